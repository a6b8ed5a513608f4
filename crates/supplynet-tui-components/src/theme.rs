//! Theme and style definitions.

use ratatui::style::{Color, Modifier, Style};

/// Default accent, the indigo used by the hosted chat surface.
pub const DEFAULT_PRIMARY: Color = Color::Rgb(0x63, 0x66, 0xf1);

/// Theme configuration for the supply network console.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Primary accent color (focused borders, card headers, selection)
    pub accent: Color,
    /// Success color (completed steps)
    pub success: Color,
    /// Warning color (spikes, paused feed)
    pub warning: Color,
    /// Muted color (timestamps, pending steps, placeholders)
    pub muted: Color,
    /// User message color
    pub user: Color,
    /// Assistant message color
    pub assistant: Color,
    /// System message color
    pub system: Color,
    /// Tool name color in the execution timeline
    pub tool: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: DEFAULT_PRIMARY,
            success: Color::Green,
            warning: Color::Yellow,
            muted: Color::DarkGray,
            user: Color::Cyan,
            assistant: Color::Green,
            system: Color::Yellow,
            tool: Color::LightBlue,
        }
    }
}

impl Theme {
    /// Default theme with a custom accent color.
    pub fn with_primary(primary: Color) -> Self {
        Self {
            accent: primary,
            ..Self::default()
        }
    }

    /// Style for focused/active borders.
    pub fn focused_border(&self) -> Style {
        Style::default().fg(self.accent)
    }

    /// Style for unfocused borders.
    pub fn unfocused_border(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Style for the selected card or timeline entry header.
    pub fn selected_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    }

    /// Style for card headers.
    pub fn card_title_style(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    /// Style for success text.
    pub fn success_style(&self) -> Style {
        Style::default().fg(self.success)
    }

    /// Style for warning text.
    pub fn warning_style(&self) -> Style {
        Style::default().fg(self.warning)
    }

    /// Style for muted/secondary text.
    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Style for bold text.
    pub fn bold(&self) -> Style {
        Style::default().add_modifier(Modifier::BOLD)
    }

    /// Style for user messages.
    pub fn user_style(&self) -> Style {
        Style::default().fg(self.user)
    }

    /// Style for assistant messages.
    pub fn assistant_style(&self) -> Style {
        Style::default().fg(self.assistant)
    }

    /// Style for system messages.
    pub fn system_style(&self) -> Style {
        Style::default().fg(self.system)
    }

    /// Style for tool names.
    pub fn tool_style(&self) -> Style {
        Style::default().fg(self.tool).add_modifier(Modifier::BOLD)
    }
}
