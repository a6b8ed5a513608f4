//! Single-line message input.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::theme::Theme;

/// Input box with a placeholder shown while empty.
#[derive(Debug, Clone)]
pub struct InputBox<'a> {
    text: &'a str,
    /// Cursor position in characters.
    cursor: usize,
    placeholder: &'a str,
    focused: bool,
    theme: Theme,
}

impl<'a> InputBox<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            cursor: text.chars().count(),
            placeholder: "",
            focused: false,
            theme: Theme::default(),
        }
    }

    pub fn cursor(mut self, cursor: usize) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Text as displayed, with a cursor bar when focused.
    pub fn display_text(&self) -> String {
        if self.text.is_empty() {
            return if self.focused {
                format!("│{}", self.placeholder)
            } else {
                self.placeholder.to_string()
            };
        }

        if !self.focused {
            return self.text.to_string();
        }

        let chars: Vec<char> = self.text.chars().collect();
        let cursor = self.cursor.min(chars.len());
        let before: String = chars[..cursor].iter().collect();
        let after: String = chars[cursor..].iter().collect();
        format!("{}│{}", before, after)
    }

    /// Render the widget.
    pub fn render(self, frame: &mut Frame, area: Rect) {
        let border_style = if self.focused {
            self.theme.focused_border()
        } else {
            self.theme.unfocused_border()
        };
        let text_style = if self.text.is_empty() {
            self.theme.muted_style()
        } else {
            Style::default().fg(Color::White)
        };

        let input = Paragraph::new(self.display_text()).style(text_style).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(" Message (Enter to send) "),
        );

        frame.render_widget(input, area);
    }
}
