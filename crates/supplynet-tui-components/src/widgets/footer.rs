//! Footer widget: status message and key help.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::theme::Theme;

/// Footer displaying an optional status message followed by help text.
#[derive(Debug, Clone)]
pub struct Footer<'a> {
    help: &'a str,
    status: Option<&'a str>,
    theme: Theme,
}

impl<'a> Footer<'a> {
    pub fn new(help: &'a str) -> Self {
        Self {
            help,
            status: None,
            theme: Theme::default(),
        }
    }

    /// Set a status message shown before the help text.
    pub fn status(mut self, status: Option<&'a str>) -> Self {
        self.status = status.filter(|s| !s.is_empty());
        self
    }

    /// Set the theme.
    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    fn line(&self) -> Line<'a> {
        let mut spans = Vec::new();
        if let Some(status) = self.status {
            spans.push(Span::styled(status, self.theme.warning_style()));
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(self.help, self.theme.muted_style()));
        Line::from(spans)
    }

    /// Render the footer.
    pub fn render(self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Paragraph::new(self.line()), area);
    }
}
