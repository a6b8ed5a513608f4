//! Header widget: page title, feed status and stats.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::theme::Theme;

/// Status indicator for the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusIndicator {
    pub label: String,
    pub color: Color,
}

impl StatusIndicator {
    pub fn new(label: impl Into<String>, color: Color) -> Self {
        Self {
            label: label.into(),
            color,
        }
    }

    pub fn success(label: impl Into<String>) -> Self {
        Self::new(label, Color::Green)
    }

    pub fn warning(label: impl Into<String>) -> Self {
        Self::new(label, Color::Yellow)
    }
}

/// A stat to display in the header.
#[derive(Debug, Clone)]
pub struct HeaderStat {
    pub label: String,
    pub value: String,
    pub color: Color,
}

impl HeaderStat {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            color: Color::Cyan,
        }
    }
}

/// Header with title, status and stats.
#[derive(Debug, Clone)]
pub struct Header<'a> {
    title: &'a str,
    status: Option<StatusIndicator>,
    stats: Vec<HeaderStat>,
    theme: Theme,
}

impl<'a> Header<'a> {
    pub fn new(title: &'a str) -> Self {
        Self {
            title,
            status: None,
            stats: Vec::new(),
            theme: Theme::default(),
        }
    }

    /// Set the status indicator.
    pub fn status(mut self, status: StatusIndicator) -> Self {
        self.status = Some(status);
        self
    }

    /// Add a stat to display.
    pub fn stat(mut self, stat: HeaderStat) -> Self {
        self.stats.push(stat);
        self
    }

    /// Set the theme.
    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    fn title_line(&self) -> Line<'static> {
        let mut spans = vec![Span::styled(
            format!(" {} ", self.title),
            Style::default()
                .fg(self.theme.accent)
                .add_modifier(Modifier::BOLD),
        )];
        if let Some(status) = &self.status {
            spans.push(Span::styled(
                format!("[{}]", status.label),
                Style::default().fg(status.color),
            ));
        }
        Line::from(spans)
    }

    fn stats_line(&self) -> Line<'static> {
        let mut spans = vec![Span::raw(" ")];
        for (i, stat) in self.stats.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" | "));
            }
            spans.push(Span::raw(format!("{}: ", stat.label)));
            spans.push(Span::styled(stat.value.clone(), Style::default().fg(stat.color)));
        }
        spans.push(Span::raw(" "));
        Line::from(spans)
    }

    /// Render the header.
    pub fn render(self, frame: &mut Frame, area: Rect) {
        let has_stats = !self.stats.is_empty();
        let constraints = if has_stats {
            vec![Constraint::Min(30), Constraint::Length(36)]
        } else {
            vec![Constraint::Min(0)]
        };

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.unfocused_border());

        let title = Paragraph::new(self.title_line()).block(block.clone());
        frame.render_widget(title, chunks[0]);

        if has_stats && chunks.len() > 1 {
            let stats = Paragraph::new(self.stats_line()).block(block);
            frame.render_widget(stats, chunks[1]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_with_status() {
        let header = Header::new("Supply Chain Network Assistant")
            .status(StatusIndicator::warning("paused"));
        assert_eq!(
            header.title_line().to_string(),
            " Supply Chain Network Assistant [paused]"
        );
    }

    #[test]
    fn test_stats_line() {
        let header = Header::new("t")
            .stat(HeaderStat::new("Steps", "2/5"))
            .stat(HeaderStat::new("Trace", "3"));
        assert_eq!(header.stats_line().to_string(), " Steps: 2/5 | Trace: 3 ");
    }

    #[test]
    fn test_render_title_and_stats() {
        use ratatui::backend::TestBackend;
        use ratatui::Terminal;

        let backend = TestBackend::new(100, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                Header::new("Supply Chain Network Assistant")
                    .status(StatusIndicator::success("streaming"))
                    .stat(HeaderStat::new("Steps", "2/5"))
                    .render(frame, frame.area())
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let row: String = (0..buffer.area.width)
            .map(|x| buffer[(x, 1)].symbol().to_string())
            .collect();
        assert!(row.contains("Supply Chain Network Assistant [streaming]"));
        assert!(row.contains("Steps: 2/5"));
    }
}
