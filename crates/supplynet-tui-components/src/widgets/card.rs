//! Collapsible card used to present tool results and trace details.
//!
//! A [`Card`] is immutable content: a title and a body. Whether it is open
//! lives in a separate [`CardState`] owned by whoever hosts the card, one
//! state per card instance, so toggling one card never affects another.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::theme::Theme;

/// Default number of body lines shown before clipping.
pub const DEFAULT_MAX_BODY_LINES: usize = 12;

/// Disclosure state of one card. Starts collapsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CardState {
    expanded: bool,
}

impl CardState {
    /// A collapsed card state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip between collapsed and expanded.
    pub fn toggle(&mut self) {
        self.expanded = !self.expanded;
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }
}

/// Title plus arbitrary body content.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    title: String,
    body: Vec<Line<'static>>,
}

impl Card {
    /// Create a card from prepared lines.
    pub fn new(title: impl Into<String>, body: Vec<Line<'static>>) -> Self {
        Self {
            title: title.into(),
            body,
        }
    }

    /// Create a card with no body.
    pub fn empty(title: impl Into<String>) -> Self {
        Self::new(title, Vec::new())
    }

    /// Create a card whose body is plain text lines.
    pub fn text<I, S>(title: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            title,
            lines
                .into_iter()
                .map(|line| Line::from(line.into()))
                .collect(),
        )
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &[Line<'static>] {
        &self.body
    }

    /// Plain text of the body, one string per line.
    pub fn body_text(&self) -> Vec<String> {
        self.body.iter().map(|line| line.to_string()).collect()
    }
}

/// Renders a card according to its state.
#[derive(Debug, Clone)]
pub struct CardView<'a> {
    card: &'a Card,
    state: CardState,
    selected: bool,
    max_body_lines: usize,
    indent: &'static str,
    theme: Theme,
}

impl<'a> CardView<'a> {
    pub fn new(card: &'a Card, state: CardState) -> Self {
        Self {
            card,
            state,
            selected: false,
            max_body_lines: DEFAULT_MAX_BODY_LINES,
            indent: "  ",
            theme: Theme::default(),
        }
    }

    /// Highlight the header as the current selection.
    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Limit the number of body lines shown when expanded.
    pub fn max_body_lines(mut self, max: usize) -> Self {
        self.max_body_lines = max;
        self
    }

    /// Prefix for body lines.
    pub fn indent(mut self, indent: &'static str) -> Self {
        self.indent = indent;
        self
    }

    /// Set the theme.
    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Header line plus, when expanded, the (clipped) body.
    pub fn lines(&self) -> Vec<Line<'static>> {
        let glyph = if self.state.is_expanded() { "▾" } else { "▸" };
        let header_style = if self.selected {
            self.theme.selected_style()
        } else {
            self.theme.card_title_style()
        };

        let mut lines = vec![Line::from(Span::styled(
            format!("{} {}", glyph, self.card.title),
            header_style,
        ))];

        if !self.state.is_expanded() {
            return lines;
        }

        for body_line in self.card.body.iter().take(self.max_body_lines) {
            let mut spans = vec![Span::raw(self.indent)];
            spans.extend(body_line.spans.iter().cloned());
            lines.push(Line::from(spans));
        }

        let hidden = self.card.body.len().saturating_sub(self.max_body_lines);
        if hidden > 0 {
            lines.push(Line::from(Span::styled(
                format!("{}… {} more lines", self.indent, hidden),
                self.theme.muted_style(),
            )));
        }

        lines
    }

    /// Render the card inside its own bordered block.
    pub fn render(self, frame: &mut Frame, area: Rect) {
        let border_style = if self.selected {
            self.theme.focused_border()
        } else {
            self.theme.unfocused_border()
        };
        let paragraph = Paragraph::new(self.lines())
            .block(Block::default().borders(Borders::ALL).border_style(border_style));
        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(lines: &[Line<'_>]) -> Vec<String> {
        lines.iter().map(|line| line.to_string()).collect()
    }

    #[test]
    fn test_starts_collapsed() {
        assert!(!CardState::new().is_expanded());
    }

    #[test]
    fn test_toggle_parity() {
        for n in 0..7 {
            let mut state = CardState::new();
            for _ in 0..n {
                state.toggle();
            }
            assert_eq!(state.is_expanded(), n % 2 == 1, "after {} toggles", n);
        }
    }

    #[test]
    fn test_states_are_independent() {
        let mut first = CardState::new();
        let second = CardState::new();
        first.toggle();
        assert!(first.is_expanded());
        assert!(!second.is_expanded());
    }

    #[test]
    fn test_collapsed_shows_header_only() {
        let card = Card::text("🚨 Alert Sent", ["{", "}"]);
        let lines = CardView::new(&card, CardState::new()).lines();
        assert_eq!(texts(&lines), vec!["▸ 🚨 Alert Sent"]);
    }

    #[test]
    fn test_expanded_shows_body() {
        let card = Card::text("🚨 Alert Sent", ["{", "}"]);
        let mut state = CardState::new();
        state.toggle();
        let lines = CardView::new(&card, state).lines();
        assert_eq!(texts(&lines), vec!["▾ 🚨 Alert Sent", "  {", "  }"]);
    }

    #[test]
    fn test_empty_body_renders() {
        let card = Card::empty("📦 Inventory Optimization");
        let mut state = CardState::new();
        state.toggle();
        let lines = CardView::new(&card, state).lines();
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_body_is_clipped() {
        let card = Card::text("big", (0..20).map(|i| i.to_string()));
        let mut state = CardState::new();
        state.toggle();
        let lines = CardView::new(&card, state).max_body_lines(5).lines();
        assert_eq!(lines.len(), 1 + 5 + 1);
        assert_eq!(lines[6].to_string(), "  … 15 more lines");
    }
}
