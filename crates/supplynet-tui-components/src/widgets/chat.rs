//! Chat transcript widget: messages interleaved with tool result cards.

use chrono::DateTime;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use supplynet_core::{ChatMessage, ChatRole, ToolCall, Transcript, TranscriptItem};

use crate::theme::Theme;
use crate::utils::wrap_text_indented;
use crate::widgets::card::{CardState, CardView};
use crate::widgets::tools::ToolRendererRegistry;

/// Chat widget over a [`Transcript`].
///
/// Tool calls are numbered in transcript order; `card_states` and
/// `selected_card` use that numbering.
#[derive(Debug, Clone)]
pub struct ChatWidget<'a> {
    transcript: &'a Transcript,
    registry: &'a ToolRendererRegistry,
    card_states: &'a [CardState],
    selected_card: Option<usize>,
    instructions: Option<&'a str>,
    greeting: Option<&'a str>,
    /// Scroll offset (usize::MAX = follow the bottom or the selection).
    scroll: usize,
    focused: bool,
    title: Option<String>,
    theme: Theme,
}

impl<'a> ChatWidget<'a> {
    pub fn new(transcript: &'a Transcript, registry: &'a ToolRendererRegistry) -> Self {
        Self {
            transcript,
            registry,
            card_states: &[],
            selected_card: None,
            instructions: None,
            greeting: None,
            scroll: usize::MAX,
            focused: false,
            title: None,
            theme: Theme::default(),
        }
    }

    /// Per-card expansion state; missing entries are collapsed.
    pub fn card_states(mut self, states: &'a [CardState]) -> Self {
        self.card_states = states;
        self
    }

    /// Highlight a tool card.
    pub fn selected_card(mut self, selected: Option<usize>) -> Self {
        self.selected_card = selected;
        self
    }

    /// System instructions shown dimmed at the top.
    pub fn instructions(mut self, instructions: &'a str) -> Self {
        if !instructions.is_empty() {
            self.instructions = Some(instructions);
        }
        self
    }

    /// Opening assistant line shown above the transcript.
    pub fn greeting(mut self, greeting: &'a str) -> Self {
        if !greeting.is_empty() {
            self.greeting = Some(greeting);
        }
        self
    }

    /// Set the scroll offset.
    pub fn scroll(mut self, offset: usize) -> Self {
        self.scroll = offset;
        self
    }

    /// Set whether the widget is focused.
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Set a custom title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the theme.
    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// All transcript lines, plus the line index of the selected card header.
    pub fn lines(&self, width: usize) -> (Vec<Line<'static>>, Option<usize>) {
        let mut all_lines: Vec<Line<'static>> = Vec::new();
        let mut selected_line = None;

        if let Some(instructions) = self.instructions {
            all_lines.push(Line::from(Span::styled(
                "System",
                self.theme.system_style().add_modifier(Modifier::BOLD),
            )));
            for wrapped in wrap_text_indented(instructions, width, "  ") {
                all_lines.push(Line::from(Span::styled(wrapped, self.theme.muted_style())));
            }
            all_lines.push(Line::from(""));
        }

        if let Some(greeting) = self.greeting {
            all_lines.push(Line::from(Span::styled(
                "Assistant",
                self.theme.assistant_style().add_modifier(Modifier::BOLD),
            )));
            for wrapped in wrap_text_indented(greeting, width, "  ") {
                all_lines.push(Line::from(wrapped));
            }
            all_lines.push(Line::from(""));
        }

        let mut card_index = 0;
        for item in self.transcript.items() {
            match item {
                TranscriptItem::Message(message) => {
                    self.push_message(&mut all_lines, message, width);
                }
                TranscriptItem::ToolCall(call) => {
                    let selected = self.selected_card == Some(card_index);
                    if selected {
                        selected_line = Some(all_lines.len());
                    }
                    let state = self.card_states.get(card_index).copied().unwrap_or_default();
                    self.push_tool_call(&mut all_lines, call, state, selected);
                    card_index += 1;
                }
            }
        }

        (all_lines, selected_line)
    }

    fn push_message(&self, lines: &mut Vec<Line<'static>>, message: &ChatMessage, width: usize) {
        let (prefix, style) = match message.role {
            ChatRole::User => ("You", self.theme.user_style()),
            ChatRole::Assistant => ("Assistant", self.theme.assistant_style()),
            ChatRole::System => ("System", self.theme.system_style()),
        };

        let mut header = vec![Span::styled(prefix, style.add_modifier(Modifier::BOLD))];
        if let Some(time) = DateTime::from_timestamp_millis(message.timestamp_ms) {
            header.push(Span::raw(" "));
            header.push(Span::styled(
                time.format("%H:%M:%S").to_string(),
                self.theme.muted_style(),
            ));
        }
        lines.push(Line::from(header));

        for wrapped in wrap_text_indented(&message.content, width, "  ") {
            lines.push(Line::from(wrapped));
        }
        lines.push(Line::from(""));
    }

    fn push_tool_call(
        &self,
        lines: &mut Vec<Line<'static>>,
        call: &ToolCall,
        state: CardState,
        selected: bool,
    ) {
        match self.registry.render(&call.name, &call.args, call.result.as_ref()) {
            Some(card) => {
                let view = CardView::new(&card, state)
                    .selected(selected)
                    .theme(self.theme.clone());
                lines.extend(view.lines());
            }
            None => {
                // No renderer: one muted line naming the tool
                let style = if selected {
                    self.theme.selected_style()
                } else {
                    self.theme.muted_style()
                };
                let status = if call.result.is_some() { "done" } else { "running" };
                lines.push(Line::from(Span::styled(
                    format!("⚙ {} ({})", call.name, status),
                    style,
                )));
            }
        }
        lines.push(Line::from(""));
    }

    /// Render the widget.
    pub fn render(self, frame: &mut Frame, area: Rect) {
        let border_style = if self.focused {
            self.theme.focused_border()
        } else {
            self.theme.unfocused_border()
        };

        let visible_height = area.height.saturating_sub(2) as usize;
        let text_width = area.width.saturating_sub(2) as usize;

        let (all_lines, selected_line) = self.lines(text_width);
        let total_lines = all_lines.len();

        let max_scroll = total_lines.saturating_sub(visible_height);
        let scroll_offset = match (self.scroll, selected_line) {
            (usize::MAX, Some(line)) => line.saturating_sub(visible_height / 3).min(max_scroll),
            (usize::MAX, None) => max_scroll,
            (offset, _) => offset.min(max_scroll),
        };

        let lines: Vec<Line> = all_lines
            .into_iter()
            .skip(scroll_offset)
            .take(visible_height)
            .collect();

        let title = self
            .title
            .map(|title| format!(" {} ", title))
            .unwrap_or_else(|| " Chat ".to_string());

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(title),
        );

        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use serde_json::json;
    use supplynet_core::ToolCallId;

    fn texts(lines: &[Line<'_>]) -> Vec<String> {
        lines.iter().map(|line| line.to_string()).collect()
    }

    fn transcript() -> Transcript {
        let mut transcript = Transcript::new();
        transcript.push_message(ChatMessage::user("jackets are selling out in Delhi"));
        transcript.push_tool_call(
            ToolCall::new(
                ToolCallId::new("c1"),
                "forecast_demand",
                json!({ "product_sku": "WJ-DNM-BLK-M", "region": "Delhi" }),
            )
            .with_result(json!({ "peak_demand": 144 })),
        );
        transcript.push_tool_call(ToolCall::new(
            ToolCallId::new("c2"),
            "get_warehouse_status",
            json!({}),
        ));
        transcript
    }

    #[test]
    fn test_registered_tool_renders_card() {
        let transcript = transcript();
        let registry = ToolRendererRegistry::supply_chain();
        let (lines, _) = ChatWidget::new(&transcript, &registry).lines(60);
        let lines = texts(&lines);
        assert!(lines.iter().any(|l| l == "▸ 📈 Demand Forecast"));
        assert!(!lines.iter().any(|l| l.contains("peak_demand")));
    }

    #[test]
    fn test_unregistered_tool_falls_back() {
        let transcript = transcript();
        let registry = ToolRendererRegistry::supply_chain();
        let (lines, _) = ChatWidget::new(&transcript, &registry).lines(60);
        assert!(texts(&lines)
            .iter()
            .any(|l| l == "⚙ get_warehouse_status (running)"));
    }

    #[test]
    fn test_empty_registry_falls_back_for_everything() {
        let transcript = transcript();
        let registry = ToolRendererRegistry::new();
        let (lines, _) = ChatWidget::new(&transcript, &registry).lines(60);
        let lines = texts(&lines);
        assert!(lines.iter().any(|l| l == "⚙ forecast_demand (done)"));
        assert!(!lines.iter().any(|l| l.contains("▸")));
    }

    #[test]
    fn test_expanded_card_and_selection() {
        let transcript = transcript();
        let registry = ToolRendererRegistry::supply_chain();
        let mut first = CardState::new();
        first.toggle();
        let states = [first];

        let (lines, selected_line) = ChatWidget::new(&transcript, &registry)
            .card_states(&states)
            .selected_card(Some(0))
            .lines(60);
        let lines = texts(&lines);

        let header = selected_line.unwrap();
        assert_eq!(lines[header], "▾ 📈 Demand Forecast");
        assert_eq!(lines[header + 1], "  SKU: WJ-DNM-BLK-M | Region: Delhi");
        assert!(lines.iter().any(|l| l.contains("\"peak_demand\": 144")));
    }

    #[test]
    fn test_greeting_shown_first() {
        let transcript = Transcript::new();
        let registry = ToolRendererRegistry::supply_chain();
        let (lines, selected) = ChatWidget::new(&transcript, &registry)
            .greeting("How can I help with your supply chain today?")
            .lines(80);
        assert_eq!(
            texts(&lines)[..2],
            [
                "Assistant".to_string(),
                "  How can I help with your supply chain today?".to_string()
            ]
        );
        assert!(selected.is_none());
    }

    #[test]
    fn test_instructions_precede_greeting() {
        let transcript = Transcript::new();
        let registry = ToolRendererRegistry::new();
        let (lines, _) = ChatWidget::new(&transcript, &registry)
            .instructions("Delegate tasks in order.")
            .greeting("Hello")
            .lines(80);
        assert_eq!(
            texts(&lines),
            vec!["System", "  Delegate tasks in order.", "", "Assistant", "  Hello", ""]
        );
    }

    #[test]
    fn test_render_smoke() {
        let transcript = transcript();
        let registry = ToolRendererRegistry::supply_chain();
        let backend = TestBackend::new(50, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                ChatWidget::new(&transcript, &registry)
                    .title("Supply Chain Assistant")
                    .focused(true)
                    .render(frame, frame.area())
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let first_row: String = (0..buffer.area.width)
            .map(|x| buffer[(x, 0)].symbol().to_string())
            .collect();
        assert!(first_row.contains("Supply Chain Assistant"));
    }
}
