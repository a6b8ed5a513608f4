//! UI state for rendering.

use std::sync::Arc;

use supplynet_core::{AgentState, ChatMessage, ToolCall, ToolCallId, Transcript};
use supplynet_tui_components::{CardState, WorkflowView};

use crate::event::FeedStatus;

/// Which panel receives navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Chat,
    Input,
    Workflow,
}

/// Snapshot of data for rendering (no async, no locks).
#[derive(Debug)]
pub struct UiState {
    /// Conversation so far.
    pub transcript: Transcript,

    /// One state per tool call, in transcript order.
    pub card_states: Vec<CardState>,

    /// Selected tool card.
    pub selected_card: Option<usize>,

    /// Latest state snapshot.
    pub agent_state: Arc<AgentState>,

    /// Projection of `agent_state`.
    pub workflow: WorkflowView,

    /// One state per execution trace entry.
    pub trace_states: Vec<CardState>,

    /// Selected timeline entry.
    pub selected_trace: Option<usize>,

    /// Scroll offset of the workflow debugger (usize::MAX = follow the
    /// selected entry).
    pub workflow_scroll: usize,

    /// Whether the workflow debugger is mounted.
    pub show_workflow: bool,

    pub focus: Focus,

    /// Text typed into the input box.
    pub input: String,

    /// Cursor position in characters.
    pub input_cursor: usize,

    pub feed_status: FeedStatus,

    /// Status message to display in footer.
    pub status_message: Option<String>,

    should_quit: bool,
}

impl UiState {
    pub fn new(show_workflow: bool) -> Self {
        let agent_state = Arc::new(AgentState::default());
        Self {
            transcript: Transcript::new(),
            card_states: Vec::new(),
            selected_card: None,
            workflow: WorkflowView::project(&agent_state),
            agent_state,
            trace_states: Vec::new(),
            selected_trace: None,
            workflow_scroll: usize::MAX,
            show_workflow,
            focus: Focus::default(),
            input: String::new(),
            input_cursor: 0,
            feed_status: FeedStatus::default(),
            status_message: None,
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    pub fn push_message(&mut self, message: ChatMessage) {
        self.transcript.push_message(message);
    }

    /// Add a tool call with its own collapsed card.
    pub fn push_tool_call(&mut self, call: ToolCall) {
        self.transcript.push_tool_call(call);
        self.card_states.push(CardState::new());
    }

    /// Attach a result to an earlier tool call. Unknown ids are reported
    /// and dropped.
    pub fn attach_result(&mut self, id: &ToolCallId, result: serde_json::Value) {
        if let Err(e) = self.transcript.attach_result(id, result) {
            tracing::warn!(error = %e, "Dropping tool result");
            self.status_message = Some(e.to_string());
        }
    }

    /// Replace the snapshot and re-project it. Timeline expansion state is
    /// kept for entries that still exist.
    pub fn set_agent_state(&mut self, state: Arc<AgentState>) {
        self.workflow = WorkflowView::project(&state);
        self.agent_state = state;

        let len = self.workflow.timeline_len();
        self.trace_states.resize(len, CardState::new());
        self.selected_trace = match (self.selected_trace, len) {
            (_, 0) => None,
            (Some(i), _) => Some(i.min(len - 1)),
            (None, _) => None,
        };
    }

    pub fn card_count(&self) -> usize {
        self.card_states.len()
    }

    pub fn select_next_card(&mut self) {
        self.selected_card = step_selection(self.selected_card, self.card_count(), true);
    }

    pub fn select_prev_card(&mut self) {
        self.selected_card = step_selection(self.selected_card, self.card_count(), false);
    }

    pub fn toggle_selected_card(&mut self) {
        if let Some(state) = self.selected_card.and_then(|i| self.card_states.get_mut(i)) {
            state.toggle();
        }
    }

    pub fn select_next_trace(&mut self) {
        self.selected_trace = step_selection(self.selected_trace, self.trace_states.len(), true);
        self.workflow_scroll = usize::MAX;
    }

    pub fn select_prev_trace(&mut self) {
        self.selected_trace = step_selection(self.selected_trace, self.trace_states.len(), false);
        self.workflow_scroll = usize::MAX;
    }

    /// Page the workflow debugger by `lines`, leaving selection-follow mode.
    pub fn scroll_workflow(&mut self, lines: isize) {
        let base = if self.workflow_scroll == usize::MAX {
            0
        } else {
            self.workflow_scroll
        };
        self.workflow_scroll = base.saturating_add_signed(lines);
    }

    pub fn toggle_selected_trace(&mut self) {
        if let Some(state) = self.selected_trace.and_then(|i| self.trace_states.get_mut(i)) {
            state.toggle();
        }
    }

    /// Tab order: chat, input, then workflow when mounted.
    pub fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Chat => Focus::Input,
            Focus::Input if self.show_workflow => Focus::Workflow,
            Focus::Input | Focus::Workflow => Focus::Chat,
        };
    }

    /// Mount or unmount the workflow debugger.
    pub fn toggle_workflow(&mut self) {
        self.show_workflow = !self.show_workflow;
        if !self.show_workflow && self.focus == Focus::Workflow {
            self.focus = Focus::Chat;
        }
    }

    pub fn insert_char(&mut self, c: char) {
        let byte_index = self.cursor_byte_index();
        self.input.insert(byte_index, c);
        self.input_cursor += 1;
    }

    pub fn delete_char_before_cursor(&mut self) {
        if self.input_cursor == 0 {
            return;
        }
        self.input_cursor -= 1;
        let byte_index = self.cursor_byte_index();
        self.input.remove(byte_index);
    }

    pub fn move_cursor_left(&mut self) {
        self.input_cursor = self.input_cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        self.input_cursor = (self.input_cursor + 1).min(self.input.chars().count());
    }

    /// Take the typed message, leaving the input empty. Blank input yields
    /// `None` and is left untouched.
    pub fn take_input(&mut self) -> Option<String> {
        let text = self.input.trim().to_string();
        if text.is_empty() {
            return None;
        }
        self.input.clear();
        self.input_cursor = 0;
        Some(text)
    }

    fn cursor_byte_index(&self) -> usize {
        self.input
            .char_indices()
            .nth(self.input_cursor)
            .map_or(self.input.len(), |(i, _)| i)
    }
}

fn step_selection(current: Option<usize>, len: usize, forward: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match (current, forward) {
        (None, true) => 0,
        (None, false) => len - 1,
        (Some(i), true) => (i + 1).min(len - 1),
        (Some(i), false) => i.saturating_sub(1),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(id: &str) -> ToolCall {
        ToolCall::new(ToolCallId::new(id), "forecast_demand", json!({}))
    }

    #[test]
    fn test_card_states_follow_tool_calls() {
        let mut state = UiState::new(false);
        state.push_tool_call(call("c1"));
        state.push_tool_call(call("c2"));
        assert_eq!(state.card_count(), 2);

        state.select_next_card();
        state.select_next_card();
        state.toggle_selected_card();
        assert!(!state.card_states[0].is_expanded());
        assert!(state.card_states[1].is_expanded());
    }

    #[test]
    fn test_selection_clamps() {
        assert_eq!(step_selection(None, 0, true), None);
        assert_eq!(step_selection(None, 3, false), Some(2));
        assert_eq!(step_selection(Some(2), 3, true), Some(2));
        assert_eq!(step_selection(Some(0), 3, false), Some(0));
    }

    #[test]
    fn test_unknown_result_is_dropped() {
        let mut state = UiState::new(false);
        state.push_tool_call(call("c1"));
        state.attach_result(&ToolCallId::new("missing"), json!({}));
        assert!(state.status_message.is_some());
        assert!(state.transcript.tool_calls().all(|c| c.result.is_none()));
    }

    #[test]
    fn test_snapshot_keeps_trace_expansion() {
        let mut state = UiState::new(true);
        let snapshot = |n: usize| {
            let trace: Vec<_> = (0..n)
                .map(|_| json!({ "agent": "DemandAgent", "tool": "forecast_demand", "output": {} }))
                .collect();
            Arc::new(AgentState::from_value(
                json!({ "workflow_state": { "execution_trace": trace } }),
            ))
        };

        state.set_agent_state(snapshot(1));
        state.select_next_trace();
        state.toggle_selected_trace();

        state.set_agent_state(snapshot(3));
        assert_eq!(state.trace_states.len(), 3);
        assert!(state.trace_states[0].is_expanded());
        assert!(!state.trace_states[2].is_expanded());
    }

    #[test]
    fn test_focus_cycle_skips_unmounted_workflow() {
        let mut state = UiState::new(false);
        state.cycle_focus();
        assert_eq!(state.focus, Focus::Input);
        state.cycle_focus();
        assert_eq!(state.focus, Focus::Chat);

        state.toggle_workflow();
        state.cycle_focus();
        state.cycle_focus();
        assert_eq!(state.focus, Focus::Workflow);

        state.toggle_workflow();
        assert_eq!(state.focus, Focus::Chat);
    }

    #[test]
    fn test_input_editing() {
        let mut state = UiState::new(false);
        for c in "reoder".chars() {
            state.insert_char(c);
        }
        state.move_cursor_left();
        state.move_cursor_left();
        state.move_cursor_left();
        state.insert_char('r');
        assert_eq!(state.input, "reorder");

        state.delete_char_before_cursor();
        assert_eq!(state.input, "reoder");

        assert_eq!(state.take_input().as_deref(), Some("reoder"));
        assert!(state.input.is_empty());
        assert_eq!(state.take_input(), None);
    }

    #[test]
    fn test_workflow_scroll_follows_selection_until_paged() {
        let mut state = UiState::new(true);
        assert_eq!(state.workflow_scroll, usize::MAX);

        state.scroll_workflow(10);
        assert_eq!(state.workflow_scroll, 10);
        state.scroll_workflow(-25);
        assert_eq!(state.workflow_scroll, 0);

        state.select_next_trace();
        assert_eq!(state.workflow_scroll, usize::MAX);
    }
}
