//! Application state and main event loop.

use std::time::Duration;

use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;
use tracing::{debug, info};

use supplynet_core::ChatMessage;
use supplynet_tui_components::{Theme, ToolRendererRegistry};

use crate::config::PageConfig;
use crate::error::AppError;
use crate::event::{BackendCommand, FeedStatus, UiEvent};
use crate::feed::StateSubscription;
use crate::state::{Focus, UiState};
use crate::ui;

/// Main application with UI state and channel handles.
pub struct App {
    /// Current UI state snapshot for rendering.
    pub(crate) state: UiState,

    pub(crate) config: PageConfig,

    pub(crate) registry: ToolRendererRegistry,

    pub(crate) theme: Theme,

    /// Receiver for events from the backend.
    ui_rx: mpsc::Receiver<UiEvent>,

    /// Sender for commands to the backend.
    cmd_tx: mpsc::Sender<BackendCommand>,

    /// Shared agent state.
    subscription: StateSubscription,
}

impl App {
    pub fn new(
        config: PageConfig,
        ui_rx: mpsc::Receiver<UiEvent>,
        cmd_tx: mpsc::Sender<BackendCommand>,
        subscription: StateSubscription,
    ) -> Self {
        let mut state = UiState::new(config.show_workflow);
        state.set_agent_state(subscription.current());

        Self {
            theme: Theme::with_primary(config.primary_color),
            registry: ToolRendererRegistry::supply_chain(),
            state,
            config,
            ui_rx,
            cmd_tx,
            subscription,
        }
    }

    /// Run the main event loop.
    pub fn run(&mut self, mut terminal: DefaultTerminal) -> Result<(), AppError> {
        info!(workflow = self.state.show_workflow, "UI loop started");

        loop {
            self.sync_agent_state();

            terminal.draw(|frame| ui::render(frame, &*self))?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }

            while let Ok(event) = self.ui_rx.try_recv() {
                self.apply_event(event);
            }

            if self.state.should_quit() {
                break;
            }
        }

        let _ = self.cmd_tx.blocking_send(BackendCommand::Quit);

        Ok(())
    }

    /// Pull the latest snapshot, re-projecting only when it changed.
    pub(crate) fn sync_agent_state(&mut self) {
        if let Some(snapshot) = self.subscription.take_update() {
            self.state.set_agent_state(snapshot);
            debug!(
                trace_len = self.state.workflow.timeline_len(),
                "Workflow re-projected"
            );
        }
    }

    /// Apply an event from the backend to the UI state.
    pub(crate) fn apply_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Message(message) => {
                self.state.push_message(message);
            }
            UiEvent::ToolCall(call) => {
                debug!(tool = %call.name, id = %call.id, "Tool call");
                self.state.push_tool_call(call);
            }
            UiEvent::ToolResult { id, result } => {
                self.state.attach_result(&id, result);
            }
            UiEvent::FeedStatus(status) => {
                self.state.feed_status = status;
                self.state.status_message = match status {
                    FeedStatus::Ended => Some("Session replay finished".to_string()),
                    _ => None,
                };
            }
            UiEvent::Notice(message) => {
                self.state.status_message = Some(message);
            }
            UiEvent::Error(message) => {
                self.state.status_message = Some(format!("Error: {}", message));
            }
        }
    }

    /// Handle a key press.
    pub(crate) fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
        {
            self.state.request_quit();
            return;
        }

        if key.code == KeyCode::Tab {
            self.state.cycle_focus();
            return;
        }

        match self.state.focus {
            Focus::Input => self.handle_input_key(key.code),
            Focus::Chat | Focus::Workflow => self.handle_navigation_key(key.code),
        }
    }

    fn handle_input_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter => {
                if let Some(text) = self.state.take_input() {
                    info!(chars = text.chars().count(), "Sending message");
                    self.state.push_message(ChatMessage::user(text.clone()));
                    self.send(BackendCommand::SendMessage(text));
                }
            }
            KeyCode::Char(c) => self.state.insert_char(c),
            KeyCode::Backspace => self.state.delete_char_before_cursor(),
            KeyCode::Left => self.state.move_cursor_left(),
            KeyCode::Right => self.state.move_cursor_right(),
            _ => {}
        }
    }

    fn handle_navigation_key(&mut self, code: KeyCode) {
        let on_workflow = self.state.focus == Focus::Workflow;

        match code {
            KeyCode::Char('q') => self.state.request_quit(),

            KeyCode::Up | KeyCode::Char('k') => {
                if on_workflow {
                    self.state.select_prev_trace();
                } else {
                    self.state.select_prev_card();
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if on_workflow {
                    self.state.select_next_trace();
                } else {
                    self.state.select_next_card();
                }
            }

            KeyCode::Enter | KeyCode::Char(' ') => {
                if on_workflow {
                    self.state.toggle_selected_trace();
                } else {
                    self.state.toggle_selected_card();
                }
            }

            KeyCode::PageUp if on_workflow => self.state.scroll_workflow(-10),
            KeyCode::PageDown if on_workflow => self.state.scroll_workflow(10),

            KeyCode::Char('w') => {
                self.state.toggle_workflow();
                info!(mounted = self.state.show_workflow, "Workflow debugger toggled");
            }
            KeyCode::Char('p') => self.send(BackendCommand::TogglePause),

            _ => {}
        }
    }

    fn send(&self, command: BackendCommand) {
        if let Err(e) = self.cmd_tx.try_send(command) {
            tracing::warn!(error = %e, "Backend command dropped");
        }
    }
}
