//! Event types for communication between the backend and the UI.

use serde_json::Value;

use supplynet_core::{ChatMessage, ToolCall, ToolCallId};

/// Progress of the session feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedStatus {
    /// No session file configured.
    #[default]
    Idle,

    /// Replaying events.
    Streaming,

    /// At the end of the file, waiting for appended lines.
    Following,

    /// Replay suspended by the user.
    Paused,

    /// The whole file was replayed.
    Ended,
}

impl FeedStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Streaming => "streaming",
            Self::Following => "following",
            Self::Paused => "paused",
            Self::Ended => "ended",
        }
    }
}

/// Events sent from the backend to the UI thread.
#[derive(Debug)]
pub enum UiEvent {
    /// A chat message was observed.
    Message(ChatMessage),

    /// A tool call was announced.
    ToolCall(ToolCall),

    /// A tool call completed.
    ToolResult { id: ToolCallId, result: Value },

    /// The feed changed state.
    FeedStatus(FeedStatus),

    /// Informational status line.
    Notice(String),

    /// An error occurred.
    Error(String),
}

/// Commands sent from the UI to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    /// Forward a message typed by the user.
    SendMessage(String),

    /// Pause or resume the replay.
    TogglePause,

    /// Quit the application.
    Quit,
}
