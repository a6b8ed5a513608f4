//! Line-delimited session events.
//!
//! The agent transport hands the console one JSON object per line. Each
//! object is tagged by `type`; types this console does not know are kept as
//! [`SessionEvent::Unknown`] so a newer transport never breaks an older
//! console.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::ids::ToolCallId;
use crate::lenient;
use crate::state::AgentState;

/// A single event from the session feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Message typed by the user.
    UserMessage { content: String },

    /// Text produced by the assistant.
    AssistantMessage { content: String },

    /// Tool invocation, optionally already carrying its result.
    ToolCall {
        #[serde(
            default,
            deserialize_with = "lenient::tool_call_id_option",
            skip_serializing_if = "Option::is_none"
        )]
        id: Option<ToolCallId>,
        name: String,
        #[serde(default)]
        args: Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result: Option<Value>,
    },

    /// Result for a previously announced tool call.
    ToolResult {
        #[serde(deserialize_with = "lenient::tool_call_id")]
        id: ToolCallId,
        #[serde(default)]
        result: Value,
    },

    /// Whole replacement of the shared agent state.
    StateSnapshot {
        /// Agent that owns the state; absent means the default agent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        agent: Option<String>,
        #[serde(default)]
        state: Value,
    },

    /// Unknown event type (fallback).
    #[serde(untagged)]
    Unknown(Value),
}

impl SessionEvent {
    /// Every `type` tag this console decodes.
    pub const KINDS: [&'static str; 5] = [
        "user_message",
        "assistant_message",
        "tool_call",
        "tool_result",
        "state_snapshot",
    ];

    /// Parse one line of the feed. Blank lines yield `None`.
    pub fn parse_line(line: &str) -> Result<Option<Self>, CoreError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(line)?))
    }

    /// Serialize as a single feed line (no trailing newline).
    pub fn to_line(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Create a user message event.
    pub fn user_message(content: impl Into<String>) -> Self {
        Self::UserMessage {
            content: content.into(),
        }
    }

    /// Short name of the event type, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UserMessage { .. } => "user_message",
            Self::AssistantMessage { .. } => "assistant_message",
            Self::ToolCall { .. } => "tool_call",
            Self::ToolResult { .. } => "tool_result",
            Self::StateSnapshot { .. } => "state_snapshot",
            Self::Unknown(_) => "unknown",
        }
    }

    /// For [`SessionEvent::Unknown`]: the `type` tag, if it is one of
    /// [`SessionEvent::KINDS`]. Such an event was recognized but its fields
    /// did not decode.
    pub fn malformed_kind(&self) -> Option<&'static str> {
        match self {
            Self::Unknown(value) => {
                let tag = value.get("type")?.as_str()?;
                Self::KINDS.into_iter().find(|kind| *kind == tag)
            }
            _ => None,
        }
    }

    /// For snapshots: whether the snapshot belongs to `agent_name`.
    pub fn is_for_agent(&self, agent_name: &str) -> bool {
        match self {
            Self::StateSnapshot { agent, .. } => {
                agent.as_deref().map_or(true, |agent| agent == agent_name)
            }
            _ => false,
        }
    }

    /// For snapshots: the decoded agent state.
    pub fn snapshot(&self) -> Option<AgentState> {
        match self {
            Self::StateSnapshot { state, .. } => Some(AgentState::from_value(state.clone())),
            _ => None,
        }
    }
}
