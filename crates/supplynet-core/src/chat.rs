//! Conversation transcript: chat messages interleaved with tool calls.

use serde_json::Value;

use crate::error::CoreError;
use crate::ids::ToolCallId;
use crate::tool::ToolPayload;

/// Role of a message in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    /// User message (input/prompt).
    User,
    /// Assistant message (response).
    Assistant,
    /// System message (instructions).
    System,
}

/// A message in the conversation history.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    /// Role of this message.
    pub role: ChatRole,
    /// Message content.
    pub content: String,
    /// Unix timestamp (milliseconds) when message was created.
    pub timestamp_ms: i64,
}

impl ChatMessage {
    /// Create a new chat message.
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }

    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ChatRole::System, content)
    }
}

/// A tool invocation observed in the conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub id: ToolCallId,
    /// Tool name as sent by the agent.
    pub name: String,
    pub args: Value,
    /// Result, once the tool has completed.
    pub result: Option<Value>,
    /// Unix timestamp (milliseconds) when the call was announced.
    pub timestamp_ms: i64,
}

impl ToolCall {
    /// Create a pending tool call.
    pub fn new(id: ToolCallId, name: impl Into<String>, args: Value) -> Self {
        Self {
            id,
            name: name.into(),
            args,
            result: None,
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Builder method to set the result.
    pub fn with_result(mut self, result: Value) -> Self {
        self.result = Some(result);
        self
    }

    /// Decode arguments and result for rendering.
    pub fn payload(&self) -> ToolPayload {
        ToolPayload::decode(&self.name, &self.args, self.result.as_ref())
    }
}

/// One entry of the conversation transcript.
#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptItem {
    Message(ChatMessage),
    ToolCall(ToolCall),
}

/// Ordered conversation transcript.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    items: Vec<TranscriptItem>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[TranscriptItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push_message(&mut self, message: ChatMessage) {
        self.items.push(TranscriptItem::Message(message));
    }

    pub fn push_tool_call(&mut self, call: ToolCall) {
        self.items.push(TranscriptItem::ToolCall(call));
    }

    /// Attach a result to the most recent call with the given id.
    pub fn attach_result(&mut self, id: &ToolCallId, result: Value) -> Result<(), CoreError> {
        let call = self
            .items
            .iter_mut()
            .rev()
            .find_map(|item| match item {
                TranscriptItem::ToolCall(call) if &call.id == id => Some(call),
                _ => None,
            })
            .ok_or_else(|| CoreError::ToolCallNotFound(id.to_string()))?;
        call.result = Some(result);
        Ok(())
    }

    /// Tool calls in transcript order.
    pub fn tool_calls(&self) -> impl Iterator<Item = &ToolCall> {
        self.items.iter().filter_map(|item| match item {
            TranscriptItem::ToolCall(call) => Some(call),
            TranscriptItem::Message(_) => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_attach_result() {
        let mut transcript = Transcript::new();
        transcript.push_message(ChatMessage::user("Cyclone warning in Mumbai"));
        transcript.push_tool_call(ToolCall::new(
            ToolCallId::from("c1"),
            "forecast_demand",
            json!({ "product_sku": "RC-UMB-BLK", "region": "Mumbai" }),
        ));

        transcript
            .attach_result(&ToolCallId::from("c1"), json!({ "peak_demand": 900 }))
            .unwrap();

        let call = transcript.tool_calls().next().unwrap();
        assert_eq!(call.result, Some(json!({ "peak_demand": 900 })));
    }

    #[test]
    fn test_attach_result_unknown_id() {
        let mut transcript = Transcript::new();
        let err = transcript
            .attach_result(&ToolCallId::from("missing"), json!(null))
            .unwrap_err();
        assert!(matches!(err, CoreError::ToolCallNotFound(ref id) if id == "missing"));
    }

    #[test]
    fn test_tool_calls_skip_messages() {
        let mut transcript = Transcript::new();
        transcript.push_message(ChatMessage::assistant("Checking demand"));
        transcript.push_tool_call(ToolCall::new(ToolCallId::local(0), "a", json!({})));
        transcript.push_message(ChatMessage::assistant("Checking stock"));
        transcript.push_tool_call(ToolCall::new(ToolCallId::local(1), "b", json!({})));

        let names: Vec<&str> = transcript.tool_calls().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(transcript.len(), 4);
    }
}
