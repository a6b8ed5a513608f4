//! Newtype wrappers for identifiers to ensure type safety.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier the agent runtime assigns to one tool invocation.
///
/// Results arrive separately from the call announcement and are matched
/// back to it through this id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolCallId(String);

impl ToolCallId {
    /// Create a new ToolCallId from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Synthesize an id for a call the feed announced without one.
    pub fn local(sequence: usize) -> Self {
        Self(format!("local-{}", sequence))
    }

    /// Get the inner string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ToolCallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ToolCallId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ToolCallId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_ids_are_distinct() {
        assert_ne!(ToolCallId::local(1), ToolCallId::local(2));
        assert_eq!(ToolCallId::local(7).as_str(), "local-7");
    }

    #[test]
    fn test_serde_transparent_string() {
        let id: ToolCallId = serde_json::from_str("\"call_42\"").unwrap();
        assert_eq!(id, ToolCallId::from("call_42"));
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"call_42\"");
    }
}
