//! Supply Network Core Domain Types
//!
//! This crate contains pure domain types with no dependencies on:
//! - Terminal rendering
//! - Async runtimes
//! - The session transport
//!
//! All types here describe what the remote supply chain agent publishes:
//! the shared workflow state, its execution trace, tool call payloads and
//! the line-delimited session events that carry them.

pub mod chat;
pub mod error;
pub mod ids;
mod lenient;
pub mod pipeline;
pub mod session;
pub mod state;
pub mod tool;

// Re-export commonly used types
pub use chat::{ChatMessage, ChatRole, ToolCall, Transcript, TranscriptItem};
pub use error::CoreError;
pub use ids::ToolCallId;
pub use pipeline::{completed_steps, Step};
pub use session::SessionEvent;
pub use state::{AgentState, TraceEntry, WorkflowState};
pub use tool::{normalize_products, ToolName, ToolPayload};

/// Name under which the supply chain agent publishes its shared state.
pub const DEFAULT_AGENT_NAME: &str = "cognitive_supply_network_agent";
