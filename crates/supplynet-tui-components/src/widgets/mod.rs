//! Reusable TUI widgets.

pub mod card;
pub mod chat;
pub mod footer;
pub mod header;
pub mod input;
pub mod tools;
pub mod workflow;
