//! Page and feed configuration.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use ratatui::style::Color;
use supplynet_core::DEFAULT_AGENT_NAME;

use crate::error::AppError;

/// Default log file, next to the terminal rather than on it.
pub const DEFAULT_LOG_FILE: &str = "/tmp/supplynet-tui.log";

/// Default tracing filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "supplynet_tui=debug,supplynet_core=info";

/// Static configuration of the page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageConfig {
    /// Page title shown in the header.
    pub title: String,

    /// Title of the chat panel.
    pub chat_title: String,

    /// Opening assistant line.
    pub greeting: String,

    /// Input placeholder.
    pub placeholder: String,

    /// Orchestrator instructions handed to the agent.
    pub instructions: String,

    /// Accent color.
    pub primary_color: Color,

    /// Whether the workflow debugger is mounted.
    pub show_workflow: bool,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: "Supply Chain Network Assistant 🕵️‍♀️".to_string(),
            chat_title: "Supply Chain Assistant".to_string(),
            greeting: "How can I help with your supply chain today?".to_string(),
            placeholder: "Ask about demand, inventory, vendors...".to_string(),
            instructions: concat!(
                "You are a supply chain orchestrator. ",
                "Delegate tasks to specialists in the correct order."
            )
            .to_string(),
            primary_color: Color::Rgb(0x63, 0x66, 0xf1),
            show_workflow: false,
        }
    }
}

/// Session feed configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedConfig {
    /// Line-delimited session file to replay.
    pub session_path: Option<PathBuf>,

    /// Keep reading lines appended after the end of the file.
    pub follow: bool,

    /// Delay between consecutive events.
    pub pace: Duration,

    /// Agent whose state snapshots are published.
    pub agent_name: String,

    /// File receiving messages typed by the user.
    pub outbox_path: Option<PathBuf>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            session_path: None,
            follow: false,
            pace: Duration::from_millis(400),
            agent_name: DEFAULT_AGENT_NAME.to_string(),
            outbox_path: None,
        }
    }
}

/// Parse a color name or `#rrggbb` hex value.
pub fn parse_color(value: &str) -> Result<Color, AppError> {
    Color::from_str(value.trim()).map_err(|_| AppError::InvalidColor(value.to_string()))
}
