//! Terminal widgets for the supply network console.
//!
//! - `widgets` - card shell, tool renderer registry, workflow debugger,
//!   chat transcript, input, header, footer
//! - `theme` - colors and styles
//! - `utils` - text wrapping and placeholder formatting
//!
//! Widgets borrow their data and are rebuilt every frame. State that must
//! survive a frame, such as whether a card is expanded, is owned by the
//! caller and passed in.

pub mod theme;
pub mod utils;
pub mod widgets;

pub use theme::Theme;
pub use utils::{pretty_json, truncate, wrap_text_indented, PLACEHOLDER};
pub use widgets::card::{Card, CardState, CardView};
pub use widgets::chat::ChatWidget;
pub use widgets::footer::Footer;
pub use widgets::header::{Header, HeaderStat, StatusIndicator};
pub use widgets::input::InputBox;
pub use widgets::tools::{ParameterSpec, RenderFn, ToolRenderer, ToolRendererRegistry};
pub use widgets::workflow::{
    reorder_label, StepMarker, SummaryPanel, TimelineEntry, WorkflowDebugger, WorkflowProjection,
    WorkflowView, WAITING_MESSAGE,
};
