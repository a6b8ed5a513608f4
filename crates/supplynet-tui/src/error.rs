//! Console errors.

use supplynet_core::CoreError;
use thiserror::Error;

/// Errors surfaced by the console binary.
#[derive(Debug, Error)]
pub enum AppError {
    /// Terminal or file I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A configured color could not be parsed.
    #[error("Invalid color '{0}': expected a name or #rrggbb")]
    InvalidColor(String),

    /// Error from the domain layer.
    #[error(transparent)]
    Core(#[from] CoreError),
}
