//! Error types for cellgrid-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in cellgrid-core
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Invalid cell address format
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Invalid cell range format
    #[error("Invalid cell range: {0}")]
    InvalidRange(String),

    /// Resize would drop populated cells
    #[error("Cannot resize grid to {columns}x{rows}: cells in use need {min_columns}x{min_rows}")]
    InvalidResize {
        columns: u64,
        rows: u64,
        min_columns: u64,
        min_rows: u64,
    },
}
