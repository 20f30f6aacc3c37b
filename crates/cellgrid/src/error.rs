//! Error types for the engine

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Reasons a mutation or lookup is rejected
///
/// A rejected mutation leaves the grid and its history untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Address codec or grid store failure
    #[error(transparent)]
    Core(#[from] cellgrid_core::Error),

    /// One entry of a bulk update could not be applied
    #[error("bulk update entry {index}: {source}")]
    BulkUpdate {
        index: usize,
        #[source]
        source: cellgrid_core::Error,
    },
}

impl Error {
    /// The underlying grid store error
    pub fn core(&self) -> &cellgrid_core::Error {
        match self {
            Error::Core(e) => e,
            Error::BulkUpdate { source, .. } => source,
        }
    }
}
