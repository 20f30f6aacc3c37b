//! Engine configuration

use cellgrid_core::Extent;

/// Options for an [`Engine`](crate::Engine)
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Initial column count, restored by `clear_all` (default: 26)
    pub default_columns: u64,
    /// Initial row count, restored by `clear_all` (default: 100)
    pub default_rows: u64,
    /// Maximum entries on each history stack (default: 50); 0 disables undo
    pub history_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_columns: 26,
            default_rows: 100,
            history_limit: 50,
        }
    }
}

impl EngineConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default column count
    pub fn with_default_columns(mut self, columns: u64) -> Self {
        self.default_columns = columns;
        self
    }

    /// Set the default row count
    pub fn with_default_rows(mut self, rows: u64) -> Self {
        self.default_rows = rows;
        self
    }

    /// Set the history limit
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// The default extent, with zero counts raised to 1
    pub fn default_extent(&self) -> Extent {
        Extent::new(self.default_columns, self.default_rows)
    }
}
