//! Change notifications
//!
//! Subscribers are called synchronously, once per committed mutation, after
//! the grid has been updated. Debouncing and persistence are up to them.

use cellgrid_core::{CellAddress, Extent};

/// The kind of mutation that produced a [`ChangeEvent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    SetCell,
    SetFormat,
    Resize,
    ClearAll,
    Paste,
    InsertRows,
    InsertColumns,
    BulkUpdate,
    Undo,
    Redo,
}

impl MutationKind {
    /// Short lowercase name, used in log output
    pub fn as_str(&self) -> &'static str {
        match self {
            MutationKind::SetCell => "set_cell",
            MutationKind::SetFormat => "set_format",
            MutationKind::Resize => "resize",
            MutationKind::ClearAll => "clear_all",
            MutationKind::Paste => "paste",
            MutationKind::InsertRows => "insert_rows",
            MutationKind::InsertColumns => "insert_columns",
            MutationKind::BulkUpdate => "bulk_update",
            MutationKind::Undo => "undo",
            MutationKind::Redo => "redo",
        }
    }
}

impl std::fmt::Display for MutationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload delivered after a committed mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Document revision after the mutation
    pub revision: u64,
    /// What kind of mutation ran
    pub kind: MutationKind,
    /// Extent after the mutation
    pub extent: Extent,
    /// Addresses whose cell data changed, row-major
    pub changed: Vec<CellAddress>,
}

/// Receiver of change events
pub trait ChangeNotifier {
    /// Called after every committed mutation
    fn on_mutated(&mut self, event: &ChangeEvent);
}

impl<F> ChangeNotifier for F
where
    F: FnMut(&ChangeEvent),
{
    fn on_mutated(&mut self, event: &ChangeEvent) {
        self(event)
    }
}
