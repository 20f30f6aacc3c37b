//! Snapshot-based undo/redo
//!
//! Before each mutation the live grid is copied onto the undo stack. Both
//! stacks are bounded; pushing past the limit evicts the oldest entry.

use std::collections::VecDeque;

use cellgrid_core::{Grid, GridSnapshot};

/// Proof that a mutation was recorded in history
///
/// Returned by [`HistoryManager::begin_mutation`]; carries the revision
/// number assigned to the mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationToken {
    revision: u64,
}

impl MutationToken {
    /// Revision the document reaches once the mutation is applied
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

/// Bounded undo and redo stacks for one document
#[derive(Debug, Clone)]
pub struct HistoryManager {
    undo_stack: VecDeque<GridSnapshot>,
    redo_stack: VecDeque<GridSnapshot>,
    limit: usize,
    revision: u64,
}

impl HistoryManager {
    /// Create an empty history holding at most `limit` entries per stack
    pub fn new(limit: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            limit,
            revision: 0,
        }
    }

    /// Maximum entries per stack
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Current document revision
    ///
    /// Starts at 0 and increases by one for every mutation, undo and redo.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Record the state of `grid` before it is mutated
    ///
    /// Clears the redo stack.
    pub fn begin_mutation(&mut self, grid: &Grid) -> MutationToken {
        self.record(grid.snapshot())
    }

    /// Record a snapshot already taken of the pre-mutation state
    pub fn record(&mut self, before: GridSnapshot) -> MutationToken {
        if !self.redo_stack.is_empty() {
            log::debug!("discarding {} redo entries", self.redo_stack.len());
            self.redo_stack.clear();
        }
        push_bounded(&mut self.undo_stack, before, self.limit, "undo");
        self.revision += 1;
        MutationToken {
            revision: self.revision,
        }
    }

    /// Restore the most recent undo entry into `grid`
    ///
    /// The current state moves onto the redo stack. Returns `false` and
    /// leaves `grid` alone when there is nothing to undo.
    pub fn undo(&mut self, grid: &mut Grid) -> bool {
        let Some(previous) = self.undo_stack.pop_back() else {
            return false;
        };
        push_bounded(&mut self.redo_stack, grid.snapshot(), self.limit, "redo");
        grid.restore(previous);
        self.revision += 1;
        true
    }

    /// Restore the most recent redo entry into `grid`
    pub fn redo(&mut self, grid: &mut Grid) -> bool {
        let Some(next) = self.redo_stack.pop_back() else {
            return false;
        };
        push_bounded(&mut self.undo_stack, grid.snapshot(), self.limit, "undo");
        grid.restore(next);
        self.revision += 1;
        true
    }

    /// Check if [`undo`](Self::undo) would do anything
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if [`redo`](Self::redo) would do anything
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of undo entries
    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of redo entries
    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Drop both stacks; the revision counter keeps counting
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(50)
    }
}

fn push_bounded(
    stack: &mut VecDeque<GridSnapshot>,
    snapshot: GridSnapshot,
    limit: usize,
    name: &str,
) {
    if limit == 0 {
        return;
    }
    stack.push_back(snapshot);
    while stack.len() > limit {
        stack.pop_front();
        log::debug!("{} history full, evicted oldest entry", name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellgrid_core::{CellAddress, CellContent, Extent};
    use pretty_assertions::assert_eq;

    fn grid() -> Grid {
        Grid::new(Extent::new(5, 5))
    }

    fn write(history: &mut HistoryManager, grid: &mut Grid, text: &str) -> MutationToken {
        let token = history.begin_mutation(grid);
        grid.set(CellAddress::new(0, 0), CellContent::from_input(text));
        token
    }

    fn a1(grid: &Grid) -> String {
        grid.get(&CellAddress::new(0, 0))
            .map(|c| c.input_text().to_string())
            .unwrap_or_default()
    }

    #[test]
    fn test_undo_redo_restore_exact_states() {
        let mut history = HistoryManager::new(50);
        let mut grid = grid();
        let s0 = grid.clone();

        write(&mut history, &mut grid, "1");
        let s1 = grid.clone();

        assert!(history.undo(&mut grid));
        assert_eq!(grid, s0);
        assert!(history.redo(&mut grid));
        assert_eq!(grid, s1);

        assert!(history.undo(&mut grid));
        assert!(!history.undo(&mut grid));
        assert_eq!(grid, s0);
    }

    #[test]
    fn test_empty_history_is_noop() {
        let mut history = HistoryManager::default();
        let mut grid = grid();
        assert!(!history.undo(&mut grid));
        assert!(!history.redo(&mut grid));
        assert_eq!(history.revision(), 0);
    }

    #[test]
    fn test_bounded_fifo_eviction() {
        let mut history = HistoryManager::new(50);
        let mut grid = grid();
        for i in 1..=60 {
            write(&mut history, &mut grid, &i.to_string());
        }
        assert_eq!(history.undo_len(), 50);

        // The 50 most recent pre-mutation states come back newest first
        for expected in (10..=59).rev() {
            assert!(history.undo(&mut grid));
            assert_eq!(a1(&grid), expected.to_string());
        }
        assert!(!history.undo(&mut grid));
        assert_eq!(a1(&grid), "10");
    }

    #[test]
    fn test_new_mutation_clears_redo() {
        let mut history = HistoryManager::new(50);
        let mut grid = grid();
        write(&mut history, &mut grid, "a");
        write(&mut history, &mut grid, "b");

        assert!(history.undo(&mut grid));
        assert!(history.can_redo());

        write(&mut history, &mut grid, "c");
        assert!(!history.can_redo());
        assert!(!history.redo(&mut grid));
        assert_eq!(a1(&grid), "c");
    }

    #[test]
    fn test_redo_stack_is_bounded() {
        let mut history = HistoryManager::new(2);
        let mut grid = grid();
        for text in ["a", "b", "c"] {
            write(&mut history, &mut grid, text);
        }
        assert_eq!(history.undo_len(), 2);

        while history.undo(&mut grid) {}
        assert_eq!(history.redo_len(), 2);
        assert_eq!(a1(&grid), "a");
    }

    #[test]
    fn test_zero_limit_disables_history() {
        let mut history = HistoryManager::new(0);
        let mut grid = grid();
        let token = write(&mut history, &mut grid, "x");
        assert_eq!(token.revision(), 1);
        assert!(!history.can_undo());
        assert!(!history.undo(&mut grid));
        assert_eq!(a1(&grid), "x");
    }

    #[test]
    fn test_revisions() {
        let mut history = HistoryManager::new(10);
        let mut grid = grid();
        assert_eq!(write(&mut history, &mut grid, "a").revision(), 1);
        assert_eq!(write(&mut history, &mut grid, "b").revision(), 2);
        history.undo(&mut grid);
        assert_eq!(history.revision(), 3);
        history.redo(&mut grid);
        assert_eq!(history.revision(), 4);

        history.clear();
        assert!(!history.can_undo());
        assert_eq!(history.revision(), 4);
    }
}
