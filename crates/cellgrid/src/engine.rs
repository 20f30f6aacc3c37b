//! The engine for one document
//!
//! [`Engine`] owns the live grid and its history. Every inbound operation
//! is validated first; a rejected operation changes nothing, records no
//! history entry and notifies nobody. A committed operation records one
//! history entry and fires one [`ChangeEvent`].
//!
//! # Example
//!
//! ```rust
//! use cellgrid::prelude::*;
//!
//! let mut engine = Engine::default();
//! engine.set_cell("A1", "5").unwrap();
//! engine.set_cell("B1", "=A1*2").unwrap();
//! assert_eq!(engine.display_value("B1").unwrap(), "10");
//!
//! engine.undo();
//! assert_eq!(engine.display_value("B1").unwrap(), "");
//! ```

use std::fmt;

use cellgrid_core::{CellAddress, CellContent, CellData, Extent, FormatPatch, Grid};
use cellgrid_formula::{evaluate, evaluate_all, EvaluationResult};

use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::history::HistoryManager;
use crate::notifier::{ChangeEvent, ChangeNotifier, MutationKind};

/// Grid, history and subscribers of one document
pub struct Engine {
    grid: Grid,
    history: HistoryManager,
    config: EngineConfig,
    subscribers: Vec<Box<dyn ChangeNotifier + Send>>,
}

impl Engine {
    /// Create an empty document
    pub fn new(config: EngineConfig) -> Self {
        Self {
            grid: Grid::new(config.default_extent()),
            history: HistoryManager::new(config.history_limit),
            config,
            subscribers: Vec::new(),
        }
    }

    /// The configuration the engine was created with
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Read-only view of the live grid
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Undo/redo state
    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    /// Current logical extent
    pub fn extent(&self) -> Extent {
        self.grid.extent()
    }

    /// Current document revision
    pub fn revision(&self) -> u64 {
        self.history.revision()
    }

    /// Get a stored cell
    pub fn cell(&self, address: &str) -> Result<Option<&CellData>> {
        Ok(self.cell_at(CellAddress::parse(address)?))
    }

    /// Get a stored cell by address
    pub fn cell_at(&self, addr: CellAddress) -> Option<&CellData> {
        self.grid.get(&addr)
    }

    /// Register a subscriber for change events
    pub fn subscribe<N>(&mut self, notifier: N)
    where
        N: ChangeNotifier + Send + 'static,
    {
        self.subscribers.push(Box::new(notifier));
    }

    // ===== Mutations =====

    /// Write user text into a cell
    ///
    /// Text starting with `=` is stored as a formula, empty text clears the
    /// content. The cell's format is kept.
    pub fn set_cell(&mut self, address: &str, text: &str) -> Result<()> {
        let addr = parse_address(address, MutationKind::SetCell)?;
        self.set_cell_at(addr, text);
        Ok(())
    }

    /// Write user text into a cell by address
    pub fn set_cell_at(&mut self, addr: CellAddress, text: &str) {
        let content = CellContent::from_input(text);
        self.commit_infallible(MutationKind::SetCell, |grid| grid.set(addr, content));
    }

    /// Apply a format patch to a cell
    pub fn set_format(&mut self, address: &str, patch: &FormatPatch) -> Result<()> {
        let addr = parse_address(address, MutationKind::SetFormat)?;
        self.set_format_at(addr, patch);
        Ok(())
    }

    /// Apply a format patch to a cell by address
    pub fn set_format_at(&mut self, addr: CellAddress, patch: &FormatPatch) {
        self.commit_infallible(MutationKind::SetFormat, |grid| grid.set_format(addr, patch));
    }

    /// Set the extent explicitly
    ///
    /// Fails without side effects if a populated cell would fall outside.
    pub fn resize_grid(&mut self, columns: u64, rows: u64) -> Result<()> {
        self.commit(MutationKind::Resize, |grid| grid.resize(columns, rows))
    }

    /// Remove every cell and restore the default extent
    pub fn clear_all(&mut self) {
        self.commit_infallible(MutationKind::ClearAll, Grid::clear);
    }

    /// Copy content and format of `source` onto `destination`
    ///
    /// Formula text is copied verbatim. Pasting an empty source clears the
    /// destination.
    pub fn paste_cell(&mut self, source: &str, destination: &str) -> Result<()> {
        let source = parse_address(source, MutationKind::Paste)?;
        let destination = parse_address(destination, MutationKind::Paste)?;
        self.paste_cell_at(source, destination);
        Ok(())
    }

    /// Copy a cell by address
    pub fn paste_cell_at(&mut self, source: CellAddress, destination: CellAddress) {
        let data = self.grid.get(&source).cloned().unwrap_or_default();
        self.commit_infallible(MutationKind::Paste, |grid| grid.set_cell(destination, data));
    }

    /// Insert `count` empty rows before row index `at` (0-based)
    pub fn insert_rows(&mut self, at: u32, count: u32) -> Result<()> {
        self.commit(MutationKind::InsertRows, |grid| grid.insert_rows(at, count))
    }

    /// Insert `count` empty columns before column index `at` (0-based)
    pub fn insert_columns(&mut self, at: u32, count: u32) -> Result<()> {
        self.commit(MutationKind::InsertColumns, |grid| {
            grid.insert_columns(at, count)
        })
    }

    /// Apply a batch of `(address, text)` assignments as one mutation
    ///
    /// Every address is parsed before anything is written; one bad address
    /// rejects the whole batch. The extent grows to cover every target.
    /// An empty batch does nothing.
    pub fn apply_bulk_update<I, A, T>(&mut self, assignments: I) -> Result<()>
    where
        I: IntoIterator<Item = (A, T)>,
        A: AsRef<str>,
        T: AsRef<str>,
    {
        let mut parsed = Vec::new();
        for (index, (address, text)) in assignments.into_iter().enumerate() {
            let addr = CellAddress::parse(address.as_ref()).map_err(|source| {
                log::warn!("rejected bulk update: entry {} has {}", index, source);
                Error::BulkUpdate { index, source }
            })?;
            parsed.push((addr, CellContent::from_input(text.as_ref())));
        }

        if parsed.is_empty() {
            return Ok(());
        }

        self.commit_infallible(MutationKind::BulkUpdate, |grid| {
            for (addr, content) in parsed {
                grid.set(addr, content);
            }
        });
        Ok(())
    }

    /// Undo the most recent mutation
    ///
    /// Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.step(MutationKind::Undo)
    }

    /// Redo the most recently undone mutation
    pub fn redo(&mut self) -> bool {
        self.step(MutationKind::Redo)
    }

    // ===== Reads =====

    /// Evaluate a cell
    pub fn evaluate(&self, address: &str) -> Result<EvaluationResult> {
        Ok(self.evaluate_at(CellAddress::parse(address)?))
    }

    /// Evaluate a cell by address
    pub fn evaluate_at(&self, addr: CellAddress) -> EvaluationResult {
        evaluate(&self.grid, addr)
    }

    /// Text a cell displays
    pub fn display_value(&self, address: &str) -> Result<String> {
        Ok(self.evaluate(address)?.display())
    }

    /// Text a cell displays, by address
    pub fn display_value_at(&self, addr: CellAddress) -> String {
        self.evaluate_at(addr).display()
    }

    /// Evaluate every populated cell, row-major
    pub fn export_all(&self) -> Vec<(CellAddress, EvaluationResult)> {
        evaluate_all(&self.grid, self.grid.cells().map(|(addr, _)| *addr))
    }

    // ===== Internals =====

    fn commit_infallible<F>(&mut self, kind: MutationKind, apply: F)
    where
        F: FnOnce(&mut Grid),
    {
        let before = self.grid.clone();
        apply(&mut self.grid);
        self.finish(kind, before);
    }

    fn commit<F>(&mut self, kind: MutationKind, apply: F) -> Result<()>
    where
        F: FnOnce(&mut Grid) -> cellgrid_core::Result<()>,
    {
        let before = self.grid.clone();
        if let Err(e) = apply(&mut self.grid) {
            log::warn!("rejected {}: {}", kind, e);
            self.grid = before;
            return Err(e.into());
        }
        self.finish(kind, before);
        Ok(())
    }

    fn finish(&mut self, kind: MutationKind, before: Grid) {
        let changed = before.diff(&self.grid);
        let token = self.history.record(before.into_snapshot());
        self.notify(token.revision(), kind, changed);
    }

    fn step(&mut self, kind: MutationKind) -> bool {
        let available = match kind {
            MutationKind::Redo => self.history.can_redo(),
            _ => self.history.can_undo(),
        };
        if !available {
            return false;
        }

        let before = self.grid.clone();
        let applied = match kind {
            MutationKind::Redo => self.history.redo(&mut self.grid),
            _ => self.history.undo(&mut self.grid),
        };
        if applied {
            let changed = before.diff(&self.grid);
            self.notify(self.history.revision(), kind, changed);
        }
        applied
    }

    fn notify(&mut self, revision: u64, kind: MutationKind, changed: Vec<CellAddress>) {
        log::debug!(
            "{} committed at revision {} ({} cells changed)",
            kind,
            revision,
            changed.len()
        );
        if self.subscribers.is_empty() {
            return;
        }

        let event = ChangeEvent {
            revision,
            kind,
            extent: self.grid.extent(),
            changed,
        };
        for subscriber in &mut self.subscribers {
            subscriber.on_mutated(&event);
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("extent", &self.grid.extent())
            .field("cells", &self.grid.len())
            .field("revision", &self.history.revision())
            .field("undo_len", &self.history.undo_len())
            .field("redo_len", &self.history.redo_len())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

fn parse_address(address: &str, kind: MutationKind) -> Result<CellAddress> {
    CellAddress::parse(address).map_err(|e| {
        log::warn!("rejected {}: {}", kind, e);
        Error::from(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    fn addr(s: &str) -> CellAddress {
        CellAddress::parse(s).unwrap()
    }

    fn recorder(engine: &mut Engine) -> Arc<Mutex<Vec<ChangeEvent>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        engine.subscribe(move |event: &ChangeEvent| sink.lock().unwrap().push(event.clone()));
        events
    }

    #[test]
    fn test_engine_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Engine>();
    }

    #[test]
    fn test_default_extent() {
        let engine = Engine::default();
        assert_eq!(engine.extent(), Extent::new(26, 100));
        assert_eq!(engine.revision(), 0);
    }

    #[test]
    fn test_set_cell_notifies_changed_address() {
        let mut engine = Engine::default();
        let events = recorder(&mut engine);

        engine.set_cell("C3", "hello").unwrap();

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0],
            ChangeEvent {
                revision: 1,
                kind: MutationKind::SetCell,
                extent: Extent::new(26, 100),
                changed: vec![addr("C3")],
            }
        );
    }

    #[test]
    fn test_rejected_address_leaves_no_trace() {
        let mut engine = Engine::default();
        let events = recorder(&mut engine);

        assert!(engine.set_cell("3C", "x").is_err());
        assert!(engine.set_format("", &FormatPatch::new().bold(true)).is_err());
        assert!(engine.paste_cell("A1", "A0").is_err());

        assert!(!engine.history().can_undo());
        assert_eq!(engine.revision(), 0);
        assert!(events.lock().unwrap().is_empty());
    }

    #[test]
    fn test_undo_redo_notify() {
        let mut engine = Engine::default();
        engine.set_cell("A1", "1").unwrap();
        let events = recorder(&mut engine);

        assert!(engine.undo());
        assert!(engine.redo());
        assert!(!engine.redo());

        let events = events.lock().unwrap();
        let kinds: Vec<_> = events.iter().map(|e| (e.kind, e.revision)).collect();
        assert_eq!(kinds, vec![(MutationKind::Undo, 2), (MutationKind::Redo, 3)]);
        assert_eq!(events[0].changed, vec![addr("A1")]);
    }

    #[test]
    fn test_debug_output() {
        let mut engine = Engine::default();
        engine.set_cell("A1", "x").unwrap();
        let text = format!("{:?}", engine);
        assert!(text.contains("revision: 1"));
        assert!(text.contains("cells: 1"));
    }
}
