//! # cellgrid
//!
//! In-memory state manager for a single spreadsheet document.
//!
//! cellgrid keeps a sparse grid of cells, evaluates formulas on demand and
//! maintains a bounded, snapshot-based undo/redo history.
//!
//! ## Features
//!
//! - A1-style addressing with bijective base-26 column letters
//! - Arithmetic formulas with cell references and parentheses
//! - `SUM`, `AVERAGE`, `COUNT`, `MIN` and `MAX` over a range
//! - Circular reference detection; evaluation errors are values
//! - Undo/redo bounded to a configurable number of entries
//! - Synchronous change notifications for sync or persistence layers
//!
//! ## Example
//!
//! ```rust
//! use cellgrid::prelude::*;
//!
//! let mut engine = Engine::new(EngineConfig::default().with_history_limit(10));
//!
//! engine.apply_bulk_update([("A1", "1"), ("A2", "2"), ("A3", "3")]).unwrap();
//! engine.set_cell("A4", "=SUM(A1:A3)").unwrap();
//! assert_eq!(engine.display_value("A4").unwrap(), "6");
//!
//! engine.set_cell("B1", "=A1/0").unwrap();
//! assert_eq!(engine.display_value("B1").unwrap(), "#DIV/0!");
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod notifier;
pub mod prelude;

pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{Error, Result};
pub use history::{HistoryManager, MutationToken};
pub use notifier::{ChangeEvent, ChangeNotifier, MutationKind};

// Re-export core types
pub use cellgrid_core::{
    CellAddress, CellContent, CellData, CellFormat, CellRange, Color, Extent, FormatPatch, Grid,
    GridSnapshot, HorizontalAlignment,
};

// Re-export formula types
pub use cellgrid_formula::{evaluate, parse_formula, CellSource, EvalError, EvaluationResult};
