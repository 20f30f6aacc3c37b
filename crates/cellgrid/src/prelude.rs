//! Prelude module - common imports for cellgrid users
//!
//! ```rust
//! use cellgrid::prelude::*;
//! ```

pub use crate::{
    CellAddress,
    CellContent,
    CellData,
    CellFormat,
    CellRange,
    // Notifications
    ChangeEvent,
    ChangeNotifier,
    Color,
    // Main types
    Engine,
    EngineConfig,
    // Errors
    Error,
    EvalError,
    EvaluationResult,
    Extent,
    FormatPatch,
    HorizontalAlignment,
    MutationKind,
    Result,
};
