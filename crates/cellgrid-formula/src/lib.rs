//! # cellgrid-formula
//!
//! Formula parser and evaluator for cellgrid.
//!
//! This crate provides:
//! - Formula parsing (text → AST), including whole-formula aggregates
//!   (`SUM`, `AVERAGE`, `COUNT`, `MIN`, `MAX` over a range)
//! - Evaluation of a cell to a number, text, or an error value
//! - Circular reference detection during evaluation
//!
//! ## Example
//!
//! ```rust
//! use cellgrid_core::{CellAddress, CellContent, Extent, Grid};
//! use cellgrid_formula::{evaluate, EvaluationResult};
//!
//! let mut grid = Grid::new(Extent::new(10, 10));
//! let a1 = CellAddress::parse("A1").unwrap();
//! let b1 = CellAddress::parse("B1").unwrap();
//! grid.set(a1, CellContent::from_input("20"));
//! grid.set(b1, CellContent::from_input("=A1/4"));
//!
//! assert_eq!(evaluate(&grid, b1), EvaluationResult::Number(5.0));
//! ```

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod parser;
pub mod references;

pub use ast::{AggregateFunction, BinaryOperator, Formula, FormulaExpr};
pub use error::{EvalError, FormulaError, FormulaResult};
pub use evaluator::{
    evaluate, evaluate_all, evaluate_formula, format_number, parse_number, CellSource,
    EvaluationResult,
};
pub use parser::parse_formula;
pub use references::{collect_references, Reference};
