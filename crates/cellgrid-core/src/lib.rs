//! # cellgrid-core
//!
//! Core data structures for the cellgrid formula engine.
//!
//! This crate provides:
//! - [`CellAddress`] and [`CellRange`] - Cell addressing, including the
//!   bijective base-26 column codec
//! - [`CellData`] and [`CellContent`] - What a user entered into a cell
//! - [`CellFormat`] - Presentation-only formatting carried with each cell
//! - [`Grid`] - Sparse storage of one document's cells and its extent
//!
//! ## Example
//!
//! ```rust
//! use cellgrid_core::{CellAddress, CellContent, Extent, Grid};
//!
//! let mut grid = Grid::new(Extent::new(10, 10));
//! let addr = CellAddress::parse("Z1").unwrap();
//! grid.set(addr, CellContent::from_input("hello"));
//!
//! assert_eq!(grid.extent().columns, 26);
//! assert_eq!(CellAddress::column_to_letters(27), "AB");
//! ```

pub mod cell;
pub mod error;
pub mod grid;
pub mod style;

// Re-exports for convenience
pub use cell::{CellAddress, CellContent, CellData, CellRange, CellRangeIterator};
pub use error::{Error, Result};
pub use grid::{Extent, Grid, GridSnapshot};
pub use style::{CellFormat, Color, FormatPatch, HorizontalAlignment};
