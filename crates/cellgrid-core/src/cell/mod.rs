//! Cell-related types and utilities
//!
//! This module contains:
//! - [`CellAddress`] - A cell's location (e.g., "A1")
//! - [`CellRange`] - A rectangular block of cells (e.g., "A1:B10")
//! - [`CellData`] - What a user entered into a cell, plus its format

mod address;
mod data;

pub use address::{CellAddress, CellRange, CellRangeIterator};
pub use data::{CellContent, CellData};
