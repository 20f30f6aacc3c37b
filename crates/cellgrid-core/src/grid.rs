//! Sparse grid storage
//!
//! The grid owns every cell of one document and the logical extent shown to
//! the user. Only populated cells are stored, keyed by address in a
//! `BTreeMap` so that iteration is row-major.

use std::collections::BTreeMap;

use crate::cell::{CellAddress, CellContent, CellData, CellRange};
use crate::error::{Error, Result};
use crate::style::FormatPatch;

/// Logical size of the grid
///
/// Counts are `u64` so that an extent can cover the last `u32` address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Extent {
    /// Number of columns
    pub columns: u64,
    /// Number of rows
    pub rows: u64,
}

impl Extent {
    /// Create an extent; zero counts are raised to 1
    pub fn new(columns: u64, rows: u64) -> Self {
        Self {
            columns: columns.max(1),
            rows: rows.max(1),
        }
    }

    /// Check if an address lies inside the extent
    pub fn contains(&self, addr: &CellAddress) -> bool {
        (addr.col as u64) < self.columns && (addr.row as u64) < self.rows
    }

    /// Grow each axis independently until `addr` is covered
    pub fn grow_to_cover(&mut self, addr: &CellAddress) {
        self.columns = self.columns.max(addr.col as u64 + 1);
        self.rows = self.rows.max(addr.row as u64 + 1);
    }
}

/// The live grid of one document
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    /// Populated cells
    cells: BTreeMap<CellAddress, CellData>,
    /// Current logical extent
    extent: Extent,
    /// Extent restored by [`Grid::clear`]
    default_extent: Extent,
}

impl Grid {
    /// Create an empty grid with the given default extent
    pub fn new(default_extent: Extent) -> Self {
        let default_extent = Extent::new(default_extent.columns, default_extent.rows);
        Self {
            cells: BTreeMap::new(),
            extent: default_extent,
            default_extent,
        }
    }

    /// Current logical extent
    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// Extent the grid was created with
    pub fn default_extent(&self) -> Extent {
        self.default_extent
    }

    /// Number of stored cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if no cell is stored
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Get a cell
    pub fn get(&self, addr: &CellAddress) -> Option<&CellData> {
        self.cells.get(addr)
    }

    /// Iterate over stored cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (&CellAddress, &CellData)> + '_ {
        self.cells.iter()
    }

    /// Iterate over stored cells inside `range`, row-major
    pub fn cells_in<'a>(
        &'a self,
        range: &CellRange,
    ) -> impl Iterator<Item = (&'a CellAddress, &'a CellData)> + 'a {
        let (first_col, last_col) = (range.start.col, range.end.col);
        let from = CellAddress::new(0, range.start.row);
        let to = CellAddress::new(u32::MAX, range.end.row);
        self.cells
            .range(from..=to)
            .filter(move |(addr, _)| addr.col >= first_col && addr.col <= last_col)
    }

    /// Set a cell's content, keeping its format
    ///
    /// Grows the extent when `addr` lies outside it.
    pub fn set(&mut self, addr: CellAddress, content: CellContent) {
        let mut cell = self.cells.remove(&addr).unwrap_or_default();
        cell.set_content(content);
        self.put(addr, cell);
    }

    /// Replace a cell's data wholesale (content and format)
    pub fn set_cell(&mut self, addr: CellAddress, data: CellData) {
        self.cells.remove(&addr);
        self.put(addr, data);
    }

    /// Apply a format patch to a cell, keeping its content
    pub fn set_format(&mut self, addr: CellAddress, patch: &FormatPatch) {
        let mut cell = self.cells.remove(&addr).unwrap_or_default();
        cell.format.apply(patch);
        self.put(addr, cell);
    }

    fn put(&mut self, addr: CellAddress, data: CellData) {
        if !self.extent.contains(&addr) {
            self.extent.grow_to_cover(&addr);
        }
        // Empty cells are not stored; their display value is "" either way
        if !data.is_empty() {
            self.cells.insert(addr, data);
        }
    }

    /// Smallest extent that still covers every stored cell
    pub fn min_extent(&self) -> Extent {
        let mut extent = Extent::new(1, 1);
        for addr in self.cells.keys() {
            extent.grow_to_cover(addr);
        }
        extent
    }

    /// Set the extent explicitly
    ///
    /// Fails with [`Error::InvalidResize`] if a stored cell would fall outside.
    pub fn resize(&mut self, columns: u64, rows: u64) -> Result<()> {
        self.check_resize(columns, rows)?;
        self.extent = Extent::new(columns, rows);
        Ok(())
    }

    /// Validate a resize without applying it
    pub fn check_resize(&self, columns: u64, rows: u64) -> Result<()> {
        let min = self.min_extent();
        if columns < min.columns || rows < min.rows {
            return Err(Error::InvalidResize {
                columns,
                rows,
                min_columns: min.columns,
                min_rows: min.rows,
            });
        }
        Ok(())
    }

    /// Remove every cell and reset the extent to its default
    pub fn clear(&mut self) {
        self.cells.clear();
        self.extent = self.default_extent;
    }

    /// Insert `count` empty rows before row `at`
    pub fn insert_rows(&mut self, at: u32, count: u32) -> Result<()> {
        self.shift(count, |addr| {
            if addr.row < at {
                return Some(*addr);
            }
            addr.row
                .checked_add(count)
                .map(|row| CellAddress::new(addr.col, row))
        })?;
        self.extent.rows += count as u64;
        Ok(())
    }

    /// Insert `count` empty columns before column `at`
    pub fn insert_columns(&mut self, at: u32, count: u32) -> Result<()> {
        self.shift(count, |addr| {
            if addr.col < at {
                return Some(*addr);
            }
            addr.col
                .checked_add(count)
                .map(|col| CellAddress::new(col, addr.row))
        })?;
        self.extent.columns += count as u64;
        Ok(())
    }

    fn shift<F>(&mut self, count: u32, mut relocate: F) -> Result<()>
    where
        F: FnMut(&CellAddress) -> Option<CellAddress>,
    {
        if count == 0 {
            return Ok(());
        }

        // Validate before touching anything so a failure leaves the grid intact
        let mut moved = Vec::with_capacity(self.cells.len());
        for addr in self.cells.keys() {
            let target = relocate(addr).ok_or_else(|| {
                Error::InvalidAddress(format!("cannot shift {} past the last address", addr))
            })?;
            moved.push(target);
        }

        let old = std::mem::take(&mut self.cells);
        for ((_, data), target) in old.into_iter().zip(moved) {
            if !self.extent.contains(&target) {
                self.extent.grow_to_cover(&target);
            }
            self.cells.insert(target, data);
        }
        Ok(())
    }

    /// Take a deep, independent copy of the grid
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot(self.clone())
    }

    /// Turn the grid itself into a snapshot
    pub fn into_snapshot(self) -> GridSnapshot {
        GridSnapshot(self)
    }

    /// Replace the live state wholesale with a snapshot
    pub fn restore(&mut self, snapshot: GridSnapshot) {
        *self = snapshot.0;
    }

    /// Addresses whose cell data differ between `self` and `other`
    ///
    /// Returned in row-major order.
    pub fn diff(&self, other: &Grid) -> Vec<CellAddress> {
        let mut changed: Vec<CellAddress> = self
            .cells
            .iter()
            .filter(|(addr, data)| other.cells.get(addr) != Some(data))
            .map(|(addr, _)| *addr)
            .collect();

        changed.extend(
            other
                .cells
                .keys()
                .filter(|addr| !self.cells.contains_key(addr))
                .copied(),
        );
        changed.sort();
        changed
    }
}

/// A deep, independent copy of a [`Grid`] at one point in time
///
/// Snapshots share no storage with the live grid; once taken they are
/// never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSnapshot(Grid);

impl GridSnapshot {
    /// Read-only view of the captured grid
    pub fn grid(&self) -> &Grid {
        &self.0
    }

    /// Extent at the time of the snapshot
    pub fn extent(&self) -> Extent {
        self.0.extent
    }
}
