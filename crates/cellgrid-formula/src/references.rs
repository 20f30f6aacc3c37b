//! References a formula reads
//!
//! The evaluator uses these to reject a formula before recursing into it
//! when it reads a cell that is already being evaluated.

use crate::ast::{Formula, FormulaExpr};
use ahash::AHashSet;
use cellgrid_core::{CellAddress, CellRange};

/// A cell or rectangular block read by a formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reference {
    Cell(CellAddress),
    Range(CellRange),
}

impl Reference {
    /// Check if the reference reads `addr`
    pub fn covers(&self, addr: &CellAddress) -> bool {
        match self {
            Reference::Cell(cell) => cell == addr,
            Reference::Range(range) => range.contains(addr),
        }
    }
}

/// Collect every reference in a parsed formula, in source order
pub fn collect_references(formula: &Formula) -> Vec<Reference> {
    let mut refs = Vec::new();
    match formula {
        Formula::Aggregate { range, .. } => refs.push(Reference::Range(*range)),
        Formula::Expr(expr) => collect_expr(expr, &mut refs),
    }
    refs
}

fn collect_expr(expr: &FormulaExpr, refs: &mut Vec<Reference>) {
    match expr {
        FormulaExpr::Number(_) => {}
        FormulaExpr::CellRef(addr) => refs.push(Reference::Cell(*addr)),
        FormulaExpr::BinaryOp { left, right, .. } => {
            collect_expr(left, refs);
            collect_expr(right, refs);
        }
        FormulaExpr::Negate(operand) => collect_expr(operand, refs),
    }
}

/// An address in `in_progress` that any of `refs` reads
///
/// Ranges are checked from whichever side is smaller: the range's cells or
/// the in-progress set.
pub fn first_covered(
    refs: &[Reference],
    in_progress: &AHashSet<CellAddress>,
) -> Option<CellAddress> {
    refs.iter().find_map(|r| match r {
        Reference::Cell(addr) => in_progress.contains(addr).then_some(*addr),
        Reference::Range(range) if range.cell_count() <= in_progress.len() as u64 => {
            range.cells().find(|addr| in_progress.contains(addr))
        }
        Reference::Range(range) => in_progress.iter().find(|addr| range.contains(addr)).copied(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_formula;

    fn addr(s: &str) -> CellAddress {
        CellAddress::parse(s).unwrap()
    }

    fn refs(formula: &str) -> Vec<Reference> {
        collect_references(&parse_formula(formula).unwrap())
    }

    #[test]
    fn test_collect_cell_references() {
        assert_eq!(
            refs("=A1+B2*(C3-1)/-D4"),
            vec![
                Reference::Cell(addr("A1")),
                Reference::Cell(addr("B2")),
                Reference::Cell(addr("C3")),
                Reference::Cell(addr("D4")),
            ]
        );
        assert!(refs("=1+2").is_empty());
    }

    #[test]
    fn test_collect_range_reference() {
        assert_eq!(
            refs("=SUM(B3:A1)"),
            vec![Reference::Range(CellRange::parse("A1:B3").unwrap())]
        );
    }

    #[test]
    fn test_range_covers_interior() {
        let r = Reference::Range(CellRange::parse("A1:A3").unwrap());
        assert!(r.covers(&addr("A2")));
        assert!(!r.covers(&addr("B2")));
    }

    #[test]
    fn test_first_covered() {
        let found = refs("=SUM(A1:C3)");
        let path: AHashSet<CellAddress> = [addr("D1"), addr("B2")].into_iter().collect();
        assert_eq!(first_covered(&found, &path), Some(addr("B2")));

        let outside: AHashSet<CellAddress> = [addr("D4")].into_iter().collect();
        assert_eq!(first_covered(&found, &outside), None);

        // A wide range against a short path scans the path instead
        let wide = refs("=SUM(A1:ZZ5000)");
        let path: AHashSet<CellAddress> = [addr("Q77")].into_iter().collect();
        assert_eq!(first_covered(&wide, &path), Some(addr("Q77")));

        let cells = refs("=E5+A1*2");
        let path: AHashSet<CellAddress> = [addr("A1"), addr("C1")].into_iter().collect();
        assert_eq!(first_covered(&cells, &path), Some(addr("A1")));
    }
}
