//! Evaluation against a custom cell source

use std::collections::HashMap;

use cellgrid_core::{CellAddress, CellContent, CellData, CellRange, Extent, Grid};
use cellgrid_formula::{evaluate, evaluate_formula, CellSource, EvalError, EvaluationResult};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// Hash-map backed source that relies on the default range enumeration
#[derive(Default)]
struct MapSource(HashMap<CellAddress, CellData>);

impl MapSource {
    fn with(cells: &[(&str, &str)]) -> Self {
        let mut source = Self::default();
        for (address, text) in cells {
            source.0.insert(
                CellAddress::parse(address).unwrap(),
                CellData::new(CellContent::from_input(*text)),
            );
        }
        source
    }
}

impl CellSource for MapSource {
    fn cell(&self, addr: &CellAddress) -> Option<&CellData> {
        self.0.get(addr)
    }
}

fn eval(source: &MapSource, address: &str) -> EvaluationResult {
    evaluate(source, CellAddress::parse(address).unwrap())
}

#[test]
fn test_map_source_matches_grid() {
    let cells = [
        ("A1", "1"),
        ("B1", "2.5"),
        ("A2", "=A1+B1"),
        ("B2", "=SUM(A1:B2)"),
        ("C3", "=AVERAGE(A1:B1)"),
    ];
    let source = MapSource::with(&cells);

    let mut grid = Grid::new(Extent::new(5, 5));
    for (address, text) in cells {
        grid.set(CellAddress::parse(address).unwrap(), CellContent::from_input(text));
    }

    for (address, _) in cells {
        let addr = CellAddress::parse(address).unwrap();
        assert_eq!(evaluate(&source, addr), evaluate(&grid, addr), "{}", address);
    }
    assert_eq!(eval(&source, "A2"), EvaluationResult::Number(3.5));
    assert_eq!(eval(&source, "C3"), EvaluationResult::Number(1.75));
    assert_eq!(
        eval(&source, "B2"),
        EvaluationResult::Error(EvalError::CircularReference)
    );
}

#[test]
fn test_detached_formula() {
    let source = MapSource::with(&[("A1", "6"), ("A2", "4")]);
    assert_eq!(
        evaluate_formula(&source, "=MAX(A1:A2)-MIN(A1:A2)"),
        EvaluationResult::Error(EvalError::Syntax)
    );
    assert_eq!(
        evaluate_formula(&source, "=(A1-A2)*10"),
        EvaluationResult::Number(20.0)
    );
    assert_eq!(
        evaluate_formula(&source, "=COUNT(A1:A9)"),
        EvaluationResult::Number(2.0)
    );
}

#[test]
fn test_long_reference_chain() {
    let mut source = MapSource::default();
    source.0.insert(
        CellAddress::new(0, 0),
        CellData::new(CellContent::from_input("1")),
    );
    for row in 1..200u32 {
        let text = format!("={}+1", CellAddress::new(0, row - 1));
        source
            .0
            .insert(CellAddress::new(0, row), CellData::new(CellContent::from_input(text)));
    }
    assert_eq!(
        evaluate(&source, CellAddress::new(0, 199)),
        EvaluationResult::Number(200.0)
    );
}

#[test]
fn test_range_corners_error() {
    let source = MapSource::default();
    assert_eq!(
        evaluate_formula(&source, "=SUM(A1:1A)"),
        EvaluationResult::Error(EvalError::Range)
    );
    let range = CellRange::parse("A1:B2").unwrap();
    assert!(source.populated_in(&range).is_empty());
}

proptest! {
    #[test]
    fn evaluation_never_panics(body in "[A-C0-9+*/().:\\- ]{0,24}") {
        let source = MapSource::with(&[("A1", "=B1"), ("B1", "=A1+1"), ("C1", "0")]);
        let result = evaluate_formula(&source, &format!("={}", body));
        prop_assert!(!result.display().is_empty() || matches!(result, EvaluationResult::Text(_)));
    }

    #[test]
    fn arithmetic_matches_f64(a in -1000i32..1000, b in 1i32..1000) {
        let source = MapSource::default();
        let result = evaluate_formula(&source, &format!("=({})/{}+{}*2", a, b, a));
        let expected = f64::from(a) / f64::from(b) + f64::from(a) * 2.0;
        prop_assert_eq!(result, EvaluationResult::Number(expected));
    }
}
