//! Formula Abstract Syntax Tree types

use cellgrid_core::{CellAddress, CellRange};

/// A parsed formula body
#[derive(Debug, Clone, PartialEq)]
pub enum Formula {
    /// Arithmetic expression over numbers and cell references
    Expr(FormulaExpr),
    /// Whole-formula aggregate such as `SUM(A1:A10)`
    Aggregate {
        function: AggregateFunction,
        range: CellRange,
    },
}

/// Arithmetic expression AST
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaExpr {
    /// Numeric literal
    Number(f64),
    /// Single cell reference
    CellRef(CellAddress),
    /// Binary operation
    BinaryOp {
        op: BinaryOperator,
        left: Box<FormulaExpr>,
        right: Box<FormulaExpr>,
    },
    /// Unary minus
    Negate(Box<FormulaExpr>),
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

/// Functions allowed as a whole-formula aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateFunction {
    Sum,
    Average,
    Count,
    Min,
    Max,
}

impl AggregateFunction {
    /// Look up a function by name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "SUM" => Some(AggregateFunction::Sum),
            "AVERAGE" => Some(AggregateFunction::Average),
            "COUNT" => Some(AggregateFunction::Count),
            "MIN" => Some(AggregateFunction::Min),
            "MAX" => Some(AggregateFunction::Max),
            _ => None,
        }
    }

    /// Canonical upper-case name
    pub fn name(&self) -> &'static str {
        match self {
            AggregateFunction::Sum => "SUM",
            AggregateFunction::Average => "AVERAGE",
            AggregateFunction::Count => "COUNT",
            AggregateFunction::Min => "MIN",
            AggregateFunction::Max => "MAX",
        }
    }
}
