//! Formula error types

use thiserror::Error;

/// Result type for formula parsing
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// The error value a cell displays when its formula cannot be evaluated
///
/// These are values, not failures: [`evaluate`](crate::evaluate) returns
/// them inside [`EvaluationResult::Error`](crate::EvaluationResult::Error).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum EvalError {
    /// Formula does not match the grammar
    #[error("#ERROR!")]
    Syntax,
    /// A reference token is not a well-formed cell address
    #[error("#NAME?")]
    InvalidAddress,
    /// An aggregate's range corners are not valid addresses
    #[error("#REF!")]
    Range,
    /// A referenced value is not a number where one is required
    #[error("#VALUE!")]
    Value,
    /// Division by zero
    #[error("#DIV/0!")]
    DivideByZero,
    /// The formula depends on itself
    #[error("#CIRCULAR!")]
    CircularReference,
}

impl EvalError {
    /// Get the display string for this error
    pub fn code(&self) -> &'static str {
        match self {
            EvalError::Syntax => "#ERROR!",
            EvalError::InvalidAddress => "#NAME?",
            EvalError::Range => "#REF!",
            EvalError::Value => "#VALUE!",
            EvalError::DivideByZero => "#DIV/0!",
            EvalError::CircularReference => "#CIRCULAR!",
        }
    }
}

/// Errors that can occur while parsing a formula
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormulaError {
    /// Formula does not match the grammar
    #[error("Syntax error: {0}")]
    Syntax(String),

    /// Reference token is not a valid address
    #[error("Invalid reference: {0}")]
    InvalidAddress(String),

    /// Aggregate range corners are not valid addresses
    #[error("Invalid range: {0}")]
    InvalidRange(String),
}

impl FormulaError {
    /// The error value a cell with this formula displays
    pub fn kind(&self) -> EvalError {
        match self {
            FormulaError::Syntax(_) => EvalError::Syntax,
            FormulaError::InvalidAddress(_) => EvalError::InvalidAddress,
            FormulaError::InvalidRange(_) => EvalError::Range,
        }
    }
}
