//! Formula evaluator
//!
//! Evaluates cells to display values, resolving references depth first.
//!
//! Each top-level call owns a fresh set of addresses currently being
//! evaluated. A formula that reads any of them (directly, or anywhere inside
//! an aggregate's range) yields [`EvalError::CircularReference`] instead of
//! descending, so evaluation terminates on every reference graph.

use std::fmt;

use ahash::{AHashMap, AHashSet};
use cellgrid_core::{CellAddress, CellData, CellRange, Grid};

use crate::ast::{AggregateFunction, BinaryOperator, Formula, FormulaExpr};
use crate::error::EvalError;
use crate::parser::parse_formula;
use crate::references::{collect_references, first_covered};

/// Read-only view of cell storage used during evaluation
pub trait CellSource {
    /// Get a stored cell
    fn cell(&self, addr: &CellAddress) -> Option<&CellData>;

    /// Addresses of stored cells inside `range`, row-major
    ///
    /// The default walks every address of the range; stores that can
    /// answer range queries directly should override it.
    fn populated_in(&self, range: &CellRange) -> Vec<CellAddress> {
        range
            .cells()
            .filter(|addr| self.cell(addr).is_some())
            .collect()
    }
}

impl CellSource for Grid {
    fn cell(&self, addr: &CellAddress) -> Option<&CellData> {
        self.get(addr)
    }

    fn populated_in(&self, range: &CellRange) -> Vec<CellAddress> {
        self.cells_in(range).map(|(addr, _)| *addr).collect()
    }
}

/// The value a cell displays
#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationResult {
    Number(f64),
    Text(String),
    Error(EvalError),
}

impl EvaluationResult {
    /// Convert to number, if possible
    ///
    /// Empty text counts as 0. Other text must parse as a finite number.
    pub fn as_number(&self) -> Result<f64, EvalError> {
        match self {
            EvaluationResult::Number(n) => Ok(*n),
            EvaluationResult::Text(s) if s.trim().is_empty() => Ok(0.0),
            EvaluationResult::Text(s) => parse_number(s).ok_or(EvalError::Value),
            EvaluationResult::Error(e) => Err(*e),
        }
    }

    /// The numeric value, if the result is numerically parseable
    ///
    /// Unlike [`as_number`](Self::as_number), empty text is not a number.
    /// This is the rule aggregates use to pick their operands.
    pub fn numeric(&self) -> Option<f64> {
        match self {
            EvaluationResult::Number(n) => Some(*n),
            EvaluationResult::Text(s) => parse_number(s),
            EvaluationResult::Error(_) => None,
        }
    }

    /// Check if this is an error
    pub fn is_error(&self) -> bool {
        matches!(self, EvaluationResult::Error(_))
    }

    /// Get the error if this is one
    pub fn error(&self) -> Option<EvalError> {
        match self {
            EvaluationResult::Error(e) => Some(*e),
            _ => None,
        }
    }

    /// Text shown to the user
    pub fn display(&self) -> String {
        match self {
            EvaluationResult::Number(n) => format_number(*n),
            EvaluationResult::Text(s) => s.clone(),
            EvaluationResult::Error(e) => e.code().to_string(),
        }
    }
}

impl fmt::Display for EvaluationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl From<EvalError> for EvaluationResult {
    fn from(e: EvalError) -> Self {
        EvaluationResult::Error(e)
    }
}

/// Parse display text as a finite number
pub fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    // Rust accepts "inf" and "NaN"; a cell reading "inf" is text, not a number
    if !text.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Format a number like a spreadsheet: integral values without ".0"
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Evaluate the cell at `addr`
///
/// A cell without a formula evaluates to its literal text; an absent cell
/// to "". Never fails: problems are reported as [`EvaluationResult::Error`].
pub fn evaluate<S: CellSource + ?Sized>(source: &S, addr: CellAddress) -> EvaluationResult {
    Evaluator::new(source).resolve(addr)
}

/// Evaluate several cells, sharing finished values between them
///
/// Gives the same results as calling [`evaluate`] for each address.
pub fn evaluate_all<S, I>(source: &S, addrs: I) -> Vec<(CellAddress, EvaluationResult)>
where
    S: CellSource + ?Sized,
    I: IntoIterator<Item = CellAddress>,
{
    let mut evaluator = Evaluator::new(source);
    addrs
        .into_iter()
        .map(|addr| (addr, evaluator.resolve(addr)))
        .collect()
}

/// Evaluate formula text that does not live in any cell
pub fn evaluate_formula<S: CellSource + ?Sized>(source: &S, formula: &str) -> EvaluationResult {
    let mut evaluator = Evaluator::new(source);
    match parse_formula(formula) {
        Ok(parsed) => {
            let frame = evaluator.frame(None, parsed);
            evaluator.run(frame)
        }
        Err(e) => EvaluationResult::Error(e.kind()),
    }
}

/// A formula waiting for its referenced cells
struct Frame {
    /// `None` for detached formula text
    addr: Option<CellAddress>,
    formula: Formula,
    /// Referenced cells, in the order they are read
    deps: Vec<CellAddress>,
    next: usize,
}

enum Entry {
    /// The cell's value is known without reading other cells
    Ready(EvaluationResult),
    /// The cell is now in progress and its references must be resolved
    Pending(Frame),
}

/// Evaluation state for one top-level call
///
/// References are resolved with an explicit stack of [`Frame`]s rather than
/// by recursion, so chain length is bounded by memory, not by the thread's
/// stack. Finished cells are cached for the rest of the call.
struct Evaluator<'a, S: ?Sized> {
    source: &'a S,
    /// Addresses on the current evaluation path
    in_progress: AHashSet<CellAddress>,
    /// Values of cells finished during this call
    done: AHashMap<CellAddress, EvaluationResult>,
}

impl<'a, S: CellSource + ?Sized> Evaluator<'a, S> {
    fn new(source: &'a S) -> Self {
        Self {
            source,
            in_progress: AHashSet::new(),
            done: AHashMap::new(),
        }
    }

    fn resolve(&mut self, addr: CellAddress) -> EvaluationResult {
        if let Some(value) = self.done.get(&addr) {
            return value.clone();
        }
        match self.enter(addr) {
            Entry::Ready(value) => {
                self.done.insert(addr, value.clone());
                value
            }
            Entry::Pending(frame) => self.run(frame),
        }
    }

    /// Start evaluating `addr`
    ///
    /// Returns the value directly when no reference has to be read, or when
    /// the formula reads a cell on the current path.
    fn enter(&mut self, addr: CellAddress) -> Entry {
        let Some(cell) = self.source.cell(&addr) else {
            return Entry::Ready(EvaluationResult::Text(String::new()));
        };

        let Some(formula) = cell.formula_text() else {
            return Entry::Ready(EvaluationResult::Text(
                cell.raw_text.clone().unwrap_or_default(),
            ));
        };

        let parsed = match parse_formula(formula) {
            Ok(parsed) => parsed,
            Err(e) => return Entry::Ready(EvaluationResult::Error(e.kind())),
        };

        let refs = collect_references(&parsed);
        if let Some(hit) = first_covered(&refs, &self.in_progress) {
            log::trace!("circular reference: {} reads {} which is in progress", addr, hit);
            return Entry::Ready(EvaluationResult::Error(EvalError::CircularReference));
        }

        self.in_progress.insert(addr);
        Entry::Pending(self.frame(Some(addr), parsed))
    }

    fn frame(&self, addr: Option<CellAddress>, formula: Formula) -> Frame {
        let deps = match &formula {
            Formula::Aggregate { range, .. } => self.source.populated_in(range),
            Formula::Expr(expr) => {
                let mut deps = Vec::new();
                collect_cells(expr, &mut deps);
                deps
            }
        };
        Frame {
            addr,
            formula,
            deps,
            next: 0,
        }
    }

    /// Resolve `root` and everything it reads, depth first
    fn run(&mut self, root: Frame) -> EvaluationResult {
        let mut stack = vec![root];

        loop {
            let Some(top) = stack.last_mut() else {
                // The root frame always produces the return value below
                return EvaluationResult::Text(String::new());
            };

            if let Some(&dep) = top.deps.get(top.next) {
                top.next += 1;
                if self.done.contains_key(&dep) || self.in_progress.contains(&dep) {
                    continue;
                }
                match self.enter(dep) {
                    Entry::Ready(value) => {
                        self.done.insert(dep, value);
                    }
                    Entry::Pending(frame) => stack.push(frame),
                }
                continue;
            }

            let Some(frame) = stack.pop() else {
                continue;
            };
            let value = self.compute(&frame);
            if let Some(addr) = frame.addr {
                self.in_progress.remove(&addr);
                self.done.insert(addr, value.clone());
            }
            if stack.is_empty() {
                return value;
            }
        }
    }

    /// Value of a referenced cell once it has been resolved
    fn lookup(&self, addr: &CellAddress) -> EvaluationResult {
        if self.in_progress.contains(addr) {
            log::trace!("circular reference: {} read while being evaluated", addr);
            return EvaluationResult::Error(EvalError::CircularReference);
        }
        self.done
            .get(addr)
            .cloned()
            .unwrap_or_else(|| EvaluationResult::Text(String::new()))
    }

    fn compute(&self, frame: &Frame) -> EvaluationResult {
        match &frame.formula {
            // A bare reference passes the referenced value through unchanged
            Formula::Expr(FormulaExpr::CellRef(addr)) => self.lookup(addr),
            Formula::Expr(expr) => match self.evaluate_expr(expr) {
                Ok(n) => EvaluationResult::Number(n),
                Err(e) => EvaluationResult::Error(e),
            },
            Formula::Aggregate { function, .. } => self.evaluate_aggregate(*function, &frame.deps),
        }
    }

    fn evaluate_expr(&self, expr: &FormulaExpr) -> Result<f64, EvalError> {
        match expr {
            FormulaExpr::Number(n) => Ok(*n),
            FormulaExpr::CellRef(addr) => self.lookup(addr).as_number(),
            FormulaExpr::Negate(operand) => Ok(-self.evaluate_expr(operand)?),
            FormulaExpr::BinaryOp { op, left, right } => {
                let l = self.evaluate_expr(left)?;
                let r = self.evaluate_expr(right)?;
                match op {
                    BinaryOperator::Add => Ok(l + r),
                    BinaryOperator::Subtract => Ok(l - r),
                    BinaryOperator::Multiply => Ok(l * r),
                    BinaryOperator::Divide => {
                        if r == 0.0 {
                            Err(EvalError::DivideByZero)
                        } else {
                            Ok(l / r)
                        }
                    }
                }
            }
        }
    }

    fn evaluate_aggregate(
        &self,
        function: AggregateFunction,
        members: &[CellAddress],
    ) -> EvaluationResult {
        let mut values = Vec::new();
        for addr in members {
            let value = self.lookup(addr);
            // Unparseable operands are skipped, but a cycle is never hidden
            if value.error() == Some(EvalError::CircularReference) {
                return value;
            }
            if let Some(n) = value.numeric() {
                values.push(n);
            }
        }

        let count = values.len();
        let sum: f64 = values.iter().sum();
        let result = match function {
            AggregateFunction::Sum => sum,
            AggregateFunction::Count => count as f64,
            AggregateFunction::Average if count == 0 => 0.0,
            AggregateFunction::Average => sum / count as f64,
            AggregateFunction::Min => values.iter().copied().reduce(f64::min).unwrap_or(0.0),
            AggregateFunction::Max => values.iter().copied().reduce(f64::max).unwrap_or(0.0),
        };
        EvaluationResult::Number(result)
    }
}

fn collect_cells(expr: &FormulaExpr, cells: &mut Vec<CellAddress>) {
    match expr {
        FormulaExpr::Number(_) => {}
        FormulaExpr::CellRef(addr) => cells.push(*addr),
        FormulaExpr::BinaryOp { left, right, .. } => {
            collect_cells(left, cells);
            collect_cells(right, cells);
        }
        FormulaExpr::Negate(operand) => collect_cells(operand, cells),
    }
}
