//! Formula parser
//!
//! A recursive descent parser for the arithmetic grammar, plus a recognizer
//! for whole-formula aggregates.
//!
//! ```text
//! expression := term (('+' | '-') term)*
//! term       := factor (('*' | '/') factor)*
//! factor     := NUMBER | CELL_REF | '(' expression ')' | '-' factor
//! aggregate  := NAME '(' CELL_REF ':' CELL_REF ')'     (entire body only)
//! ```

use crate::ast::{AggregateFunction, BinaryOperator, Formula, FormulaExpr};
use crate::error::{FormulaError, FormulaResult};
use cellgrid_core::{CellAddress, CellRange};
use lazy_regex::regex_captures;

/// Deepest parenthesis/unary nesting accepted before the formula is rejected
pub const MAX_NESTING: usize = 512;

/// Most binary operators accepted in one formula
///
/// Operator chains nest to the left, so this bounds the depth of the tree.
pub const MAX_OPERATORS: usize = 2048;

/// Parse a formula string into an AST
///
/// # Example
/// ```rust
/// use cellgrid_formula::{parse_formula, Formula};
///
/// assert!(matches!(parse_formula("=1+2*A1").unwrap(), Formula::Expr(_)));
/// assert!(matches!(parse_formula("=SUM(A1:A10)").unwrap(), Formula::Aggregate { .. }));
/// assert!(parse_formula("=SUM(A1:A2)+1").is_err());
/// ```
pub fn parse_formula(formula: &str) -> FormulaResult<Formula> {
    let formula = formula.trim();

    // Formula must start with '='
    let body = formula
        .strip_prefix('=')
        .ok_or_else(|| FormulaError::Syntax("Formula must start with '='".into()))?;

    if let Some(aggregate) = parse_aggregate(body)? {
        return Ok(aggregate);
    }

    let mut parser = FormulaParser::new(body);
    let expr = parser.parse_expression()?;

    // Make sure we consumed all input
    if !matches!(parser.current_token(), Token::Eof) {
        return Err(FormulaError::Syntax(format!(
            "Unexpected {} after expression",
            parser.current_token()
        )));
    }

    Ok(Formula::Expr(expr))
}

/// Recognize `NAME(REF:REF)` as the entire formula body
///
/// Returns `Ok(None)` when the body does not have that shape or names an
/// unknown function, so the arithmetic parser gets to report the error.
fn parse_aggregate(body: &str) -> FormulaResult<Option<Formula>> {
    let Some((_, name, start, end)) = regex_captures!(
        r"^\s*([A-Za-z]+)\s*\(\s*([^:()]*?)\s*:\s*([^:()]*?)\s*\)\s*$",
        body
    ) else {
        return Ok(None);
    };

    let Some(function) = AggregateFunction::from_name(name) else {
        return Ok(None);
    };

    let corner = |text: &str| {
        CellAddress::parse(text).map_err(|e| {
            FormulaError::InvalidRange(format!("{}({}:{}): {}", function.name(), start, end, e))
        })
    };
    let range = CellRange::new(corner(start)?, corner(end)?);

    Ok(Some(Formula::Aggregate { function, range }))
}

/// Token types
#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    /// Letters followed by digits, e.g. `B7`
    CellRef(String),
    /// Any other alphanumeric run, e.g. `SUM` or `A1B`
    Identifier(String),
    Plus,
    Minus,
    Star,
    Slash,
    LeftParen,
    RightParen,
    /// Text the grammar has no token for
    Invalid(String),
    Eof,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Number(n) => write!(f, "number {}", n),
            Token::CellRef(s) => write!(f, "reference '{}'", s),
            Token::Identifier(s) => write!(f, "name '{}'", s),
            Token::Plus => write!(f, "'+'"),
            Token::Minus => write!(f, "'-'"),
            Token::Star => write!(f, "'*'"),
            Token::Slash => write!(f, "'/'"),
            Token::LeftParen => write!(f, "'('"),
            Token::RightParen => write!(f, "')'"),
            Token::Invalid(s) => write!(f, "'{}'", s),
            Token::Eof => write!(f, "end of formula"),
        }
    }
}

/// Formula parser
struct FormulaParser<'a> {
    input: &'a str,
    pos: usize,
    current_token: Option<Token>,
    depth: usize,
    operators: usize,
}

impl<'a> FormulaParser<'a> {
    fn new(input: &'a str) -> Self {
        let mut parser = Self {
            input,
            pos: 0,
            current_token: None,
            depth: 0,
            operators: 0,
        };
        parser.advance_token();
        parser
    }

    // === Token scanning ===

    fn advance_token(&mut self) {
        self.current_token = Some(self.scan_token());
    }

    fn scan_token(&mut self) -> Token {
        self.skip_whitespace();

        let Some(c) = self.peek_char() else {
            return Token::Eof;
        };

        let single = match c {
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '*' => Some(Token::Star),
            '/' => Some(Token::Slash),
            '(' => Some(Token::LeftParen),
            ')' => Some(Token::RightParen),
            _ => None,
        };
        if let Some(token) = single {
            self.advance();
            return token;
        }

        if c.is_ascii_digit()
            || (c == '.' && self.peek_char_at(1).map_or(false, |c| c.is_ascii_digit()))
        {
            return self.scan_number();
        }

        if c.is_ascii_alphanumeric() || c == '_' {
            return self.scan_identifier_or_ref();
        }

        self.advance();
        Token::Invalid(c.to_string())
    }

    fn scan_number(&mut self) -> Token {
        let start = self.pos;

        // Integer part
        while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
        }

        // Decimal part
        if self.peek_char() == Some('.') {
            self.advance();
            while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        let num_str = &self.input[start..self.pos];
        match num_str.parse() {
            Ok(n) => Token::Number(n),
            Err(_) => Token::Invalid(num_str.to_string()),
        }
    }

    fn scan_identifier_or_ref(&mut self) -> Token {
        let start = self.pos;

        while self
            .peek_char()
            .map_or(false, |c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.advance();
        }

        let text = &self.input[start..self.pos];
        if Self::is_cell_reference(text) {
            Token::CellRef(text.to_string())
        } else {
            Token::Identifier(text.to_string())
        }
    }

    /// Letters followed by digits, nothing else
    fn is_cell_reference(text: &str) -> bool {
        let letters = text.bytes().take_while(|b| b.is_ascii_alphabetic()).count();
        let digits = text[letters..]
            .bytes()
            .take_while(|b| b.is_ascii_digit())
            .count();
        letters > 0 && digits > 0 && letters + digits == text.len()
    }

    // === Helper methods ===

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().map_or(false, |c| c.is_whitespace()) {
            self.advance();
        }
    }

    fn current_token(&self) -> &Token {
        self.current_token.as_ref().unwrap_or(&Token::Eof)
    }

    fn consume(&mut self) -> Token {
        let token = self.current_token.take().unwrap_or(Token::Eof);
        self.advance_token();
        token
    }

    fn expect(&mut self, expected: &Token) -> FormulaResult<()> {
        if self.current_token() == expected {
            self.consume();
            Ok(())
        } else {
            Err(FormulaError::Syntax(format!(
                "Expected {}, got {}",
                expected,
                self.current_token()
            )))
        }
    }

    fn descend(&mut self) -> FormulaResult<()> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(FormulaError::Syntax(format!(
                "Formula nests deeper than {} levels",
                MAX_NESTING
            )));
        }
        Ok(())
    }

    fn count_operator(&mut self) -> FormulaResult<()> {
        self.operators += 1;
        if self.operators > MAX_OPERATORS {
            return Err(FormulaError::Syntax(format!(
                "Formula has more than {} operators",
                MAX_OPERATORS
            )));
        }
        Ok(())
    }

    // === Expression parsing with precedence ===
    // Precedence (lowest to highest):
    // 1. Addition/Subtraction: +, -
    // 2. Multiplication/Division: *, /
    // 3. Factor: number, reference, parentheses, unary minus

    fn parse_expression(&mut self) -> FormulaResult<FormulaExpr> {
        let mut left = self.parse_term()?;

        loop {
            let op = match self.current_token() {
                Token::Plus => BinaryOperator::Add,
                Token::Minus => BinaryOperator::Subtract,
                _ => break,
            };

            self.consume();
            self.count_operator()?;
            let right = self.parse_term()?;
            left = FormulaExpr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_term(&mut self) -> FormulaResult<FormulaExpr> {
        let mut left = self.parse_factor()?;

        loop {
            let op = match self.current_token() {
                Token::Star => BinaryOperator::Multiply,
                Token::Slash => BinaryOperator::Divide,
                _ => break,
            };

            self.consume();
            self.count_operator()?;
            let right = self.parse_factor()?;
            left = FormulaExpr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_factor(&mut self) -> FormulaResult<FormulaExpr> {
        match self.consume() {
            Token::Number(n) => Ok(FormulaExpr::Number(n)),

            Token::CellRef(ref_str) => {
                let address = CellAddress::parse(&ref_str).map_err(|e| {
                    FormulaError::InvalidAddress(format!("'{}': {}", ref_str, e))
                })?;
                Ok(FormulaExpr::CellRef(address))
            }

            Token::LeftParen => {
                self.descend()?;
                let expr = self.parse_expression()?;
                self.expect(&Token::RightParen)?;
                self.depth -= 1;
                Ok(expr)
            }

            Token::Minus => {
                self.descend()?;
                let operand = self.parse_factor()?;
                self.depth -= 1;
                Ok(FormulaExpr::Negate(Box::new(operand)))
            }

            token => Err(FormulaError::Syntax(format!("Unexpected {}", token))),
        }
    }
}
