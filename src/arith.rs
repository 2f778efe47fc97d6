//! Arithmetic reduction of a fully resolved, flat infix string.
//!
//! The evaluator only depends on the [`Reduce`] trait; [`Arithmetic`] is the
//! engine used by default.  Its contract:
//!
//! ```text
//! expression → term ( ( "+" | "-" ) term )* ;
//! term       → operand ( ( "*" | "/" ) operand )* ;
//! operand    → sign? NUMBER ;
//! ```
//!
//! * two precedence tiers, each folded left to right in `f64`;
//! * a single sign is accepted in front of a literal at the start of the
//!   expression or right after an operator (resolved values can be negative);
//! * no whitespace, no parentheses;
//! * `x / 0` is [`CalcError::DivisionByZero`], anything ill‑formed is
//!   [`CalcError::MalformedExpression`], and so is a result that overflows
//!   to infinity.

use std::fmt;

use log::debug;

use crate::error::{CalcError, Result};

/// Reduces a flat infix string to a number.
pub trait Reduce {
    fn reduce(&self, expr: &str) -> Result<f64>;
}

/// Default two‑tier arithmetic engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct Arithmetic;

impl Reduce for Arithmetic {
    fn reduce(&self, expr: &str) -> Result<f64> {
        debug!("Reducing expression: {}", expr);

        let lexemes = Lexer::new(expr).collect::<Result<Vec<Lexeme>>>()?;

        let value = Reduction {
            expr,
            lexemes,
            curr: 0,
        }
        .run()?;

        debug!("Expression {} reduced to {}", expr, value);

        Ok(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Add,
    Sub,
    Mul,
    Div,
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Op::Add => '+',
            Op::Sub => '-',
            Op::Mul => '*',
            Op::Div => '/',
        };
        write!(f, "{}", c)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Lexeme {
    Number(f64),
    Op(Op),
}

// ─────────────────────────────────────────────────────────────────────────────
// Lexer
// ─────────────────────────────────────────────────────────────────────────────

struct Lexer<'a> {
    expr: &'a str,
    src: &'a [u8],
    curr: usize,
    after_operand: bool, // last lexeme was a number
}

impl<'a> Lexer<'a> {
    fn new(expr: &'a str) -> Self {
        Self {
            expr,
            src: expr.as_bytes(),
            curr: 0,
            after_operand: false,
        }
    }

    #[inline(always)]
    fn is_at_end(&self) -> bool {
        self.curr >= self.src.len()
    }

    /// Peek at the current byte.  Returns `0` past EOF.
    #[inline(always)]
    fn peek(&self) -> u8 {
        self.src.get(self.curr).copied().unwrap_or(0)
    }

    #[inline(always)]
    fn peek_next(&self) -> u8 {
        self.src.get(self.curr + 1).copied().unwrap_or(0)
    }

    fn skip_digits(&mut self) {
        while self.peek().is_ascii_digit() {
            self.curr += 1;
        }
    }

    /// Scan `sign? digits ('.' digits)? (e sign? digits)?` starting at `curr`.
    fn number(&mut self) -> Result<Lexeme> {
        let start = self.curr;

        if matches!(self.peek(), b'+' | b'-') {
            self.curr += 1;
        }

        self.skip_digits();

        if self.peek() == b'.' {
            self.curr += 1;
            self.skip_digits();
        }

        if matches!(self.peek(), b'e' | b'E') {
            self.curr += 1;

            if matches!(self.peek(), b'+' | b'-') {
                self.curr += 1;
            }

            self.skip_digits();
        }

        let text = &self.expr[start..self.curr];

        text.parse::<f64>()
            .map(Lexeme::Number)
            .map_err(|_| CalcError::malformed(self.expr, format!("invalid number '{}'", text)))
    }

    fn scan(&mut self) -> Result<Lexeme> {
        let b = self.peek();
        let starts_literal = |c: u8| c.is_ascii_digit() || c == b'.';

        let lexeme = match b {
            b'0'..=b'9' | b'.' => self.number()?,

            b'+' | b'-' if !self.after_operand && starts_literal(self.peek_next()) => {
                self.number()?
            }

            b'+' | b'-' | b'*' | b'/' => {
                self.curr += 1;

                Lexeme::Op(match b {
                    b'+' => Op::Add,
                    b'-' => Op::Sub,
                    b'*' => Op::Mul,
                    _ => Op::Div,
                })
            }

            b'(' | b')' => {
                return Err(CalcError::malformed(self.expr, "parentheses are not supported"));
            }

            _ => {
                let c = self.expr[self.curr..].chars().next().unwrap_or('?');

                return Err(CalcError::malformed(
                    self.expr,
                    format!("unexpected character '{}'", c),
                ));
            }
        };

        self.after_operand = matches!(lexeme, Lexeme::Number(_));

        Ok(lexeme)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Lexeme>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_at_end() {
            return None;
        }

        let result = self.scan();

        if result.is_err() {
            // stop after the first error
            self.curr = self.src.len();
        }

        Some(result)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Reduction
// ─────────────────────────────────────────────────────────────────────────────

struct Reduction<'a> {
    expr: &'a str,
    lexemes: Vec<Lexeme>,
    curr: usize,
}

impl Reduction<'_> {
    fn run(mut self) -> Result<f64> {
        if self.lexemes.is_empty() {
            return Err(CalcError::malformed(self.expr, "empty expression"));
        }

        let value = self.sum()?;

        match self.lexemes.get(self.curr) {
            None if !value.is_finite() => {
                Err(CalcError::malformed(self.expr, "result is not finite"))
            }
            None => Ok(value),
            Some(Lexeme::Number(n)) => Err(CalcError::malformed(
                self.expr,
                format!("missing operator before {}", n),
            )),
            Some(Lexeme::Op(op)) => Err(CalcError::malformed(
                self.expr,
                format!("unexpected operator '{}'", op),
            )),
        }
    }

    fn peek_op(&self) -> Option<Op> {
        match self.lexemes.get(self.curr) {
            Some(Lexeme::Op(op)) => Some(*op),
            _ => None,
        }
    }

    fn sum(&mut self) -> Result<f64> {
        let mut acc = self.product()?;

        while let Some(op @ (Op::Add | Op::Sub)) = self.peek_op() {
            self.curr += 1;

            let rhs = self.product()?;

            acc = if op == Op::Add { acc + rhs } else { acc - rhs };
        }

        Ok(acc)
    }

    fn product(&mut self) -> Result<f64> {
        let mut acc = self.operand()?;

        while let Some(op @ (Op::Mul | Op::Div)) = self.peek_op() {
            self.curr += 1;

            let rhs = self.operand()?;

            acc = match op {
                Op::Div if rhs == 0.0 => {
                    debug!("Division by zero in {}", self.expr);
                    return Err(CalcError::DivisionByZero);
                }
                Op::Div => acc / rhs,
                _ => acc * rhs,
            };
        }

        Ok(acc)
    }

    fn operand(&mut self) -> Result<f64> {
        match self.lexemes.get(self.curr) {
            Some(Lexeme::Number(n)) => {
                self.curr += 1;
                Ok(*n)
            }
            Some(Lexeme::Op(op)) => Err(CalcError::malformed(
                self.expr,
                format!("expected a number, found '{}'", op),
            )),
            None => Err(CalcError::malformed(
                self.expr,
                "expression ends with an operator",
            )),
        }
    }
}
