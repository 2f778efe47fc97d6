//! Module `line` turns one raw statement into a classified [`Line`].
//!
//! Shapes are tried in order against the trimmed input:
//!
//! ```text
//! scalar assignment  → "$NAME=( " body " )"     body is tokenized
//! array assignment   → "@NAME=[ " digits " ]"   payload kept verbatim
//! function call      → "#NAME( " argument " )"  payload kept verbatim
//! plain expression   → anything else            whole line is tokenized
//! ```
//!
//! Tokenized bodies are split on single spaces; an empty piece means two
//! separators in a row (or a stray leading/trailing one) and is rejected.
//!
//! A line is immutable once parsed, except that [`Line::resolve`] swaps its
//! unresolved references for resolved ones exactly once.

use std::fmt;
use std::str::FromStr;

use log::{debug, info};
use serde::Serialize;

use crate::environment::Environment;
use crate::error::{CalcError, Result};
use crate::symbol::Symbol;
use crate::syntax::{ARRAY_ASSIGNMENT, FUNCTION_CALL, SCALAR_ASSIGNMENT};

/// Statement shape of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LineKind {
    /// `<tok> <tok> ...`, evaluated and not stored.
    Plain,

    /// `$NAME=( <expr> )`
    ScalarAssign,

    /// `@NAME=[ d,d,... ]`
    ArrayAssign,

    /// `#NAME( $VAR )` or `#NAME( @ARR )`
    FuncCall,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
enum Body {
    Tokens(Vec<Symbol>),
    Payload(String),
}

/// One parsed statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    kind: LineKind,
    target: Option<String>,
    body: Body,
    resolved: bool,
}

impl Line {
    /// Classify and tokenize `raw`.
    pub fn parse(raw: &str) -> Result<Self> {
        let input = raw.trim();

        let line = if let Some(caps) = SCALAR_ASSIGNMENT.captures(input) {
            Line {
                kind: LineKind::ScalarAssign,
                target: Some(caps[1].to_string()),
                body: Body::Tokens(tokenize(&caps[2])?),
                resolved: false,
            }
        } else if let Some(caps) = ARRAY_ASSIGNMENT.captures(input) {
            Line {
                kind: LineKind::ArrayAssign,
                target: Some(caps[1].to_string()),
                body: Body::Payload(caps[2].to_string()),
                resolved: false,
            }
        } else if let Some(caps) = FUNCTION_CALL.captures(input) {
            Line {
                kind: LineKind::FuncCall,
                target: Some(caps[1].to_string()),
                body: Body::Payload(caps[2].to_string()),
                resolved: false,
            }
        } else {
            Line {
                kind: LineKind::Plain,
                target: None,
                body: Body::Tokens(tokenize(input)?),
                resolved: false,
            }
        };

        info!("Parsed {:?} line: {}", line.kind, line);

        Ok(line)
    }

    pub fn kind(&self) -> LineKind {
        self.kind
    }

    /// Assigned variable, assigned array or called function; `None` for plain lines.
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Tokens of a plain or scalar‑assignment line; empty for the other kinds.
    pub fn symbols(&self) -> &[Symbol] {
        match &self.body {
            Body::Tokens(tokens) => tokens,
            Body::Payload(_) => &[],
        }
    }

    /// Verbatim payload of an array assignment or function call.
    pub fn payload(&self) -> Option<&str> {
        match &self.body {
            Body::Tokens(_) => None,
            Body::Payload(payload) => Some(payload),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Resolve every reference token against `env`.  Runs at most once; the
    /// tokens are only replaced when every reference resolved.
    pub fn resolve(&mut self, env: &Environment) -> Result<()> {
        if self.resolved {
            debug!("Line already resolved, skipping");

            return Ok(());
        }

        if let Body::Tokens(tokens) = &mut self.body {
            let resolved = tokens
                .iter()
                .cloned()
                .map(|symbol| symbol.resolve(env))
                .collect::<Result<Vec<Symbol>>>()?;

            *tokens = resolved;
        }

        self.resolved = true;

        Ok(())
    }

    /// The text handed to evaluation: the concatenated rendered tokens for
    /// plain/scalar lines, the raw payload for the other kinds.
    pub fn eval_line(&self) -> Result<String> {
        match &self.body {
            Body::Tokens(_) if !self.resolved => Err(CalcError::NotResolved),
            Body::Tokens(tokens) => {
                let expr: String = tokens.iter().map(Symbol::to_string).collect();

                debug!("Evaluation text: {}", expr);

                Ok(expr)
            }
            Body::Payload(payload) => Ok(payload.clone()),
        }
    }

    /// [`resolve`](Self::resolve) followed by [`eval_line`](Self::eval_line).
    pub fn eval_line_with(&mut self, env: &Environment) -> Result<String> {
        self.resolve(env)?;
        self.eval_line()
    }
}

fn tokenize(body: &str) -> Result<Vec<Symbol>> {
    let pieces: Vec<&str> = body.split(' ').collect();

    if pieces.iter().any(|piece| piece.is_empty()) {
        return Err(CalcError::MalformedSeparator {
            body: body.to_string(),
        });
    }

    pieces.into_iter().map(Symbol::classify).collect()
}

impl FromStr for Line {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        Line::parse(s)
    }
}

/// Canonical statement text, references shown by name.
impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = self.target.as_deref().unwrap_or_default();

        match &self.body {
            Body::Tokens(tokens) => {
                let expr = tokens
                    .iter()
                    .map(Symbol::lexeme)
                    .collect::<Vec<_>>()
                    .join(" ");

                match self.kind {
                    LineKind::ScalarAssign => write!(f, "{}=( {} )", target, expr),
                    _ => f.write_str(&expr),
                }
            }
            Body::Payload(payload) => match self.kind {
                LineKind::ArrayAssign => write!(f, "{}=[ {} ]", target, payload),
                _ => write!(f, "{}( {} )", target, payload),
            },
        }
    }
}
