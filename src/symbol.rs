//! Module `symbol` classifies a single whitespace‑delimited token of a line.
//!
//! Classification order is significant and first match wins:
//!
//! 1. scalar variable name (`$NAME`)            → [`Symbol::Variable`]
//! 2. contains any of `+ - * /`                 → [`Symbol::Operator`] (whole token)
//! 3. plain decimal literal                      → [`Symbol::Number`]
//! 4. array index (`NAME[i]`)                    → [`Symbol::Element`]
//! 5. anything else                              → [`CalcError::InvalidSymbol`]
//!
//! Rendering a symbol (`Display`) yields the text that goes into the flat
//! arithmetic expression: references render their *resolved value*, never
//! their name, and `"0"` while unresolved.

use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::Serialize;

use crate::environment::Environment;
use crate::error::{CalcError, Result};
use crate::syntax::{ARRAY_INDEX, VARIABLE};
use crate::value::format_number;

/// The four binary operators of the language.
pub const OPERATORS: [char; 4] = ['+', '-', '*', '/'];

/// Rendered form of a reference nobody resolved.
const UNRESOLVED: &str = "0";

/// A named reference into the environment.
///
/// References are two‑phase: parsing produces one with only a name, and
/// [`Reference::resolved`] turns it into a new reference carrying the value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reference {
    name: String,
    value: Option<String>,
}

impl Reference {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn is_resolved(&self) -> bool {
        self.value.is_some()
    }

    /// Consume the unresolved reference and produce the resolved one.
    pub fn resolved(self, value: String) -> Self {
        debug!("Reference '{}' resolved to {}", self.name, value);

        Self {
            name: self.name,
            value: Some(value),
        }
    }
}

/// One classified token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Symbol {
    /// Numeric literal, stored as IEEE‑754 `f64`.
    Number(f64),

    /// Operator token.  Holds the whole token; anything longer than one
    /// character is rejected later by the arithmetic reducer.
    Operator(String),

    /// `$NAME`
    Variable(Reference),

    /// `NAME[i]`
    Element(Reference),
}

impl Symbol {
    /// Classify a raw token.  Surrounding whitespace is ignored.
    pub fn classify(input: &str) -> Result<Self> {
        let token = input.trim();

        let symbol = if VARIABLE.is_match(token) {
            Symbol::Variable(Reference::new(token))
        } else if token.contains(&OPERATORS[..]) {
            Symbol::Operator(token.to_string())
        } else if let Some(n) = parse_literal(token) {
            Symbol::Number(n)
        } else if ARRAY_INDEX.is_match(token) {
            Symbol::Element(Reference::new(token))
        } else {
            return Err(CalcError::invalid_symbol(token));
        };

        debug!("Classified '{}' as {:?}", token, symbol);

        Ok(symbol)
    }

    /// The reference carried by `Variable`/`Element`, if any.
    pub fn reference(&self) -> Option<&Reference> {
        match self {
            Symbol::Variable(r) | Symbol::Element(r) => Some(r),
            Symbol::Number(_) | Symbol::Operator(_) => None,
        }
    }

    /// Source form of the token: the name for references, not the value.
    pub fn lexeme(&self) -> String {
        match self {
            Symbol::Number(n) => format_number(*n),
            Symbol::Operator(op) => op.clone(),
            Symbol::Variable(r) | Symbol::Element(r) => r.name.clone(),
        }
    }

    /// Look the symbol's reference up in `env`, returning the resolved symbol.
    /// Literals and operators pass through untouched.
    pub fn resolve(self, env: &Environment) -> Result<Self> {
        Ok(match self {
            Symbol::Variable(r) => {
                let value = env.get_variable_value(r.name())?;
                Symbol::Variable(r.resolved(value))
            }
            Symbol::Element(r) => {
                let value = env.get_variable_value(r.name())?;
                Symbol::Element(r.resolved(value))
            }
            other => other,
        })
    }
}

impl FromStr for Symbol {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        Symbol::classify(s)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Number(n) => f.write_str(&format_number(*n)),
            Symbol::Operator(op) => f.write_str(op),
            Symbol::Variable(r) | Symbol::Element(r) => {
                f.write_str(r.value().unwrap_or(UNRESOLVED))
            }
        }
    }
}

/// Parse a plain decimal literal (`12`, `0.5`, `.5`, `3e8`).  Textual floats
/// such as `inf` or `NaN` are not part of the language, nor are literals
/// that overflow to infinity.
fn parse_literal(token: &str) -> Option<f64> {
    let first = *token.as_bytes().first()?;

    if !(first.is_ascii_digit() || first == b'.') {
        return None;
    }

    if !token
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E'))
    {
        return None;
    }

    token.parse::<f64>().ok().filter(|n| n.is_finite())
}
