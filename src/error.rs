//! Centralised error hierarchy for the **calcline interpreter**.
//!
//! Every stage (symbol classification, line parsing, environment lookups,
//! arithmetic reduction, the script driver) reports failure through one of the
//! variants defined here.  A failure always aborts the current statement only;
//! the [`Environment`](crate::environment::Environment) stays usable.
//!
//! The module **does not** print diagnostics itself

use thiserror::Error;

use log::info;

/// Canonical error type used throughout the interpreter.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CalcError {
    /// A token matches none of the four symbol shapes.
    #[error("Invalid symbol '{token}'")]
    InvalidSymbol {
        /// The offending token, trimmed.
        token: String,
    },

    /// A name fails its required sigil/shape pattern.
    #[error("Invalid name '{name}'")]
    InvalidName { name: String },

    /// Registration of a name that is already present.
    #[error("Name '{name}' is already defined")]
    DuplicateName { name: String },

    /// Lookup of an unregistered variable, array or function.
    #[error("Undefined name '{name}'")]
    NotFound { name: String },

    /// Array index outside `[0, len)`.
    #[error("Index {index} is out of range for '{name}' (length {len})")]
    IndexOutOfRange {
        /// Array name including its `@` sigil.
        name: String,
        /// The requested index as written in the source.
        index: String,
        len: usize,
    },

    /// A tokenized body or an array value list contains an empty token.
    #[error("Empty token between separators in '{body}'")]
    MalformedSeparator { body: String },

    /// Evaluation attempted before the line's references were resolved.
    #[error("References must be resolved before evaluation")]
    NotResolved,

    /// The arithmetic reducer could not make sense of its input.
    #[error("Malformed expression '{expr}': {reason}")]
    MalformedExpression { expr: String, reason: String },

    /// Division by zero inside the arithmetic reducer.
    #[error("Division by zero")]
    DivisionByZero,

    /// A native function rejected its arguments.
    #[error("Function '{name}' failed: {message}")]
    FunctionFailed { name: String, message: String },
}

impl CalcError {
    /// Helper constructor for the **symbol classifier**.
    pub fn invalid_symbol<S: Into<String>>(token: S) -> Self {
        let token: String = token.into();

        info!("Creating InvalidSymbol error: token={}", token);

        CalcError::InvalidSymbol { token }
    }

    /// Helper constructor for name validation failures.
    pub fn invalid_name<S: Into<String>>(name: S) -> Self {
        let name: String = name.into();

        info!("Creating InvalidName error: name={}", name);

        CalcError::InvalidName { name }
    }

    pub fn duplicate_name<S: Into<String>>(name: S) -> Self {
        let name: String = name.into();

        info!("Creating DuplicateName error: name={}", name);

        CalcError::DuplicateName { name }
    }

    pub fn not_found<S: Into<String>>(name: S) -> Self {
        let name: String = name.into();

        info!("Creating NotFound error: name={}", name);

        CalcError::NotFound { name }
    }

    /// Helper constructor for the **arithmetic reducer**.
    pub fn malformed<E: Into<String>, R: Into<String>>(expr: E, reason: R) -> Self {
        let expr: String = expr.into();
        let reason: String = reason.into();

        info!(
            "Creating MalformedExpression error: expr={}, reason={}",
            expr, reason
        );

        CalcError::MalformedExpression { expr, reason }
    }

    /// Did this failure happen while reading the statement, before evaluation?
    pub fn is_syntax(&self) -> bool {
        matches!(
            self,
            CalcError::InvalidSymbol { .. } | CalcError::MalformedSeparator { .. }
        )
    }
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, CalcError>;
