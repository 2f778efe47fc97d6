//! Surface syntax of the language: the name alphabet and the statement shapes.
//!
//! | Shape              | Pattern                         |
//! |--------------------|---------------------------------|
//! | scalar name        | `$NAME`                         |
//! | array name         | `@NAME`                         |
//! | array index        | `NAME[i]`                       |
//! | function name      | `#NAME`                         |
//! | scalar assignment  | `$NAME=( <expr> )`              |
//! | array assignment   | `@NAME=[ d,d,... ]`             |
//! | function call      | `#NAME( $VAR )` / `#NAME( @ARR )` |
//!
//! The sigil is load‑bearing: every lookup re‑checks it through
//! [`NameKind::of`] before touching a table.

use std::sync::LazyLock;

use log::debug;
use regex::Regex;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in pattern must compile")
}

pub static VARIABLE: LazyLock<Regex> = LazyLock::new(|| compile(r"^\$[A-Z]+$"));
pub static ARRAY_NAME: LazyLock<Regex> = LazyLock::new(|| compile(r"^@[A-Z]+$"));
pub static ARRAY_INDEX: LazyLock<Regex> = LazyLock::new(|| compile(r"^([A-Z]+)\[(\d+)\]$"));
pub static FUNCTION_NAME: LazyLock<Regex> = LazyLock::new(|| compile(r"^#[A-Z]+$"));

pub static SCALAR_ASSIGNMENT: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^(\$[A-Z]+)=\( (.+) \)$"));
pub static ARRAY_ASSIGNMENT: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^(@[A-Z]+)=\[ ([\d,]+) \]$"));
pub static FUNCTION_CALL: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^(#[A-Z]+)\( ((?:\$|@)[A-Z]+) \)$"));

/// Which namespace a name belongs to, decided purely by its shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameKind<'a> {
    /// `$NAME`
    Scalar,

    /// `@NAME`
    Array,

    /// `NAME[i]`, with the owning array name (`@NAME`) and the raw index digits.
    Element { array: String, index: &'a str },

    /// `#NAME`
    Function,
}

impl<'a> NameKind<'a> {
    /// Classify `name` by shape, or `None` when it fits no namespace.
    pub fn of(name: &'a str) -> Option<Self> {
        let kind = if VARIABLE.is_match(name) {
            Some(NameKind::Scalar)
        } else if ARRAY_NAME.is_match(name) {
            Some(NameKind::Array)
        } else if FUNCTION_NAME.is_match(name) {
            Some(NameKind::Function)
        } else if let Some(caps) = ARRAY_INDEX.captures(name) {
            match (caps.get(1), caps.get(2)) {
                (Some(array), Some(index)) => Some(NameKind::Element {
                    array: format!("@{}", array.as_str()),
                    index: index.as_str(),
                }),
                _ => None,
            }
        } else {
            None
        };

        debug!("Name '{}' classified as {:?}", name, kind);

        kind
    }
}
