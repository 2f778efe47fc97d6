/// Largest magnitude that still round-trips through `i64` exactly enough for
/// integral rendering.
const INTEGRAL_LIMIT: f64 = 9.0e15;

/// What a statement evaluates to.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Result of an arithmetic reduction.
    Number(f64),

    /// Result returned verbatim by a native function.
    Text(String),

    /// Statements with no result of their own (array declarations).
    Nop,
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(n) => f.write_str(&format_number(*n)),

            Value::Text(s) => write!(f, "{}", s),

            Value::Nop => write!(f, "NOP"),
        }
    }
}

/// Canonical decimal form of a double: `12` rather than `12.0`, `0.5` as is.
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < INTEGRAL_LIMIT {
        let mut buf: itoa::Buffer = itoa::Buffer::new();
        buf.format(n as i64).to_string()
    } else {
        n.to_string()
    }
}
