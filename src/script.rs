//! Multi‑line driver: evaluates a script one statement per line.
//!
//! Blank lines and lines starting with `//` are skipped.  A failing line is
//! reported in its [`Outcome`] and never stops the lines after it.

use log::{debug, info};
use memchr::memchr_iter;

use crate::arith::Reduce;
use crate::error::Result;
use crate::evaluator::Evaluator;
use crate::value::Value;

/// Result of one statement of a script.
#[derive(Debug)]
pub struct Outcome {
    /// 1‑based line number in the source.
    pub line_no: usize,

    /// The statement text, without its line terminator.
    pub source: String,

    pub result: Result<Value>,
}

/// Statement lines of `source` with their 1‑based line numbers.
pub fn statements(source: &str) -> Vec<(usize, &str)> {
    let bytes = source.as_bytes();
    let ends = memchr_iter(b'\n', bytes).chain(std::iter::once(bytes.len()));

    let mut lines = Vec::new();
    let mut start = 0;

    for (idx, end) in ends.enumerate() {
        let raw = &source[start..end];
        start = end + 1;

        let text = raw.strip_suffix('\r').unwrap_or(raw);
        let trimmed = text.trim();

        if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }

        lines.push((idx + 1, text));
    }

    debug!("Found {} statements", lines.len());

    lines
}

/// Evaluate every statement of `source` in order.
pub fn run<R: Reduce>(evaluator: &mut Evaluator<'_, R>, source: &str) -> Vec<Outcome> {
    let outcomes: Vec<Outcome> = statements(source)
        .into_iter()
        .map(|(line_no, text)| {
            let result = evaluator.evaluate_str(text);

            if let Err(e) = &result {
                debug!("Line {} failed: {}", line_no, e);
            }

            Outcome {
                line_no,
                source: text.to_string(),
                result,
            }
        })
        .collect();

    info!(
        "Script finished: {} statements, {} failed",
        outcomes.len(),
        outcomes.iter().filter(|o| o.result.is_err()).count()
    );

    outcomes
}
