//! Built‑in native functions available through
//! [`Environment::with_prelude`](crate::environment::Environment::with_prelude).
//!
//! Each takes the marshalled argument strings of a call such as `#SUM( @A )`
//! and returns its result already rendered.

use log::debug;
use phf::phf_map;

use crate::environment::NativeFn;
use crate::value::format_number;

pub static FUNCTIONS: phf::Map<&'static str, NativeFn> = phf_map! {
    "#SUM"   => sum as NativeFn,
    "#MIN"   => min as NativeFn,
    "#MAX"   => max as NativeFn,
    "#AVG"   => avg as NativeFn,
    "#COUNT" => count as NativeFn,
};

fn numbers(args: &[String]) -> Result<Vec<f64>, String> {
    args.iter()
        .map(|arg| {
            arg.trim()
                .parse::<f64>()
                .map_err(|_| format!("'{}' is not a number", arg))
        })
        .collect()
}

fn non_empty(args: &[String]) -> Result<Vec<f64>, String> {
    let values = numbers(args)?;

    if values.is_empty() {
        return Err("expected at least one argument".to_string());
    }

    Ok(values)
}

pub fn sum(args: &[String]) -> Result<String, String> {
    let total: f64 = numbers(args)?.iter().sum();

    debug!("#SUM of {} values = {}", args.len(), total);

    Ok(format_number(total))
}

pub fn min(args: &[String]) -> Result<String, String> {
    let values = non_empty(args)?;

    Ok(format_number(values.into_iter().fold(f64::INFINITY, f64::min)))
}

pub fn max(args: &[String]) -> Result<String, String> {
    let values = non_empty(args)?;

    Ok(format_number(
        values.into_iter().fold(f64::NEG_INFINITY, f64::max),
    ))
}

pub fn avg(args: &[String]) -> Result<String, String> {
    let values = non_empty(args)?;
    let len = values.len() as f64;

    Ok(format_number(values.iter().sum::<f64>() / len))
}

/// Number of arguments; never inspects their contents.
pub fn count(args: &[String]) -> Result<String, String> {
    let mut buf = itoa::Buffer::new();

    Ok(buf.format(args.len()).to_string())
}
