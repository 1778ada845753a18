//! Answer-shape readers and structural checks.
//!
//! Readers implement the format layer: they accept the loose spellings a
//! solver produces (JSON numbers, integral strings, `\boxed{...}` wrappers,
//! JSON lists embedded in strings) and reject everything else with
//! `INCORRECT_FORMAT`. None of them panic on any input.

use super::Rejection;
use crate::symbolic::{Expr, ExpressionParser, Rational};
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt::{Debug, Display};
use std::sync::OnceLock;

/// Absolute tolerance for real-valued comparisons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance(pub f64);

impl Tolerance {
    pub fn approx_eq(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.0
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

fn boxed_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\\boxed\s*\{(.*)\}$").expect("valid regex"))
}

fn assignment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*[A-Za-z](?:\s*\(\s*([A-Za-z])\s*\))?\s*=\s*").expect("valid regex")
    })
}

fn fraction_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(-?\d+)\s*/\s*(-?\d+)$|^(-?)\\[dt]?frac\s*\{\s*(-?\d+)\s*\}\s*\{\s*(-?\d+)\s*\}$")
            .expect("valid regex")
    })
}

/// Trim whitespace, `$` delimiters and a surrounding `\boxed{...}`.
pub fn unwrap_answer_text(text: &str) -> &str {
    let mut text = text.trim().trim_matches('$').trim();
    if let Some(inner) = boxed_re().captures(text).and_then(|c| c.get(1)) {
        text = inner.as_str().trim();
    }
    text
}

/// Drop a leading `y =` or `f(x) =`.
pub fn strip_assignment_prefix(text: &str) -> &str {
    match assignment_re().find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    }
}

/// The argument of a leading `f(v) =`, if there is one.
pub fn assignment_variable(text: &str) -> Option<String> {
    assignment_re()
        .captures(unwrap_answer_text(text))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Read a single integer.
pub fn read_integer(candidate: &Value) -> Result<i64, Rejection> {
    match candidate {
        Value::Number(n) => {
            if let Some(v) = n.as_i64() {
                return Ok(v);
            }
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => Ok(f as i64),
                _ => Err(Rejection::format(format!("{n} is not an integer"))),
            }
        }
        Value::String(s) => unwrap_answer_text(s)
            .parse::<i64>()
            .map_err(|_| Rejection::format(format!("'{s}' is not an integer"))),
        other => Err(Rejection::format(format!(
            "expected an integer, got {}",
            type_name(other)
        ))),
    }
}

/// Read a real number.
pub fn read_real(candidate: &Value) -> Result<f64, Rejection> {
    let value = match candidate {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => unwrap_answer_text(s).parse::<f64>().ok(),
        _ => None,
    };
    match value {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(Rejection::format(format!("{candidate} is not a real number"))),
    }
}

/// A JSON list, or a string holding one.
fn read_list(candidate: &Value) -> Result<Vec<Value>, Rejection> {
    match candidate {
        Value::Array(items) => Ok(items.clone()),
        Value::String(s) => match serde_json::from_str::<Value>(unwrap_answer_text(s)) {
            Ok(Value::Array(items)) => Ok(items),
            _ => Err(Rejection::format(format!("'{s}' is not a list"))),
        },
        other => Err(Rejection::format(format!(
            "expected a list, got {}",
            type_name(other)
        ))),
    }
}

fn read_elements<T>(
    candidate: &Value,
    read: impl Fn(&Value) -> Result<T, Rejection>,
) -> Result<Vec<T>, Rejection> {
    read_list(candidate)?
        .iter()
        .enumerate()
        .map(|(i, item)| {
            read(item).map_err(|r| Rejection::format(format!("element {i}: {}", r.message())))
        })
        .collect()
}

/// Read a list of integers.
pub fn read_integer_list(candidate: &Value) -> Result<Vec<i64>, Rejection> {
    read_elements(candidate, read_integer)
}

/// Read a list of reals.
pub fn read_real_list(candidate: &Value) -> Result<Vec<f64>, Rejection> {
    read_elements(candidate, read_real)
}

/// Read a list of integer pairs such as `[[1, 4], [2, 3]]`.
pub fn read_pair_list(candidate: &Value) -> Result<Vec<(i64, i64)>, Rejection> {
    read_elements(candidate, |item| {
        let pair = read_integer_list(item)?;
        match pair.as_slice() {
            [a, b] => Ok((*a, *b)),
            _ => Err(Rejection::format(format!(
                "expected a pair, got {} values",
                pair.len()
            ))),
        }
    })
}

/// Read an exact fraction: an integer, `"p/q"` or `"\frac{p}{q}"`.
pub fn read_fraction(candidate: &Value) -> Result<Rational, Rejection> {
    if let Ok(v) = read_integer(candidate) {
        return Ok(Rational::from_integer(i128::from(v)));
    }
    let Value::String(s) = candidate else {
        return Err(Rejection::format(format!(
            "expected a fraction, got {}",
            type_name(candidate)
        )));
    };
    let text = unwrap_answer_text(s);
    let caps = fraction_re()
        .captures(text)
        .ok_or_else(|| Rejection::format(format!("'{s}' is not a fraction")))?;

    let parse = |m: Option<regex::Match<'_>>| -> Result<i128, Rejection> {
        m.and_then(|m| m.as_str().parse::<i128>().ok())
            .ok_or_else(|| Rejection::format(format!("'{s}' has an invalid numerator or denominator")))
    };
    let (num, den) = if caps.get(1).is_some() {
        (parse(caps.get(1))?, parse(caps.get(2))?)
    } else {
        let num = parse(caps.get(4))?;
        let negative = caps.get(3).is_some_and(|m| !m.as_str().is_empty());
        (if negative { -num } else { num }, parse(caps.get(5))?)
    };
    Rational::new(num, den).map_err(|e| Rejection::format(format!("'{s}': {e}")))
}

/// Read a symbolic expression through `parser`.
///
/// Parse failures are format failures, never errors.
pub fn read_expression(parser: &dyn ExpressionParser, candidate: &Value) -> Result<Expr, Rejection> {
    let text = match candidate {
        Value::String(s) => s.as_str(),
        Value::Number(n) => return parser
            .parse(&n.to_string())
            .map_err(|e| Rejection::format(format!("could not parse expression: {e}"))),
        other => {
            return Err(Rejection::format(format!(
                "expected an expression, got {}",
                type_name(other)
            )))
        }
    };
    let text = strip_assignment_prefix(unwrap_answer_text(text));
    parser
        .parse(text)
        .map_err(|e| Rejection::format(format!("could not parse expression: {e}")))
}

/// Cardinality check: `INCORRECT_LENGTH` on mismatch.
pub fn require_length<T>(items: &[T], expected: usize) -> Result<(), Rejection> {
    if items.len() == expected {
        Ok(())
    } else {
        Err(Rejection::length(expected, items.len()))
    }
}

/// All elements distinct.
pub fn require_distinct<T: Ord + Debug>(items: &[T]) -> Result<(), Rejection> {
    let mut seen = BTreeSet::new();
    for item in items {
        if !seen.insert(item) {
            return Err(Rejection::format(format!("{item:?} appears more than once")));
        }
    }
    Ok(())
}

/// All elements within `[low, high]`.
pub fn require_range<T: PartialOrd + Display>(items: &[T], low: T, high: T) -> Result<(), Rejection> {
    match items.iter().find(|v| **v < low || **v > high) {
        Some(v) => Err(Rejection::format(format!("{v} is outside [{low}, {high}]"))),
        None => Ok(()),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
