//! Conversion of query literals and row cells into typed scalars, and the
//! comparison rules between them.

use std::cmp::Ordering;
use crate::utils::types::{ComparisonOperator, Scalar};

/// Coerce a literal token into a scalar.
///
/// A token wrapped in matching single or double quotes is always a string.
/// Otherwise a token containing `.` is tried as a float, anything else as an
/// integer, and a token that parses as neither stays a string unmodified.
pub fn coerce(text: &str) -> Scalar {
    if let Some(unquoted) = strip_quotes(text) {
        return Scalar::String(unquoted.to_string());
    }

    coerce_numeric(text).unwrap_or_else(|| Scalar::String(text.to_string()))
}

/// Attempt a numeric reading of `text`, without any string fallback
pub fn coerce_numeric(text: &str) -> Option<Scalar> {
    if text.contains('.') {
        text.parse::<f64>().ok().map(Scalar::Float)
    } else {
        text.parse::<i64>().ok().map(Scalar::Integer)
    }
}

fn strip_quotes(text: &str) -> Option<&str> {
    if text.len() < 2 {
        return None;
    }

    ['\'', '"']
        .iter()
        .find_map(|&quote| text.strip_prefix(quote)?.strip_suffix(quote))
}

/// Order two scalars of compatible kinds.
///
/// Integers compare exactly, mixed numerics compare as `f64`, strings compare
/// lexicographically. Returns `None` for NaN and for string/number pairs.
fn order(left: &Scalar, right: &Scalar) -> Option<Ordering> {
    match (left, right) {
        (Scalar::Integer(l), Scalar::Integer(r)) => Some(l.cmp(r)),
        (Scalar::Integer(l), Scalar::Float(r)) => (*l as f64).partial_cmp(r),
        (Scalar::Float(l), Scalar::Integer(r)) => l.partial_cmp(&(*r as f64)),
        (Scalar::Float(l), Scalar::Float(r)) => l.partial_cmp(r),
        (Scalar::String(l), Scalar::String(r)) => Some(l.cmp(r)),
        _ => None,
    }
}

/// Apply a comparison operator to `left <op> right`
pub fn compare(left: &Scalar, operator: ComparisonOperator, right: &Scalar) -> bool {
    let ordering = order(left, right);

    match operator {
        ComparisonOperator::Equal => ordering == Some(Ordering::Equal),
        ComparisonOperator::NotEqual => ordering != Some(Ordering::Equal),
        ComparisonOperator::GreaterThan => ordering == Some(Ordering::Greater),
        ComparisonOperator::LessThan => ordering == Some(Ordering::Less),
        ComparisonOperator::GreaterThanOrEqual => {
            matches!(ordering, Some(Ordering::Greater | Ordering::Equal))
        }
        ComparisonOperator::LessThanOrEqual => {
            matches!(ordering, Some(Ordering::Less | Ordering::Equal))
        }
    }
}
