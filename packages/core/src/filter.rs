//! Filter comparators and value ordering
//!
//! Comparison semantics for `[?lhs op rhs]` filter projections, plus the
//! total ordering across JSON types used as the key order for the `*_by`
//! built-ins.

use std::cmp::Ordering;

use serde_json::Value;

/// Comparison operators usable in a filter expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Lte,
    /// `>`
    Gt,
    /// `>=`
    Gte,
}

impl Comparator {
    /// Apply the comparator to a pair of values.
    ///
    /// Equality is structural over any pair. Ordering comparators are only
    /// defined on numeric pairs; on anything else the result is `None`
    /// (the comparison is *undefined*, which excludes the element from the
    /// filter output).
    pub(crate) fn apply(self, lhs: &Value, rhs: &Value) -> Option<bool> {
        match self {
            Comparator::Eq => Some(lhs == rhs),
            Comparator::Ne => Some(lhs != rhs),
            Comparator::Lt => numeric_ordering(lhs, rhs).map(|ord| ord == Ordering::Less),
            Comparator::Lte => numeric_ordering(lhs, rhs).map(|ord| ord != Ordering::Greater),
            Comparator::Gt => numeric_ordering(lhs, rhs).map(|ord| ord == Ordering::Greater),
            Comparator::Gte => numeric_ordering(lhs, rhs).map(|ord| ord != Ordering::Less),
        }
    }
}

/// Ordering of a numeric pair; `None` unless both operands are numbers.
fn numeric_ordering(lhs: &Value, rhs: &Value) -> Option<Ordering> {
    match (lhs.as_f64(), rhs.as_f64()) {
        (Some(a), Some(b)) => a.partial_cmp(&b),
        _ => None,
    }
}

/// Total ordering across JSON values, used to order sort keys.
///
/// Values of different types order by type rank
/// (null < bool < number < string < array < object); values of the same
/// type order by content. Arrays compare lexicographically, objects by
/// size and then pairwise over their members in insertion order.
pub(crate) fn total_order(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            match (x.as_f64(), y.as_f64()) {
                (Some(p), Some(q)) => p.partial_cmp(&q).unwrap_or(Ordering::Equal),
                _ => Ordering::Equal,
            }
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => {
            for (p, q) in x.iter().zip(y.iter()) {
                let ord = total_order(p, q);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            x.len().cmp(&y.len())
        }
        (Value::Object(x), Value::Object(y)) => {
            let by_len = x.len().cmp(&y.len());
            if by_len != Ordering::Equal {
                return by_len;
            }
            for ((xk, xv), (yk, yv)) in x.iter().zip(y.iter()) {
                let by_key = xk.cmp(yk);
                if by_key != Ordering::Equal {
                    return by_key;
                }
                let by_value = total_order(xv, yv);
                if by_value != Ordering::Equal {
                    return by_value;
                }
            }
            Ordering::Equal
        }
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}
