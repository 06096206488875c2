//! Predicate evaluation and value ordering over serialized rows.

use quarry_data::{Logic, Predicate};
use serde_json::Value;
use std::cmp::Ordering;

/// Left-fold evaluation: the first clause seeds the result, every later
/// clause intersects (`And`) or unions (`Or`) the accumulated result per its
/// own tag. An empty predicate matches everything.
pub(crate) fn eval_predicate(row: &Value, predicate: &Predicate) -> bool {
    let mut clauses = predicate.clauses().iter();
    let Some(first) = clauses.next() else {
        return true;
    };
    let mut acc = field_eq(row, &first.field, &first.value);
    for clause in clauses {
        let hit = field_eq(row, &clause.field, &clause.value);
        acc = match clause.logic {
            Logic::And => acc && hit,
            Logic::Or => acc || hit,
        };
    }
    acc
}

fn field_eq(row: &Value, field: &str, value: &Value) -> bool {
    row.get(field).map_or(false, |v| v == value)
}

/// Total order over optional JSON values for in-memory sorts:
/// absent < null < bool < number < string, remaining types by textual form.
pub(crate) fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => compare(a, b),
    }
}

fn rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

fn compare(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        },
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ if rank(a) != rank(b) => rank(a).cmp(&rank(b)),
        _ => a.to_string().cmp(&b.to_string()),
    }
}
