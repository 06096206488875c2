//! Parsing of `findBy...` dynamic finder names into structured conditions.

use crate::error::DataError;
use crate::query::Logic;

const FIND_BY: &str = "findBy";

/// A single parsed condition: the entity field and how it combines with the
/// result accumulated so far.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub logic: Logic,
}

/// Parses a dynamic finder name like `findByNameAndAge` into conditions.
///
/// The name must start with the literal `findBy`. The remainder splits on the
/// case-sensitive connectives `And` / `Or`; a connective only counts when the
/// field segment before it is non-empty and an uppercase letter follows, so
/// `findByAndroidId` stays a single field. Each connective becomes the logic
/// tag of the condition that *follows* it; the first condition seeds the
/// filter and its tag is never consulted. Field segments map PascalCase to
/// camelCase by lower-casing their first character.
///
/// A bare `findBy` parses to zero conditions, which executes as an
/// unfiltered query.
pub fn parse_find_method(method_name: &str) -> Result<Vec<Condition>, DataError> {
    let Some(rest) = method_name.strip_prefix(FIND_BY) else {
        return Err(DataError::InvalidQuery(format!(
            "dynamic finder `{method_name}` does not start with `{FIND_BY}`"
        )));
    };
    if rest.is_empty() {
        return Ok(Vec::new());
    }

    let chars: Vec<char> = rest.chars().collect();
    let mut conditions = Vec::new();
    let mut segment = String::new();
    let mut logic = Logic::And;
    let mut i = 0;
    while i < chars.len() {
        let connective = if segment.is_empty() {
            None
        } else if matches_connective(&chars, i, &['A', 'n', 'd']) {
            Some((Logic::And, 3))
        } else if matches_connective(&chars, i, &['O', 'r']) {
            Some((Logic::Or, 2))
        } else {
            None
        };
        match connective {
            Some((next_logic, len)) => {
                conditions.push(Condition {
                    field: lower_first(&segment),
                    logic,
                });
                segment.clear();
                logic = next_logic;
                i += len;
            }
            None => {
                segment.push(chars[i]);
                i += 1;
            }
        }
    }
    // A connective needs an uppercase follower, so the last segment is
    // never empty here.
    conditions.push(Condition {
        field: lower_first(&segment),
        logic,
    });
    Ok(conditions)
}

fn matches_connective(chars: &[char], at: usize, token: &[char]) -> bool {
    // The char after the connective must start the next field segment.
    if chars.len() < at + token.len() + 1 {
        return false;
    }
    chars[at..at + token.len()] == *token && chars[at + token.len()].is_ascii_uppercase()
}

fn lower_first(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
