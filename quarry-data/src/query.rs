use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// How a clause combines with the result accumulated so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Logic {
    And,
    Or,
}

/// Sort direction for ordered queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// A sort key: entity field plus direction.
#[derive(Debug, Clone, PartialEq)]
pub struct Sort {
    pub field: String,
    pub order: SortOrder,
}

/// An equality clause on a single entity field.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub field: String,
    pub logic: Logic,
    pub value: Value,
}

/// Ordered field -> value map, used for equality conditions and partial-update
/// patches. `BTreeMap` so drivers see a deterministic field order.
pub type FieldValues = BTreeMap<String, Value>;

/// An ordered list of equality clauses.
///
/// The first clause seeds the filter regardless of its own logic tag; every
/// later clause combines with the *accumulated* result using its own tag
/// (`And` intersects, `Or` unions, left fold). An empty predicate matches
/// everything.
///
/// # Example
///
/// ```ignore
/// let p = Predicate::new()
///     .where_eq("name", "Ann")
///     .or_eq("age", 30);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    clauses: Vec<Clause>,
}

impl Predicate {
    pub fn new() -> Self {
        Self::default()
    }

    /// All-`And` predicate from an equality map. An empty map matches everything.
    pub fn all_of(conditions: &FieldValues) -> Self {
        let mut predicate = Self::new();
        for (field, value) in conditions {
            predicate = predicate.and_eq(field, value.clone());
        }
        predicate
    }

    /// Append an equality clause with an explicit logic tag.
    pub fn clause(mut self, field: &str, logic: Logic, value: impl Into<Value>) -> Self {
        self.clauses.push(Clause {
            field: field.to_string(),
            logic,
            value: value.into(),
        });
        self
    }

    /// Seed clause. Alias of [`and_eq`](Self::and_eq): the first clause's tag
    /// is never consulted.
    pub fn where_eq(self, field: &str, value: impl Into<Value>) -> Self {
        self.clause(field, Logic::And, value)
    }

    pub fn and_eq(self, field: &str, value: impl Into<Value>) -> Self {
        self.clause(field, Logic::And, value)
    }

    pub fn or_eq(self, field: &str, value: impl Into<Value>) -> Self {
        self.clause(field, Logic::Or, value)
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

/// A fully described read: filter, slicing, ordering, soft-delete visibility.
///
/// # Example
///
/// ```ignore
/// let q = Query::new()
///     .filter(Predicate::new().where_eq("status", "active"))
///     .sort("id", SortOrder::Asc)
///     .skip(20)
///     .take(10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub predicate: Predicate,
    pub skip: Option<u64>,
    pub take: Option<u64>,
    pub sort: Option<Sort>,
    pub with_deleted: bool,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicate = predicate;
        self
    }

    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn take(mut self, take: u64) -> Self {
        self.take = Some(take);
        self
    }

    pub fn sort(mut self, field: &str, order: SortOrder) -> Self {
        self.sort = Some(Sort {
            field: field.to_string(),
            order,
        });
        self
    }

    /// Include soft-deleted entities in the result.
    pub fn with_deleted(mut self, include: bool) -> Self {
        self.with_deleted = include;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_order_preserved() {
        let p = Predicate::new()
            .where_eq("name", "Ann")
            .and_eq("age", 30)
            .or_eq("active", true);
        let clauses = p.clauses();
        assert_eq!(clauses.len(), 3);
        assert_eq!(clauses[0].field, "name");
        assert_eq!(clauses[1].logic, Logic::And);
        assert_eq!(clauses[2].logic, Logic::Or);
        assert_eq!(clauses[2].value, json!(true));
    }

    #[test]
    fn test_all_of_is_all_and() {
        let mut conditions = FieldValues::new();
        conditions.insert("age".into(), json!(30));
        conditions.insert("name".into(), json!("Ann"));
        let p = Predicate::all_of(&conditions);
        assert_eq!(p.clauses().len(), 2);
        assert!(p.clauses().iter().all(|c| c.logic == Logic::And));
    }

    #[test]
    fn test_empty_predicate() {
        assert!(Predicate::new().is_empty());
        assert!(Predicate::all_of(&FieldValues::new()).is_empty());
    }

    #[test]
    fn test_query_builder() {
        let q = Query::new()
            .skip(20)
            .take(10)
            .sort("id", SortOrder::Desc)
            .with_deleted(true);
        assert_eq!(q.skip, Some(20));
        assert_eq!(q.take, Some(10));
        assert_eq!(q.sort.as_ref().map(|s| s.field.as_str()), Some("id"));
        assert!(q.with_deleted);
    }
}
