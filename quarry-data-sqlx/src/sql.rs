//! SQL rendering for the SQLite driver.
//!
//! Entity metadata (table and column names) comes from `Entity` impls and is
//! trusted; anything a caller can pass at runtime (predicate fields, sort
//! fields, patch fields) is validated against a conservative identifier
//! pattern before it reaches a statement. Values always go through bind
//! parameters.

use quarry_data::{DataError, FieldValues, Logic, Predicate, Query, SortOrder};
use serde_json::Value;

/// A rendered statement plus its bind values, in placeholder order.
#[derive(Debug)]
pub(crate) struct Statement {
    pub(crate) sql: String,
    pub(crate) params: Vec<Value>,
}

pub(crate) fn check_identifier(ident: &str) -> Result<(), DataError> {
    if is_valid_identifier(ident) {
        Ok(())
    } else {
        Err(DataError::InvalidQuery(format!(
            "invalid identifier '{ident}'"
        )))
    }
}

fn is_valid_identifier(ident: &str) -> bool {
    let mut chars = ident.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Renders a predicate as a boolean expression.
///
/// Clauses accumulate left to right; parenthesising the accumulated
/// expression at every step keeps that order under SQL operator precedence.
/// A null clause value renders as `IS NULL` so it matches stored NULLs the
/// way `= ?` cannot.
fn predicate_expr(
    predicate: &Predicate,
    params: &mut Vec<Value>,
) -> Result<Option<String>, DataError> {
    let mut expr: Option<String> = None;
    for clause in predicate.clauses() {
        check_identifier(&clause.field)?;
        let term = if clause.value.is_null() {
            format!("{} IS NULL", clause.field)
        } else {
            params.push(clause.value.clone());
            format!("{} = ?", clause.field)
        };
        expr = Some(match expr {
            None => term,
            Some(prev) => {
                let op = match clause.logic {
                    Logic::And => "AND",
                    Logic::Or => "OR",
                };
                format!("({prev}) {op} {term}")
            }
        });
    }
    Ok(expr)
}

fn where_clause(
    predicate: &Predicate,
    only_live: Option<&str>,
    params: &mut Vec<Value>,
) -> Result<String, DataError> {
    let expr = predicate_expr(predicate, params)?;
    let filter = match (expr, only_live) {
        (Some(expr), Some(sd)) => Some(format!("({expr}) AND {sd} IS NULL")),
        (Some(expr), None) => Some(expr),
        (None, Some(sd)) => Some(format!("{sd} IS NULL")),
        (None, None) => None,
    };
    Ok(match filter {
        Some(filter) => format!(" WHERE {filter}"),
        None => String::new(),
    })
}

pub(crate) fn select(
    table: &str,
    query: &Query,
    soft_delete: Option<&str>,
) -> Result<Statement, DataError> {
    let mut params = Vec::new();
    let only_live = soft_delete.filter(|_| !query.with_deleted);
    let mut sql = format!("SELECT * FROM {table}");
    sql.push_str(&where_clause(&query.predicate, only_live, &mut params)?);
    if let Some(sort) = &query.sort {
        check_identifier(&sort.field)?;
        let dir = match sort.order {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };
        sql.push_str(&format!(" ORDER BY {} {dir}", sort.field));
    }
    match (query.take, query.skip) {
        (Some(take), Some(skip)) => sql.push_str(&format!(" LIMIT {take} OFFSET {skip}")),
        (Some(take), None) => sql.push_str(&format!(" LIMIT {take}")),
        // SQLite requires a LIMIT before OFFSET; -1 leaves it unbounded.
        (None, Some(skip)) => sql.push_str(&format!(" LIMIT -1 OFFSET {skip}")),
        (None, None) => {}
    }
    Ok(Statement { sql, params })
}

pub(crate) fn select_by_id(table: &str, id_field: &str, soft_delete: Option<&str>) -> String {
    match soft_delete {
        Some(sd) => format!("SELECT * FROM {table} WHERE {id_field} = ? AND {sd} IS NULL"),
        None => format!("SELECT * FROM {table} WHERE {id_field} = ?"),
    }
}

pub(crate) fn count(
    table: &str,
    predicate: &Predicate,
    with_deleted: bool,
    soft_delete: Option<&str>,
) -> Result<Statement, DataError> {
    let mut params = Vec::new();
    let only_live = soft_delete.filter(|_| !with_deleted);
    let mut sql = format!("SELECT COUNT(*) FROM {table}");
    sql.push_str(&where_clause(predicate, only_live, &mut params)?);
    Ok(Statement { sql, params })
}

pub(crate) fn distinct(
    table: &str,
    field: &str,
    soft_delete: Option<&str>,
) -> Result<String, DataError> {
    check_identifier(field)?;
    Ok(match soft_delete {
        Some(sd) => format!("SELECT DISTINCT {field} FROM {table} WHERE {sd} IS NULL"),
        None => format!("SELECT DISTINCT {field} FROM {table}"),
    })
}

pub(crate) fn upsert(table: &str, fields: &[&str]) -> String {
    let placeholders = vec!["?"; fields.len()].join(", ");
    format!(
        "INSERT OR REPLACE INTO {table} ({}) VALUES ({placeholders})",
        fields.join(", ")
    )
}

/// `UPDATE ... SET` over the patch fields, keyed by id. The id bind comes
/// after the patch values.
pub(crate) fn update(
    table: &str,
    id_field: &str,
    patch: &FieldValues,
) -> Result<Statement, DataError> {
    let mut assignments = Vec::with_capacity(patch.len());
    let mut params = Vec::with_capacity(patch.len());
    for (field, value) in patch {
        check_identifier(field)?;
        assignments.push(format!("{field} = ?"));
        params.push(value.clone());
    }
    let sql = format!(
        "UPDATE {table} SET {} WHERE {id_field} = ?",
        assignments.join(", ")
    );
    Ok(Statement { sql, params })
}

pub(crate) fn delete_by_id(table: &str, id_field: &str) -> String {
    format!("DELETE FROM {table} WHERE {id_field} = ?")
}

/// Hard delete matching a predicate. Soft-deleted rows are in scope here, so
/// no visibility filter is applied; an empty predicate deletes every row.
pub(crate) fn delete_where(table: &str, predicate: &Predicate) -> Result<Statement, DataError> {
    let mut params = Vec::new();
    let mut sql = format!("DELETE FROM {table}");
    sql.push_str(&where_clause(predicate, None, &mut params)?);
    Ok(Statement { sql, params })
}

pub(crate) fn soft_delete_by_id(table: &str, soft_delete: &str, id_field: &str) -> String {
    format!("UPDATE {table} SET {soft_delete} = CURRENT_TIMESTAMP WHERE {id_field} = ?")
}

pub(crate) fn restore_by_id(table: &str, soft_delete: &str, id_field: &str) -> String {
    format!("UPDATE {table} SET {soft_delete} = NULL WHERE {id_field} = ?")
}
