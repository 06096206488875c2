//! The storage capability set the repositories are generic over.

use crate::entity::Entity;
use crate::error::DataError;
use crate::query::{FieldValues, Predicate, Query};
use crate::tx::{Transaction, TxScope};
use serde_json::Value;
use std::future::Future;

/// Capability set a storage backend must provide for one entity type.
///
/// Repositories are generic over this trait, so the same facade code runs
/// against a real database or the in-memory fake. Uses RPITIT
/// (return-position `impl Trait` in traits) — no `async-trait` needed.
///
/// Field names appearing in predicates, sorts, and patches are not validated
/// here; an unknown field is a driver-level error (or an empty result,
/// driver-dependent).
pub trait StorageDriver<T: Entity>: Send + Sync {
    /// Scoped unit-of-work handle produced by [`begin`](Self::begin).
    type Tx: Transaction;

    fn find(&self, query: &Query) -> impl Future<Output = Result<Vec<T>, DataError>> + Send;

    /// Lookup by primary key among live entities. Absence is `None`, not an error.
    fn find_by_id(
        &self,
        id: &T::Id,
    ) -> impl Future<Output = Result<Option<T>, DataError>> + Send;

    fn count(
        &self,
        predicate: &Predicate,
        with_deleted: bool,
    ) -> impl Future<Output = Result<u64, DataError>> + Send;

    /// Distinct values of `field` across live entities, duplicates collapsed
    /// by the driver.
    fn distinct(&self, field: &str) -> impl Future<Output = Result<Vec<Value>, DataError>> + Send;

    /// Insert-or-update by primary key; returns the persisted form with any
    /// driver-assigned fields populated.
    fn save(
        &self,
        entity: &T,
        tx: TxScope<'_, Self::Tx>,
    ) -> impl Future<Output = Result<T, DataError>> + Send;

    /// Batched insert-or-update; persisted entities come back in input order.
    fn save_all(
        &self,
        entities: &[T],
        tx: TxScope<'_, Self::Tx>,
    ) -> impl Future<Output = Result<Vec<T>, DataError>> + Send;

    /// Apply a partial field set to the entity with the given id. A missing
    /// id is a no-op, not an error.
    fn update_by_id(
        &self,
        id: &T::Id,
        patch: &FieldValues,
        tx: TxScope<'_, Self::Tx>,
    ) -> impl Future<Output = Result<(), DataError>> + Send;

    /// Hard delete by primary key. Deleting an absent id is a no-op.
    fn delete_by_id(
        &self,
        id: &T::Id,
        tx: TxScope<'_, Self::Tx>,
    ) -> impl Future<Output = Result<(), DataError>> + Send;

    /// Hard delete every entity matching the predicate, soft-deleted ones
    /// included. An empty predicate matches everything.
    fn delete_where(
        &self,
        predicate: &Predicate,
        tx: TxScope<'_, Self::Tx>,
    ) -> impl Future<Output = Result<(), DataError>> + Send;

    /// Hard delete every entity of this type.
    fn clear(&self, tx: TxScope<'_, Self::Tx>)
        -> impl Future<Output = Result<(), DataError>> + Send;

    /// Set the soft-delete marker without physical removal.
    fn soft_delete_by_id(
        &self,
        id: &T::Id,
        tx: TxScope<'_, Self::Tx>,
    ) -> impl Future<Output = Result<(), DataError>> + Send;

    /// Clear the soft-delete marker.
    fn restore_by_id(
        &self,
        id: &T::Id,
        tx: TxScope<'_, Self::Tx>,
    ) -> impl Future<Output = Result<(), DataError>> + Send;

    /// Obtain and start a fresh transaction handle.
    fn begin(&self) -> impl Future<Output = Result<Self::Tx, DataError>> + Send;
}
