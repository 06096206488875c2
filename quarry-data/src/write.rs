use crate::driver::StorageDriver;
use crate::entity::Entity;
use crate::error::DataError;
use crate::query::{FieldValues, Predicate};
use crate::tx::{Transaction, TxScope};
use std::future::Future;
use std::marker::PhantomData;
use tracing::warn;

/// Mutation facade over a single entity's storage.
///
/// Every operation takes a [`TxScope`]: `Auto` for the driver's own
/// auto-committing path, `Within` to run inside a caller-owned transaction.
/// Driver errors propagate unchanged.
pub struct WriteRepository<T, D> {
    driver: D,
    _marker: PhantomData<T>,
}

impl<T, D> WriteRepository<T, D>
where
    T: Entity,
    D: StorageDriver<T>,
{
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            _marker: PhantomData,
        }
    }

    /// Get the underlying driver reference.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Insert-or-update by primary key; returns the persisted form with any
    /// driver-assigned fields populated.
    pub async fn save(&self, entity: &T, tx: TxScope<'_, D::Tx>) -> Result<T, DataError> {
        self.driver.save(entity, tx).await
    }

    /// Batched insert-or-update; persisted entities come back in input order.
    pub async fn save_all(
        &self,
        entities: &[T],
        tx: TxScope<'_, D::Tx>,
    ) -> Result<Vec<T>, DataError> {
        self.driver.save_all(entities, tx).await
    }

    /// Apply a partial field set to the entity with the given id. A missing
    /// id is a no-op, not an error.
    pub async fn update_by_id(
        &self,
        id: &T::Id,
        patch: &FieldValues,
        tx: TxScope<'_, D::Tx>,
    ) -> Result<(), DataError> {
        self.driver.update_by_id(id, patch, tx).await
    }

    /// Hard delete by primary key; deleting an absent id is a no-op.
    pub async fn delete_by_id(&self, id: &T::Id, tx: TxScope<'_, D::Tx>) -> Result<(), DataError> {
        self.driver.delete_by_id(id, tx).await
    }

    /// Hard delete every entity matching the equality map. An empty map
    /// matches everything.
    pub async fn delete_by_conditions(
        &self,
        conditions: &FieldValues,
        tx: TxScope<'_, D::Tx>,
    ) -> Result<(), DataError> {
        self.driver
            .delete_where(&Predicate::all_of(conditions), tx)
            .await
    }

    /// Hard delete every entity of this type.
    pub async fn delete_all(&self, tx: TxScope<'_, D::Tx>) -> Result<(), DataError> {
        self.driver.clear(tx).await
    }

    /// Mark the entity as soft-deleted without physical removal.
    pub async fn soft_delete_by_id(
        &self,
        id: &T::Id,
        tx: TxScope<'_, D::Tx>,
    ) -> Result<(), DataError> {
        self.driver.soft_delete_by_id(id, tx).await
    }

    /// Clear the soft-delete marker.
    pub async fn restore_by_id(
        &self,
        id: &T::Id,
        tx: TxScope<'_, D::Tx>,
    ) -> Result<(), DataError> {
        self.driver.restore_by_id(id, tx).await
    }

    /// Runs `operation` inside a fresh transaction.
    ///
    /// The operation takes ownership of the started handle, threads it
    /// through its writes via [`TxScope::Within`], and hands it back together
    /// with its outcome. The handle then moves STARTED → COMMITTED when the
    /// outcome is `Ok`, STARTED → ROLLED_BACK when it is an error — the
    /// original error is re-raised verbatim after the rollback attempt — and
    /// is released unconditionally as the final step either way. A failed
    /// commit is also rolled back and its error propagated. A release failure
    /// only surfaces when nothing else already failed.
    ///
    /// # Example
    ///
    /// ```ignore
    /// writes
    ///     .execute_in_transaction(|mut tx| async move {
    ///         let outcome = async {
    ///             writes.save(&user, TxScope::Within(&mut tx)).await?;
    ///             writes.delete_by_id(&old_id, TxScope::Within(&mut tx)).await?;
    ///             Ok(())
    ///         }
    ///         .await;
    ///         (tx, outcome)
    ///     })
    ///     .await?;
    /// ```
    pub async fn execute_in_transaction<F, Fut>(&self, operation: F) -> Result<(), DataError>
    where
        F: FnOnce(D::Tx) -> Fut + Send,
        Fut: Future<Output = (D::Tx, Result<(), DataError>)> + Send,
    {
        let tx = self.driver.begin().await?;
        let (mut tx, outcome) = operation(tx).await;
        let result = match outcome {
            Ok(()) => match tx.commit().await {
                Ok(()) => Ok(()),
                Err(commit_err) => {
                    if let Err(rollback_err) = tx.rollback().await {
                        warn!(error = %rollback_err, "rollback after failed commit also failed");
                    }
                    Err(commit_err)
                }
            },
            Err(op_err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "rollback failed");
                }
                Err(op_err)
            }
        };
        let released = tx.release().await;
        result?;
        released
    }
}

impl<T, D: Clone> Clone for WriteRepository<T, D> {
    fn clone(&self) -> Self {
        Self {
            driver: self.driver.clone(),
            _marker: PhantomData,
        }
    }
}
