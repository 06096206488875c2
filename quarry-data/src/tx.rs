//! Transaction handle contract and the explicit transaction-scope sum type.

use crate::error::DataError;
use std::future::Future;

/// A scoped unit-of-work against the storage driver.
///
/// Lifecycle: started by [`StorageDriver::begin`](crate::StorageDriver::begin),
/// then exactly one of [`commit`](Self::commit) / [`rollback`](Self::rollback),
/// then [`release`](Self::release) as the final step. `release` consumes the
/// handle, so a released handle cannot be reused.
pub trait Transaction: Send {
    fn commit(&mut self) -> impl Future<Output = Result<(), DataError>> + Send;
    fn rollback(&mut self) -> impl Future<Output = Result<(), DataError>> + Send;
    /// Returns the underlying resource to the driver.
    fn release(self) -> impl Future<Output = Result<(), DataError>> + Send;
}

/// Whether a write runs on its own auto-committing path or inside an
/// existing transaction.
///
/// Replaces an optional transaction parameter with a sum type so drivers
/// handle both paths exhaustively. Passing the same handle to several writes
/// batches them under one atomic transaction:
///
/// ```ignore
/// let mut tx = driver.begin().await?;
/// writes.save(&a, TxScope::Within(&mut tx)).await?;
/// writes.delete_by_id(&b_id, TxScope::Within(&mut tx)).await?;
/// tx.commit().await?;
/// tx.release().await?;
/// ```
#[derive(Debug)]
pub enum TxScope<'a, Tx> {
    /// No enclosing transaction; the driver commits the write on its own.
    Auto,
    /// Run inside the supplied transaction; its owner commits or rolls back.
    Within(&'a mut Tx),
}
