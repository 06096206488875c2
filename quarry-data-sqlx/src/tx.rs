//! SQLite transaction handle.

use quarry_data::{DataError, Transaction};
use sqlx::{Sqlite, SqliteConnection};

use crate::error::SqlxErrorExt;

/// A [`Transaction`] over a pooled SQLite connection.
///
/// `commit` and `rollback` consume the inner SQLx transaction; calling either
/// on an already finished handle is a no-op, which lets the repository run
/// its rollback-after-failed-commit path without a second error. `release`
/// hands the connection back to the pool by dropping it.
pub struct SqliteTx {
    inner: Option<sqlx::Transaction<'static, Sqlite>>,
}

impl SqliteTx {
    pub(crate) fn new(inner: sqlx::Transaction<'static, Sqlite>) -> Self {
        Self { inner: Some(inner) }
    }

    /// The connection this transaction runs on, for statements that must
    /// observe its uncommitted writes.
    pub(crate) fn conn(&mut self) -> Result<&mut SqliteConnection, DataError> {
        match self.inner.as_mut() {
            Some(tx) => Ok(&mut *tx),
            None => Err(DataError::Other(
                "transaction already committed or rolled back".into(),
            )),
        }
    }
}

impl Transaction for SqliteTx {
    async fn commit(&mut self) -> Result<(), DataError> {
        match self.inner.take() {
            Some(tx) => tx.commit().await.map_err(SqlxErrorExt::into_data_error),
            None => Ok(()),
        }
    }

    async fn rollback(&mut self) -> Result<(), DataError> {
        match self.inner.take() {
            Some(tx) => tx.rollback().await.map_err(SqlxErrorExt::into_data_error),
            None => Ok(()),
        }
    }

    async fn release(self) -> Result<(), DataError> {
        // Dropping an unfinished SQLx transaction rolls it back and returns
        // the connection to the pool.
        Ok(())
    }
}
