//! # quarry-data-sqlx — SQLite backend for the Quarry data layer
//!
//! This crate provides the [SQLx](https://github.com/launchbadge/sqlx)-backed
//! storage driver for Quarry's data access layer. It depends on [`quarry_data`]
//! for the abstract traits and types, and adds the SQL rendering, transaction
//! handle, and error bridging needed to talk to a real database.
//!
//! # What's in this crate
//!
//! | Type | Description |
//! |------|-------------|
//! | [`SqlxDriver`] | [`StorageDriver`](quarry_data::StorageDriver) over an `sqlx::SqlitePool` |
//! | [`SqliteTx`] | [`Transaction`](quarry_data::Transaction) handle wrapping `sqlx::Transaction` |
//! | [`SqlxErrorExt`] | Extension trait to convert `sqlx::Error` → `DataError` (`.into_data_error()`) |
//! | [`SqlxResult<T>`] | Type alias for `Result<T, DataError>` |
//!
//! # Quick start
//!
//! ```ignore
//! use quarry_data::prelude::*;
//! use quarry_data_sqlx::SqlxDriver;
//! use sqlx::sqlite::SqlitePoolOptions;
//!
//! let pool = SqlitePoolOptions::new().connect("sqlite::memory:").await?;
//! let repo = Repository::<User, _>::new(SqlxDriver::new(pool));
//!
//! let user = repo.save(&user, TxScope::Auto).await?;
//! let found = repo.dynamic_find("findByNameAndAge", vec!["Ann".into(), 30.into()]).await?;
//! ```
//!
//! # Entity mapping
//!
//! Reads decode rows through `sqlx::FromRow`; writes bind the entity's
//! `serde::Serialize` form column by column. Both sides therefore need the
//! serialized field names, the `FromRow` columns, and
//! [`Entity::fields`](quarry_data::Entity::fields) to agree.
//!
//! Entities with a [`soft_delete_field`](quarry_data::Entity::soft_delete_field)
//! get the soft-delete operations for free: the column holds the deletion
//! timestamp, NULL means live, and read operations filter on it unless asked
//! for deleted rows.
//!
//! # Error bridging
//!
//! Due to Rust's orphan rules, `From<sqlx::Error> for DataError` can't be
//! implemented here. Use the [`SqlxErrorExt`] trait instead:
//!
//! ```ignore
//! use quarry_data_sqlx::SqlxErrorExt;
//!
//! let row = sqlx::query("SELECT ...")
//!     .fetch_one(driver.pool())
//!     .await
//!     .map_err(|e| e.into_data_error())?;
//! ```

pub mod driver;
pub mod error;
mod sql;
pub mod tx;

pub use driver::SqlxDriver;
pub use error::{SqlxErrorExt, SqlxResult};
pub use tx::SqliteTx;

/// Re-exports of the most commonly used types from both `quarry-data` and this crate.
pub mod prelude {
    pub use crate::{SqliteTx, SqlxDriver, SqlxErrorExt, SqlxResult};
    pub use quarry_data::prelude::*;
}
