//! # quarry-data-memory — in-memory backend for the quarry data layer
//!
//! This crate provides an in-memory [`StorageDriver`](quarry_data::StorageDriver)
//! implementation. Repositories built on it behave like the real backends, so
//! it doubles as the test double for anything written against `quarry-data`.
//!
//! # What's in this crate
//!
//! | Type | Description |
//! |------|-------------|
//! | [`MemoryDriver`] | Insertion-ordered row store implementing the full driver capability set |
//! | [`MemoryTx`] | Snapshot-based transaction: rollback restores the store as of `begin` |
//! | [`TxStats`] | Per-driver transaction lifecycle counters, for test assertions |
//!
//! # Quick start
//!
//! ```ignore
//! let driver = MemoryDriver::<User>::new();
//! let repo = Repository::new(driver.clone());
//!
//! repo.save(&user, TxScope::Auto).await?;
//! let all = repo.find_all(false).await?;
//! assert_eq!(driver.tx_stats().begins, 0);
//! ```
//!
//! # Transaction semantics
//!
//! `begin` snapshots the whole store; `rollback` (or dropping an unfinished
//! handle) restores it, `commit` discards the snapshot, `release` only counts.
//! Both [`TxScope::Auto`](quarry_data::TxScope) and
//! [`TxScope::Within`](quarry_data::TxScope) writes land in the same shared
//! store, so the driver supports one transaction at a time: an auto write made
//! while a transaction is open is undone by that transaction's rollback.

pub mod driver;
pub mod tx;
mod value;

pub use driver::MemoryDriver;
pub use tx::{MemoryTx, TxStats};
