//! Snapshot-based transactions over the in-memory store.

use crate::driver::Rows;
use quarry_data::{DataError, Transaction};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

#[derive(Default)]
pub(crate) struct TxCounters {
    pub(crate) begins: AtomicUsize,
    pub(crate) commits: AtomicUsize,
    pub(crate) rollbacks: AtomicUsize,
    pub(crate) releases: AtomicUsize,
}

/// Snapshot of a driver's transaction lifecycle activity, for test assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxStats {
    pub begins: usize,
    pub commits: usize,
    pub rollbacks: usize,
    pub releases: usize,
}

impl TxCounters {
    pub(crate) fn stats(&self) -> TxStats {
        TxStats {
            begins: self.begins.load(Ordering::SeqCst),
            commits: self.commits.load(Ordering::SeqCst),
            rollbacks: self.rollbacks.load(Ordering::SeqCst),
            releases: self.releases.load(Ordering::SeqCst),
        }
    }
}

/// In-memory unit-of-work handle.
///
/// Holds the store as of `begin`; `rollback` restores it and `commit`
/// discards it. Dropping a handle that saw neither also restores, matching
/// the drop-rollback convention of SQL transaction guards.
pub struct MemoryTx<T> {
    state: Arc<RwLock<Rows<T>>>,
    snapshot: Option<Rows<T>>,
    counters: Arc<TxCounters>,
}

impl<T: Clone> MemoryTx<T> {
    pub(crate) fn begin(state: Arc<RwLock<Rows<T>>>, counters: Arc<TxCounters>) -> Self {
        counters.begins.fetch_add(1, Ordering::SeqCst);
        let snapshot = state.read().unwrap_or_else(|e| e.into_inner()).clone();
        Self {
            state,
            snapshot: Some(snapshot),
            counters,
        }
    }
}

impl<T> MemoryTx<T> {
    fn restore(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            *self.state.write().unwrap_or_else(|e| e.into_inner()) = snapshot;
        }
    }
}

impl<T> Transaction for MemoryTx<T>
where
    T: Clone + Send + Sync,
{
    async fn commit(&mut self) -> Result<(), DataError> {
        self.snapshot = None;
        self.counters.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), DataError> {
        self.restore();
        self.counters.rollbacks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn release(self) -> Result<(), DataError> {
        self.counters.releases.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl<T> Drop for MemoryTx<T> {
    fn drop(&mut self) {
        self.restore();
    }
}
