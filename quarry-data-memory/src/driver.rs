use crate::tx::{MemoryTx, TxCounters, TxStats};
use crate::value::{compare_values, eval_predicate};
use quarry_data::{
    DataError, Entity, FieldValues, Predicate, Query, SortOrder, StorageDriver, TxScope,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Clone)]
pub(crate) struct Row<T> {
    pub(crate) entity: T,
    pub(crate) deleted: bool,
}

pub(crate) type Rows<T> = Vec<Row<T>>;

/// In-memory storage driver backed by an insertion-ordered row list.
///
/// Entities are matched and sorted through their `serde_json` form, so the
/// driver works for any `Serialize + DeserializeOwned` entity. Clones share
/// the same store.
pub struct MemoryDriver<T> {
    state: Arc<RwLock<Rows<T>>>,
    counters: Arc<TxCounters>,
}

impl<T> MemoryDriver<T> {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(Vec::new())),
            counters: Arc::new(TxCounters::default()),
        }
    }

    /// Transaction lifecycle counters accumulated by this driver.
    pub fn tx_stats(&self) -> TxStats {
        self.counters.stats()
    }

    fn rows(&self) -> RwLockReadGuard<'_, Rows<T>> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn rows_mut(&self) -> RwLockWriteGuard<'_, Rows<T>> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl<T> Default for MemoryDriver<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for MemoryDriver<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            counters: self.counters.clone(),
        }
    }
}

fn to_json<T: Serialize>(entity: &T) -> Result<Value, DataError> {
    serde_json::to_value(entity).map_err(DataError::driver)
}

impl<T> StorageDriver<T> for MemoryDriver<T>
where
    T: Entity + Clone + Serialize + DeserializeOwned,
{
    type Tx = MemoryTx<T>;

    async fn find(&self, query: &Query) -> Result<Vec<T>, DataError> {
        let mut hits: Vec<(T, Value)> = Vec::new();
        {
            let rows = self.rows();
            for row in rows.iter() {
                if row.deleted && !query.with_deleted {
                    continue;
                }
                let json = to_json(&row.entity)?;
                if eval_predicate(&json, &query.predicate) {
                    hits.push((row.entity.clone(), json));
                }
            }
        }
        if let Some(sort) = &query.sort {
            hits.sort_by(|a, b| {
                let ord = compare_values(a.1.get(&sort.field), b.1.get(&sort.field));
                match sort.order {
                    SortOrder::Asc => ord,
                    SortOrder::Desc => ord.reverse(),
                }
            });
        }
        let skip = query.skip.unwrap_or(0) as usize;
        let take = query.take.map(|t| t as usize).unwrap_or(usize::MAX);
        Ok(hits
            .into_iter()
            .skip(skip)
            .take(take)
            .map(|(entity, _)| entity)
            .collect())
    }

    async fn find_by_id(&self, id: &T::Id) -> Result<Option<T>, DataError> {
        let rows = self.rows();
        Ok(rows
            .iter()
            .find(|row| !row.deleted && row.entity.id() == id)
            .map(|row| row.entity.clone()))
    }

    async fn count(&self, predicate: &Predicate, with_deleted: bool) -> Result<u64, DataError> {
        let rows = self.rows();
        let mut count = 0u64;
        for row in rows.iter() {
            if row.deleted && !with_deleted {
                continue;
            }
            if eval_predicate(&to_json(&row.entity)?, predicate) {
                count += 1;
            }
        }
        Ok(count)
    }

    async fn distinct(&self, field: &str) -> Result<Vec<Value>, DataError> {
        let rows = self.rows();
        let mut values: Vec<Value> = Vec::new();
        for row in rows.iter() {
            if row.deleted {
                continue;
            }
            let value = to_json(&row.entity)?
                .get(field)
                .cloned()
                .unwrap_or(Value::Null);
            if !values.contains(&value) {
                values.push(value);
            }
        }
        Ok(values)
    }

    async fn save(&self, entity: &T, _tx: TxScope<'_, Self::Tx>) -> Result<T, DataError> {
        let mut rows = self.rows_mut();
        match rows.iter_mut().find(|row| row.entity.id() == entity.id()) {
            Some(row) => row.entity = entity.clone(),
            None => rows.push(Row {
                entity: entity.clone(),
                deleted: false,
            }),
        }
        Ok(entity.clone())
    }

    async fn save_all(
        &self,
        entities: &[T],
        _tx: TxScope<'_, Self::Tx>,
    ) -> Result<Vec<T>, DataError> {
        let mut rows = self.rows_mut();
        for entity in entities {
            match rows.iter_mut().find(|row| row.entity.id() == entity.id()) {
                Some(row) => row.entity = entity.clone(),
                None => rows.push(Row {
                    entity: entity.clone(),
                    deleted: false,
                }),
            }
        }
        Ok(entities.to_vec())
    }

    async fn update_by_id(
        &self,
        id: &T::Id,
        patch: &FieldValues,
        _tx: TxScope<'_, Self::Tx>,
    ) -> Result<(), DataError> {
        let mut rows = self.rows_mut();
        let Some(row) = rows.iter_mut().find(|row| row.entity.id() == id) else {
            return Ok(());
        };
        let mut json = to_json(&row.entity)?;
        if let Some(object) = json.as_object_mut() {
            for (field, value) in patch {
                object.insert(field.clone(), value.clone());
            }
        }
        row.entity = serde_json::from_value(json).map_err(DataError::driver)?;
        Ok(())
    }

    async fn delete_by_id(&self, id: &T::Id, _tx: TxScope<'_, Self::Tx>) -> Result<(), DataError> {
        self.rows_mut().retain(|row| row.entity.id() != id);
        Ok(())
    }

    async fn delete_where(
        &self,
        predicate: &Predicate,
        _tx: TxScope<'_, Self::Tx>,
    ) -> Result<(), DataError> {
        let mut rows = self.rows_mut();
        let mut keep = Vec::with_capacity(rows.len());
        for row in rows.iter() {
            keep.push(!eval_predicate(&to_json(&row.entity)?, predicate));
        }
        let mut flags = keep.into_iter();
        rows.retain(|_| flags.next().unwrap_or(true));
        Ok(())
    }

    async fn clear(&self, _tx: TxScope<'_, Self::Tx>) -> Result<(), DataError> {
        self.rows_mut().clear();
        Ok(())
    }

    async fn soft_delete_by_id(
        &self,
        id: &T::Id,
        _tx: TxScope<'_, Self::Tx>,
    ) -> Result<(), DataError> {
        if let Some(row) = self.rows_mut().iter_mut().find(|row| row.entity.id() == id) {
            row.deleted = true;
        }
        Ok(())
    }

    async fn restore_by_id(
        &self,
        id: &T::Id,
        _tx: TxScope<'_, Self::Tx>,
    ) -> Result<(), DataError> {
        if let Some(row) = self.rows_mut().iter_mut().find(|row| row.entity.id() == id) {
            row.deleted = false;
        }
        Ok(())
    }

    async fn begin(&self) -> Result<Self::Tx, DataError> {
        Ok(MemoryTx::begin(self.state.clone(), self.counters.clone()))
    }
}
