use crate::driver::StorageDriver;
use crate::entity::Entity;
use crate::error::DataError;
use crate::page::Page;
use crate::query::{FieldValues, SortOrder};
use crate::read::ReadRepository;
use crate::tx::TxScope;
use crate::write::WriteRepository;
use serde_json::Value;
use std::future::Future;

/// Full read/write repository for one entity type.
///
/// Pure composition: one [`ReadRepository`] and one [`WriteRepository`] over
/// the same driver, exposed behind a single type by direct delegation.
/// Exists so callers needing the full capability depend on one type only.
pub struct Repository<T, D> {
    read: ReadRepository<T, D>,
    write: WriteRepository<T, D>,
}

impl<T, D> Repository<T, D>
where
    T: Entity,
    D: StorageDriver<T> + Clone,
{
    pub fn new(driver: D) -> Self {
        Self {
            read: ReadRepository::new(driver.clone()),
            write: WriteRepository::new(driver),
        }
    }

    pub fn reads(&self) -> &ReadRepository<T, D> {
        &self.read
    }

    pub fn writes(&self) -> &WriteRepository<T, D> {
        &self.write
    }

    // Read operations (delegate to ReadRepository)

    pub async fn find_all(&self, include_soft_deleted: bool) -> Result<Vec<T>, DataError> {
        self.read.find_all(include_soft_deleted).await
    }

    pub async fn find_one_by_id(&self, id: &T::Id) -> Result<Option<T>, DataError> {
        self.read.find_one_by_id(id).await
    }

    pub async fn find_by_conditions(&self, conditions: &FieldValues) -> Result<Vec<T>, DataError> {
        self.read.find_by_conditions(conditions).await
    }

    pub async fn find_paginated(&self, skip: u64, take: u64) -> Result<Vec<T>, DataError> {
        self.read.find_paginated(skip, take).await
    }

    pub async fn find_all_sorted(
        &self,
        sort_by: &str,
        order: SortOrder,
    ) -> Result<Vec<T>, DataError> {
        self.read.find_all_sorted(sort_by, order).await
    }

    pub async fn exists_by(&self, field: &str, value: impl Into<Value>) -> Result<bool, DataError> {
        self.read.exists_by(field, value).await
    }

    pub async fn count_by_conditions(&self, conditions: &FieldValues) -> Result<u64, DataError> {
        self.read.count_by_conditions(conditions).await
    }

    pub async fn find_distinct(&self, field: &str) -> Result<Vec<Value>, DataError> {
        self.read.find_distinct(field).await
    }

    pub async fn find_paginated_and_sorted(
        &self,
        skip: u64,
        take: u64,
        sort_by: &str,
        order: SortOrder,
    ) -> Result<Vec<T>, DataError> {
        self.read
            .find_paginated_and_sorted(skip, take, sort_by, order)
            .await
    }

    pub async fn find_with_pagination(
        &self,
        page: u64,
        items_per_page: u64,
        sort_by: &str,
        order: SortOrder,
    ) -> Result<Page<T>, DataError> {
        self.read
            .find_with_pagination(page, items_per_page, sort_by, order)
            .await
    }

    pub async fn count(&self) -> Result<u64, DataError> {
        self.read.count().await
    }

    pub async fn dynamic_find(
        &self,
        method_name: &str,
        params: Vec<Value>,
    ) -> Result<Vec<T>, DataError> {
        self.read.dynamic_find(method_name, params).await
    }

    // Write operations (delegate to WriteRepository)

    pub async fn save(&self, entity: &T, tx: TxScope<'_, D::Tx>) -> Result<T, DataError> {
        self.write.save(entity, tx).await
    }

    pub async fn save_all(
        &self,
        entities: &[T],
        tx: TxScope<'_, D::Tx>,
    ) -> Result<Vec<T>, DataError> {
        self.write.save_all(entities, tx).await
    }

    pub async fn update_by_id(
        &self,
        id: &T::Id,
        patch: &FieldValues,
        tx: TxScope<'_, D::Tx>,
    ) -> Result<(), DataError> {
        self.write.update_by_id(id, patch, tx).await
    }

    pub async fn delete_by_id(&self, id: &T::Id, tx: TxScope<'_, D::Tx>) -> Result<(), DataError> {
        self.write.delete_by_id(id, tx).await
    }

    pub async fn delete_by_conditions(
        &self,
        conditions: &FieldValues,
        tx: TxScope<'_, D::Tx>,
    ) -> Result<(), DataError> {
        self.write.delete_by_conditions(conditions, tx).await
    }

    pub async fn delete_all(&self, tx: TxScope<'_, D::Tx>) -> Result<(), DataError> {
        self.write.delete_all(tx).await
    }

    pub async fn soft_delete_by_id(
        &self,
        id: &T::Id,
        tx: TxScope<'_, D::Tx>,
    ) -> Result<(), DataError> {
        self.write.soft_delete_by_id(id, tx).await
    }

    pub async fn restore_by_id(
        &self,
        id: &T::Id,
        tx: TxScope<'_, D::Tx>,
    ) -> Result<(), DataError> {
        self.write.restore_by_id(id, tx).await
    }

    pub async fn execute_in_transaction<F, Fut>(&self, operation: F) -> Result<(), DataError>
    where
        F: FnOnce(D::Tx) -> Fut + Send,
        Fut: Future<Output = (D::Tx, Result<(), DataError>)> + Send,
    {
        self.write.execute_in_transaction(operation).await
    }
}

impl<T, D: Clone> Clone for Repository<T, D> {
    fn clone(&self) -> Self {
        Self {
            read: self.read.clone(),
            write: self.write.clone(),
        }
    }
}
