use crate::driver::StorageDriver;
use crate::entity::Entity;
use crate::error::DataError;
use crate::page::Page;
use crate::query::{FieldValues, Predicate, Query, SortOrder};
use crate::resolver::parse_find_method;
use serde_json::Value;
use std::marker::PhantomData;
use tracing::debug;

/// Read-only facade over a single entity's storage.
///
/// Holds no per-call state; concurrent calls are independent driver
/// interactions. Driver errors propagate unchanged.
pub struct ReadRepository<T, D> {
    driver: D,
    _marker: PhantomData<T>,
}

impl<T, D> ReadRepository<T, D>
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

    /// All live entities; with `include_soft_deleted`, soft-deleted ones too.
    pub async fn find_all(&self, include_soft_deleted: bool) -> Result<Vec<T>, DataError> {
        self.driver
            .find(&Query::new().with_deleted(include_soft_deleted))
            .await
    }

    /// The live entity with the given primary key, or `None`. Absence is not
    /// an error.
    pub async fn find_one_by_id(&self, id: &T::Id) -> Result<Option<T>, DataError> {
        self.driver.find_by_id(id).await
    }

    /// Live entities matching every field of the equality map. An empty map
    /// matches all.
    pub async fn find_by_conditions(&self, conditions: &FieldValues) -> Result<Vec<T>, DataError> {
        self.driver
            .find(&Query::new().filter(Predicate::all_of(conditions)))
            .await
    }

    /// Up to `take` live entities after skipping `skip`, in driver-default order.
    pub async fn find_paginated(&self, skip: u64, take: u64) -> Result<Vec<T>, DataError> {
        self.driver.find(&Query::new().skip(skip).take(take)).await
    }

    /// All live entities ordered by `sort_by`.
    pub async fn find_all_sorted(
        &self,
        sort_by: &str,
        order: SortOrder,
    ) -> Result<Vec<T>, DataError> {
        self.driver.find(&Query::new().sort(sort_by, order)).await
    }

    /// Whether at least one live entity has `field == value`.
    pub async fn exists_by(
        &self,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<bool, DataError> {
        let count = self
            .driver
            .count(&Predicate::new().where_eq(field, value), false)
            .await?;
        Ok(count > 0)
    }

    pub async fn count_by_conditions(&self, conditions: &FieldValues) -> Result<u64, DataError> {
        self.driver.count(&Predicate::all_of(conditions), false).await
    }

    /// Distinct values of `field` across live entities.
    pub async fn find_distinct(&self, field: &str) -> Result<Vec<Value>, DataError> {
        self.driver.distinct(field).await
    }

    /// Sort applied before slicing.
    pub async fn find_paginated_and_sorted(
        &self,
        skip: u64,
        take: u64,
        sort_by: &str,
        order: SortOrder,
    ) -> Result<Vec<T>, DataError> {
        self.driver
            .find(&Query::new().skip(skip).take(take).sort(sort_by, order))
            .await
    }

    /// One 1-based page of sorted results plus the total live count and page
    /// count (`skip = (page - 1) * items_per_page`).
    pub async fn find_with_pagination(
        &self,
        page: u64,
        items_per_page: u64,
        sort_by: &str,
        order: SortOrder,
    ) -> Result<Page<T>, DataError> {
        let skip = page.saturating_sub(1) * items_per_page;
        let data = self
            .driver
            .find(
                &Query::new()
                    .skip(skip)
                    .take(items_per_page)
                    .sort(sort_by, order),
            )
            .await?;
        let total = self.driver.count(&Predicate::new(), false).await?;
        Ok(Page::new(data, total, items_per_page))
    }

    /// Total live entity count.
    pub async fn count(&self) -> Result<u64, DataError> {
        self.driver.count(&Predicate::new(), false).await
    }

    /// Executes a `findBy...` finder name against positional arguments.
    ///
    /// `params` must supply exactly one value per parsed condition, or the
    /// call is rejected with [`DataError::InvalidQuery`]. A bare `findBy`
    /// runs unfiltered and returns all live entities.
    pub async fn dynamic_find(
        &self,
        method_name: &str,
        params: Vec<Value>,
    ) -> Result<Vec<T>, DataError> {
        let conditions = parse_find_method(method_name)?;
        if conditions.len() != params.len() {
            return Err(DataError::InvalidQuery(format!(
                "`{method_name}` takes {} argument(s), got {}",
                conditions.len(),
                params.len()
            )));
        }
        debug!(
            method = method_name,
            conditions = conditions.len(),
            "dynamic find"
        );
        let mut predicate = Predicate::new();
        for (condition, value) in conditions.into_iter().zip(params) {
            predicate = predicate.clause(&condition.field, condition.logic, value);
        }
        self.driver.find(&Query::new().filter(predicate)).await
    }
}

impl<T, D: Clone> Clone for ReadRepository<T, D> {
    fn clone(&self) -> Self {
        Self {
            driver: self.driver.clone(),
            _marker: PhantomData,
        }
    }
}
