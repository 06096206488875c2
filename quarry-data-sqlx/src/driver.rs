use crate::error::SqlxErrorExt;
use crate::sql;
use crate::tx::SqliteTx;
use quarry_data::{
    DataError, Entity, FieldValues, Predicate, Query, StorageDriver, TxScope,
};
use serde::Serialize;
use serde_json::Value;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::{FromRow, Row, TypeInfo, ValueRef};
use std::marker::PhantomData;
use tracing::debug;

/// Binds a `serde_json::Value` onto a query, picking the closest SQLite
/// representation. SQLite's type affinity resolves the rest at comparison
/// time.
macro_rules! bind_value {
    ($query:expr, $value:expr) => {
        match $value {
            Value::Null => $query.bind(None::<String>),
            Value::Bool(b) => $query.bind(*b),
            Value::Number(n) if n.is_i64() => $query.bind(n.as_i64()),
            Value::Number(n) => $query.bind(n.as_f64()),
            Value::String(s) => $query.bind(s.clone()),
            other => $query.bind(other.to_string()),
        }
    };
}

/// SQLite storage driver over an `sqlx` connection pool.
///
/// Rows map to entities through `sqlx::FromRow`; writes bind the entity's
/// `serde_json` form column by column, so the entity's serialized field names
/// must match its `Entity::fields`. Clones share the pool.
pub struct SqlxDriver<T> {
    pool: SqlitePool,
    _marker: PhantomData<T>,
}

impl<T> SqlxDriver<T> {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            _marker: PhantomData,
        }
    }

    /// The underlying pool reference.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl<T> Clone for SqlxDriver<T> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _marker: PhantomData,
        }
    }
}

fn to_json<T: Serialize>(entity: &T) -> Result<Value, DataError> {
    serde_json::to_value(entity).map_err(DataError::driver)
}

fn decode_column(row: &SqliteRow) -> Result<Value, DataError> {
    let raw = row.try_get_raw(0).map_err(SqlxErrorExt::into_data_error)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let type_name = raw.type_info().name().to_owned();
    let value = match type_name.as_str() {
        "INTEGER" => Value::from(row.try_get::<i64, _>(0).map_err(SqlxErrorExt::into_data_error)?),
        "REAL" => Value::from(row.try_get::<f64, _>(0).map_err(SqlxErrorExt::into_data_error)?),
        "BOOLEAN" => Value::from(row.try_get::<bool, _>(0).map_err(SqlxErrorExt::into_data_error)?),
        _ => Value::from(row.try_get::<String, _>(0).map_err(SqlxErrorExt::into_data_error)?),
    };
    Ok(value)
}

impl<T> StorageDriver<T> for SqlxDriver<T>
where
    T: Entity + Serialize + for<'r> FromRow<'r, SqliteRow>,
{
    type Tx = SqliteTx;

    async fn find(&self, query: &Query) -> Result<Vec<T>, DataError> {
        let stmt = sql::select(T::table_name(), query, T::soft_delete_field())?;
        debug!(sql = %stmt.sql, "find");
        let mut fetch = sqlx::query_as::<_, T>(&stmt.sql);
        for value in &stmt.params {
            fetch = bind_value!(fetch, value);
        }
        fetch
            .fetch_all(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_data_error)
    }

    async fn find_by_id(&self, id: &T::Id) -> Result<Option<T>, DataError> {
        let sql = sql::select_by_id(T::table_name(), T::id_field(), T::soft_delete_field());
        sqlx::query_as::<_, T>(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_data_error)
    }

    async fn count(&self, predicate: &Predicate, with_deleted: bool) -> Result<u64, DataError> {
        let stmt = sql::count(
            T::table_name(),
            predicate,
            with_deleted,
            T::soft_delete_field(),
        )?;
        let mut fetch = sqlx::query_scalar::<_, i64>(&stmt.sql);
        for value in &stmt.params {
            fetch = bind_value!(fetch, value);
        }
        let count = fetch
            .fetch_one(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_data_error)?;
        Ok(count as u64)
    }

    async fn distinct(&self, field: &str) -> Result<Vec<Value>, DataError> {
        let sql = sql::distinct(T::table_name(), field, T::soft_delete_field())?;
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_data_error)?;
        let mut values = Vec::with_capacity(rows.len());
        for row in &rows {
            values.push(decode_column(row)?);
        }
        Ok(values)
    }

    async fn save(&self, entity: &T, tx: TxScope<'_, Self::Tx>) -> Result<T, DataError> {
        let json = to_json(entity)?;
        let object = json
            .as_object()
            .ok_or_else(|| DataError::Other("entity did not serialize to an object".into()))?;
        let fields = T::fields();
        let upsert_sql = sql::upsert(T::table_name(), fields);
        let mut upsert = sqlx::query(&upsert_sql);
        for field in fields {
            let value = object.get(*field).unwrap_or(&Value::Null);
            upsert = bind_value!(upsert, value);
        }
        // Read the row back so defaults and triggers are reflected.
        let fetch_sql = sql::select_by_id(T::table_name(), T::id_field(), None);
        let id = entity.id().to_string();
        let stored = match tx {
            TxScope::Auto => {
                upsert
                    .execute(&self.pool)
                    .await
                    .map_err(SqlxErrorExt::into_data_error)?;
                sqlx::query_as::<_, T>(&fetch_sql)
                    .bind(id.clone())
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(SqlxErrorExt::into_data_error)?
            }
            TxScope::Within(tx) => {
                upsert
                    .execute(&mut *tx.conn()?)
                    .await
                    .map_err(SqlxErrorExt::into_data_error)?;
                sqlx::query_as::<_, T>(&fetch_sql)
                    .bind(id.clone())
                    .fetch_optional(&mut *tx.conn()?)
                    .await
                    .map_err(SqlxErrorExt::into_data_error)?
            }
        };
        stored.ok_or_else(|| DataError::Other(format!("saved row missing for id {id}")))
    }

    async fn save_all(
        &self,
        entities: &[T],
        tx: TxScope<'_, Self::Tx>,
    ) -> Result<Vec<T>, DataError> {
        let mut saved = Vec::with_capacity(entities.len());
        match tx {
            TxScope::Auto => {
                for entity in entities {
                    saved.push(self.save(entity, TxScope::Auto).await?);
                }
            }
            TxScope::Within(tx) => {
                for entity in entities {
                    saved.push(self.save(entity, TxScope::Within(&mut *tx)).await?);
                }
            }
        }
        Ok(saved)
    }

    async fn update_by_id(
        &self,
        id: &T::Id,
        patch: &FieldValues,
        tx: TxScope<'_, Self::Tx>,
    ) -> Result<(), DataError> {
        if patch.is_empty() {
            return Ok(());
        }
        let stmt = sql::update(T::table_name(), T::id_field(), patch)?;
        let mut update = sqlx::query(&stmt.sql);
        for value in &stmt.params {
            update = bind_value!(update, value);
        }
        let update = update.bind(id.to_string());
        match tx {
            TxScope::Auto => update.execute(&self.pool).await,
            TxScope::Within(tx) => update.execute(&mut *tx.conn()?).await,
        }
        .map_err(SqlxErrorExt::into_data_error)?;
        Ok(())
    }

    async fn delete_by_id(&self, id: &T::Id, tx: TxScope<'_, Self::Tx>) -> Result<(), DataError> {
        let sql = sql::delete_by_id(T::table_name(), T::id_field());
        let delete = sqlx::query(&sql).bind(id.to_string());
        match tx {
            TxScope::Auto => delete.execute(&self.pool).await,
            TxScope::Within(tx) => delete.execute(&mut *tx.conn()?).await,
        }
        .map_err(SqlxErrorExt::into_data_error)?;
        Ok(())
    }

    async fn delete_where(
        &self,
        predicate: &Predicate,
        tx: TxScope<'_, Self::Tx>,
    ) -> Result<(), DataError> {
        let stmt = sql::delete_where(T::table_name(), predicate)?;
        let mut delete = sqlx::query(&stmt.sql);
        for value in &stmt.params {
            delete = bind_value!(delete, value);
        }
        match tx {
            TxScope::Auto => delete.execute(&self.pool).await,
            TxScope::Within(tx) => delete.execute(&mut *tx.conn()?).await,
        }
        .map_err(SqlxErrorExt::into_data_error)?;
        Ok(())
    }

    async fn clear(&self, tx: TxScope<'_, Self::Tx>) -> Result<(), DataError> {
        let sql = format!("DELETE FROM {}", T::table_name());
        let delete = sqlx::query(&sql);
        match tx {
            TxScope::Auto => delete.execute(&self.pool).await,
            TxScope::Within(tx) => delete.execute(&mut *tx.conn()?).await,
        }
        .map_err(SqlxErrorExt::into_data_error)?;
        Ok(())
    }

    async fn soft_delete_by_id(
        &self,
        id: &T::Id,
        tx: TxScope<'_, Self::Tx>,
    ) -> Result<(), DataError> {
        let Some(sd) = T::soft_delete_field() else {
            return Err(DataError::Unsupported(format!(
                "{} has no soft-delete column",
                T::table_name()
            )));
        };
        let sql = sql::soft_delete_by_id(T::table_name(), sd, T::id_field());
        let mark = sqlx::query(&sql).bind(id.to_string());
        match tx {
            TxScope::Auto => mark.execute(&self.pool).await,
            TxScope::Within(tx) => mark.execute(&mut *tx.conn()?).await,
        }
        .map_err(SqlxErrorExt::into_data_error)?;
        Ok(())
    }

    async fn restore_by_id(
        &self,
        id: &T::Id,
        tx: TxScope<'_, Self::Tx>,
    ) -> Result<(), DataError> {
        let Some(sd) = T::soft_delete_field() else {
            return Err(DataError::Unsupported(format!(
                "{} has no soft-delete column",
                T::table_name()
            )));
        };
        let sql = sql::restore_by_id(T::table_name(), sd, T::id_field());
        let unmark = sqlx::query(&sql).bind(id.to_string());
        match tx {
            TxScope::Auto => unmark.execute(&self.pool).await,
            TxScope::Within(tx) => unmark.execute(&mut *tx.conn()?).await,
        }
        .map_err(SqlxErrorExt::into_data_error)?;
        Ok(())
    }

    async fn begin(&self) -> Result<Self::Tx, DataError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(SqlxErrorExt::into_data_error)?;
        Ok(SqliteTx::new(tx))
    }
}
