// src/repositories/entity_repository.rs

use std::marker::PhantomData;
use std::sync::Arc;

use super::table;
use crate::db::{with_connection, with_transaction, ConnectionPool};
use crate::domain::{Entity, FieldDescriptor, RecordKey};
use crate::error::{AppError, AppResult};

pub trait EntityRepository<T: Entity>: Send + Sync {
    fn list_all(&self) -> AppResult<Vec<T>>;
    fn list_in_range(
        &self,
        field: &'static FieldDescriptor,
        low: i64,
        high: i64,
        order_by: &'static FieldDescriptor,
    ) -> AppResult<Vec<T>>;
    fn search(
        &self,
        field: &'static FieldDescriptor,
        needle: &str,
        order_by: &'static FieldDescriptor,
    ) -> AppResult<Vec<T>>;
    fn get_by_key(&self, key: &RecordKey) -> AppResult<Option<T>>;
    fn insert(&self, entity: &T) -> AppResult<()>;
    /// Load, apply one field update, persist. Returns the updated entity.
    fn update(&self, key: &RecordKey, update: T::Update) -> AppResult<T>;
    /// Returns false when nothing matched `key`
    fn delete(&self, key: &RecordKey) -> AppResult<bool>;
}

/// SQLite-backed repository for any entity in the registry
pub struct SqliteRepository<T> {
    pool: Arc<ConnectionPool>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> SqliteRepository<T> {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> EntityRepository<T> for SqliteRepository<T> {
    fn list_all(&self) -> AppResult<Vec<T>> {
        with_connection(&self.pool, |conn| table::select_all(conn))
    }

    fn list_in_range(
        &self,
        field: &'static FieldDescriptor,
        low: i64,
        high: i64,
        order_by: &'static FieldDescriptor,
    ) -> AppResult<Vec<T>> {
        with_connection(&self.pool, |conn| {
            table::select_in_range(conn, field, low, high, order_by)
        })
    }

    fn search(
        &self,
        field: &'static FieldDescriptor,
        needle: &str,
        order_by: &'static FieldDescriptor,
    ) -> AppResult<Vec<T>> {
        with_connection(&self.pool, |conn| {
            table::select_matching(conn, field, needle, order_by)
        })
    }

    fn get_by_key(&self, key: &RecordKey) -> AppResult<Option<T>> {
        with_connection(&self.pool, |conn| table::select_by_key(conn, key))
    }

    fn insert(&self, entity: &T) -> AppResult<()> {
        with_transaction(&self.pool, |tx| table::insert(tx, entity))
    }

    fn update(&self, key: &RecordKey, update: T::Update) -> AppResult<T> {
        with_transaction(&self.pool, |tx| {
            let mut entity: T = table::select_by_key(tx, key)?.ok_or_else(|| AppError::NotFound {
                entity: T::KIND.title(),
                key: key.to_string(),
            })?;

            entity.apply(update);
            table::update(tx, key, &entity)?;

            Ok(entity)
        })
    }

    fn delete(&self, key: &RecordKey) -> AppResult<bool> {
        with_transaction(&self.pool, |tx| table::delete::<T>(tx, key))
    }
}
