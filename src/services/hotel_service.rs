// src/services/hotel_service.rs
//
// Data access facade used by the shell.
//
// Kinds and fields arrive by name and are resolved against the static
// registry before anything touches the store. Every public operation is
// timed and logged.

use serde::Serialize;
use std::sync::Arc;

use super::generation_service::GenerationService;
use super::timing::timed;
use crate::db::{get_database_stats, with_connection, ConnectionPool, DatabaseStats};
use crate::domain::{
    EntityKind, FieldUpdate, Record, RecordKey, Room, RoomType, Service, ServiceOrder, User,
};
use crate::error::AppResult;
use crate::repositories::{EntityRepository, SqliteRepository};

/// Result of a delete. A missing row is reported, not raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteOutcome {
    Deleted,
    Missing,
}

/// Run `$body` with `$repo` bound to the repository for `$kind`
macro_rules! with_repository {
    ($self:ident, $kind:expr, |$repo:ident| $body:expr) => {
        match $kind {
            EntityKind::User => {
                let $repo = &$self.users;
                $body
            }
            EntityKind::RoomType => {
                let $repo = &$self.room_types;
                $body
            }
            EntityKind::Room => {
                let $repo = &$self.rooms;
                $body
            }
            EntityKind::Service => {
                let $repo = &$self.services;
                $body
            }
            EntityKind::ServiceOrder => {
                let $repo = &$self.service_orders;
                $body
            }
        }
    };
}

pub struct HotelService {
    users: Arc<dyn EntityRepository<User>>,
    room_types: Arc<dyn EntityRepository<RoomType>>,
    rooms: Arc<dyn EntityRepository<Room>>,
    services: Arc<dyn EntityRepository<Service>>,
    service_orders: Arc<dyn EntityRepository<ServiceOrder>>,
    generator: GenerationService,
    pool: Arc<ConnectionPool>,
}

impl HotelService {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self {
            users: Arc::new(SqliteRepository::<User>::new(pool.clone())),
            room_types: Arc::new(SqliteRepository::<RoomType>::new(pool.clone())),
            rooms: Arc::new(SqliteRepository::<Room>::new(pool.clone())),
            services: Arc::new(SqliteRepository::<Service>::new(pool.clone())),
            service_orders: Arc::new(SqliteRepository::<ServiceOrder>::new(pool.clone())),
            generator: GenerationService::new(pool.clone()),
            pool,
        }
    }

    /// Every row of `kind`, ordered by key
    pub fn fetch_all(&self, kind: &str) -> AppResult<Vec<Record>> {
        timed("fetch_all", kind, || {
            let kind = EntityKind::parse(kind)?;
            with_repository!(self, kind, |repo| Ok(into_records(repo.list_all()?)))
        })
    }

    pub fn fetch_one(&self, kind: &str, key: &str) -> AppResult<Option<Record>> {
        timed("fetch_one", kind, || {
            let kind = EntityKind::parse(kind)?;
            let key = RecordKey::parse(kind, key)?;
            with_repository!(self, kind, |repo| Ok(repo.get_by_key(&key)?.map(Record::from)))
        })
    }

    /// Rows with `low <= field <= high`, ascending by `order_by`.
    /// `field` must be an integer field.
    pub fn fetch_in_range(
        &self,
        kind: &str,
        field: &str,
        low: i64,
        high: i64,
        order_by: &str,
    ) -> AppResult<Vec<Record>> {
        timed("fetch_in_range", kind, || {
            let kind = EntityKind::parse(kind)?;
            let descriptor = kind.descriptor();
            let field = descriptor.integer_field(field)?;
            let order_by = descriptor.field(order_by)?;

            if low > high {
                return Ok(Vec::new());
            }

            with_repository!(self, kind, |repo| Ok(into_records(
                repo.list_in_range(field, low, high, order_by)?
            )))
        })
    }

    /// Rows whose text `field` contains `pattern`, ignoring case
    pub fn fetch_by_pattern(
        &self,
        kind: &str,
        field: &str,
        pattern: &str,
        order_by: &str,
    ) -> AppResult<Vec<Record>> {
        timed("fetch_by_pattern", kind, || {
            let kind = EntityKind::parse(kind)?;
            let descriptor = kind.descriptor();
            let field = descriptor.text_field(field)?;
            let order_by = descriptor.field(order_by)?;

            with_repository!(self, kind, |repo| Ok(into_records(
                repo.search(field, pattern, order_by)?
            )))
        })
    }

    pub fn insert(&self, record: &Record) -> AppResult<()> {
        timed("insert", record.kind().name(), || match record {
            Record::User(r) => self.users.insert(r),
            Record::RoomType(r) => self.room_types.insert(r),
            Record::Room(r) => self.rooms.insert(r),
            Record::Service(r) => self.services.insert(r),
            Record::ServiceOrder(r) => self.service_orders.insert(r),
        })
    }

    /// Set one field of the row at `key` from its raw text form and
    /// return the row as stored afterwards.
    pub fn update_field(&self, kind: &str, key: &str, field: &str, value: &str) -> AppResult<Record> {
        timed("update_field", kind, || {
            let kind = EntityKind::parse(kind)?;
            let key = RecordKey::parse(kind, key)?;

            match FieldUpdate::parse(kind, field, value)? {
                FieldUpdate::User(u) => self.users.update(&key, u).map(Record::from),
                FieldUpdate::RoomType(u) => self.room_types.update(&key, u).map(Record::from),
                FieldUpdate::Room(u) => self.rooms.update(&key, u).map(Record::from),
                FieldUpdate::Service(u) => self.services.update(&key, u).map(Record::from),
                FieldUpdate::ServiceOrder(u) => {
                    self.service_orders.update(&key, u).map(Record::from)
                }
            }
        })
    }

    pub fn delete(&self, kind: &str, key: &str) -> AppResult<DeleteOutcome> {
        timed("delete", kind, || {
            let kind = EntityKind::parse(kind)?;
            let key = RecordKey::parse(kind, key)?;

            let removed = with_repository!(self, kind, |repo| repo.delete(&key)?);
            if removed {
                Ok(DeleteOutcome::Deleted)
            } else {
                log::info!("No {} with key {} to delete", kind.title(), key);
                Ok(DeleteOutcome::Missing)
            }
        })
    }

    pub fn generate(&self, kind: &str, count: usize) -> AppResult<Vec<Record>> {
        timed("generate", kind, || {
            let kind = EntityKind::parse(kind)?;
            let records = self.generator.generate(kind, count)?;
            log::info!("Generated {} {} record(s)", records.len(), kind.title());
            Ok(records)
        })
    }

    pub fn stats(&self) -> AppResult<DatabaseStats> {
        timed("stats", "database", || {
            with_connection(&self.pool, |conn| get_database_stats(conn))
        })
    }

    #[cfg(test)]
    pub(crate) fn generator(&self) -> &GenerationService {
        &self.generator
    }
}

fn into_records<T: Into<Record>>(entities: Vec<T>) -> Vec<Record> {
    entities.into_iter().map(Into::into).collect()
}
