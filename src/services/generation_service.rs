// src/services/generation_service.rs
//
// Bulk synthetic data
//
// Each call runs in one transaction: preconditions, key allocation and
// every insert either all land or none do. Keys continue from the
// current maximum without gaps.

use chrono::{DateTime, Duration, SubsecRound, Utc};
use rand::Rng;
use std::sync::Arc;

use crate::db::{with_transaction, ConnectionPool};
use crate::domain::{Entity, EntityKind, Record, Room, RoomType, Service, ServiceOrder, User};
use crate::error::{AppError, AppResult};
use crate::repositories::table;

/// Redraws allowed per service order before giving up on a unique key
const MAX_ORDER_ATTEMPTS: usize = 32;

pub struct GenerationService {
    pool: Arc<ConnectionPool>,
}

impl GenerationService {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    /// Generate `count` records of `kind` using the thread-local RNG
    pub fn generate(&self, kind: EntityKind, count: usize) -> AppResult<Vec<Record>> {
        self.generate_with(kind, count, &mut rand::thread_rng())
    }

    pub fn generate_with<R: Rng>(
        &self,
        kind: EntityKind,
        count: usize,
        rng: &mut R,
    ) -> AppResult<Vec<Record>> {
        batch_size(count)?;
        match kind {
            EntityKind::User => self.generate_users(count, rng).map(into_records),
            EntityKind::RoomType => self.generate_room_types(count, rng).map(into_records),
            EntityKind::Room => self.generate_rooms(count, rng).map(into_records),
            EntityKind::Service => self.generate_services(count, rng).map(into_records),
            EntityKind::ServiceOrder => self.generate_service_orders(count, rng).map(into_records),
        }
    }

    pub fn generate_users<R: Rng>(&self, count: usize, rng: &mut R) -> AppResult<Vec<User>> {
        with_transaction(&self.pool, |tx| {
            let users: Vec<User> = next_keys::<User>(tx, count)?
                .map(|id| {
                    User::new(
                        id,
                        format!("User_{}", rng.gen_range(1..=1000)),
                        format!("380{}", rng.gen_range(1_000_000..=9_999_999)),
                    )
                })
                .collect();

            insert_all(tx, &users)?;
            Ok(users)
        })
    }

    pub fn generate_room_types<R: Rng>(&self, count: usize, rng: &mut R) -> AppResult<Vec<RoomType>> {
        with_transaction(&self.pool, |tx| {
            let room_types: Vec<RoomType> = next_keys::<RoomType>(tx, count)?
                .map(|id| {
                    RoomType::new(id, format!("Type_{}", id), Some(rng.gen_range(100..=1099)))
                })
                .collect();

            insert_all(tx, &room_types)?;
            Ok(room_types)
        })
    }

    pub fn generate_services<R: Rng>(&self, count: usize, rng: &mut R) -> AppResult<Vec<Service>> {
        with_transaction(&self.pool, |tx| {
            let services: Vec<Service> = next_keys::<Service>(tx, count)?
                .map(|id| {
                    Service::new(id, format!("Service_{}", id), rng.gen_range(50..=500))
                })
                .collect();

            insert_all(tx, &services)?;
            Ok(services)
        })
    }

    /// Rooms reference existing room types and, when guests exist, an
    /// existing guest as occupant.
    pub fn generate_rooms<R: Rng>(&self, count: usize, rng: &mut R) -> AppResult<Vec<Room>> {
        with_transaction(&self.pool, |tx| {
            let room_types = table::ids::<RoomType>(tx)?;
            if room_types.is_empty() {
                return Err(AppError::PreconditionNotMet(
                    "no room types exist; add or generate room types first".to_string(),
                ));
            }
            let users = table::ids::<User>(tx)?;
            let keys = next_keys::<Room>(tx, count)?;
            let now = now();

            let rooms: Vec<Room> = keys
                .map(|room_id| {
                    let check_in = now - Duration::days(rng.gen_range(1..=100))
                        + Duration::hours(rng.gen_range(0..=23));
                    let check_out = check_in
                        + Duration::days(rng.gen_range(1..=30))
                        + Duration::hours(rng.gen_range(0..=23));

                    Room {
                        room_id,
                        room_number: rng.gen_range(1..=100),
                        room_type_id: pick(&room_types, rng),
                        user_id: (!users.is_empty()).then(|| pick(&users, rng)),
                        check_in: Some(check_in),
                        check_out: Some(check_out),
                    }
                })
                .collect();

            insert_all(tx, &rooms)?;
            Ok(rooms)
        })
    }

    /// Orders draw a guest and a service from existing rows; a key that
    /// already exists (in the store or earlier in this batch) is redrawn.
    pub fn generate_service_orders<R: Rng>(
        &self,
        count: usize,
        rng: &mut R,
    ) -> AppResult<Vec<ServiceOrder>> {
        batch_size(count)?;
        with_transaction(&self.pool, |tx| {
            let users = table::ids::<User>(tx)?;
            let services = table::ids::<Service>(tx)?;
            if users.is_empty() || services.is_empty() {
                return Err(AppError::PreconditionNotMet(
                    "service orders need at least one user and one service".to_string(),
                ));
            }
            let now = now();

            let mut orders = Vec::new();
            for _ in 0..count {
                let order = (0..MAX_ORDER_ATTEMPTS)
                    .map(|_| {
                        let ordered_at = now - Duration::days(rng.gen_range(1..=30))
                            + Duration::seconds(rng.gen_range(0..86_400));
                        ServiceOrder::new(pick(&users, rng), pick(&services, rng), ordered_at)
                    })
                    .find_map(|candidate| {
                        match table::exists::<ServiceOrder>(tx, &candidate.key()) {
                            Ok(false) => Some(Ok(candidate)),
                            Ok(true) => None,
                            Err(e) => Some(Err(e)),
                        }
                    })
                    .unwrap_or_else(|| {
                        Err(AppError::ConstraintViolation(format!(
                            "no unique service order key found after {} attempts",
                            MAX_ORDER_ATTEMPTS
                        )))
                    })?;

                // Inserted right away so later candidates see it.
                table::insert(tx, &order)?;
                orders.push(order);
            }

            Ok(orders)
        })
    }
}

fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

fn batch_size(count: usize) -> AppResult<i64> {
    i64::try_from(count).map_err(|_| {
        AppError::invalid_value("count", count.to_string(), "too many records for one batch")
    })
}

/// Keys `max + 1 ..= max + count` for a single-key entity. Fails before
/// anything is written when the range would pass `i64::MAX`.
fn next_keys<T: Entity>(
    conn: &rusqlite::Connection,
    count: usize,
) -> AppResult<std::ops::RangeInclusive<i64>> {
    let count = batch_size(count)?;
    let max = table::max_id::<T>(conn)?;
    if count == 0 {
        return Ok(1..=0);
    }

    let last = max.checked_add(count).ok_or_else(|| {
        AppError::PreconditionNotMet(format!(
            "{} keys would run past {} (current maximum {})",
            T::KIND.title(),
            i64::MAX,
            max
        ))
    })?;
    Ok(max + 1..=last)
}

/// `ids` must be non-empty
fn pick<R: Rng>(ids: &[i64], rng: &mut R) -> i64 {
    ids[rng.gen_range(0..ids.len())]
}

fn insert_all<T: Entity>(conn: &rusqlite::Connection, entities: &[T]) -> AppResult<()> {
    for entity in entities {
        table::insert(conn, entity)?;
    }
    Ok(())
}

fn into_records<T: Entity>(entities: Vec<T>) -> Vec<Record> {
    entities.into_iter().map(Into::into).collect()
}
