// src/repositories/mod.rs
//
// Repository layer
//
// CRITICAL RULES:
// - Repositories are DUMB data mappers
// - NO business logic
// - NO cross-repository calls
// - Explicit SQL only, built from the static registry

pub mod entity_repository;
pub mod table;

pub use entity_repository::{EntityRepository, SqliteRepository};

use crate::domain::{Room, RoomType, Service, ServiceOrder, User};

pub type SqliteUserRepository = SqliteRepository<User>;
pub type SqliteRoomTypeRepository = SqliteRepository<RoomType>;
pub type SqliteRoomRepository = SqliteRepository<Room>;
pub type SqliteServiceRepository = SqliteRepository<Service>;
pub type SqliteServiceOrderRepository = SqliteRepository<ServiceOrder>;
