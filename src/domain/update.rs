// src/domain/update.rs
//
// Single-field mutations as a tagged union. A field name coming from
// the shell only becomes a mutation through `FieldUpdate::parse`.

use super::entity::{ensure_mutable, Entity};
use super::registry::EntityKind;
use super::value::FieldValue;
use super::{
    Room, RoomType, RoomTypeUpdate, RoomUpdate, Service, ServiceOrder, ServiceOrderUpdate,
    ServiceUpdate, User, UserUpdate,
};
use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    User(UserUpdate),
    RoomType(RoomTypeUpdate),
    Room(RoomUpdate),
    Service(ServiceUpdate),
    ServiceOrder(ServiceOrderUpdate),
}

impl FieldUpdate {
    /// Resolve `field` on `kind` and coerce `raw` to its type.
    ///
    /// Errors: `UnknownField` for undeclared names, `ImmutableField` for
    /// keys, `InvalidValue` when coercion fails.
    pub fn parse(kind: EntityKind, field: &str, raw: &str) -> AppResult<FieldUpdate> {
        let descriptor = kind.descriptor().field(field)?;
        ensure_mutable(kind, descriptor)?;
        let value = FieldValue::coerce(descriptor, raw)?;

        Ok(match kind {
            EntityKind::User => FieldUpdate::User(User::update_for(descriptor, value)?),
            EntityKind::RoomType => FieldUpdate::RoomType(RoomType::update_for(descriptor, value)?),
            EntityKind::Room => FieldUpdate::Room(Room::update_for(descriptor, value)?),
            EntityKind::Service => FieldUpdate::Service(Service::update_for(descriptor, value)?),
            EntityKind::ServiceOrder => {
                FieldUpdate::ServiceOrder(ServiceOrder::update_for(descriptor, value)?)
            }
        })
    }
}
