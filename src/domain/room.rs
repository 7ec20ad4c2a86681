// src/domain/room.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{
    expect_integer, expect_optional_integer, expect_optional_timestamp, Entity, FieldCursor,
};
use super::record::RecordKey;
use super::registry::{EntityKind, FieldDescriptor};
use super::value::FieldValue;
use crate::error::{AppError, AppResult};

/// A physical room, optionally occupied by a guest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub room_id: i64,
    pub room_number: i64,
    /// Must reference an existing room type
    pub room_type_id: i64,
    /// Current occupant, if any
    pub user_id: Option<i64>,
    pub check_in: Option<DateTime<Utc>>,
    pub check_out: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomUpdate {
    RoomNumber(i64),
    RoomTypeId(i64),
    UserId(Option<i64>),
    CheckIn(Option<DateTime<Utc>>),
    CheckOut(Option<DateTime<Utc>>),
}

impl Room {
    /// A vacant room
    pub fn new(room_id: i64, room_number: i64, room_type_id: i64) -> Self {
        Self {
            room_id,
            room_number,
            room_type_id,
            user_id: None,
            check_in: None,
            check_out: None,
        }
    }
}

impl Entity for Room {
    type Update = RoomUpdate;

    const KIND: EntityKind = EntityKind::Room;

    fn key(&self) -> RecordKey {
        RecordKey::Id(self.room_id)
    }

    fn values(&self) -> Vec<FieldValue> {
        vec![
            FieldValue::Integer(self.room_id),
            FieldValue::Integer(self.room_number),
            FieldValue::Integer(self.room_type_id),
            FieldValue::optional_integer(self.user_id),
            FieldValue::optional_timestamp(self.check_in),
            FieldValue::optional_timestamp(self.check_out),
        ]
    }

    fn from_values(values: Vec<FieldValue>) -> AppResult<Self> {
        let mut cursor = FieldCursor::new(Self::KIND, values)?;
        Ok(Self {
            room_id: cursor.integer()?,
            room_number: cursor.integer()?,
            room_type_id: cursor.integer()?,
            user_id: cursor.optional_integer()?,
            check_in: cursor.optional_timestamp()?,
            check_out: cursor.optional_timestamp()?,
        })
    }

    fn update_for(field: &'static FieldDescriptor, value: FieldValue) -> AppResult<RoomUpdate> {
        match field.name {
            "room_number" => Ok(RoomUpdate::RoomNumber(expect_integer(field, value)?)),
            "room_type_id" => Ok(RoomUpdate::RoomTypeId(expect_integer(field, value)?)),
            "user_id" => Ok(RoomUpdate::UserId(expect_optional_integer(field, value)?)),
            "check_in" => Ok(RoomUpdate::CheckIn(expect_optional_timestamp(field, value)?)),
            "check_out" => Ok(RoomUpdate::CheckOut(expect_optional_timestamp(field, value)?)),
            _ => Err(AppError::ImmutableField {
                entity: Self::KIND.title(),
                field: field.name,
            }),
        }
    }

    fn apply(&mut self, update: RoomUpdate) {
        match update {
            RoomUpdate::RoomNumber(number) => self.room_number = number,
            RoomUpdate::RoomTypeId(id) => self.room_type_id = id,
            RoomUpdate::UserId(user) => self.user_id = user,
            RoomUpdate::CheckIn(at) => self.check_in = at,
            RoomUpdate::CheckOut(at) => self.check_out = at,
        }
    }
}
