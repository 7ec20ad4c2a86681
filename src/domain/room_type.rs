// src/domain/room_type.rs

use serde::{Deserialize, Serialize};

use super::entity::{expect_optional_integer, expect_text, Entity, FieldCursor};
use super::record::RecordKey;
use super::registry::{EntityKind, FieldDescriptor};
use super::value::FieldValue;
use crate::error::{AppError, AppResult};

/// Category of room with an optional base nightly price
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomType {
    pub room_type_id: i64,
    pub label: String,
    pub base_price: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomTypeUpdate {
    Label(String),
    BasePrice(Option<i64>),
}

impl RoomType {
    pub fn new(room_type_id: i64, label: impl Into<String>, base_price: Option<i64>) -> Self {
        Self {
            room_type_id,
            label: label.into(),
            base_price,
        }
    }
}

impl Entity for RoomType {
    type Update = RoomTypeUpdate;

    const KIND: EntityKind = EntityKind::RoomType;

    fn key(&self) -> RecordKey {
        RecordKey::Id(self.room_type_id)
    }

    fn values(&self) -> Vec<FieldValue> {
        vec![
            FieldValue::Integer(self.room_type_id),
            FieldValue::Text(self.label.clone()),
            FieldValue::optional_integer(self.base_price),
        ]
    }

    fn from_values(values: Vec<FieldValue>) -> AppResult<Self> {
        let mut cursor = FieldCursor::new(Self::KIND, values)?;
        Ok(Self {
            room_type_id: cursor.integer()?,
            label: cursor.text()?,
            base_price: cursor.optional_integer()?,
        })
    }

    fn update_for(field: &'static FieldDescriptor, value: FieldValue) -> AppResult<RoomTypeUpdate> {
        match field.name {
            "label" => Ok(RoomTypeUpdate::Label(expect_text(field, value)?)),
            "base_price" => Ok(RoomTypeUpdate::BasePrice(expect_optional_integer(field, value)?)),
            _ => Err(AppError::ImmutableField {
                entity: Self::KIND.title(),
                field: field.name,
            }),
        }
    }

    fn apply(&mut self, update: RoomTypeUpdate) {
        match update {
            RoomTypeUpdate::Label(label) => self.label = label,
            RoomTypeUpdate::BasePrice(price) => self.base_price = price,
        }
    }
}
