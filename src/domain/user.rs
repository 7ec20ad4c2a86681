// src/domain/user.rs

use serde::{Deserialize, Serialize};

use super::entity::{expect_text, Entity, FieldCursor};
use super::record::RecordKey;
use super::registry::{EntityKind, FieldDescriptor};
use super::value::FieldValue;
use crate::error::{AppError, AppResult};

/// A hotel guest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: i64,
    pub name: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserUpdate {
    Name(String),
    PhoneNumber(String),
}

impl User {
    pub fn new(user_id: i64, name: impl Into<String>, phone_number: impl Into<String>) -> Self {
        Self {
            user_id,
            name: name.into(),
            phone_number: phone_number.into(),
        }
    }
}

impl Entity for User {
    type Update = UserUpdate;

    const KIND: EntityKind = EntityKind::User;

    fn key(&self) -> RecordKey {
        RecordKey::Id(self.user_id)
    }

    fn values(&self) -> Vec<FieldValue> {
        vec![
            FieldValue::Integer(self.user_id),
            FieldValue::Text(self.name.clone()),
            FieldValue::Text(self.phone_number.clone()),
        ]
    }

    fn from_values(values: Vec<FieldValue>) -> AppResult<Self> {
        let mut cursor = FieldCursor::new(Self::KIND, values)?;
        Ok(Self {
            user_id: cursor.integer()?,
            name: cursor.text()?,
            phone_number: cursor.text()?,
        })
    }

    fn update_for(field: &'static FieldDescriptor, value: FieldValue) -> AppResult<UserUpdate> {
        match field.name {
            "name" => Ok(UserUpdate::Name(expect_text(field, value)?)),
            "phone_number" => Ok(UserUpdate::PhoneNumber(expect_text(field, value)?)),
            _ => Err(AppError::ImmutableField {
                entity: Self::KIND.title(),
                field: field.name,
            }),
        }
    }

    fn apply(&mut self, update: UserUpdate) {
        match update {
            UserUpdate::Name(name) => self.name = name,
            UserUpdate::PhoneNumber(phone) => self.phone_number = phone,
        }
    }
}
