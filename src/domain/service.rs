// src/domain/service.rs

use serde::{Deserialize, Serialize};

use super::entity::{expect_integer, expect_text, Entity, FieldCursor};
use super::record::RecordKey;
use super::registry::{EntityKind, FieldDescriptor};
use super::value::FieldValue;
use crate::error::{AppError, AppResult};

/// A billable hotel service (laundry, breakfast, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub service_id: i64,
    pub name: String,
    pub price: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceUpdate {
    Name(String),
    Price(i64),
}

impl Service {
    pub fn new(service_id: i64, name: impl Into<String>, price: i64) -> Self {
        Self {
            service_id,
            name: name.into(),
            price,
        }
    }
}

impl Entity for Service {
    type Update = ServiceUpdate;

    const KIND: EntityKind = EntityKind::Service;

    fn key(&self) -> RecordKey {
        RecordKey::Id(self.service_id)
    }

    fn values(&self) -> Vec<FieldValue> {
        vec![
            FieldValue::Integer(self.service_id),
            FieldValue::Text(self.name.clone()),
            FieldValue::Integer(self.price),
        ]
    }

    fn from_values(values: Vec<FieldValue>) -> AppResult<Self> {
        let mut cursor = FieldCursor::new(Self::KIND, values)?;
        Ok(Self {
            service_id: cursor.integer()?,
            name: cursor.text()?,
            price: cursor.integer()?,
        })
    }

    fn update_for(field: &'static FieldDescriptor, value: FieldValue) -> AppResult<ServiceUpdate> {
        match field.name {
            "name" => Ok(ServiceUpdate::Name(expect_text(field, value)?)),
            "price" => Ok(ServiceUpdate::Price(expect_integer(field, value)?)),
            _ => Err(AppError::ImmutableField {
                entity: Self::KIND.title(),
                field: field.name,
            }),
        }
    }

    fn apply(&mut self, update: ServiceUpdate) {
        match update {
            ServiceUpdate::Name(name) => self.name = name,
            ServiceUpdate::Price(price) => self.price = price,
        }
    }
}
