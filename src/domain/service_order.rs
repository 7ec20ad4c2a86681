// src/domain/service_order.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{expect_integer, expect_timestamp, Entity, FieldCursor};
use super::record::RecordKey;
use super::registry::{EntityKind, FieldDescriptor};
use super::value::{normalize_timestamp, FieldValue};
use crate::error::{AppError, AppResult};

/// A guest ordering a service at a point in time.
///
/// All three fields form the key: the same guest may order the same
/// service many times, but never twice at the same instant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceOrder {
    pub user_id: i64,
    pub service_id: i64,
    pub ordered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceOrderUpdate {
    UserId(i64),
    ServiceId(i64),
    OrderedAt(DateTime<Utc>),
}

impl ServiceOrder {
    pub fn new(user_id: i64, service_id: i64, ordered_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            service_id,
            ordered_at: normalize_timestamp(ordered_at),
        }
    }
}

impl Entity for ServiceOrder {
    type Update = ServiceOrderUpdate;

    const KIND: EntityKind = EntityKind::ServiceOrder;

    fn key(&self) -> RecordKey {
        RecordKey::ServiceOrder {
            user_id: self.user_id,
            service_id: self.service_id,
            ordered_at: self.ordered_at,
        }
    }

    fn values(&self) -> Vec<FieldValue> {
        vec![
            FieldValue::Integer(self.user_id),
            FieldValue::Integer(self.service_id),
            FieldValue::timestamp(self.ordered_at),
        ]
    }

    fn from_values(values: Vec<FieldValue>) -> AppResult<Self> {
        let mut cursor = FieldCursor::new(Self::KIND, values)?;
        Ok(Self::new(
            cursor.integer()?,
            cursor.integer()?,
            cursor.timestamp()?,
        ))
    }

    fn update_for(
        field: &'static FieldDescriptor,
        value: FieldValue,
    ) -> AppResult<ServiceOrderUpdate> {
        match field.name {
            "user_id" => Ok(ServiceOrderUpdate::UserId(expect_integer(field, value)?)),
            "service_id" => Ok(ServiceOrderUpdate::ServiceId(expect_integer(field, value)?)),
            "ordered_at" => Ok(ServiceOrderUpdate::OrderedAt(expect_timestamp(field, value)?)),
            _ => Err(AppError::ImmutableField {
                entity: Self::KIND.title(),
                field: field.name,
            }),
        }
    }

    fn apply(&mut self, update: ServiceOrderUpdate) {
        match update {
            ServiceOrderUpdate::UserId(id) => self.user_id = id,
            ServiceOrderUpdate::ServiceId(id) => self.service_id = id,
            ServiceOrderUpdate::OrderedAt(at) => self.ordered_at = normalize_timestamp(at),
        }
    }
}
