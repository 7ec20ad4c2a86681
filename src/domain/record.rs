// src/domain/record.rs
//
// Kind-erased records and keys used at the dynamic (by-name) boundary

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use super::entity::Entity;
use super::registry::{EntityKind, FieldDescriptor};
use super::value::{format_timestamp, parse_timestamp, FieldValue};
use super::{Room, RoomType, Service, ServiceOrder, User};
use crate::error::{AppError, AppResult};

/// One row of any entity kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    User(User),
    RoomType(RoomType),
    Room(Room),
    Service(Service),
    ServiceOrder(ServiceOrder),
}

impl Record {
    pub fn kind(&self) -> EntityKind {
        match self {
            Record::User(_) => EntityKind::User,
            Record::RoomType(_) => EntityKind::RoomType,
            Record::Room(_) => EntityKind::Room,
            Record::Service(_) => EntityKind::Service,
            Record::ServiceOrder(_) => EntityKind::ServiceOrder,
        }
    }

    pub fn key(&self) -> RecordKey {
        match self {
            Record::User(r) => r.key(),
            Record::RoomType(r) => r.key(),
            Record::Room(r) => r.key(),
            Record::Service(r) => r.key(),
            Record::ServiceOrder(r) => r.key(),
        }
    }

    pub fn values(&self) -> Vec<FieldValue> {
        match self {
            Record::User(r) => r.values(),
            Record::RoomType(r) => r.values(),
            Record::Room(r) => r.values(),
            Record::Service(r) => r.values(),
            Record::ServiceOrder(r) => r.values(),
        }
    }

    /// Descriptor fields paired with this record's values
    pub fn fields(&self) -> Vec<(&'static FieldDescriptor, FieldValue)> {
        self.kind()
            .descriptor()
            .fields
            .iter()
            .zip(self.values())
            .collect()
    }

    /// Build a record from named raw inputs, coercing each to its
    /// declared type. Missing nullable fields default to Null.
    pub fn from_fields<K, V>(kind: EntityKind, inputs: &[(K, V)]) -> AppResult<Record>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let descriptor = kind.descriptor();
        let mut values: Vec<Option<FieldValue>> = vec![None; descriptor.fields.len()];

        for (name, raw) in inputs {
            let field = descriptor.field(name.as_ref())?;
            let index = descriptor
                .fields
                .iter()
                .position(|f| std::ptr::eq(f, field))
                .ok_or_else(|| AppError::UnknownField {
                    entity: descriptor.title,
                    field: name.as_ref().to_string(),
                })?;
            values[index] = Some(FieldValue::coerce(field, raw.as_ref())?);
        }

        let values = descriptor
            .fields
            .iter()
            .zip(values)
            .map(|(field, value)| match value {
                Some(v) => Ok(v),
                None if field.nullable => Ok(FieldValue::Null),
                None => Err(AppError::invalid_value(field.name, "", "value is required")),
            })
            .collect::<AppResult<Vec<_>>>()?;

        Record::from_values(kind, values)
    }

    pub fn from_values(kind: EntityKind, values: Vec<FieldValue>) -> AppResult<Record> {
        Ok(match kind {
            EntityKind::User => User::from_values(values)?.into(),
            EntityKind::RoomType => RoomType::from_values(values)?.into(),
            EntityKind::Room => Room::from_values(values)?.into(),
            EntityKind::Service => Service::from_values(values)?.into(),
            EntityKind::ServiceOrder => ServiceOrder::from_values(values)?.into(),
        })
    }
}

impl From<User> for Record {
    fn from(value: User) -> Self {
        Record::User(value)
    }
}

impl From<RoomType> for Record {
    fn from(value: RoomType) -> Self {
        Record::RoomType(value)
    }
}

impl From<Room> for Record {
    fn from(value: Room) -> Self {
        Record::Room(value)
    }
}

impl From<Service> for Record {
    fn from(value: Service) -> Self {
        Record::Service(value)
    }
}

impl From<ServiceOrder> for Record {
    fn from(value: ServiceOrder) -> Self {
        Record::ServiceOrder(value)
    }
}

/// Identifier of a single row
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum RecordKey {
    Id(i64),
    ServiceOrder {
        user_id: i64,
        service_id: i64,
        ordered_at: DateTime<Utc>,
    },
}

impl RecordKey {
    /// Parse a key for `kind`. Service orders are written
    /// `user_id,service_id,timestamp`.
    pub fn parse(kind: EntityKind, raw: &str) -> AppResult<RecordKey> {
        let raw = raw.trim();
        let key_name = kind.descriptor().key_columns();

        if kind != EntityKind::ServiceOrder {
            return raw
                .parse::<i64>()
                .map(RecordKey::Id)
                .map_err(|e| AppError::invalid_value(key_name, raw, e.to_string()));
        }

        let parts: Vec<&str> = raw.splitn(3, ',').map(str::trim).collect();
        let (user_id, service_id, ordered_at) = match parts.as_slice() {
            [user_id, service_id, ordered_at] => (*user_id, *service_id, *ordered_at),
            _ => {
                return Err(AppError::invalid_value(
                    key_name,
                    raw,
                    "expected user_id,service_id,timestamp",
                ))
            }
        };

        let int = |s: &str| {
            s.parse::<i64>()
                .map_err(|e| AppError::invalid_value(key_name.clone(), raw, e.to_string()))
        };
        let ordered_at = parse_timestamp(ordered_at)
            .ok_or_else(|| AppError::invalid_value(key_name.clone(), raw, "invalid timestamp"))?;

        Ok(RecordKey::ServiceOrder {
            user_id: int(user_id)?,
            service_id: int(service_id)?,
            ordered_at: super::value::normalize_timestamp(ordered_at),
        })
    }

    /// Key values in key-column order
    pub fn values(&self) -> Vec<FieldValue> {
        match self {
            RecordKey::Id(id) => vec![FieldValue::Integer(*id)],
            RecordKey::ServiceOrder {
                user_id,
                service_id,
                ordered_at,
            } => vec![
                FieldValue::Integer(*user_id),
                FieldValue::Integer(*service_id),
                FieldValue::timestamp(*ordered_at),
            ],
        }
    }

    /// Whether this key has the shape `kind` expects
    pub fn fits(&self, kind: EntityKind) -> bool {
        match self {
            RecordKey::Id(_) => kind != EntityKind::ServiceOrder,
            RecordKey::ServiceOrder { .. } => kind == EntityKind::ServiceOrder,
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKey::Id(id) => write!(f, "{}", id),
            RecordKey::ServiceOrder {
                user_id,
                service_id,
                ordered_at,
            } => write!(f, "{},{},{}", user_id, service_id, format_timestamp(ordered_at)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_from_fields_builds_room_with_null_occupant() {
        let record = Record::from_fields(
            EntityKind::Room,
            &[
                ("room_id", "1"),
                ("room_number", "101"),
                ("room_type_id", "1"),
                ("user_id", ""),
            ],
        )
        .unwrap();

        assert_eq!(record, Record::Room(Room::new(1, 101, 1)));
    }

    #[test]
    fn test_from_fields_requires_non_nullable_fields() {
        let result = Record::from_fields(EntityKind::User, &[("user_id", "1"), ("name", "Ann")]);
        match result {
            Err(AppError::InvalidValue { field, .. }) => assert_eq!(field, "phone_number"),
            other => panic!("expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_from_fields_rejects_unknown_field() {
        let result = Record::from_fields(
            EntityKind::Service,
            &[("service_id", "1"), ("name", "Spa"), ("price", "10"), ("color", "red")],
        );
        assert!(matches!(result, Err(AppError::UnknownField { .. })));
    }

    #[test]
    fn test_parse_keys() {
        assert_eq!(
            RecordKey::parse(EntityKind::User, " 42 ").unwrap(),
            RecordKey::Id(42)
        );
        assert!(RecordKey::parse(EntityKind::Room, "abc").is_err());

        let key = RecordKey::parse(EntityKind::ServiceOrder, "3, 2, 2024-05-01").unwrap();
        assert_eq!(
            key,
            RecordKey::ServiceOrder {
                user_id: 3,
                service_id: 2,
                ordered_at: Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
            }
        );
        assert!(key.fits(EntityKind::ServiceOrder));
        assert!(!key.fits(EntityKind::User));
        assert!(RecordKey::parse(EntityKind::ServiceOrder, "3,2").is_err());
    }

    #[test]
    fn test_key_display_parses_back() {
        let order = ServiceOrder::new(1, 2, Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());
        let key = order.key();
        let reparsed = RecordKey::parse(EntityKind::ServiceOrder, &key.to_string()).unwrap();
        assert_eq!(reparsed, key);
    }
}
