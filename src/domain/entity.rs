// src/domain/entity.rs
//
// Behaviour shared by every persisted record type

use chrono::{DateTime, Utc};

use super::record::{Record, RecordKey};
use super::registry::{EntityDescriptor, EntityKind, FieldDescriptor};
use super::value::FieldValue;
use crate::error::{AppError, AppResult};

/// A record type backed by one table.
///
/// `values` and `from_values` use the descriptor's field order, which is
/// also the column order in the table.
pub trait Entity: Clone + Send + Sync + Into<Record> + 'static {
    /// Typed single-field mutation accepted by `apply`
    type Update: Send;

    const KIND: EntityKind;

    fn key(&self) -> RecordKey;

    fn values(&self) -> Vec<FieldValue>;

    fn from_values(values: Vec<FieldValue>) -> AppResult<Self>;

    /// Build the typed update for a declared, mutable field
    fn update_for(field: &'static FieldDescriptor, value: FieldValue) -> AppResult<Self::Update>;

    fn apply(&mut self, update: Self::Update);

    fn descriptor() -> &'static EntityDescriptor {
        Self::KIND.descriptor()
    }
}

/// Walks descriptor-ordered values while building an entity
pub struct FieldCursor {
    fields: std::slice::Iter<'static, FieldDescriptor>,
    values: std::vec::IntoIter<FieldValue>,
}

impl FieldCursor {
    pub fn new(kind: EntityKind, values: Vec<FieldValue>) -> AppResult<Self> {
        let descriptor = kind.descriptor();
        if values.len() != descriptor.fields.len() {
            return Err(AppError::invalid_value(
                descriptor.title,
                format!("{} values", values.len()),
                format!("expected {} values", descriptor.fields.len()),
            ));
        }
        Ok(Self {
            fields: descriptor.fields.iter(),
            values: values.into_iter(),
        })
    }

    fn next(&mut self) -> AppResult<(&'static FieldDescriptor, FieldValue)> {
        match (self.fields.next(), self.values.next()) {
            (Some(field), Some(value)) => Ok((field, value)),
            _ => Err(AppError::invalid_value(
                "record",
                "",
                "more fields read than the descriptor declares",
            )),
        }
    }

    pub fn integer(&mut self) -> AppResult<i64> {
        let (field, value) = self.next()?;
        expect_integer(field, value)
    }

    pub fn optional_integer(&mut self) -> AppResult<Option<i64>> {
        let (field, value) = self.next()?;
        expect_optional_integer(field, value)
    }

    pub fn text(&mut self) -> AppResult<String> {
        let (field, value) = self.next()?;
        expect_text(field, value)
    }

    pub fn timestamp(&mut self) -> AppResult<DateTime<Utc>> {
        let (field, value) = self.next()?;
        expect_timestamp(field, value)
    }

    pub fn optional_timestamp(&mut self) -> AppResult<Option<DateTime<Utc>>> {
        let (field, value) = self.next()?;
        expect_optional_timestamp(field, value)
    }
}

fn mismatch(field: &FieldDescriptor, value: &FieldValue) -> AppError {
    let reason = if value.is_null() {
        "value is required".to_string()
    } else {
        format!("expected {}", field.field_type.describe())
    };
    AppError::invalid_value(field.name, value.to_string(), reason)
}

pub fn expect_integer(field: &FieldDescriptor, value: FieldValue) -> AppResult<i64> {
    match value {
        FieldValue::Integer(v) => Ok(v),
        other => Err(mismatch(field, &other)),
    }
}

pub fn expect_optional_integer(field: &FieldDescriptor, value: FieldValue) -> AppResult<Option<i64>> {
    match value {
        FieldValue::Null => Ok(None),
        other => expect_integer(field, other).map(Some),
    }
}

pub fn expect_text(field: &FieldDescriptor, value: FieldValue) -> AppResult<String> {
    match value {
        FieldValue::Text(s) => Ok(s),
        other => Err(mismatch(field, &other)),
    }
}

pub fn expect_timestamp(field: &FieldDescriptor, value: FieldValue) -> AppResult<DateTime<Utc>> {
    match value {
        FieldValue::Timestamp(dt) => Ok(dt),
        other => Err(mismatch(field, &other)),
    }
}

pub fn expect_optional_timestamp(
    field: &FieldDescriptor,
    value: FieldValue,
) -> AppResult<Option<DateTime<Utc>>> {
    match value {
        FieldValue::Null => Ok(None),
        other => expect_timestamp(field, other).map(Some),
    }
}

/// Rejects fields that are not declared mutable
pub fn ensure_mutable(kind: EntityKind, field: &'static FieldDescriptor) -> AppResult<()> {
    if !field.mutable {
        return Err(AppError::ImmutableField {
            entity: kind.title(),
            field: field.name,
        });
    }
    Ok(())
}
