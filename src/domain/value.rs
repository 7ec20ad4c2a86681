// src/domain/value.rs
//
// Field values and type coercion from raw text input

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, SubsecRound, TimeZone, Utc};
use serde::Serialize;
use std::fmt;

use super::registry::{FieldDescriptor, FieldType};
use crate::error::{AppError, AppResult};

/// A single column value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Integer(i64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl FieldValue {
    /// Timestamps are kept at microsecond precision so stored and
    /// in-memory values compare equal.
    pub fn timestamp(dt: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(normalize_timestamp(dt))
    }

    pub fn optional_integer(value: Option<i64>) -> Self {
        value.map_or(FieldValue::Null, FieldValue::Integer)
    }

    pub fn optional_timestamp(value: Option<DateTime<Utc>>) -> Self {
        value.map_or(FieldValue::Null, FieldValue::timestamp)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Coerce raw user input into a value of the field's type.
    ///
    /// For nullable fields an empty string, `null` or `none` means Null.
    pub fn coerce(field: &FieldDescriptor, raw: &str) -> AppResult<Self> {
        let trimmed = raw.trim();

        if field.nullable
            && (trimmed.is_empty()
                || trimmed.eq_ignore_ascii_case("null")
                || trimmed.eq_ignore_ascii_case("none"))
        {
            return Ok(FieldValue::Null);
        }

        match field.field_type {
            FieldType::Integer => trimmed
                .parse::<i64>()
                .map(FieldValue::Integer)
                .map_err(|e| AppError::invalid_value(field.name, raw, e.to_string())),
            FieldType::Text => Ok(FieldValue::Text(raw.to_string())),
            FieldType::Timestamp => parse_timestamp(trimmed)
                .map(FieldValue::timestamp)
                .ok_or_else(|| {
                    AppError::invalid_value(
                        field.name,
                        raw,
                        "expected RFC 3339, 'YYYY-MM-DD HH:MM:SS' or 'YYYY-MM-DD'",
                    )
                }),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => write!(f, "none"),
            FieldValue::Integer(v) => write!(f, "{}", v),
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Timestamp(dt) if dt.timestamp_subsec_micros() == 0 => {
                write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S UTC"))
            }
            FieldValue::Timestamp(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S%.6f UTC")),
        }
    }
}

pub fn normalize_timestamp(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.trunc_subsecs(6)
}

/// Storage form: fixed-width RFC 3339 in UTC, so text order is time order
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` and
/// `YYYY-MM-DD` (midnight). Offset-less inputs are taken as UTC; a
/// trailing ` UTC`, as printed by `Display`, is accepted.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    let raw = raw.strip_suffix(" UTC").unwrap_or(raw);

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::registry::EntityKind;

    fn room_field(name: &str) -> &'static FieldDescriptor {
        EntityKind::Room.descriptor().field(name).unwrap()
    }

    #[test]
    fn test_integer_coercion() {
        assert_eq!(
            FieldValue::coerce(room_field("room_number"), " 202 ").unwrap(),
            FieldValue::Integer(202)
        );
        assert!(matches!(
            FieldValue::coerce(room_field("room_number"), "two"),
            Err(AppError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_null_only_for_nullable_fields() {
        assert_eq!(
            FieldValue::coerce(room_field("user_id"), "").unwrap(),
            FieldValue::Null
        );
        assert_eq!(
            FieldValue::coerce(room_field("check_in"), "NULL").unwrap(),
            FieldValue::Null
        );
        assert!(FieldValue::coerce(room_field("room_number"), "").is_err());
    }

    #[test]
    fn test_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-05-01"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01 00:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01T00:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01T03:00:00+03:00"), Some(expected));
        assert_eq!(parse_timestamp("01/05/2024"), None);
    }

    #[test]
    fn test_storage_format_is_fixed_width() {
        let a = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let b = a + chrono::Duration::milliseconds(500);
        assert_eq!(format_timestamp(&a), "2024-05-01T10:00:00.000000Z");
        assert!(format_timestamp(&a) < format_timestamp(&b));
    }

    #[test]
    fn test_display() {
        let dt = Utc.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).unwrap();
        assert_eq!(FieldValue::timestamp(dt).to_string(), "2024-05-01 10:30:00 UTC");
        assert_eq!(FieldValue::Null.to_string(), "none");
    }

    #[test]
    fn test_display_keeps_fractional_seconds() {
        let dt = Utc.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).unwrap()
            + chrono::Duration::microseconds(250_001);
        let shown = FieldValue::timestamp(dt).to_string();

        assert_eq!(shown, "2024-05-01 10:30:00.250001 UTC");
        assert_eq!(parse_timestamp(&shown), Some(dt));
        assert_eq!(
            parse_timestamp("2024-05-01 10:30:00 UTC"),
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).unwrap())
        );
    }
}
