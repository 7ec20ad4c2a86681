// src/domain/registry.rs
//
// Static entity registry
//
// Every entity kind the shell can name is listed here with its table,
// columns and key. Lookups by name go through this table only.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::{AppError, AppResult};

/// Storage type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Integer,
    Text,
    Timestamp,
}

impl FieldType {
    pub fn describe(self) -> &'static str {
        match self {
            FieldType::Integer => "an integer field",
            FieldType::Text => "a text field",
            FieldType::Timestamp => "a timestamp field",
        }
    }
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    /// Field name, identical to the column name
    pub name: &'static str,
    /// Label used when rendering records
    pub label: &'static str,
    pub field_type: FieldType,
    pub nullable: bool,
    /// Part of the primary key
    pub key: bool,
    /// Accepted by single-field updates
    pub mutable: bool,
}

impl FieldDescriptor {
    const fn new(name: &'static str, label: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            label,
            field_type,
            nullable: false,
            key: false,
            mutable: true,
        }
    }

    const fn key(self) -> Self {
        Self {
            key: true,
            mutable: false,
            ..self
        }
    }

    const fn nullable(self) -> Self {
        Self {
            nullable: true,
            ..self
        }
    }

    /// Composite key members may be re-keyed through an update.
    const fn rekeyable(self) -> Self {
        Self {
            mutable: true,
            ..self
        }
    }
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct EntityDescriptor {
    pub kind: EntityKind,
    pub table: &'static str,
    pub title: &'static str,
    pub fields: &'static [FieldDescriptor],
    #[serde(skip)]
    aliases: &'static [&'static str],
}

impl EntityDescriptor {
    /// Look up a declared field, case-insensitively
    pub fn field(&self, name: &str) -> AppResult<&'static FieldDescriptor> {
        let wanted = name.trim();
        self.fields
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| AppError::UnknownField {
                entity: self.title,
                field: wanted.to_string(),
            })
    }

    pub fn key_fields(&self) -> impl Iterator<Item = &'static FieldDescriptor> {
        self.fields.iter().filter(|f| f.key)
    }

    /// Comma-separated column list in declaration order
    pub fn columns(&self) -> String {
        self.fields
            .iter()
            .map(|f| f.name)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Comma-separated key column list
    pub fn key_columns(&self) -> String {
        self.key_fields().map(|f| f.name).collect::<Vec<_>>().join(", ")
    }

    /// Require `name` to be an integer field (range queries)
    pub fn integer_field(&self, name: &str) -> AppResult<&'static FieldDescriptor> {
        self.typed_field(name, FieldType::Integer)
    }

    /// Require `name` to be a text field (pattern queries)
    pub fn text_field(&self, name: &str) -> AppResult<&'static FieldDescriptor> {
        self.typed_field(name, FieldType::Text)
    }

    fn typed_field(&self, name: &str, expected: FieldType) -> AppResult<&'static FieldDescriptor> {
        let field = self.field(name)?;
        if field.field_type != expected {
            return Err(AppError::FieldTypeMismatch {
                entity: self.title,
                field: field.name,
                expected: expected.describe(),
            });
        }
        Ok(field)
    }
}

/// The five record types the data layer manages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    User,
    RoomType,
    Room,
    Service,
    ServiceOrder,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::User,
        EntityKind::RoomType,
        EntityKind::Room,
        EntityKind::Service,
        EntityKind::ServiceOrder,
    ];

    /// Resolve a kind name. Case, `_`, `-` and spaces are ignored.
    pub fn parse(name: &str) -> AppResult<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| !matches!(c, '_' | '-') && !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();

        REGISTRY
            .iter()
            .find(|d| d.aliases.contains(&normalized.as_str()))
            .map(|d| d.kind)
            .ok_or_else(|| AppError::UnknownEntity(name.trim().to_string()))
    }

    pub fn descriptor(self) -> &'static EntityDescriptor {
        match self {
            EntityKind::User => &REGISTRY[0],
            EntityKind::RoomType => &REGISTRY[1],
            EntityKind::Room => &REGISTRY[2],
            EntityKind::Service => &REGISTRY[3],
            EntityKind::ServiceOrder => &REGISTRY[4],
        }
    }

    /// Canonical shell name
    pub fn name(self) -> &'static str {
        self.descriptor().aliases[0]
    }

    pub fn title(self) -> &'static str {
        self.descriptor().title
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for EntityKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::parse(s)
    }
}

use FieldType::{Integer, Text, Timestamp};

static USER_FIELDS: [FieldDescriptor; 3] = [
    FieldDescriptor::new("user_id", "User ID", Integer).key(),
    FieldDescriptor::new("name", "Name", Text),
    FieldDescriptor::new("phone_number", "Phone Number", Text),
];

static ROOM_TYPE_FIELDS: [FieldDescriptor; 3] = [
    FieldDescriptor::new("room_type_id", "Room Type ID", Integer).key(),
    FieldDescriptor::new("label", "Type Name", Text),
    FieldDescriptor::new("base_price", "Price", Integer).nullable(),
];

static ROOM_FIELDS: [FieldDescriptor; 6] = [
    FieldDescriptor::new("room_id", "Room ID", Integer).key(),
    FieldDescriptor::new("room_number", "Room Number", Integer),
    FieldDescriptor::new("room_type_id", "Room Type ID", Integer),
    FieldDescriptor::new("user_id", "User ID", Integer).nullable(),
    FieldDescriptor::new("check_in", "Check-in Date", Timestamp).nullable(),
    FieldDescriptor::new("check_out", "Check-out Date", Timestamp).nullable(),
];

static SERVICE_FIELDS: [FieldDescriptor; 3] = [
    FieldDescriptor::new("service_id", "Service ID", Integer).key(),
    FieldDescriptor::new("name", "Service Name", Text),
    FieldDescriptor::new("price", "Price", Integer),
];

static SERVICE_ORDER_FIELDS: [FieldDescriptor; 3] = [
    FieldDescriptor::new("user_id", "User ID", Integer).key().rekeyable(),
    FieldDescriptor::new("service_id", "Service ID", Integer).key().rekeyable(),
    FieldDescriptor::new("ordered_at", "Date", Timestamp).key().rekeyable(),
];

/// Indexed by `EntityKind` declaration order; the first alias is the
/// canonical name.
pub static REGISTRY: [EntityDescriptor; 5] = [
    EntityDescriptor {
        kind: EntityKind::User,
        table: "users",
        title: "User",
        fields: &USER_FIELDS,
        aliases: &["user", "users", "guest", "guests"],
    },
    EntityDescriptor {
        kind: EntityKind::RoomType,
        table: "room_types",
        title: "Room type",
        fields: &ROOM_TYPE_FIELDS,
        aliases: &["roomtype", "roomtypes"],
    },
    EntityDescriptor {
        kind: EntityKind::Room,
        table: "rooms",
        title: "Room",
        fields: &ROOM_FIELDS,
        aliases: &["room", "rooms"],
    },
    EntityDescriptor {
        kind: EntityKind::Service,
        table: "services",
        title: "Service",
        fields: &SERVICE_FIELDS,
        aliases: &["service", "services"],
    },
    EntityDescriptor {
        kind: EntityKind::ServiceOrder,
        table: "service_orders",
        title: "Service order",
        fields: &SERVICE_ORDER_FIELDS,
        aliases: &[
            "orderingservice",
            "orderingservices",
            "serviceorder",
            "serviceorders",
            "order",
            "orders",
        ],
    },
];
