// src/domain/mod.rs
//
// Domain Root
//
// Declares the five hotel entities, the static registry that maps kind
// names to descriptors, and the kind-erased record/key/update types used
// at the by-name boundary. All other modules import from `crate::domain`.

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod entity;
pub mod record;
pub mod registry;
pub mod room;
pub mod room_type;
pub mod service;
pub mod service_order;
pub mod update;
pub mod user;
pub mod value;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

pub use entity::{Entity, FieldCursor};
pub use record::{Record, RecordKey};
pub use registry::{EntityDescriptor, EntityKind, FieldDescriptor, FieldType, REGISTRY};
pub use update::FieldUpdate;
pub use value::FieldValue;

// Entities
pub use room::{Room, RoomUpdate};
pub use room_type::{RoomType, RoomTypeUpdate};
pub use service::{Service, ServiceUpdate};
pub use service_order::{ServiceOrder, ServiceOrderUpdate};
pub use user::{User, UserUpdate};
