// src/lib.rs
// HotelDB - data access layer and shell for a small hotel database
//
// Architecture:
// - Registry-driven: every entity kind, field and key is declared once, statically
// - Scoped sessions: each operation owns its connection and transaction
// - Explicit: names from the shell are resolved, never reflected
// - Application Layer: line-oriented shell on top of the services

// ============================================================================
// DATA ACCESS LAYER
// ============================================================================

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod repositories;
pub mod services;

// ============================================================================
// APPLICATION LAYER
// ============================================================================

pub mod application;

// ============================================================================
// PUBLIC API - Domain
// ============================================================================

pub use domain::{
    Entity,
    EntityDescriptor,
    EntityKind,
    FieldDescriptor,
    FieldType,
    FieldUpdate,
    FieldValue,
    Record,
    RecordKey,
    // Entities
    Room,
    RoomType,
    Service,
    ServiceOrder,
    User,
    REGISTRY,
};

// ============================================================================
// PUBLIC API - Error Types
// ============================================================================

pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Configuration & Database
// ============================================================================

pub use config::{DatabaseConfig, DatabaseLocation, Overrides};
pub use db::{create_connection_pool, initialize_database, ConnectionPool, DatabaseStats};

// ============================================================================
// PUBLIC API - Repositories
// ============================================================================

pub use repositories::{EntityRepository, SqliteRepository};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{DeleteOutcome, GenerationService, HotelService};

// ============================================================================
// PUBLIC API - Application Layer
// ============================================================================

pub use application::{AppState, Command, OutputFormat};
