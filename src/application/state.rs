// src/application/state.rs

use std::sync::Arc;

use crate::services::HotelService;

/// How command results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Shared state for command handlers.
/// Services are built in main.rs and passed here.
pub struct AppState {
    pub hotel_service: Arc<HotelService>,
    pub format: OutputFormat,
}

impl AppState {
    pub fn new(hotel_service: Arc<HotelService>, format: OutputFormat) -> Self {
        Self {
            hotel_service,
            format,
        }
    }
}
