// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod generation_service;
pub mod hotel_service;
pub mod timing;

#[cfg(test)]
mod hotel_service_tests;

pub use generation_service::GenerationService;
pub use hotel_service::{DeleteOutcome, HotelService};
pub use timing::timed;
