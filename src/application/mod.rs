// src/application/mod.rs
//
// Application Layer
//
// ARCHITECTURE:
// - Sits above the services and never touches SQL
// - Turns shell lines into commands and command results into text
// - Errors are reported per command; the session keeps going

pub mod commands;
pub mod error_handling;
pub mod shell;
pub mod state;
pub mod view;

pub use commands::{execute, Command, CommandOutput};
pub use error_handling::{ErrorResponse, ErrorType};
pub use shell::{respond, run, Reply, PROMPT};
pub use state::{AppState, OutputFormat};
