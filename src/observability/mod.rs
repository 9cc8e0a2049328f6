//! # Observability
//!
//! Structured logging for server events.

pub mod logger;

pub use logger::{Logger, Severity};
