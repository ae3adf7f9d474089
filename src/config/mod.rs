//! Configuration Module
//!
//! Handles application configuration loading, validation, and management.

mod types;

pub use types::{Config, LoggingConfig, ServerConfig, SpeechConfig, kartuli_home};
