//! # Error Types
//!
//! Custom error types for Virtual Joy using `thiserror`.

use thiserror::Error;

/// Main error type for Virtual Joy
#[derive(Debug, Error)]
pub enum VirtualJoyError {
    /// Stick range must be a positive, finite number
    #[error("Invalid configuration: range must be positive, got {0}")]
    InvalidRange(f64),

    /// Configuration validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration parse errors
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Malformed UI event lines
    #[error("Event decode error: {0}")]
    Event(#[from] serde_json::Error),

    /// Message transport errors
    #[error("Publish error: {0}")]
    Publish(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Virtual Joy
pub type Result<T> = std::result::Result<T, VirtualJoyError>;
