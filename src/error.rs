//! # Error Types
//!
//! This module defines error types used throughout the etiqueta library.

use thiserror::Error;

/// Main error type for etiqueta operations
#[derive(Debug, Error)]
pub enum LabelError {
    /// Unknown template key requested
    #[error("Unknown template '{requested}'. Available templates: {available}")]
    TemplateNotFound {
        requested: String,
        available: String,
    },

    /// Invalid identifier pattern configuration
    #[error("Invalid identifier pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Drawing or encoding step could not produce a surface
    #[error("Render error: {0}")]
    Render(String),

    /// Font could not be resolved or loaded
    #[error("Font error: {0}")]
    Font(String),

    /// Homebox API error (connection, auth, payload)
    #[error("Homebox API error: {0}")]
    Api(String),

    /// Invalid configuration or CLI input
    #[error("Config error: {0}")]
    Config(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
