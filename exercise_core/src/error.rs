//! Error types for the exercise_core library.

use std::fmt;
use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// A single failed field check
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Error for a required field that was missing or empty
    pub fn required(field: &str) -> Self {
        Self::new(field, format!("Path `{}` is required.", field))
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Core error type for exercise_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// One or more fields failed validation. Displays the first message.
    #[error("{}", first_message(.0))]
    Validation(Vec<FieldError>),

    /// No record with the given id
    #[error("unknown userId: {0}")]
    NotFound(String),

    /// Identifier could not be parsed
    #[error("invalid userId: {0}")]
    InvalidId(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// The first field-level error, if this is a validation error
    pub fn first_field_error(&self) -> Option<&FieldError> {
        match self {
            Error::Validation(errors) => errors.first(),
            _ => None,
        }
    }
}

fn first_message(errors: &[FieldError]) -> &str {
    errors
        .first()
        .map(|e| e.message.as_str())
        .unwrap_or("Validation failed")
}
