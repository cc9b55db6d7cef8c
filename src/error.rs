// src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeometryError {
    /// An input polygon is degenerate or self-intersecting. Raised before any
    /// arrangement work starts.
    #[error("Invalid shape at index {index}: {reason}")]
    InvalidShape { index: usize, reason: String },

    /// The arrangement or face tracing could not close a consistent set of rings.
    #[error("Geometry consistency error: {message}")]
    GeometryConsistency { message: String },

    /// A covering rectangle was requested for an empty shape collection.
    #[error("Cannot bound an empty shape collection")]
    EmptyInput,

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("Encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GeometryError {
    pub fn invalid_shape(index: usize, reason: impl Into<String>) -> Self {
        GeometryError::InvalidShape {
            index,
            reason: reason.into(),
        }
    }

    pub fn consistency(message: impl Into<String>) -> Self {
        GeometryError::GeometryConsistency {
            message: message.into(),
        }
    }

    pub fn invalid_config(reason: impl Into<String>) -> Self {
        GeometryError::InvalidConfig {
            reason: reason.into(),
        }
    }

    pub fn is_invalid_shape(&self) -> bool {
        matches!(self, GeometryError::InvalidShape { .. })
    }

    pub fn is_consistency_error(&self) -> bool {
        matches!(self, GeometryError::GeometryConsistency { .. })
    }
}

pub type Result<T> = std::result::Result<T, GeometryError>;
