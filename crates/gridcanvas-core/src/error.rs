//! Error types for the canvas engine.

use crate::shapes::ShapeId;
use thiserror::Error;

/// Canvas engine errors.
#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
    #[error("Unknown shape: {0}")]
    UnknownShape(ShapeId),
}

/// Result type for canvas operations.
pub type CanvasResult<T> = Result<T, CanvasError>;
