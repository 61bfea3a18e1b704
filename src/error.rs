//! # Error Types
//!
//! This module defines error types used throughout the labsheet library.

use thiserror::Error;

/// Main error type for labsheet operations
#[derive(Debug, Error)]
pub enum LabsheetError {
    /// Element kind outside the closed set of report element kinds
    #[error("Invalid element kind: '{0}'")]
    InvalidElementKind(String),

    /// Interchange document could not be turned into a template
    #[error("Malformed template: {0}")]
    MalformedTemplate(String),

    /// A rectangle violates the canvas invariants
    #[error("Geometry out of bounds: {0}")]
    OutOfBoundsGeometry(String),

    /// Rejected at the upload boundary (MIME type or size)
    #[error("{0}")]
    UnsupportedUpload(String),

    /// Content field that the element kind does not carry
    #[error("Element kind '{kind}' has no field '{field}'")]
    UnknownField { kind: String, field: String },

    /// Value shape does not match the field (text vs. list)
    #[error("Field '{field}' expects {expected}")]
    FieldType {
        field: String,
        expected: &'static str,
    },

    /// No template or element with the given id
    #[error("Not found: {0}")]
    NotFound(String),

    /// Hand-off slot still holds an unread document
    #[error("Hand-off slot already holds an unread template")]
    HandoffOccupied,

    /// Layout analysis refused or failed
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Raster or markup rendering failure
    #[error("Render error: {0}")]
    Render(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
