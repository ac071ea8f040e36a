//! Error types for the shape interchange layer

use roisync_geometry::ShapeKind;
use thiserror::Error;

/// Failure to turn one remote record into a shape
#[derive(Error, Debug)]
pub enum ShapeError {
    /// The record is not a JSON object
    #[error("shape JSON is not an object: {0}")]
    NotAnObject(String),

    /// The `@type` discriminator is absent or not a string
    #[error("'@type' attribute not found in shape JSON")]
    MissingType,

    /// The `@type` discriminator names no supported kind
    #[error("unrecognized shape type {0}")]
    UnrecognizedType(String),

    /// A required field of the kind is missing or has the wrong type
    #[error("malformed {kind} shape: {source}")]
    Malformed {
        kind: ShapeKind,
        #[source]
        source: serde_json::Error,
    },

    /// A ROI container lacks its id or its shape list
    #[error("malformed ROI: {0}")]
    MalformedRoi(String),
}

/// A classification path that could not be written into the packed text field
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassificationError {
    #[error("class names may not be empty")]
    EmptyName,

    #[error("class name {0:?} contains a reserved delimiter")]
    ReservedDelimiter(String),

    #[error("a lone class named {0:?} is indistinguishable from no classification")]
    ReservedName(String),
}

/// Result type for shape decoding
pub type Result<T> = std::result::Result<T, ShapeError>;
