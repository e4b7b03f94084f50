//! Error types for the resource engine.
//!
//! Per-field validation failures are not here: they are ordinary values
//! (see [`crate::Validation`]) so a caller can render many at once.

use crate::path::FieldPath;
use thiserror::Error;

/// Result type for engine operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Any error the engine can surface.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error(transparent)]
    SchemaDecode(#[from] SchemaDecodeError),

    #[error(transparent)]
    InvalidResourceData(#[from] InvalidResourceData),

    #[error(transparent)]
    MetadataConsistency(#[from] MetadataConsistencyError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

/// A type-definition document could not be turned into a resource type.
#[derive(Debug, Error)]
pub enum SchemaDecodeError {
    #[error("malformed type definition: {0}")]
    Json(#[from] serde_json::Error),

    #[error("type definition has no '{0}' schema")]
    MissingContainer(&'static str),

    #[error("unsupported field description for '{field}': {reason}")]
    UnsupportedField { field: String, reason: String },

    #[error("field '{0}' is declared more than once")]
    DuplicateField(String),
}

/// A caller addressed a field the record's type does not declare, or wrote
/// a value whose shape disagrees with the declaration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidResourceData {
    #[error("field '{0}' is not declared by the resource type")]
    UndeclaredField(FieldPath),

    #[error("field '{field}' holds {expected} values, got {actual}")]
    ShapeMismatch {
        field: FieldPath,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("field '{0}' does not hold a one-time password")]
    NotTotp(FieldPath),

    #[error("field '{0}' is encrypted and the secret has not been fetched")]
    SecretNotLoaded(FieldPath),

    #[error("the {0} payload is not a JSON object")]
    PayloadNotObject(&'static str),
}

/// Decoded metadata disagrees with its plaintext shadow or declared type.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MetadataConsistencyError {
    #[error("resource type mismatch: expected {expected}, got {actual}")]
    ResourceTypeMismatch { expected: String, actual: String },

    #[error("object type mismatch: expected {expected}, got {actual:?}")]
    ObjectTypeMismatch {
        expected: &'static str,
        actual: Option<String>,
    },

    #[error("name mismatch: expected {expected:?}, got {actual:?}")]
    NameMismatch { expected: String, actual: String },

    #[error("username mismatch: expected {expected:?}, got {actual:?}")]
    UsernameMismatch {
        expected: Option<String>,
        actual: Option<String>,
    },

    #[error("description mismatch: expected {expected:?}, got {actual:?}")]
    DescriptionMismatch {
        expected: Option<String>,
        actual: Option<String>,
    },

    #[error("name is empty")]
    EmptyName,

    #[error("name is {length} characters long, limit is {max}")]
    NameTooLong { length: usize, max: usize },

    #[error("username is {length} characters long, limit is {max}")]
    UsernameTooLong { length: usize, max: usize },

    #[error("description is {length} characters long, limit is {max}")]
    DescriptionTooLong { length: usize, max: usize },
}
