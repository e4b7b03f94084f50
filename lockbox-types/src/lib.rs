//! Identifier types for Lockbox.
//!
//! This crate defines the small set of identifiers shared by every layer
//! that touches password-manager resources:
//! - Resource identifiers (server-assigned, absent until first sync)
//! - Resource type identifiers (one per server-side schema)
//! - Custom field identifiers (stable across the metadata/secret split)
//!
//! Field schemas, records, and validation live in `lockbox-model`.

mod ids;

pub use ids::{CustomFieldId, ResourceId, ResourceTypeId};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),
}
