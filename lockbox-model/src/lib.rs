//! Resource schema and validation engine for Lockbox.
//!
//! A password-manager resource has no fixed shape. Its fields are described
//! by a server-published resource type, split between a plaintext `meta`
//! payload and an end-to-end encrypted `secret` payload:
//! - [`ResourceType`]: decoded from a type definition, an ordered set of
//!   [`FieldSpecification`]s
//! - [`Record`]: a resource's two payloads, read and written by [`FieldPath`]
//!   with every write validated
//! - [`Validator`] / [`Validation`]: per-field rules compiled from
//!   [`FieldContent`]
//! - [`CustomFieldFragment`]: halves of custom fields, recombined with
//!   [`combine_fragments`]
//! - [`ResourceMetadata`]: the metadata document and its consistency check
//!
//! Everything here is synchronous and operates on already-decrypted JSON.
//! Fetching, decryption and storage belong to the caller.

mod config;
mod content;
mod error;
mod field;
mod fragment;
mod metadata;
mod path;
mod record;
mod resource_type;
mod schema;
mod validation;
mod value;

pub use config::{DEFAULT_MAX_STRING_LENGTH, EngineConfig, ValidationConfig};
pub use content::FieldContent;
pub use error::{
    InvalidResourceData, MetadataConsistencyError, ModelError, ModelResult, SchemaDecodeError,
};
pub use field::FieldSpecification;
pub use fragment::{
    CustomFieldFragment, CustomFieldType, MAX_CUSTOM_FIELD_KEY_LENGTH,
    MAX_CUSTOM_FIELD_VALUE_LENGTH, combine_fragments,
};
pub use metadata::{
    Icon, MAX_DESCRIPTION_LENGTH, MAX_NAME_LENGTH, MAX_USERNAME_LENGTH, MetadataShadow,
    RESOURCE_METADATA_OBJECT_TYPE, ResourceMetadata,
};
pub use path::FieldPath;
pub use record::Record;
pub use resource_type::ResourceType;
pub use schema::decode_fields;
pub use validation::{
    InvalidReason, TOTP_DIGITS, Validation, ValidationError, Validator, validate_totp_attribute,
};
pub use value::{FieldValue, HashAlgorithm, Totp, TotpAttribute, TotpAttributeValue};
