//! Custom field fragments.
//!
//! A custom field is split across the two payloads: the metadata carries one
//! half of its key/value pair and the secret carries the other, both under
//! the same field id. Fragments are recombined here before they reach a
//! record.

use lockbox_types::CustomFieldId;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Longest accepted custom field key, in characters.
pub const MAX_CUSTOM_FIELD_KEY_LENGTH: usize = 255;
/// Longest accepted custom field value, in characters.
pub const MAX_CUSTOM_FIELD_VALUE_LENGTH: usize = 20_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomFieldType {
    Text,
    Password,
    Boolean,
    Number,
    Uri,
}

/// One half (or, once combined, both halves) of a custom field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFieldFragment {
    pub id: CustomFieldId,
    #[serde(rename = "type")]
    pub field_type: CustomFieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_value: Option<String>,
}

impl CustomFieldFragment {
    /// An empty fragment to be filled by the caller.
    pub fn new(id: CustomFieldId, field_type: CustomFieldType) -> Self {
        Self {
            id,
            field_type,
            metadata_key: None,
            secret_key: None,
            metadata_value: None,
            secret_value: None,
        }
    }

    pub fn key(&self) -> Option<&str> {
        self.metadata_key.as_deref().or(self.secret_key.as_deref())
    }

    pub fn value(&self) -> Option<&str> {
        self.metadata_value.as_deref().or(self.secret_value.as_deref())
    }

    /// Exactly one of the two keys is set and both key and value fit their
    /// length limits.
    pub fn is_valid(&self) -> bool {
        let one_key = self.metadata_key.is_some() != self.secret_key.is_some();
        let key_fits = self
            .key()
            .is_none_or(|key| key.chars().count() <= MAX_CUSTOM_FIELD_KEY_LENGTH);
        let value_fits = self
            .value()
            .is_none_or(|value| value.chars().count() <= MAX_CUSTOM_FIELD_VALUE_LENGTH);
        one_key && key_fits && value_fits
    }

    /// Carries nothing that belongs in the secret.
    pub fn is_metadata_half(&self) -> bool {
        self.secret_key.is_none() && self.secret_value.is_none()
    }

    /// Carries nothing that belongs in the metadata.
    pub fn is_secret_half(&self) -> bool {
        self.metadata_key.is_none() && self.metadata_value.is_none()
    }

    /// Merges two halves of the same custom field.
    ///
    /// Returns `None` when the fragments belong to different fields or types,
    /// or when both supply a key or both supply a value: that is corrupt or
    /// duplicate data and neither side is preferred.
    pub fn combine(&self, other: &Self) -> Option<Self> {
        if self.id != other.id || self.field_type != other.field_type {
            return None;
        }
        if (self.key().is_some() && other.key().is_some())
            || (self.value().is_some() && other.value().is_some())
        {
            return None;
        }

        Some(Self {
            id: self.id,
            field_type: self.field_type,
            metadata_key: self.metadata_key.clone().or_else(|| other.metadata_key.clone()),
            secret_key: self.secret_key.clone().or_else(|| other.secret_key.clone()),
            metadata_value: self
                .metadata_value
                .clone()
                .or_else(|| other.metadata_value.clone()),
            secret_value: self.secret_value.clone().or_else(|| other.secret_value.clone()),
        })
    }
}

/// Folds `incoming` fragments onto `existing`.
///
/// A fragment whose id is already present is combined with it in place;
/// if the pair is ambiguous the existing fragment is kept unchanged. New ids
/// are appended, so order of first appearance is preserved.
pub fn combine_fragments(
    existing: Vec<CustomFieldFragment>,
    incoming: &[CustomFieldFragment],
) -> Vec<CustomFieldFragment> {
    let mut combined = existing;
    for fragment in incoming {
        match combined.iter_mut().find(|current| current.id == fragment.id) {
            Some(current) => match current.combine(fragment) {
                Some(merged) => *current = merged,
                None => warn!(
                    "Ambiguous fragments for custom field {}, keeping prior state",
                    fragment.id
                ),
            },
            None => combined.push(fragment.clone()),
        }
    }
    combined
}
