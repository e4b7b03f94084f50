//! Resource metadata documents and their consistency check.
//!
//! Metadata arrives as its own JSON document (decrypted separately when the
//! server encrypts metadata). Before a record built from it is trusted, the
//! document is compared with the plaintext copy the server also sends and
//! with the type the record was declared with.

use crate::error::{MetadataConsistencyError, ModelResult};
use crate::fragment::CustomFieldFragment;
use lockbox_types::ResourceTypeId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Object type tag every resource metadata document must carry.
pub const RESOURCE_METADATA_OBJECT_TYPE: &str = "PASSBOLT_RESOURCE_METADATA";

pub const MAX_NAME_LENGTH: usize = 255;
pub const MAX_USERNAME_LENGTH: usize = 255;
pub const MAX_DESCRIPTION_LENGTH: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
    #[serde(default)]
    pub resource_type_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub uris: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_fields: Vec<CustomFieldFragment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Icon {
    #[serde(rename = "type")]
    pub icon_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

/// The independently held plaintext copy a metadata document must agree with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataShadow {
    pub resource_type_id: ResourceTypeId,
    pub name: String,
    pub username: Option<String>,
    pub description: Option<String>,
}

impl ResourceMetadata {
    pub fn from_json(bytes: &[u8]) -> ModelResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn from_value(document: Value) -> ModelResult<Self> {
        Ok(serde_json::from_value(document)?)
    }

    /// Decodes a document and accepts it only if it is consistent with
    /// `shadow`.
    pub fn decode_checked(document: Value, shadow: &MetadataShadow) -> ModelResult<Self> {
        let metadata = Self::from_value(document)?;
        metadata.check_consistency(shadow)?;
        Ok(metadata)
    }

    /// The document as a record's `meta` payload.
    pub fn to_value(&self) -> ModelResult<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Runs every consistency check and reports the first failure.
    pub fn check_consistency(&self, shadow: &MetadataShadow) -> Result<(), MetadataConsistencyError> {
        let result = self.first_inconsistency(shadow);
        if let Err(e) = &result {
            warn!("Metadata failed consistency check: {e}");
        }
        result
    }

    fn first_inconsistency(&self, shadow: &MetadataShadow) -> Result<(), MetadataConsistencyError> {
        if !shadow.resource_type_id.matches_str(&self.resource_type_id) {
            return Err(MetadataConsistencyError::ResourceTypeMismatch {
                expected: shadow.resource_type_id.to_string(),
                actual: self.resource_type_id.clone(),
            });
        }
        if self.object_type.as_deref() != Some(RESOURCE_METADATA_OBJECT_TYPE) {
            return Err(MetadataConsistencyError::ObjectTypeMismatch {
                expected: RESOURCE_METADATA_OBJECT_TYPE,
                actual: self.object_type.clone(),
            });
        }

        let name_length = self.name.chars().count();
        if name_length == 0 {
            return Err(MetadataConsistencyError::EmptyName);
        }
        if name_length > MAX_NAME_LENGTH {
            return Err(MetadataConsistencyError::NameTooLong {
                length: name_length,
                max: MAX_NAME_LENGTH,
            });
        }
        if let Some(length) = char_count_over(self.username.as_deref(), MAX_USERNAME_LENGTH) {
            return Err(MetadataConsistencyError::UsernameTooLong {
                length,
                max: MAX_USERNAME_LENGTH,
            });
        }
        if let Some(length) = char_count_over(self.description.as_deref(), MAX_DESCRIPTION_LENGTH) {
            return Err(MetadataConsistencyError::DescriptionTooLong {
                length,
                max: MAX_DESCRIPTION_LENGTH,
            });
        }

        if self.name != shadow.name {
            return Err(MetadataConsistencyError::NameMismatch {
                expected: shadow.name.clone(),
                actual: self.name.clone(),
            });
        }
        if self.username != shadow.username {
            return Err(MetadataConsistencyError::UsernameMismatch {
                expected: shadow.username.clone(),
                actual: self.username.clone(),
            });
        }
        if self.description != shadow.description {
            return Err(MetadataConsistencyError::DescriptionMismatch {
                expected: shadow.description.clone(),
                actual: self.description.clone(),
            });
        }
        Ok(())
    }
}

fn char_count_over(text: Option<&str>, max: usize) -> Option<usize> {
    text.map(|text| text.chars().count())
        .filter(|length| *length > max)
}
