//! Decoding of server-published resource type definitions.
//!
//! A definition carries two JSON-schema-like objects: `resource` for the
//! plaintext fields and `secret` for the encrypted ones. Only the subset of
//! JSON schema servers actually emit is understood: direct `type` strings,
//! `anyOf` with an optional `null` variant, and string length bounds.

use crate::content::FieldContent;
use crate::error::SchemaDecodeError;
use crate::field::FieldSpecification;
use crate::resource_type::ResourceType;
use lockbox_types::ResourceTypeId;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Wire shape of a resource type as served by the API.
#[derive(Debug, Deserialize)]
struct ResourceTypeDocument {
    id: ResourceTypeId,
    slug: String,
    name: String,
    definition: Value,
}

/// Container holding one sub-schema's properties.
#[derive(Debug, Deserialize)]
struct ObjectSchema {
    properties: Map<String, Value>,
    #[serde(default)]
    required: HashSet<String>,
}

/// The parts of a property description the engine reads.
#[derive(Debug, Deserialize)]
struct PropertySchema {
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default, rename = "anyOf")]
    any_of: Option<Vec<PropertySchema>>,
    #[serde(default, rename = "minLength")]
    min_length: Option<usize>,
    #[serde(default, rename = "maxLength")]
    max_length: Option<usize>,
    #[serde(default)]
    minimum: Option<usize>,
    #[serde(default)]
    maximum: Option<usize>,
}

impl ResourceType {
    /// Decodes a resource type from the raw API document.
    pub fn from_json(bytes: &[u8]) -> Result<Self, SchemaDecodeError> {
        Self::from_value(serde_json::from_slice(bytes)?)
    }

    /// Decodes a resource type from an already-parsed API document.
    pub fn from_value(document: Value) -> Result<Self, SchemaDecodeError> {
        let document: ResourceTypeDocument = serde_json::from_value(document)?;
        let fields = decode_fields(&document.definition)?;
        debug!(
            "Decoded resource type {} ({}) with {} fields",
            document.slug,
            document.id,
            fields.len()
        );
        Self::new(document.id, document.slug, document.name, fields)
    }
}

/// Resolves the fields declared by a type definition's `resource` and
/// `secret` schemas, in declaration order (resource first).
///
/// A `secret` entry that is missing, or that declares a non-object `type`,
/// is a legacy definition whose secret is an opaque string: it yields the
/// single [`FieldSpecification::unstructured_secret`] field. Any other
/// `secret` entry must be a well-formed object schema. An object schema with
/// no properties yields no secret fields.
pub fn decode_fields(definition: &Value) -> Result<Vec<FieldSpecification>, SchemaDecodeError> {
    let resource = definition
        .get("resource")
        .ok_or(SchemaDecodeError::MissingContainer("resource"))?;
    let resource = ObjectSchema::deserialize(resource)?;
    let mut fields = resolve_properties(&resource, false)?;

    match definition.get("secret") {
        None => {
            warn!("Type definition has no secret schema, treating secret as unstructured");
            fields.push(FieldSpecification::unstructured_secret());
        }
        Some(secret) if is_legacy_secret(secret) => {
            warn!("Secret schema is not an object schema, treating secret as unstructured");
            fields.push(FieldSpecification::unstructured_secret());
        }
        Some(secret) => {
            let secret = ObjectSchema::deserialize(secret)?;
            fields.extend(resolve_properties(&secret, true)?);
        }
    }

    Ok(fields)
}

/// A secret schema describing a plain value, e.g. `{"type": "string"}`.
fn is_legacy_secret(secret: &Value) -> bool {
    secret
        .get("type")
        .and_then(Value::as_str)
        .is_some_and(|kind| kind != "object")
}

fn resolve_properties(
    schema: &ObjectSchema,
    encrypted: bool,
) -> Result<Vec<FieldSpecification>, SchemaDecodeError> {
    schema
        .properties
        .iter()
        .map(|(name, description)| {
            let property = PropertySchema::deserialize(description).map_err(|e| {
                SchemaDecodeError::UnsupportedField {
                    field: name.clone(),
                    reason: e.to_string(),
                }
            })?;
            resolve_property(name, &property, schema.required.contains(name), encrypted)
        })
        .collect()
}

fn resolve_property(
    name: &str,
    property: &PropertySchema,
    listed_required: bool,
    encrypted: bool,
) -> Result<FieldSpecification, SchemaDecodeError> {
    let (effective, required) = match &property.any_of {
        Some(variants) => {
            let nullable = variants.iter().any(|v| v.kind.as_deref() == Some("null"));
            let string_variant = variants
                .iter()
                .find(|v| v.kind.as_deref() == Some("string"))
                .ok_or_else(|| unsupported(name, "anyOf has no string variant"))?;
            (string_variant, !nullable)
        }
        None => (property, listed_required),
    };

    let content = match effective.kind.as_deref() {
        Some("string") => FieldContent::String {
            encrypted,
            required,
            min_length: effective.min_length.or(effective.minimum),
            max_length: effective.max_length.or(effective.maximum),
        },
        Some("object") if name == "totp" => {
            if !encrypted {
                return Err(unsupported(name, "one-time passwords must be declared as secret"));
            }
            FieldContent::Totp { required }
        }
        Some("object") => return Err(unsupported(name, "object fields are not supported")),
        Some("array" | "number" | "integer" | "boolean") => {
            FieldContent::Unknown { encrypted, required }
        }
        Some(other) => return Err(unsupported(name, &format!("unknown type '{other}'"))),
        None => return Err(unsupported(name, "no type given")),
    };

    Ok(FieldSpecification::new(name, content))
}

fn unsupported(field: &str, reason: &str) -> SchemaDecodeError {
    SchemaDecodeError::UnsupportedField {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resolve(name: &str, description: Value, required: bool) -> Result<FieldSpecification, SchemaDecodeError> {
        let property = PropertySchema::deserialize(&description).unwrap();
        resolve_property(name, &property, required, false)
    }

    #[test]
    fn minimum_and_maximum_are_fallback_bound_names() {
        let field = resolve("pin", json!({"type": "string", "minimum": 4, "maximum": 8}), true).unwrap();
        assert_eq!(field.content().min_length(), Some(4));
        assert_eq!(field.content().max_length(), Some(8));
    }

    #[test]
    fn length_names_win_over_fallback_names() {
        let field = resolve("pin", json!({"type": "string", "maxLength": 10, "maximum": 8}), true).unwrap();
        assert_eq!(field.content().max_length(), Some(10));
    }

    #[test]
    fn any_of_ignores_enclosing_required_list() {
        let description = json!({"anyOf": [{"type": "string"}, {"type": "null"}]});
        let field = resolve("uri", description, true).unwrap();
        assert!(!field.required());
    }

    #[test]
    fn missing_type_is_rejected() {
        assert!(resolve("pin", json!({"maxLength": 4}), false).is_err());
    }

    #[test]
    fn only_non_object_type_marks_legacy_secret() {
        assert!(is_legacy_secret(&json!({"type": "string", "maxLength": 4096})));
        assert!(!is_legacy_secret(&json!({"type": "object", "properties": {}})));
        assert!(!is_legacy_secret(&json!({"properties": {}, "required": "password"})));
        assert!(!is_legacy_secret(&json!("string")));
    }

    #[test]
    fn plaintext_totp_is_rejected() {
        assert!(resolve("totp", json!({"type": "object"}), false).is_err());
    }
}
