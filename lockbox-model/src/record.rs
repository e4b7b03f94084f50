//! The runtime resource entity.
//!
//! A [`Record`] pairs a [`ResourceType`] with two JSON payloads: `meta`
//! (plaintext) and `secret` (decrypted secret). Each declared field lives in
//! exactly one of them. The secret is usually fetched later than the
//! metadata, and possibly never; until it is, encrypted fields read as
//! [`FieldValue::Encrypted`].
//!
//! Lookup tables derived from the type are built once per type by
//! `rebuild_caches`, which runs on construction and in [`Record::with_type`].
//! A record is not internally synchronized; callers sharing one across tasks
//! must hold exclusive access across a read-modify-write.

use crate::config::{EngineConfig, ValidationConfig};
use crate::content::FieldContent;
use crate::error::{InvalidResourceData, ModelResult};
use crate::path::FieldPath;
use crate::resource_type::ResourceType;
use crate::validation::{validate_totp_attribute, Validation, ValidationError, Validator};
use crate::value::{FieldValue, Totp, TotpAttribute, TotpAttributeValue};
use lockbox_types::ResourceId;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::{debug, trace};

#[derive(Clone)]
pub struct Record {
    id: Option<ResourceId>,
    resource_type: ResourceType,
    meta: Value,
    secret: Value,
    config: ValidationConfig,
    contents: HashMap<FieldPath, FieldContent>,
    meta_paths: HashSet<FieldPath>,
    secret_paths: HashSet<FieldPath>,
    validators: HashMap<FieldPath, Validator>,
}

impl Record {
    /// A fresh, not yet persisted record with empty payloads.
    pub fn new(resource_type: ResourceType) -> Self {
        Self::with_config(resource_type, &EngineConfig::default())
    }

    /// A fresh record whose validators follow `config`.
    pub fn with_config(resource_type: ResourceType, config: &EngineConfig) -> Self {
        Self::build(
            None,
            resource_type,
            Value::Object(Map::new()),
            Value::Object(Map::new()),
            config.validation.clone(),
        )
    }

    /// A stored record whose metadata has been decoded. The secret is not
    /// fetched yet; supply it later with [`Record::set_secret_payload`].
    pub fn loaded(id: ResourceId, resource_type: ResourceType, meta: Value) -> Self {
        Self::loaded_with_config(id, resource_type, meta, &EngineConfig::default())
    }

    /// A stored record whose validators follow `config`.
    pub fn loaded_with_config(
        id: ResourceId,
        resource_type: ResourceType,
        meta: Value,
        config: &EngineConfig,
    ) -> Self {
        Self::build(
            Some(id),
            resource_type,
            meta,
            Value::Null,
            config.validation.clone(),
        )
    }

    fn build(
        id: Option<ResourceId>,
        resource_type: ResourceType,
        meta: Value,
        secret: Value,
        config: ValidationConfig,
    ) -> Self {
        let mut record = Self {
            id,
            resource_type,
            meta,
            secret,
            config,
            contents: HashMap::new(),
            meta_paths: HashSet::new(),
            secret_paths: HashSet::new(),
            validators: HashMap::new(),
        };
        record.rebuild_caches();
        record
    }

    /// Replaces the validation settings and recompiles validators.
    #[must_use]
    pub fn with_validation_config(mut self, config: ValidationConfig) -> Self {
        self.config = config;
        self.rebuild_caches();
        self
    }

    /// Returns this record reinterpreted under another type. Payloads are
    /// kept as they are; every derived table is rebuilt.
    #[must_use]
    pub fn with_type(mut self, resource_type: ResourceType) -> Self {
        self.resource_type = resource_type;
        self.rebuild_caches();
        self
    }

    #[must_use]
    pub fn with_id(mut self, id: ResourceId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn with_secret(mut self, secret: Value) -> Self {
        self.set_secret_payload(secret);
        self
    }

    /// Installs a freshly decrypted secret payload.
    pub fn set_secret_payload(&mut self, secret: Value) {
        self.secret = secret;
    }

    /// Drops the decrypted secret, returning encrypted fields to the
    /// not-fetched state.
    pub fn clear_secret(&mut self) {
        self.secret = Value::Null;
    }

    fn rebuild_caches(&mut self) {
        let fields = self.resource_type.fields();
        let mut contents = HashMap::with_capacity(fields.len());
        let mut meta_paths = HashSet::new();
        let mut secret_paths = HashSet::new();
        let mut validators = HashMap::with_capacity(fields.len());

        for field in fields {
            let path = field.path().clone();
            if field.encrypted() {
                secret_paths.insert(path.clone());
            } else {
                meta_paths.insert(path.clone());
            }
            validators.insert(
                path.clone(),
                Validator::compile(path.clone(), field.content(), &self.config),
            );
            contents.insert(path, *field.content());
        }

        debug!(
            "Rebuilt field tables for type {} ({} meta, {} secret)",
            self.resource_type.slug(),
            meta_paths.len(),
            secret_paths.len()
        );
        self.contents = contents;
        self.meta_paths = meta_paths;
        self.secret_paths = secret_paths;
        self.validators = validators;
    }

    // ── Accessors ───────────────────────────────────────────────────

    pub fn id(&self) -> Option<ResourceId> {
        self.id
    }

    /// Whether the record has never been stored on the server.
    pub fn is_local(&self) -> bool {
        self.id.is_none()
    }

    pub fn resource_type(&self) -> &ResourceType {
        &self.resource_type
    }

    pub fn meta(&self) -> &Value {
        &self.meta
    }

    pub fn secret(&self) -> &Value {
        &self.secret
    }

    pub fn is_secret_loaded(&self) -> bool {
        !self.secret.is_null()
    }

    pub fn meta_paths(&self) -> &HashSet<FieldPath> {
        &self.meta_paths
    }

    pub fn secret_paths(&self) -> &HashSet<FieldPath> {
        &self.secret_paths
    }

    pub fn validator(&self, path: &FieldPath) -> Option<&Validator> {
        self.validators.get(path)
    }

    /// True when the type has no secret schema and the secret is a single
    /// opaque string.
    pub fn has_unstructured_secret(&self) -> bool {
        self.secret_paths.len() == 1 && self.secret_paths.contains(&FieldPath::Secret)
    }

    // ── Field access ────────────────────────────────────────────────

    /// Reads a field. Undeclared paths and missing plaintext values read as
    /// the null sentinel; an encrypted field with no value in the secret
    /// payload, fetched or not, reads as [`FieldValue::Encrypted`].
    pub fn value(&self, path: &FieldPath) -> FieldValue {
        let Some(content) = self.contents.get(path) else {
            return FieldValue::null();
        };
        match self.raw_value(path) {
            Some(raw) => FieldValue::from_json(raw, content),
            None if self.secret_paths.contains(path) => FieldValue::Encrypted,
            None => FieldValue::null(),
        }
    }

    fn raw_value(&self, path: &FieldPath) -> Option<&Value> {
        if self.secret_paths.contains(path) {
            if self.is_unstructured_payload(path) {
                return Some(&self.secret);
            }
            self.secret.get(path.as_str())
        } else {
            self.meta.get(path.as_str())
        }
    }

    fn is_unstructured_payload(&self, path: &FieldPath) -> bool {
        *path == FieldPath::Secret && self.has_unstructured_secret() && self.secret.is_string()
    }

    /// Writes a field and returns the verdict for the new value.
    ///
    /// The value is stored even when invalid. Fails only when the path is
    /// not declared or the value's shape does not fit the field; writing the
    /// null sentinel clears the field.
    pub fn set(&mut self, path: &FieldPath, value: FieldValue) -> ModelResult<Validation> {
        let content = self
            .contents
            .get(path)
            .ok_or_else(|| InvalidResourceData::UndeclaredField(path.clone()))?;
        check_shape(path, content, &value)?;

        let verdict = self.validate_value(path, &value);
        self.write(path, value)?;
        trace!("Set field {} (valid={})", path, verdict.is_valid());
        Ok(verdict)
    }

    /// Reads one attribute of a one-time-password field.
    pub fn totp_attribute(
        &self,
        path: &FieldPath,
        attribute: TotpAttribute,
    ) -> Result<TotpAttributeValue, InvalidResourceData> {
        Ok(self.current_totp(path)?.get(attribute))
    }

    /// Replaces one attribute of a one-time-password field. The field must
    /// already hold a one-time password; the verdict covers only the
    /// attribute written.
    pub fn set_totp_attribute(
        &mut self,
        path: &FieldPath,
        value: TotpAttributeValue,
    ) -> ModelResult<Validation> {
        let updated = self.current_totp(path)?.with(value.clone());
        let verdict = validate_totp_attribute(path, &value);
        self.write(path, FieldValue::Totp(updated))?;
        trace!(
            "Set {:?} of field {} (valid={})",
            value.attribute(),
            path,
            verdict.is_valid()
        );
        Ok(verdict)
    }

    fn current_totp(&self, path: &FieldPath) -> Result<Totp, InvalidResourceData> {
        if !self.contents.contains_key(path) {
            return Err(InvalidResourceData::UndeclaredField(path.clone()));
        }
        match self.value(path) {
            FieldValue::Totp(totp) => Ok(totp),
            _ => Err(InvalidResourceData::NotTotp(path.clone())),
        }
    }

    fn write(&mut self, path: &FieldPath, value: FieldValue) -> ModelResult<()> {
        let encrypted = self.secret_paths.contains(path);
        if encrypted && !self.is_secret_loaded() {
            return Err(InvalidResourceData::SecretNotLoaded(path.clone()).into());
        }

        if encrypted && *path == FieldPath::Secret && self.has_unstructured_secret() {
            self.secret = match value {
                FieldValue::String(secret) => Value::String(secret),
                _ => Value::Object(Map::new()),
            };
            return Ok(());
        }

        let raw = match value {
            FieldValue::String(value) => Some(Value::String(value)),
            FieldValue::Totp(totp) => Some(serde_json::to_value(totp)?),
            FieldValue::Unknown(Value::Null) | FieldValue::Encrypted => None,
            FieldValue::Unknown(raw) => Some(raw),
        };

        let (payload, label) = if encrypted {
            (&mut self.secret, "secret")
        } else {
            (&mut self.meta, "meta")
        };
        if payload.is_null() {
            // Only a missing meta payload gets here.
            *payload = Value::Object(Map::new());
        }
        let object = payload
            .as_object_mut()
            .ok_or(InvalidResourceData::PayloadNotObject(label))?;
        match raw {
            Some(raw) => {
                object.insert(path.as_str().to_string(), raw);
            }
            None => {
                object.remove(path.as_str());
            }
        }
        Ok(())
    }

    // ── Validation ──────────────────────────────────────────────────

    fn validate_value(&self, path: &FieldPath, value: &FieldValue) -> Validation {
        self.validators
            .get(path)
            .map_or(Validation::Valid, |validator| validator.validate(value))
    }

    /// The value a field is judged by. Once the secret is fetched, a secret
    /// field it does not contain is absent rather than not yet decrypted.
    fn judged_value(&self, path: &FieldPath) -> FieldValue {
        match self.value(path) {
            FieldValue::Encrypted if self.is_secret_loaded() => FieldValue::null(),
            value => value,
        }
    }

    /// Validates one field's current value.
    pub fn validate_field(&self, path: &FieldPath) -> Result<Validation, InvalidResourceData> {
        if !self.contents.contains_key(path) {
            return Err(InvalidResourceData::UndeclaredField(path.clone()));
        }
        Ok(self.validate_value(path, &self.judged_value(path)))
    }

    /// Validates every field in display order and reports the first failure.
    pub fn validate(&self) -> Validation {
        self.resource_type
            .fields()
            .iter()
            .map(|field| self.validate_value(field.path(), &self.judged_value(field.path())))
            .find(|verdict| !verdict.is_valid())
            .unwrap_or(Validation::Valid)
    }

    /// Validates every field and collects all failures, in display order.
    pub fn validate_all(&self) -> Vec<ValidationError> {
        self.resource_type
            .fields()
            .iter()
            .filter_map(|field| {
                self.validate_value(field.path(), &self.judged_value(field.path()))
                    .into_result()
                    .err()
            })
            .collect()
    }
}

fn check_shape(
    path: &FieldPath,
    content: &FieldContent,
    value: &FieldValue,
) -> Result<(), InvalidResourceData> {
    match (content, value) {
        (_, FieldValue::Unknown(Value::Null))
        | (FieldContent::String { .. }, FieldValue::String(_))
        | (FieldContent::Totp { .. }, FieldValue::Totp(_))
        | (FieldContent::Unknown { .. }, FieldValue::Unknown(_)) => Ok(()),
        _ => Err(InvalidResourceData::ShapeMismatch {
            field: path.clone(),
            expected: content.kind(),
            actual: value.kind(),
        }),
    }
}

// Payloads may hold decrypted secrets; only their shape is printed.
impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("id", &self.id)
            .field("resource_type", &self.resource_type.slug())
            .field("meta_paths", &self.meta_paths)
            .field("secret_paths", &self.secret_paths)
            .field("secret_loaded", &self.is_secret_loaded())
            .finish_non_exhaustive()
    }
}
