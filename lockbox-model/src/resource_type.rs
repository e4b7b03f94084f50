use crate::error::SchemaDecodeError;
use crate::field::FieldSpecification;
use crate::path::FieldPath;
use lockbox_types::ResourceTypeId;
use std::collections::HashSet;

/// The field schema of one kind of resource, as published by the server.
///
/// Fields are kept in canonical display order. Equality compares the field
/// sets only; id, slug and display name are labels.
#[derive(Debug, Clone)]
pub struct ResourceType {
    id: ResourceTypeId,
    slug: String,
    display_name: String,
    fields: Vec<FieldSpecification>,
}

impl ResourceType {
    /// Builds a resource type, sorting fields into display order.
    ///
    /// Fails if two fields resolve to the same path.
    pub fn new(
        id: ResourceTypeId,
        slug: impl Into<String>,
        display_name: impl Into<String>,
        mut fields: Vec<FieldSpecification>,
    ) -> Result<Self, SchemaDecodeError> {
        let mut seen = HashSet::with_capacity(fields.len());
        for field in &fields {
            if !seen.insert(field.path()) {
                return Err(SchemaDecodeError::DuplicateField(field.name().to_string()));
            }
        }
        fields.sort_by(FieldSpecification::display_cmp);

        Ok(Self {
            id,
            slug: slug.into(),
            display_name: display_name.into(),
            fields,
        })
    }

    pub fn id(&self) -> ResourceTypeId {
        self.id
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn fields(&self) -> &[FieldSpecification] {
        &self.fields
    }

    pub fn field(&self, path: &FieldPath) -> Option<&FieldSpecification> {
        self.fields.iter().find(|field| field.path() == path)
    }

    pub fn contains(&self, path: &FieldPath) -> bool {
        self.field(path).is_some()
    }

    /// Plaintext fields, in display order.
    pub fn meta_fields(&self) -> impl Iterator<Item = &FieldSpecification> {
        self.fields.iter().filter(|field| !field.encrypted())
    }

    /// Encrypted fields, in display order.
    pub fn secret_fields(&self) -> impl Iterator<Item = &FieldSpecification> {
        self.fields.iter().filter(|field| field.encrypted())
    }

    pub fn has_totp(&self) -> bool {
        self.contains(&FieldPath::Totp)
    }

    pub fn has_password(&self) -> bool {
        self.contains(&FieldPath::Password)
    }

    /// Types introduced with encrypted metadata carry a `v5-` slug prefix.
    pub fn is_v5(&self) -> bool {
        self.slug.starts_with("v5-")
    }
}

impl PartialEq for ResourceType {
    fn eq(&self, other: &Self) -> bool {
        self.fields.len() == other.fields.len()
            && self.fields.iter().all(|field| other.contains(field.path()))
    }
}

impl Eq for ResourceType {}
