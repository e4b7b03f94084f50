use crate::content::FieldContent;
use crate::path::FieldPath;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// A named field of a resource type.
///
/// Identity is the field's path only. Content is fixed once decoded, and
/// keying on the path keeps sets of fields consistent even when two decodes
/// of the same name disagree on content.
#[derive(Debug, Clone)]
pub struct FieldSpecification {
    name: String,
    path: FieldPath,
    content: FieldContent,
}

impl FieldSpecification {
    pub fn new(name: impl Into<String>, content: FieldContent) -> Self {
        let name = name.into();
        let path = FieldPath::from_name(&name);
        Self {
            name,
            path,
            content,
        }
    }

    /// The synthetic field standing in for a secret without a schema.
    pub fn unstructured_secret() -> Self {
        Self::new(
            "secret",
            FieldContent::String {
                encrypted: true,
                required: true,
                min_length: None,
                max_length: None,
            },
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    pub fn content(&self) -> &FieldContent {
        &self.content
    }

    pub fn encrypted(&self) -> bool {
        self.content.encrypted()
    }

    pub fn required(&self) -> bool {
        self.content.required()
    }

    /// Canonical display order: name, uri, username, password, description,
    /// totp, then everything else. Fields sharing the last rank compare
    /// equal, so a stable sort keeps their declaration order.
    pub fn display_cmp(&self, other: &Self) -> Ordering {
        self.path.display_rank().cmp(&other.path.display_rank())
    }
}

impl PartialEq for FieldSpecification {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for FieldSpecification {}

impl Hash for FieldSpecification {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}
