use serde::{Deserialize, Serialize};
use std::fmt;

/// Address of a field's value inside a record.
///
/// Derived from the field name alone, so two decodes of the same name always
/// address the same slot. Well-known names get their own variant; anything
/// else is carried as `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldPath {
    Name,
    Uri,
    Uris,
    Username,
    Password,
    Description,
    Totp,
    /// The legacy, unstructured secret.
    Secret,
    Custom(String),
}

impl FieldPath {
    pub fn from_name(name: &str) -> Self {
        match name {
            "name" => Self::Name,
            "uri" => Self::Uri,
            "uris" => Self::Uris,
            "username" => Self::Username,
            "password" => Self::Password,
            "description" => Self::Description,
            "totp" => Self::Totp,
            "secret" => Self::Secret,
            other => Self::Custom(other.to_string()),
        }
    }

    /// The JSON key this path addresses.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Name => "name",
            Self::Uri => "uri",
            Self::Uris => "uris",
            Self::Username => "username",
            Self::Password => "password",
            Self::Description => "description",
            Self::Totp => "totp",
            Self::Secret => "secret",
            Self::Custom(name) => name,
        }
    }

    /// Position in the canonical display order. Lower sorts first; every
    /// path without a fixed slot shares the last rank.
    pub fn display_rank(&self) -> u8 {
        match self {
            Self::Name => 0,
            Self::Uri | Self::Uris => 1,
            Self::Username => 2,
            Self::Password => 3,
            Self::Description => 4,
            Self::Totp => 5,
            Self::Secret | Self::Custom(_) => 6,
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for FieldPath {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

impl From<String> for FieldPath {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        match path {
            FieldPath::Custom(name) => name,
            known => known.as_str().to_string(),
        }
    }
}
