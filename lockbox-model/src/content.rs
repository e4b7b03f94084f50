use serde::{Deserialize, Serialize};

/// The shape of a single resource field and its static constraints.
///
/// Matched exhaustively by the validator; adding a variant must fail to
/// compile until every consumer handles it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldContent {
    /// Plain text, optionally bounded in length (counted in characters).
    String {
        encrypted: bool,
        required: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_length: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_length: Option<usize>,
    },
    /// Structured one-time-password secret. Always lives in the secret.
    Totp { required: bool },
    /// A field this engine does not interpret, carried through untouched.
    Unknown { encrypted: bool, required: bool },
}

impl FieldContent {
    /// Whether the field lives in the encrypted secret payload.
    pub fn encrypted(&self) -> bool {
        match self {
            Self::String { encrypted, .. } | Self::Unknown { encrypted, .. } => *encrypted,
            Self::Totp { .. } => true,
        }
    }

    pub fn required(&self) -> bool {
        match self {
            Self::String { required, .. }
            | Self::Totp { required }
            | Self::Unknown { required, .. } => *required,
        }
    }

    pub fn min_length(&self) -> Option<usize> {
        match self {
            Self::String { min_length, .. } => *min_length,
            Self::Totp { .. } | Self::Unknown { .. } => None,
        }
    }

    pub fn max_length(&self) -> Option<usize> {
        match self {
            Self::String { max_length, .. } => *max_length,
            Self::Totp { .. } | Self::Unknown { .. } => None,
        }
    }

    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::String { .. } => "string",
            Self::Totp { .. } => "totp",
            Self::Unknown { .. } => "unknown",
        }
    }
}
