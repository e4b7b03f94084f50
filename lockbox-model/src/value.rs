use crate::content::FieldContent;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A field's value as read from, or written to, a record.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Totp(Totp),
    /// The field exists in the secret, which has not been fetched.
    Encrypted,
    /// Raw JSON the engine does not interpret. `Unknown(Value::Null)` is
    /// the "no value" sentinel.
    Unknown(Value),
}

impl FieldValue {
    /// The "no value" sentinel.
    pub const fn null() -> Self {
        Self::Unknown(Value::Null)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Unknown(Value::Null))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_totp(&self) -> Option<&Totp> {
        match self {
            Self::Totp(totp) => Some(totp),
            _ => None,
        }
    }

    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Totp(_) => "totp",
            Self::Encrypted => "encrypted",
            Self::Unknown(Value::Null) => "null",
            Self::Unknown(_) => "unknown",
        }
    }

    /// Interprets raw payload JSON according to the field's declared shape.
    /// JSON that does not fit the shape is kept as `Unknown`.
    pub(crate) fn from_json(raw: &Value, content: &FieldContent) -> Self {
        match (content, raw) {
            (FieldContent::String { .. }, Value::String(value)) => Self::String(value.clone()),
            (FieldContent::Totp { .. }, Value::Object(_)) => Totp::deserialize(raw)
                .map(Self::Totp)
                .unwrap_or_else(|_| Self::Unknown(raw.clone())),
            _ => Self::Unknown(raw.clone()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Totp> for FieldValue {
    fn from(totp: Totp) -> Self {
        Self::Totp(totp)
    }
}

/// HMAC hash used to derive one-time passwords.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HashAlgorithm {
    #[default]
    Sha1,
    Sha256,
    Sha512,
}

/// A time-based one-time-password secret as stored in a resource's secret.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totp {
    /// Base32 shared secret.
    pub secret_key: String,
    #[serde(default)]
    pub algorithm: HashAlgorithm,
    pub digits: u8,
    /// Step length in seconds.
    pub period: u64,
}

impl Totp {
    pub const DEFAULT_DIGITS: u8 = 6;
    pub const DEFAULT_PERIOD: u64 = 30;

    /// A SHA-1, six digit, thirty second secret.
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            algorithm: HashAlgorithm::default(),
            digits: Self::DEFAULT_DIGITS,
            period: Self::DEFAULT_PERIOD,
        }
    }

    pub fn get(&self, attribute: TotpAttribute) -> TotpAttributeValue {
        match attribute {
            TotpAttribute::SecretKey => TotpAttributeValue::SecretKey(self.secret_key.clone()),
            TotpAttribute::Algorithm => TotpAttributeValue::Algorithm(self.algorithm),
            TotpAttribute::Digits => TotpAttributeValue::Digits(self.digits),
            TotpAttribute::Period => TotpAttributeValue::Period(self.period),
        }
    }

    /// Returns a copy with one attribute replaced.
    #[must_use]
    pub fn with(&self, value: TotpAttributeValue) -> Self {
        let mut updated = self.clone();
        match value {
            TotpAttributeValue::SecretKey(secret_key) => updated.secret_key = secret_key,
            TotpAttributeValue::Algorithm(algorithm) => updated.algorithm = algorithm,
            TotpAttributeValue::Digits(digits) => updated.digits = digits,
            TotpAttributeValue::Period(period) => updated.period = period,
        }
        updated
    }
}

// The shared secret never goes to logs.
impl fmt::Debug for Totp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Totp")
            .field("secret_key", &"[redacted]")
            .field("algorithm", &self.algorithm)
            .field("digits", &self.digits)
            .field("period", &self.period)
            .finish()
    }
}

/// Addressable parts of a [`Totp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TotpAttribute {
    SecretKey,
    Algorithm,
    Digits,
    Period,
}

/// A single [`Totp`] attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TotpAttributeValue {
    SecretKey(String),
    Algorithm(HashAlgorithm),
    Digits(u8),
    Period(u64),
}

impl TotpAttributeValue {
    pub fn attribute(&self) -> TotpAttribute {
        match self {
            Self::SecretKey(_) => TotpAttribute::SecretKey,
            Self::Algorithm(_) => TotpAttribute::Algorithm,
            Self::Digits(_) => TotpAttribute::Digits,
            Self::Period(_) => TotpAttribute::Period,
        }
    }
}
