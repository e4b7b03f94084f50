//! Field validators.
//!
//! One validator is compiled per field from its [`FieldContent`]. Values not
//! yet fetched ([`FieldValue::Encrypted`]) are never judged; they are checked
//! once the secret arrives.

use crate::config::ValidationConfig;
use crate::content::FieldContent;
use crate::path::FieldPath;
use crate::value::{FieldValue, TotpAttributeValue};
use std::fmt;
use std::ops::RangeInclusive;

/// Accepted one-time-password lengths.
pub const TOTP_DIGITS: RangeInclusive<u8> = 6..=8;

/// Why a value was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidReason {
    /// A required field has no value, or an empty one.
    Required,
    /// The value's shape does not match the field's content.
    WrongType { actual: &'static str },
    TooShort { min: usize, length: usize },
    TooLong { max: usize, length: usize },
    /// One-time-password step must be positive.
    InvalidPeriod,
    InvalidDigits { digits: u8 },
    EmptySecret,
    /// A passthrough field was given structured data.
    UnexpectedValue,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "is required"),
            Self::WrongType { actual } => write!(f, "has the wrong type ({actual})"),
            Self::TooShort { min, length } => {
                write!(f, "is too short ({length} characters, minimum {min})")
            }
            Self::TooLong { max, length } => {
                write!(f, "is too long ({length} characters, maximum {max})")
            }
            Self::InvalidPeriod => write!(f, "has a non-positive period"),
            Self::InvalidDigits { digits } => write!(
                f,
                "has {digits} digits, expected {} to {}",
                TOTP_DIGITS.start(),
                TOTP_DIGITS.end()
            ),
            Self::EmptySecret => write!(f, "has an empty secret key"),
            Self::UnexpectedValue => write!(f, "cannot hold a value"),
        }
    }
}

/// A rejected field value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("field '{field}' {reason}")]
pub struct ValidationError {
    pub field: FieldPath,
    pub reason: InvalidReason,
}

/// Outcome of validating a value. Invalid is an expected, user-facing state,
/// not an error of the operation that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Valid,
    Invalid(ValidationError),
}

impl Validation {
    fn invalid(field: &FieldPath, reason: InvalidReason) -> Self {
        Self::Invalid(ValidationError {
            field: field.clone(),
            reason,
        })
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn error(&self) -> Option<&ValidationError> {
        match self {
            Self::Valid => None,
            Self::Invalid(error) => Some(error),
        }
    }

    pub fn reason(&self) -> Option<&InvalidReason> {
        self.error().map(|error| &error.reason)
    }

    pub fn into_result(self) -> Result<(), ValidationError> {
        match self {
            Self::Valid => Ok(()),
            Self::Invalid(error) => Err(error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Rule {
    String {
        required: bool,
        min_length: Option<usize>,
        max_length: usize,
    },
    Totp {
        required: bool,
    },
    Unknown {
        required: bool,
    },
}

/// Compiled validator for a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validator {
    field: FieldPath,
    rule: Rule,
}

impl Validator {
    pub fn compile(field: FieldPath, content: &FieldContent, config: &ValidationConfig) -> Self {
        let rule = match *content {
            FieldContent::String {
                required,
                min_length,
                max_length,
                ..
            } => Rule::String {
                required,
                min_length,
                max_length: max_length.unwrap_or(config.max_string_length),
            },
            FieldContent::Totp { required } => Rule::Totp { required },
            FieldContent::Unknown { required, .. } => Rule::Unknown { required },
        };
        Self { field, rule }
    }

    pub fn field(&self) -> &FieldPath {
        &self.field
    }

    pub fn validate(&self, value: &FieldValue) -> Validation {
        let field = &self.field;
        match (&self.rule, value) {
            (_, FieldValue::Encrypted) => Validation::Valid,
            (
                Rule::String { required, .. }
                | Rule::Totp { required }
                | Rule::Unknown { required },
                FieldValue::Unknown(serde_json::Value::Null),
            ) => {
                if *required {
                    Validation::invalid(field, InvalidReason::Required)
                } else {
                    Validation::Valid
                }
            }
            (
                Rule::String {
                    required,
                    min_length,
                    max_length,
                },
                FieldValue::String(value),
            ) => {
                let length = value.chars().count();
                if *required && length == 0 {
                    Validation::invalid(field, InvalidReason::Required)
                } else if let Some(min) = min_length.filter(|min| length < *min) {
                    Validation::invalid(field, InvalidReason::TooShort { min, length })
                } else if length > *max_length {
                    Validation::invalid(
                        field,
                        InvalidReason::TooLong {
                            max: *max_length,
                            length,
                        },
                    )
                } else {
                    Validation::Valid
                }
            }
            (Rule::Totp { .. }, FieldValue::Totp(totp)) => {
                for attribute in [
                    TotpAttributeValue::Period(totp.period),
                    TotpAttributeValue::Digits(totp.digits),
                    TotpAttributeValue::SecretKey(totp.secret_key.clone()),
                ] {
                    let verdict = validate_totp_attribute(field, &attribute);
                    if !verdict.is_valid() {
                        return verdict;
                    }
                }
                Validation::Valid
            }
            (Rule::Unknown { .. }, FieldValue::Unknown(_)) => Validation::Valid,
            (Rule::Unknown { .. }, FieldValue::String(_) | FieldValue::Totp(_)) => {
                Validation::invalid(field, InvalidReason::UnexpectedValue)
            }
            (Rule::String { .. } | Rule::Totp { .. }, other) => Validation::invalid(
                field,
                InvalidReason::WrongType {
                    actual: other.kind(),
                },
            ),
        }
    }
}

/// Checks one attribute of a one-time-password secret in isolation.
pub fn validate_totp_attribute(field: &FieldPath, value: &TotpAttributeValue) -> Validation {
    match value {
        TotpAttributeValue::Period(0) => Validation::invalid(field, InvalidReason::InvalidPeriod),
        TotpAttributeValue::Digits(digits) if !TOTP_DIGITS.contains(digits) => {
            Validation::invalid(field, InvalidReason::InvalidDigits { digits: *digits })
        }
        TotpAttributeValue::SecretKey(secret_key) if secret_key.is_empty() => {
            Validation::invalid(field, InvalidReason::EmptySecret)
        }
        TotpAttributeValue::Period(_)
        | TotpAttributeValue::Digits(_)
        | TotpAttributeValue::SecretKey(_)
        | TotpAttributeValue::Algorithm(_) => Validation::Valid,
    }
}
