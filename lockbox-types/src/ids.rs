//! Identifier types used throughout the Lockbox core.
//!
//! Servers issue random (v4) UUIDs and serialize them lowercase, but older
//! servers are not consistent about case, so parsing accepts either.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wraps an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> Uuid {
                self.0
            }

            /// Parses an identifier from its textual form (any case).
            pub fn parse(s: &str) -> $crate::Result<Self> {
                Ok(Self(Uuid::parse_str(s)?))
            }

            /// Compares against a textual identifier without regard to case.
            ///
            /// Text that is not a UUID never matches.
            #[must_use]
            pub fn matches_str(&self, s: &str) -> bool {
                Uuid::parse_str(s).is_ok_and(|other| other == self.0)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = $crate::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

uuid_identifier!(
    /// Server-assigned identifier of a stored resource.
    ResourceId
);

uuid_identifier!(
    /// Identifier of a resource type (one server-side schema).
    ResourceTypeId
);

uuid_identifier!(
    /// Identifier shared by both halves of a custom field.
    CustomFieldId
);
