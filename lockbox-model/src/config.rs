//! Engine configuration, optionally read from TOML:
//!
//! ```toml
//! [validation]
//! max-string-length = 65536
//! ```

use crate::error::ModelResult;
use serde::{Deserialize, Serialize};

/// Length ceiling applied to string fields whose schema gives no `maxLength`.
pub const DEFAULT_MAX_STRING_LENGTH: usize = 1_000_000;

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub validation: ValidationConfig,
}

/// Settings consumed when compiling field validators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ValidationConfig {
    #[serde(default = "default_max_string_length")]
    pub max_string_length: usize,
}

fn default_max_string_length() -> usize {
    DEFAULT_MAX_STRING_LENGTH
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_string_length: default_max_string_length(),
        }
    }
}

impl EngineConfig {
    /// Parses a configuration document. Missing keys take their defaults.
    pub fn from_toml_str(contents: &str) -> ModelResult<Self> {
        Ok(toml::from_str(contents)?)
    }
}
