//! Shared fixtures for resource engine tests.

#![allow(dead_code)]

use lockbox_model::ResourceType;
use serde_json::{Value, json};

pub const DEFAULT_TYPE_ID: &str = "a28a04cd-6f53-518a-967c-9963bf9cec51";
pub const TOTP_TYPE_ID: &str = "1e4bbde6-1d7d-52a0-8b54-6e2f3c9a3cd1";
pub const LEGACY_TYPE_ID: &str = "669f8c64-242a-59fb-92fc-81f660975fd3";

/// Installs a test-writer subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// name (required), uri (optional), password (required, secret).
pub fn default_type_document() -> Value {
    json!({
        "id": DEFAULT_TYPE_ID,
        "slug": "v5-default",
        "name": "Password with URI",
        "definition": {
            "resource": {
                "type": "object",
                "required": ["name"],
                "properties": {
                    "name": {"type": "string", "maxLength": 255},
                    "uri": {"anyOf": [{"type": "string", "maxLength": 1024}, {"type": "null"}]}
                }
            },
            "secret": {
                "type": "object",
                "required": ["password"],
                "properties": {
                    "password": {"type": "string", "maxLength": 4096}
                }
            }
        }
    })
}

/// Metadata with username/uris/description, secret with password and totp.
pub fn totp_type_document() -> Value {
    json!({
        "id": TOTP_TYPE_ID,
        "slug": "v5-default-with-totp",
        "name": "Password, description and TOTP",
        "definition": {
            "resource": {
                "type": "object",
                "required": ["name"],
                "properties": {
                    "name": {"type": "string", "maxLength": 255},
                    "username": {"anyOf": [{"type": "string", "maxLength": 255}, {"type": "null"}]},
                    "uris": {"type": "array", "items": {"type": "string"}},
                    "description": {"anyOf": [{"type": "string", "maxLength": 10000}, {"type": "null"}]}
                }
            },
            "secret": {
                "type": "object",
                "required": ["password", "totp"],
                "properties": {
                    "password": {"type": "string", "maxLength": 4096},
                    "totp": {
                        "type": "object",
                        "required": ["secret_key", "digits", "algorithm"],
                        "properties": {
                            "secret_key": {"type": "string"},
                            "digits": {"type": "number"},
                            "algorithm": {"type": "string"},
                            "period": {"type": "number"}
                        }
                    }
                }
            }
        }
    })
}

/// A legacy type whose secret is a bare string rather than an object schema.
pub fn legacy_type_document() -> Value {
    json!({
        "id": LEGACY_TYPE_ID,
        "slug": "password-string",
        "name": "Simple password",
        "definition": {
            "resource": {
                "type": "object",
                "required": ["name"],
                "properties": {
                    "name": {"type": "string", "maxLength": 255},
                    "username": {"anyOf": [{"type": "string", "maxLength": 255}, {"type": "null"}]}
                }
            },
            "secret": {"type": "string", "maxLength": 4096}
        }
    })
}

pub fn default_type() -> ResourceType {
    ResourceType::from_value(default_type_document()).unwrap()
}

pub fn totp_type() -> ResourceType {
    ResourceType::from_value(totp_type_document()).unwrap()
}

pub fn legacy_type() -> ResourceType {
    ResourceType::from_value(legacy_type_document()).unwrap()
}
