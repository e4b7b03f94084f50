mod common;

use common::*;
use lockbox_model::{
    FieldPath, FieldValue, HashAlgorithm, InvalidReason, InvalidResourceData, ModelError, Record,
    Totp, TotpAttribute, TotpAttributeValue, Validation,
};
use lockbox_types::ResourceId;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::HashSet;

fn totp_value() -> Totp {
    Totp {
        secret_key: "JBSWY3DPEHPK3PXP".to_string(),
        algorithm: HashAlgorithm::Sha256,
        digits: 6,
        period: 30,
    }
}

fn invalid_data(err: ModelError) -> InvalidResourceData {
    match err {
        ModelError::InvalidResourceData(inner) => inner,
        other => panic!("expected InvalidResourceData, got {other:?}"),
    }
}

// ── Field tables ─────────────────────────────────────────────────

#[test]
fn paths_are_partitioned_between_payloads() {
    let record = Record::new(default_type());
    assert_eq!(
        record.meta_paths(),
        &HashSet::from([FieldPath::Name, FieldPath::Uri])
    );
    assert_eq!(record.secret_paths(), &HashSet::from([FieldPath::Password]));
    for field in record.resource_type().fields() {
        assert!(record.validator(field.path()).is_some());
    }
    assert!(!record.has_unstructured_secret());
}

#[test]
fn with_type_rebuilds_tables_and_keeps_payloads() {
    let mut record = Record::new(default_type());
    record.set(&FieldPath::Name, "Mail".into()).unwrap();

    let record = record.with_type(legacy_type());
    assert!(record.has_unstructured_secret());
    assert_eq!(
        record.meta_paths(),
        &HashSet::from([FieldPath::Name, FieldPath::Username])
    );
    assert_eq!(record.secret_paths(), &HashSet::from([FieldPath::Secret]));
    assert!(record.validator(&FieldPath::Password).is_none());
    assert_eq!(record.value(&FieldPath::Name), FieldValue::from("Mail"));
}

#[test]
fn with_type_is_idempotent() {
    let once = Record::new(totp_type()).with_type(default_type());
    let twice = once.clone().with_type(default_type());
    assert_eq!(once.meta_paths(), twice.meta_paths());
    assert_eq!(once.secret_paths(), twice.secret_paths());
    assert_eq!(once.meta(), twice.meta());
}

// ── Reading ──────────────────────────────────────────────────────

#[test]
fn password_reads_encrypted_before_secret_is_fetched() {
    let id = ResourceId::new();
    let record = Record::loaded(id, default_type(), json!({"name": "Mail"}));
    assert_eq!(record.id(), Some(id));
    assert!(!record.is_local());
    assert!(!record.is_secret_loaded());
    assert_eq!(record.value(&FieldPath::Password), FieldValue::Encrypted);
    assert_eq!(record.value(&FieldPath::Name), FieldValue::from("Mail"));
}

#[test]
fn secret_fields_read_after_secret_is_installed() {
    let mut record = Record::loaded(ResourceId::new(), totp_type(), json!({"name": "Bank"}));
    record.set_secret_payload(json!({
        "password": "hunter2",
        "totp": {"secret_key": "JBSWY3DPEHPK3PXP", "algorithm": "SHA256", "digits": 6, "period": 30}
    }));

    assert!(record.is_secret_loaded());
    assert_eq!(record.value(&FieldPath::Password), FieldValue::from("hunter2"));
    assert_eq!(record.value(&FieldPath::Totp), FieldValue::Totp(totp_value()));

    record.clear_secret();
    assert_eq!(record.value(&FieldPath::Totp), FieldValue::Encrypted);
}

#[test]
fn missing_plaintext_values_read_as_null() {
    let record = Record::loaded(ResourceId::new(), totp_type(), json!({"name": "Bank"}))
        .with_secret(json!({"password": "x"}));
    assert!(record.value(&FieldPath::Username).is_null());
    assert!(record.value(&FieldPath::Description).is_null());
}

#[test]
fn missing_secret_values_read_as_encrypted() {
    assert_eq!(
        Record::new(totp_type()).value(&FieldPath::Password),
        FieldValue::Encrypted
    );

    let record = Record::loaded(ResourceId::new(), totp_type(), json!({"name": "Bank"}))
        .with_secret(json!({"password": "p"}));
    assert_eq!(record.value(&FieldPath::Password), FieldValue::from("p"));
    assert_eq!(record.value(&FieldPath::Totp), FieldValue::Encrypted);
}

#[test]
fn fetched_secret_without_required_key_fails_validation() {
    let record = Record::loaded(ResourceId::new(), totp_type(), json!({"name": "Bank"}))
        .with_secret(json!({"password": "p"}));
    let verdict = record.validate_field(&FieldPath::Totp).unwrap();
    assert_eq!(verdict.reason(), Some(&InvalidReason::Required));
    assert_eq!(record.validate().error().map(|e| &e.field), Some(&FieldPath::Totp));
}

#[test]
fn undeclared_path_reads_as_null() {
    let record = Record::new(default_type());
    assert_eq!(record.value(&FieldPath::Totp), FieldValue::null());
    assert_eq!(
        record.value(&FieldPath::Custom("pin".into())),
        FieldValue::null()
    );
}

#[test]
fn malformed_totp_reads_as_unknown() {
    let record = Record::new(totp_type()).with_secret(json!({"totp": {"digits": "six"}}));
    assert_eq!(
        record.value(&FieldPath::Totp),
        FieldValue::Unknown(json!({"digits": "six"}))
    );
    assert!(!record.validate_field(&FieldPath::Totp).unwrap().is_valid());
}

#[test]
fn uris_pass_through_as_raw_json() {
    let record = Record::loaded(
        ResourceId::new(),
        totp_type(),
        json!({"name": "Bank", "uris": ["https://bank.example"]}),
    );
    assert_eq!(
        record.value(&FieldPath::Uris),
        FieldValue::Unknown(json!(["https://bank.example"]))
    );
}

// ── Writing ──────────────────────────────────────────────────────

#[test]
fn name_validation_scenario() {
    let mut record = Record::new(default_type());
    assert!(record.is_local());

    let verdict = record.set(&FieldPath::Name, "".into()).unwrap();
    assert_eq!(verdict.reason(), Some(&InvalidReason::Required));

    let verdict = record.set(&FieldPath::Name, "x".into()).unwrap();
    assert_eq!(verdict, Validation::Valid);
}

#[test]
fn invalid_values_are_stored() {
    let mut record = Record::new(default_type());
    let long = "a".repeat(300);
    let verdict = record.set(&FieldPath::Name, long.as_str().into()).unwrap();
    assert!(!verdict.is_valid());
    assert_eq!(record.meta()["name"], json!(long));
}

#[test]
fn secret_writes_land_in_secret_payload() {
    let mut record = Record::loaded(ResourceId::new(), default_type(), json!({"name": "Mail"}))
        .with_secret(json!({}));
    record.set(&FieldPath::Password, "hunter2".into()).unwrap();
    assert_eq!(record.secret(), &json!({"password": "hunter2"}));
    assert!(record.meta().get("password").is_none());
}

#[test]
fn secret_write_before_fetch_is_rejected() {
    let mut record = Record::loaded(ResourceId::new(), totp_type(), json!({"name": "Bank"}));
    assert_eq!(record.validate(), Validation::Valid);

    let err = record.set(&FieldPath::Password, "new".into()).unwrap_err();
    assert_eq!(
        invalid_data(err),
        InvalidResourceData::SecretNotLoaded(FieldPath::Password)
    );
    let err = record.set(&FieldPath::Totp, FieldValue::null()).unwrap_err();
    assert_eq!(
        invalid_data(err),
        InvalidResourceData::SecretNotLoaded(FieldPath::Totp)
    );

    assert!(!record.is_secret_loaded());
    assert_eq!(record.value(&FieldPath::Totp), FieldValue::Encrypted);
    assert_eq!(record.validate(), Validation::Valid);
}

#[test]
fn plaintext_write_before_fetch_is_accepted() {
    let mut record = Record::loaded(ResourceId::new(), totp_type(), json!({"name": "Bank"}));
    assert!(record.set(&FieldPath::Name, "Savings".into()).unwrap().is_valid());
    assert!(!record.is_secret_loaded());
}

#[test]
fn writing_null_clears_field() {
    let mut record = Record::new(default_type());
    record.set(&FieldPath::Uri, "https://mail.example".into()).unwrap();
    assert_eq!(record.meta()["uri"], json!("https://mail.example"));

    let verdict = record.set(&FieldPath::Uri, FieldValue::null()).unwrap();
    assert!(verdict.is_valid());
    assert!(record.meta().get("uri").is_none());
}

#[test]
fn undeclared_path_write_is_rejected() {
    let mut record = Record::new(default_type());
    let err = record.set(&FieldPath::Totp, totp_value().into()).unwrap_err();
    assert_eq!(
        invalid_data(err),
        InvalidResourceData::UndeclaredField(FieldPath::Totp)
    );
}

#[test]
fn shape_mismatch_write_is_rejected() {
    let mut record = Record::new(totp_type());
    let err = record.set(&FieldPath::Totp, "123456".into()).unwrap_err();
    assert_eq!(
        invalid_data(err),
        InvalidResourceData::ShapeMismatch {
            field: FieldPath::Totp,
            expected: "totp",
            actual: "string",
        }
    );

    let err = record.set(&FieldPath::Password, FieldValue::Encrypted).unwrap_err();
    assert!(matches!(
        invalid_data(err),
        InvalidResourceData::ShapeMismatch { actual: "encrypted", .. }
    ));

    let err = record.set(&FieldPath::Uris, "https://x".into()).unwrap_err();
    assert!(matches!(
        invalid_data(err),
        InvalidResourceData::ShapeMismatch { expected: "unknown", .. }
    ));
}

#[test]
fn write_into_non_object_payload_is_rejected() {
    let mut record = Record::loaded(ResourceId::new(), default_type(), json!("corrupt"));
    let err = record.set(&FieldPath::Name, "x".into()).unwrap_err();
    assert_eq!(invalid_data(err), InvalidResourceData::PayloadNotObject("meta"));
}

#[test]
fn totp_is_stored_in_wire_format() {
    let mut record = Record::new(totp_type());
    let verdict = record.set(&FieldPath::Totp, totp_value().into()).unwrap();
    assert!(verdict.is_valid());
    assert_eq!(
        record.secret()["totp"],
        json!({"secret_key": "JBSWY3DPEHPK3PXP", "algorithm": "SHA256", "digits": 6, "period": 30})
    );
}

// ── Unstructured secret ──────────────────────────────────────────

#[test]
fn unstructured_secret_reads_whole_payload() {
    let record = Record::loaded(ResourceId::new(), legacy_type(), json!({"name": "Router"}))
        .with_secret(json!("hunter2"));
    assert!(record.has_unstructured_secret());
    assert_eq!(record.value(&FieldPath::Secret), FieldValue::from("hunter2"));
}

#[test]
fn unstructured_secret_accepts_wrapped_form() {
    let record = Record::new(legacy_type()).with_secret(json!({"secret": "hunter2"}));
    assert_eq!(record.value(&FieldPath::Secret), FieldValue::from("hunter2"));
}

#[test]
fn unstructured_secret_write_replaces_payload() {
    let mut record = Record::new(legacy_type());
    let verdict = record.set(&FieldPath::Secret, "s3cret".into()).unwrap();
    assert!(verdict.is_valid());
    assert_eq!(record.secret(), &json!("s3cret"));

    let verdict = record.set(&FieldPath::Secret, FieldValue::null()).unwrap();
    assert_eq!(verdict.reason(), Some(&InvalidReason::Required));
    assert_eq!(record.value(&FieldPath::Secret), FieldValue::Encrypted);
    assert!(!record.validate_field(&FieldPath::Secret).unwrap().is_valid());
}

// ── TOTP attributes ──────────────────────────────────────────────

#[test]
fn totp_attribute_reads() {
    let mut record = Record::new(totp_type());
    record.set(&FieldPath::Totp, totp_value().into()).unwrap();
    assert_eq!(
        record.totp_attribute(&FieldPath::Totp, TotpAttribute::Digits),
        Ok(TotpAttributeValue::Digits(6))
    );
    assert_eq!(
        record.totp_attribute(&FieldPath::Totp, TotpAttribute::Algorithm),
        Ok(TotpAttributeValue::Algorithm(HashAlgorithm::Sha256))
    );
}

#[test]
fn totp_attribute_write_replaces_whole_value() {
    let mut record = Record::new(totp_type());
    record.set(&FieldPath::Totp, totp_value().into()).unwrap();

    let verdict = record
        .set_totp_attribute(&FieldPath::Totp, TotpAttributeValue::Period(60))
        .unwrap();
    assert!(verdict.is_valid());
    assert_eq!(record.secret()["totp"]["period"], json!(60));
    assert_eq!(record.secret()["totp"]["secret_key"], json!("JBSWY3DPEHPK3PXP"));
}

#[test]
fn invalid_totp_attribute_is_stored_and_reported() {
    let mut record = Record::new(totp_type());
    record.set(&FieldPath::Totp, totp_value().into()).unwrap();

    let verdict = record
        .set_totp_attribute(&FieldPath::Totp, TotpAttributeValue::Digits(5))
        .unwrap();
    assert_eq!(verdict.reason(), Some(&InvalidReason::InvalidDigits { digits: 5 }));
    assert_eq!(
        record.totp_attribute(&FieldPath::Totp, TotpAttribute::Digits),
        Ok(TotpAttributeValue::Digits(5))
    );
    assert!(!record.validate_field(&FieldPath::Totp).unwrap().is_valid());
}

#[test]
fn totp_attribute_requires_existing_totp() {
    let mut record = Record::new(totp_type());
    assert_eq!(
        record.totp_attribute(&FieldPath::Totp, TotpAttribute::SecretKey),
        Err(InvalidResourceData::NotTotp(FieldPath::Totp))
    );
    let err = record
        .set_totp_attribute(&FieldPath::Totp, TotpAttributeValue::Digits(6))
        .unwrap_err();
    assert_eq!(invalid_data(err), InvalidResourceData::NotTotp(FieldPath::Totp));
}

#[test]
fn totp_attribute_on_other_field_is_rejected() {
    let mut record = Record::new(totp_type());
    record.set(&FieldPath::Password, "x".into()).unwrap();
    assert_eq!(
        record.totp_attribute(&FieldPath::Password, TotpAttribute::Digits),
        Err(InvalidResourceData::NotTotp(FieldPath::Password))
    );
    assert_eq!(
        Record::new(default_type()).totp_attribute(&FieldPath::Totp, TotpAttribute::Digits),
        Err(InvalidResourceData::UndeclaredField(FieldPath::Totp))
    );
}

// ── Whole-record validation ──────────────────────────────────────

#[test]
fn validate_reports_first_failure_in_display_order() {
    let record = Record::new(totp_type());
    let verdict = record.validate();
    assert_eq!(verdict.error().map(|e| &e.field), Some(&FieldPath::Name));
    assert_eq!(verdict.reason(), Some(&InvalidReason::Required));
}

#[test]
fn validate_all_collects_every_failure() {
    let record = Record::new(totp_type());
    let failed: Vec<_> = record.validate_all().into_iter().map(|e| e.field).collect();
    assert_eq!(
        failed,
        vec![FieldPath::Name, FieldPath::Password, FieldPath::Totp]
    );
}

#[test]
fn unfetched_secret_does_not_fail_validation() {
    let record = Record::loaded(ResourceId::new(), totp_type(), json!({"name": "Bank"}));
    assert_eq!(record.validate(), Validation::Valid);
}

#[test]
fn complete_record_is_valid() {
    let mut record = Record::new(totp_type());
    record.set(&FieldPath::Name, "Bank".into()).unwrap();
    record.set(&FieldPath::Password, "hunter2".into()).unwrap();
    record.set(&FieldPath::Totp, totp_value().into()).unwrap();
    assert_eq!(record.validate(), Validation::Valid);
    assert!(record.validate_all().is_empty());
}

#[test]
fn validate_field_rejects_undeclared_path() {
    let record = Record::new(default_type());
    assert_eq!(
        record.validate_field(&FieldPath::Username),
        Err(InvalidResourceData::UndeclaredField(FieldPath::Username))
    );
}

// ── Debug output ─────────────────────────────────────────────────

#[test]
fn debug_output_omits_payloads() {
    let record = Record::new(default_type())
        .with_id(ResourceId::new())
        .with_secret(json!({"password": "hunter2"}));
    let printed = format!("{record:?}");
    assert!(!printed.contains("hunter2"));
    assert!(printed.contains("v5-default"));
}

#[test]
fn totp_debug_redacts_secret_key() {
    let printed = format!("{:?}", totp_value());
    assert!(!printed.contains("JBSWY3DPEHPK3PXP"));
}
