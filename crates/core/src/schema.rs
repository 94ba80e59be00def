//! Fixed shape contract for trial documents.
//!
//! The schema is closed: unknown keys are rejected. Validation runs on the
//! raw text before any domain parsing and reports pass/fail only; it never
//! returns an error to the caller.

use std::sync::LazyLock;

use jsonschema::Validator;
use serde_json::{json, Value};

/// Document literals accepted for `status`.
pub const STATUS_LITERALS: [&str; 3] = ["Not Started", "Ongoing", "Completed"];

static TRIAL_SCHEMA: LazyLock<Validator> = LazyLock::new(|| {
    jsonschema::draft7::options()
        .should_validate_formats(true)
        .build(&schema_document())
        .expect("embedded trial schema must compile")
});

/// The draft-07 schema every trial document must satisfy.
pub fn schema_document() -> Value {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "title": "ClinicalTrialMetadata",
        "type": "object",
        "properties": {
            "trialId": { "type": "string" },
            "title": { "type": "string" },
            "startDate": { "type": "string", "format": "date" },
            "endDate": { "type": "string", "format": "date" },
            "participants": { "type": "integer", "minimum": 1 },
            "status": { "type": "string", "enum": STATUS_LITERALS }
        },
        "required": ["trialId", "title", "startDate", "status"],
        "additionalProperties": false
    })
}

/// Whether `raw` is a JSON document satisfying the trial schema.
///
/// Unparseable text yields `false`.
pub fn is_valid_document(raw: &str) -> bool {
    match serde_json::from_str::<Value>(raw) {
        Ok(instance) => TRIAL_SCHEMA.is_valid(&instance),
        Err(_) => false,
    }
}

/// Human-readable reasons `raw` fails validation, empty when it passes.
pub fn violations(raw: &str) -> Vec<String> {
    match serde_json::from_str::<Value>(raw) {
        Ok(instance) => TRIAL_SCHEMA
            .iter_errors(&instance)
            .map(|err| err.to_string())
            .collect(),
        Err(err) => vec![format!("not valid JSON: {err}")],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str =
        r#"{"trialId":"T1","title":"X","startDate":"2024-01-01","status":"Ongoing"}"#;

    fn with_field(key: &str, value: Value) -> String {
        let mut doc: Value = serde_json::from_str(VALID).unwrap();
        doc[key] = value;
        doc.to_string()
    }

    fn without_field(key: &str) -> String {
        let mut doc: Value = serde_json::from_str(VALID).unwrap();
        doc.as_object_mut().unwrap().remove(key);
        doc.to_string()
    }

    #[test]
    fn minimal_document_is_valid() {
        assert!(is_valid_document(VALID));
        assert!(violations(VALID).is_empty());
    }

    #[test]
    fn full_document_is_valid() {
        let doc = r#"{
            "trialId": "T2",
            "title": "Full",
            "startDate": "2024-01-01",
            "endDate": "2024-12-31",
            "participants": 250,
            "status": "Not Started"
        }"#;
        assert!(is_valid_document(doc));
    }

    #[test]
    fn missing_required_field_is_invalid() {
        for key in ["trialId", "title", "startDate", "status"] {
            let doc = without_field(key);
            assert!(!is_valid_document(&doc), "document without {key} passed");
        }
    }

    #[test]
    fn unknown_field_is_invalid() {
        assert!(!is_valid_document(&with_field("sponsor", json!("Acme"))));
        assert!(!is_valid_document(&with_field("durationDays", json!(10))));
    }

    #[test]
    fn differently_cased_key_is_unknown() {
        let doc = r#"{"TrialId":"T1","title":"X","startDate":"2024-01-01","status":"Ongoing"}"#;
        assert!(!is_valid_document(doc));
    }

    #[test]
    fn string_fields_reject_other_types() {
        assert!(!is_valid_document(&with_field("trialId", json!(1))));
        assert!(!is_valid_document(&with_field("title", Value::Null)));
    }

    #[test]
    fn dates_must_be_calendar_dates() {
        assert!(!is_valid_document(&with_field("startDate", json!("invalid-date"))));
        assert!(!is_valid_document(&with_field("startDate", json!("2024-02-30"))));
        assert!(!is_valid_document(&with_field("endDate", json!("01/02/2024"))));
        assert!(is_valid_document(&with_field("endDate", json!("2024-02-29"))));
    }

    #[test]
    fn participants_must_be_positive_integer() {
        assert!(is_valid_document(&with_field("participants", json!(1))));
        assert!(!is_valid_document(&with_field("participants", json!(0))));
        assert!(!is_valid_document(&with_field("participants", json!(-3))));
        assert!(!is_valid_document(&with_field("participants", json!(2.5))));
        assert!(!is_valid_document(&with_field("participants", json!("10"))));
    }

    #[test]
    fn status_must_be_a_known_literal() {
        for literal in STATUS_LITERALS {
            assert!(is_valid_document(&with_field("status", json!(literal))));
        }
        assert!(!is_valid_document(&with_field("status", json!("Invalid"))));
        assert!(!is_valid_document(&with_field("status", json!("ongoing"))));
        assert!(!is_valid_document(&with_field("status", json!("NotStarted"))));
    }

    #[test]
    fn malformed_input_is_invalid_without_panicking() {
        assert!(!is_valid_document(""));
        assert!(!is_valid_document("not json"));
        assert!(!is_valid_document("{\"trialId\":"));
        assert!(!is_valid_document("[]"));
        assert!(!is_valid_document("42"));
        assert_eq!(violations("not json").len(), 1);
    }

    #[test]
    fn violations_are_reported_per_rule() {
        let reasons = violations(&with_field("participants", json!(0)));
        assert_eq!(reasons.len(), 1);

        let doc = r#"{"title":"X","startDate":"2024-01-01","status":"Ongoing","extra":1}"#;
        assert_eq!(violations(doc).len(), 2);
    }
}
