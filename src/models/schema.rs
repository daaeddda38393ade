//! Shape validation for API payloads.
//!
//! Every list fetched from the server passes through here before it reaches
//! the UI, so a malformed or partially-null payload is rejected as a whole
//! instead of leaking half-typed records into rendering. Failures list every
//! mismatch found, not just the first.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{Owner, Pet};

/// Which record kind a payload was supposed to contain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Owner,
    Pet,
}

impl RecordKind {
    /// Lowercase name used in messages
    pub const fn name(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Pet => "pet",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One mismatch between a payload and its schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaIssue {
    /// Location such as `[2].owner_id`
    pub path: String,
    pub expected: &'static str,
    pub found: &'static str,
}

impl std::fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: expected {}, found {}",
            self.path, self.expected, self.found
        )
    }
}

/// A payload did not match the record schema
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid {record}s data from API: {}", summarize(.issues))]
pub struct SchemaError {
    pub record: RecordKind,
    pub issues: Vec<SchemaIssue>,
}

fn summarize(issues: &[SchemaIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Integer,
    Number,
    Text,
    Boolean,
}

impl FieldKind {
    const fn name(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Text => "string",
            Self::Boolean => "boolean",
        }
    }

    fn accepts(self, value: &Value) -> bool {
        match self {
            Self::Integer => value.as_i64().is_some(),
            Self::Number => value.is_number(),
            Self::Text => value.is_string(),
            Self::Boolean => value.is_boolean(),
        }
    }
}

struct FieldRule {
    name: &'static str,
    kind: FieldKind,
    required: bool,
}

const fn required(name: &'static str, kind: FieldKind) -> FieldRule {
    FieldRule {
        name,
        kind,
        required: true,
    }
}

const fn optional(name: &'static str, kind: FieldKind) -> FieldRule {
    FieldRule {
        name,
        kind,
        required: false,
    }
}

const OWNER_RULES: &[FieldRule] = &[
    required("id", FieldKind::Integer),
    required("name", FieldKind::Text),
    optional("email", FieldKind::Text),
    optional("phone", FieldKind::Text),
    optional("address", FieldKind::Text),
    optional("city", FieldKind::Text),
    optional("state", FieldKind::Text),
    optional("zip_code", FieldKind::Text),
    optional("country", FieldKind::Text),
    optional("date_of_birth", FieldKind::Text),
];

const PET_RULES: &[FieldRule] = &[
    required("id", FieldKind::Integer),
    required("name", FieldKind::Text),
    required("owner_id", FieldKind::Integer),
    optional("species", FieldKind::Text),
    optional("age", FieldKind::Integer),
    optional("breed", FieldKind::Text),
    optional("color", FieldKind::Text),
    optional("weight", FieldKind::Number),
    optional("description", FieldKind::Text),
    optional("gender", FieldKind::Text),
    optional("is_vaccinated", FieldKind::Boolean),
    optional("birthdate", FieldKind::Text),
    optional("date_added", FieldKind::Text),
    optional("photo_filename", FieldKind::Text),
];

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn check_record(index: usize, value: &Value, rules: &[FieldRule], issues: &mut Vec<SchemaIssue>) {
    let Some(object) = value.as_object() else {
        issues.push(SchemaIssue {
            path: format!("[{index}]"),
            expected: "object",
            found: json_kind(value),
        });
        return;
    };

    for rule in rules {
        let path = || format!("[{index}].{}", rule.name);
        match object.get(rule.name) {
            None if rule.required => issues.push(SchemaIssue {
                path: path(),
                expected: rule.kind.name(),
                found: "missing",
            }),
            Some(Value::Null) if rule.required => issues.push(SchemaIssue {
                path: path(),
                expected: rule.kind.name(),
                found: "null",
            }),
            None | Some(Value::Null) => {}
            Some(field) if !rule.kind.accepts(field) => issues.push(SchemaIssue {
                path: path(),
                expected: rule.kind.name(),
                found: json_kind(field),
            }),
            Some(_) => {}
        }
    }
}

fn validate_list<T: DeserializeOwned>(
    value: &Value,
    record: RecordKind,
    rules: &[FieldRule],
) -> Result<Vec<T>, SchemaError> {
    let Some(items) = value.as_array() else {
        return Err(SchemaError {
            record,
            issues: vec![SchemaIssue {
                path: "$".to_string(),
                expected: "array",
                found: json_kind(value),
            }],
        });
    };

    let mut issues = Vec::new();
    for (index, item) in items.iter().enumerate() {
        check_record(index, item, rules, &mut issues);
    }
    if !issues.is_empty() {
        tracing::warn!(%record, count = issues.len(), "schema validation failed");
        return Err(SchemaError { record, issues });
    }

    // The rules above mirror the serde model, so this only fails if they drift apart.
    serde_json::from_value(value.clone()).map_err(|e| {
        tracing::warn!(%record, "typed decode failed after validation: {e}");
        SchemaError {
            record,
            issues: vec![SchemaIssue {
                path: "$".to_string(),
                expected: "decodable records",
                found: "undecodable value",
            }],
        }
    })
}

/// Validate a purported list of owners
pub fn validate_owners(value: &Value) -> Result<Vec<Owner>, SchemaError> {
    validate_list(value, RecordKind::Owner, OWNER_RULES)
}

/// Validate a purported list of pets.
///
/// Species is normalized to an empty string when absent or null.
pub fn validate_pets(value: &Value) -> Result<Vec<Pet>, SchemaError> {
    validate_list(value, RecordKind::Pet, PET_RULES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_owners_with_nulls() {
        let owners = validate_owners(&json!([
            { "id": 1, "name": "Ada", "email": null, "pets": [] },
            { "id": 2, "name": "Grace", "city": "Arlington" }
        ]))
        .unwrap();
        assert_eq!(owners.len(), 2);
        assert_eq!(owners[0].email, None);
        assert_eq!(owners[1].city.as_deref(), Some("Arlington"));
    }

    #[test]
    fn test_pet_missing_owner_id_fails_whole_list() {
        let err = validate_pets(&json!([
            { "id": 1, "name": "Rex", "owner_id": 1 },
            { "id": 2, "name": "Tom" }
        ]))
        .unwrap_err();
        assert_eq!(err.record, RecordKind::Pet);
        assert_eq!(
            err.issues,
            vec![SchemaIssue {
                path: "[1].owner_id".to_string(),
                expected: "integer",
                found: "missing",
            }]
        );
    }

    #[test]
    fn test_reports_every_mismatch() {
        let err = validate_pets(&json!([
            { "id": "1", "name": "Rex", "owner_id": 1, "weight": "heavy" },
            42
        ]))
        .unwrap_err();
        let paths: Vec<_> = err.issues.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["[0].id", "[0].weight", "[1]"]);
        assert!(err.to_string().starts_with("Invalid pets data from API"));
    }

    #[test]
    fn test_required_null_is_rejected() {
        let err = validate_owners(&json!([{ "id": 1, "name": null }])).unwrap_err();
        assert_eq!(err.issues[0].found, "null");
    }

    #[test]
    fn test_non_array_payload() {
        let err = validate_owners(&json!({ "id": 1 })).unwrap_err();
        assert_eq!(err.issues[0].path, "$");
        assert_eq!(err.issues[0].found, "object");
    }

    #[test]
    fn test_pet_species_normalized() {
        let pets = validate_pets(&json!([
            { "id": 1, "name": "Rex", "owner_id": 4, "species": null, "weight": 7 }
        ]))
        .unwrap();
        assert_eq!(pets[0].species, "");
        assert_eq!(pets[0].weight, Some(7.0));
    }

    #[test]
    fn test_fractional_id_is_not_an_integer() {
        let err = validate_pets(&json!([{ "id": 1.5, "name": "Rex", "owner_id": 4 }])).unwrap_err();
        assert_eq!(err.issues[0].path, "[0].id");
        assert_eq!(err.issues[0].found, "number");
    }
}
