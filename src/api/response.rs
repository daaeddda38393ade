//! Interpretation of raw API responses.
//!
//! These functions take a status code and body text and never touch the
//! network, which keeps the error conventions testable on their own.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::ApiError;
use crate::models::{Owner, Pet, RecordKind, validate_owners, validate_pets};

const fn is_success(status: u16) -> bool {
    matches!(status, 200..=299)
}

/// Human-readable message from an error body.
///
/// Uses the `detail` string when the body is a JSON object carrying one, or
/// the body itself when it is a JSON string.
pub fn error_detail(body: &Value) -> Option<String> {
    match body {
        Value::Object(map) => map
            .get("detail")
            .and_then(Value::as_str)
            .map(ToString::to_string),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

fn http_error(status: u16, body: &str, fallback: &str) -> ApiError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .as_ref()
        .and_then(error_detail)
        .unwrap_or_else(|| fallback.to_string());
    ApiError::Http { status, message }
}

fn require_array(value: &Value, record: RecordKind) -> Result<(), ApiError> {
    if value.is_array() {
        Ok(())
    } else {
        Err(ApiError::NotAList {
            record,
            got: value.to_string(),
        })
    }
}

/// Interpret a `GET /owners` response
pub fn parse_owner_list(status: u16, body: &str) -> Result<Vec<Owner>, ApiError> {
    if !is_success(status) {
        return Err(http_error(status, body, "Failed to fetch owners"));
    }
    let value: Value = serde_json::from_str(body).map_err(|_| ApiError::InvalidJson {
        body: body.to_string(),
    })?;
    require_array(&value, RecordKind::Owner)?;
    Ok(validate_owners(&value)?)
}

/// Interpret a `GET /pets` response.
///
/// The body must be JSON even on failure; a `detail` message from the server
/// becomes the error message. Missing `photo_filename` and `species` keys are
/// filled with explicit nulls before validation.
pub fn parse_pet_list(status: u16, body: &str) -> Result<Vec<Pet>, ApiError> {
    let mut value: Value = serde_json::from_str(body).map_err(|_| ApiError::InvalidJson {
        body: body.to_string(),
    })?;

    if !is_success(status) {
        let message = error_detail(&value).unwrap_or_else(|| "Failed to fetch pets".to_string());
        return Err(ApiError::Http { status, message });
    }

    require_array(&value, RecordKind::Pet)?;
    if let Value::Array(items) = &mut value {
        for item in items.iter_mut().filter_map(Value::as_object_mut) {
            item.entry("photo_filename").or_insert(Value::Null);
            item.entry("species").or_insert(Value::Null);
        }
    }
    Ok(validate_pets(&value)?)
}

/// Interpret the response to a create request
pub fn parse_created<T: DeserializeOwned>(
    status: u16,
    body: &str,
    record: RecordKind,
) -> Result<T, ApiError> {
    if !is_success(status) {
        return Err(http_error(status, body, &format!("Failed to create {record}")));
    }
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Interpret a photo download status
pub fn check_photo(status: u16, filename: &str) -> Result<(), ApiError> {
    if is_success(status) {
        Ok(())
    } else {
        Err(ApiError::Http {
            status,
            message: format!("Failed to fetch photo {filename}"),
        })
    }
}
