//! Merge upload results into a user-creation payload

use crate::error::PayloadError;
use common::fields::IMAGE_FIELDS;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Set or overwrite one field; existing keys keep their position
pub fn set_field(tree: &mut Map<String, Value>, key: &str, value: impl Into<Value>) {
    tree.insert(key.to_string(), value.into());
}

/// Parse a payload that must be a JSON object
pub fn parse_object(json: &str) -> Result<Map<String, Value>, PayloadError> {
    match serde_json::from_str(json)? {
        Value::Object(map) => Ok(map),
        Value::Array(_) => Err(PayloadError::NotAnObject("an array")),
        Value::String(_) => Err(PayloadError::NotAnObject("a string")),
        Value::Number(_) => Err(PayloadError::NotAnObject("a number")),
        Value::Bool(_) => Err(PayloadError::NotAnObject("a boolean")),
        Value::Null => Err(PayloadError::NotAnObject("null")),
    }
}

/// Write the image URLs present in `upload_results` into the payload.
/// Only the known image fields are considered; everything else is untouched.
pub fn enrich(
    original_json: &str,
    upload_results: &HashMap<String, String>,
) -> Result<String, PayloadError> {
    let mut tree = parse_object(original_json)?;
    for field in IMAGE_FIELDS {
        if let Some(url) = upload_results.get(field) {
            set_field(&mut tree, field, url.as_str());
        }
    }
    Ok(serde_json::to_string(&tree)?)
}
