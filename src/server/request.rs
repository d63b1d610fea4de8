//! Prediction request framing
//!
//! Turns a raw `{"data": ...}` body into a feature matrix ordered like `features.json`.

use crate::error::{PipelineError, Result};
use ndarray::Array2;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// One JSON object per row to score
pub type Record = Map<String, Value>;

/// Parse the body and unwrap `data` into records.
///
/// `data` may be a single object or a non-empty array of objects.
pub fn parse_request(body: &[u8]) -> Result<Vec<Record>> {
    let payload: Value = serde_json::from_slice(body)
        .map_err(|e| PipelineError::MalformedRequest(format!("Invalid JSON body: {e}")))?;

    let data = match payload {
        Value::Object(mut map) => map.remove("data"),
        _ => None,
    }
    .ok_or_else(|| PipelineError::MalformedRequest("Body must be JSON with a 'data' key.".to_string()))?;

    let not_records =
        || PipelineError::MalformedRequest("'data' must be an object or a non-empty list of objects.".to_string());

    match data {
        Value::Object(record) => Ok(vec![record]),
        Value::Array(items) if !items.is_empty() => items
            .into_iter()
            .map(|item| match item {
                Value::Object(record) => Ok(record),
                _ => Err(not_records()),
            })
            .collect(),
        _ => Err(not_records()),
    }
}

/// Check every record's keys against the trained features
fn check_keys(index: usize, record: &Record, feature_names: &[String]) -> Result<()> {
    let expected: HashSet<&str> = feature_names.iter().map(String::as_str).collect();

    let mut missing: Vec<String> = feature_names
        .iter()
        .filter(|f| !record.contains_key(f.as_str()))
        .cloned()
        .collect();
    let mut extra: Vec<String> = record
        .keys()
        .filter(|k| !expected.contains(k.as_str()))
        .cloned()
        .collect();
    if missing.is_empty() && extra.is_empty() {
        return Ok(());
    }
    missing.sort();
    extra.sort();

    let mut parts = Vec::new();
    if !missing.is_empty() {
        parts.push(format!("Missing keys: {missing:?}"));
    }
    if !extra.is_empty() {
        parts.push(format!("Unexpected keys: {extra:?}"));
    }
    let prefix = if index == 0 { String::new() } else { format!("Record {index}: ") };

    let mut keys = missing;
    keys.extend(extra);
    keys.sort();
    Err(PipelineError::schema(format!("{prefix}{}", parts.join("; ")), keys))
}

fn coerce(index: usize, feature: &str, value: &Value) -> Result<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|v| v.is_finite()).ok_or_else(|| {
        PipelineError::CoercionFailure(format!(
            "Unable to parse value {value} for feature '{feature}' in record {index}"
        ))
    })
}

/// Validate keys of every record and build the matrix in `feature_names` order
pub fn frame_records(records: &[Record], feature_names: &[String]) -> Result<Array2<f64>> {
    for (i, record) in records.iter().enumerate() {
        check_keys(i, record, feature_names)?;
    }

    let mut x = Array2::zeros((records.len(), feature_names.len()));
    for (i, record) in records.iter().enumerate() {
        for (j, feature) in feature_names.iter().enumerate() {
            // presence checked above
            let value = record.get(feature).unwrap_or(&Value::Null);
            x[[i, j]] = coerce(i, feature, value)?;
        }
    }
    Ok(x)
}
