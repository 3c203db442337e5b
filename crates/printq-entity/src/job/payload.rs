//! Payload rules shared by enqueue and reprint.

use serde_json::Value;

use printq_core::types::JobId;
use printq_core::{AppError, AppResult};

/// Key added to a reprinted payload, holding the id of the job it copies.
pub const REPRINT_OF_KEY: &str = "reprintOf";

/// Accept only non-empty JSON objects.
pub fn validate_payload(payload: &Value) -> AppResult<()> {
    match payload {
        Value::Object(map) if !map.is_empty() => Ok(()),
        Value::Object(_) => Err(AppError::validation("job_data must not be empty")),
        _ => Err(AppError::validation("job_data must be a JSON object")),
    }
}

/// Copy `payload` and set `reprintOf` to `source`.
///
/// An existing `reprintOf` is overwritten, so a reprint always points at
/// the job it was made from.
pub fn annotate_reprint(payload: &Value, source: JobId) -> AppResult<Value> {
    let Value::Object(map) = payload else {
        return Err(AppError::validation("Stored job_data is not a JSON object"));
    };
    let mut map = map.clone();
    map.insert(REPRINT_OF_KEY.to_string(), Value::from(source.get()));
    Ok(Value::Object(map))
}
