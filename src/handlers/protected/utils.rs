use axum::body::Bytes;
use serde_json::Value;

use crate::database::Document;
use crate::error::ApiError;

/// Parse a request body as a JSON object. An empty body is an empty object.
pub fn json_object(body: &Bytes) -> Result<Document, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Document::new());
    }
    match serde_json::from_slice::<Value>(body)? {
        Value::Object(map) => Ok(map),
        _ => Err(ApiError::bad_request("Request body must be a JSON object")),
    }
}
