use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::error::AppError;

/// Message returned for every validation failure (missing job id, failed
/// header check, failed body check). Callers match on it, so it never changes.
pub const VALIDATION_FAILED_MESSAGE: &str =
    "Missing target Rundeck Job ID or failed headers or body keys checks.";

/// API Gateway proxy response returned by the adapter
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdapterResponse {
    #[schemars(description = "Rundeck status code, or 400 when validation failed")]
    pub status_code: u16,
    #[schemars(description = "JSON-encoded object with `message` and the echoed `input` event")]
    pub body: String,
}

// Encoded into `AdapterResponse::body`
#[derive(Serialize)]
struct ResponseBody<'a> {
    message: &'a str,
    input: &'a Value,
}

impl AdapterResponse {
    /// Builds a response echoing the untouched inbound event.
    ///
    /// # Errors
    ///
    /// Returns `AppError::SerializationError` if the body cannot be encoded.
    pub fn new(status_code: u16, message: &str, input: &Value) -> Result<Self, AppError> {
        let body = serde_json::to_string(&ResponseBody { message, input })?;
        Ok(Self { status_code, body })
    }

    /// The fixed 400 response for a request that failed validation.
    ///
    /// # Errors
    ///
    /// Returns `AppError::SerializationError` if the body cannot be encoded.
    pub fn validation_failed(input: &Value) -> Result<Self, AppError> {
        Self::new(400, VALIDATION_FAILED_MESSAGE, input)
    }
}
