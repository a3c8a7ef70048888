//! Inbound API Gateway proxy event carrying a GitHub webhook delivery.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

use crate::models::error::AppError;

/// Header GitHub uses to name the webhook event type
pub const GITHUB_EVENT_HEADER: &str = "X-GitHub-Event";
/// Header GitHub uses to identify a single delivery
pub const GITHUB_DELIVERY_HEADER: &str = "X-GitHub-Delivery";
/// Event type GitHub sends when a webhook is created or pinged manually
pub const PING_EVENT: &str = "ping";

/// Typed view of the proxy event fields the adapter reads.
///
/// API Gateway sends `null` for `headers` and `queryStringParameters` when
/// there are none, so both are optional.
#[derive(Deserialize, Serialize, Debug, Default, Clone, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InboundEvent {
    #[serde(default)]
    #[schemars(description = "Request headers, names are matched case-sensitively")]
    pub headers: Option<HashMap<String, String>>,
    #[serde(default)]
    #[schemars(description = "Query parameters carrying the job id, checks and pass-keys")]
    pub query_string_parameters: Option<BTreeMap<String, String>>,
    #[serde(default)]
    #[schemars(description = "JSON-encoded webhook payload")]
    pub body: Option<String>,
}

impl InboundEvent {
    /// Reads the typed view out of a raw event without consuming it.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` if the event is not a proxy event
    /// (for example a header value that is not a string).
    pub fn from_value(event: &Value) -> Result<Self, AppError> {
        Self::deserialize(event)
            .map_err(|e| AppError::InvalidInput(format!("Unrecognised event shape: {e}")))
    }

    /// Looks up a header by its exact name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .as_ref()
            .and_then(|headers| headers.get(name))
            .map(String::as_str)
    }

    /// True when GitHub flagged this delivery as a connectivity check.
    #[must_use]
    pub fn is_ping(&self) -> bool {
        self.header(GITHUB_EVENT_HEADER) == Some(PING_EVENT)
    }

    /// Iterates the query parameters in name order.
    pub fn query_parameters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.query_string_parameters
            .iter()
            .flatten()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Parses the webhook payload into a JSON object.
    ///
    /// An absent body is treated as an empty object.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` if the body is not valid JSON or is
    /// valid JSON but not an object.
    pub fn parse_body(&self) -> Result<Map<String, Value>, AppError> {
        let Some(raw) = self.body.as_deref() else {
            return Ok(Map::new());
        };

        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(body)) => Ok(body),
            Ok(other) => Err(AppError::InvalidInput(format!(
                "Request body must be a JSON object, got {}",
                json_kind(&other)
            ))),
            Err(e) => Err(AppError::InvalidInput(format!(
                "Request body is not valid JSON: {e}"
            ))),
        }
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
