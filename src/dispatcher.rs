use lambda_runtime::tracing::{error, info};
use serde_json::{Map, Value, json};

use crate::config::Config;
use crate::http::{HttpClient, JsonPost, RemoteStatus};
use crate::models::error::AppError;

/// Rundeck API version used for the job run endpoint
pub const RUNDECK_API_VERSION: u32 = 18;
/// Header carrying the Rundeck API token
pub const AUTH_TOKEN_HEADER: &str = "X-Rundeck-Auth-Token";

/// URL of the run endpoint for `job_id`, which is percent-encoded.
#[must_use]
pub fn job_run_url(config: &Config, job_id: &str) -> String {
    format!(
        "{}:{}/api/{RUNDECK_API_VERSION}/job/{}/run",
        config.hostname,
        config.port,
        urlencoding::encode(job_id)
    )
}

/// Builds the run request. Rundeck receives the options as one JSON-encoded
/// string under `options`.
///
/// # Errors
///
/// Returns `AppError::SerializationError` if the options cannot be encoded.
pub fn run_job_request(
    config: &Config,
    job_id: &str,
    options: &Map<String, Value>,
) -> Result<JsonPost, AppError> {
    let encoded_options = serde_json::to_string(options)?;

    Ok(JsonPost {
        url: job_run_url(config, job_id),
        headers: vec![
            ("Accept".to_string(), "application/json".to_string()),
            ("Content-Type".to_string(), "application/json".to_string()),
            (AUTH_TOKEN_HEADER.to_string(), config.auth_token.clone()),
        ],
        body: json!({ "options": encoded_options }),
    })
}

/// Triggers a Rundeck job and returns the remote status line as-is.
///
/// Non-2xx replies are returned as `Ok`; only a call that got no response
/// at all is an error.
///
/// # Errors
///
/// This function will return an error if:
/// - The options cannot be encoded (`SerializationError`).
/// - The request could not be sent or no response arrived (`DispatchError`).
pub async fn run_job<C>(
    client: &C,
    config: &Config,
    job_id: &str,
    options: &Map<String, Value>,
) -> Result<RemoteStatus, AppError>
where
    C: HttpClient + ?Sized,
{
    let request = run_job_request(config, job_id, options)?;

    info!(
        job_id = %job_id,
        option_count = options.len(),
        "Triggering Rundeck job"
    );

    let status = client.post_json(request).await.map_err(|e| {
        error!(job_id = %job_id, error = %e, "Rundeck call failed");
        AppError::DispatchError(e.to_string())
    })?;

    info!(
        job_id = %job_id,
        status = status.code,
        message = %status.message,
        "Rundeck responded"
    );

    Ok(status)
}
