use lambda_runtime::tracing::{debug, error, info, warn};
use lambda_runtime::{Diagnostic, LambdaEvent};
use serde_json::Value;

use crate::config::Config;
use crate::dispatcher::run_job;
use crate::http::{HttpClient, ReqwestClient};
use crate::interpreter::Directives;
use crate::models::event::{GITHUB_DELIVERY_HEADER, GITHUB_EVENT_HEADER};
use crate::models::{AdapterResponse, AppError, InboundEvent};

/// Configuration and HTTP client shared by every invocation.
pub struct Adapter<C> {
    config: Config,
    client: C,
}

impl Adapter<ReqwestClient> {
    /// Builds the production adapter from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ConfigError` if the configuration is incomplete or
    /// the HTTP client cannot be built.
    pub fn from_env() -> Result<Self, AppError> {
        let config = Config::from_env()?;
        let client = ReqwestClient::from_config(&config)
            .map_err(|e| AppError::ConfigError(format!("{e:#}")))?;
        Ok(Self::new(config, client))
    }
}

impl<C: HttpClient> Adapter<C> {
    pub const fn new(config: Config, client: C) -> Self {
        Self { config, client }
    }

    /// Translates one webhook delivery into at most one Rundeck call.
    ///
    /// `raw_event` is echoed unchanged in the response.
    ///
    /// # Errors
    ///
    /// - `InvalidInput`: the event is not a proxy event or its body is not a JSON object
    /// - `DispatchError`: Rundeck could not be reached
    /// - `SerializationError`: a request or response body could not be encoded
    pub async fn handle(&self, raw_event: &Value) -> Result<AdapterResponse, AppError> {
        let event = InboundEvent::from_value(raw_event)?;
        let body = event.parse_body()?;
        let directives = Directives::parse(event.query_parameters());

        if event.is_ping() {
            info!(
                job_id = %self.config.ping_job_id,
                "GitHub ping event, triggering the ping job"
            );
            let options = directives.forwarded_options(&body);
            let status = run_job(
                &self.client,
                &self.config,
                &self.config.ping_job_id,
                &options,
            )
            .await?;
            return AdapterResponse::new(status.code, &status.message, raw_event);
        }

        let intent = directives.interpret(event.headers.as_ref(), &body);
        debug!(
            has_job_id = intent.job_id.is_some(),
            checks_passed = intent.outcome.passed(),
            option_count = intent.options.len(),
            "Interpreted webhook delivery"
        );
        let validated = match intent.validate() {
            Ok(validated) => validated,
            Err(failure) => {
                warn!(reason = %failure, "Rejecting webhook delivery");
                return AdapterResponse::validation_failed(raw_event);
            }
        };

        let status = run_job(
            &self.client,
            &self.config,
            &validated.job_id,
            &validated.options,
        )
        .await?;
        AdapterResponse::new(status.code, &status.message, raw_event)
    }
}

/// Lambda event handler for API Gateway proxy events.
/// Logs the full event when `RUST_LOG=debug/trace`, only the GitHub event
/// type and delivery id otherwise.
///
/// # Errors
///
/// Returns a `Diagnostic` error with one of the following types:
///
/// - `InvalidInput`: the event or its body could not be parsed
/// - `DispatchError`: the Rundeck API could not be reached
/// - `SerializationError`: a request or response body could not be encoded
pub async fn function_handler<C: HttpClient>(
    adapter: &Adapter<C>,
    event: LambdaEvent<Value>,
) -> Result<AdapterResponse, Diagnostic> {
    let (payload, context) = event.into_parts();

    let github_header = |name: &str| {
        payload
            .get("headers")
            .and_then(|headers| headers.get(name))
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string()
    };
    info!(
        request_id = %context.request_id,
        github_event = %github_header(GITHUB_EVENT_HEADER),
        delivery = %github_header(GITHUB_DELIVERY_HEADER),
        "Received webhook delivery"
    );
    debug!(payload = ?payload, "Full event");

    match adapter.handle(&payload).await {
        Ok(response) => {
            info!(status = response.status_code, "Returning adapter response");
            Ok(response)
        }
        Err(e) => {
            error!(error_type = e.error_type(), error = %e, "Webhook handling failed");
            Err(e.into_diagnostic())
        }
    }
}
