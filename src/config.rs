//! Process configuration loaded from the Lambda environment.

use lambda_runtime::tracing::warn;

use crate::models::error::AppError;

/// Rundeck base host, with or without scheme
pub const HOSTNAME_VAR: &str = "RUNDECK_HOSTNAME";
/// Rundeck TCP port
pub const PORT_VAR: &str = "RUNDECK_PORT";
/// Rundeck API token sent as `X-Rundeck-Auth-Token`
pub const AUTH_TOKEN_VAR: &str = "RUNDECK_AUTH_TOKEN";
/// Job run for GitHub ping deliveries
pub const PING_JOB_VAR: &str = "RUNDECK_JOB_UUID_PING";
/// Opt-in switch that disables TLS certificate validation
pub const ACCEPT_INVALID_CERTS_VAR: &str = "RUNDECK_ACCEPT_INVALID_CERTS";

/// Immutable adapter configuration, read once at cold start.
#[derive(Clone)]
pub struct Config {
    /// Base URL of the Rundeck host including scheme, without port
    pub hostname: String,
    pub port: u16,
    pub auth_token: String,
    /// Job id dispatched for `X-GitHub-Event: ping`
    pub ping_job_id: String,
    /// Skip certificate validation on the outbound call
    pub accept_invalid_certs: bool,
}

// Keeps the token out of logs
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("hostname", &self.hostname)
            .field("port", &self.port)
            .field("auth_token", &"<redacted>")
            .field("ping_job_id", &self.ping_job_id)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .finish()
    }
}

impl Config {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ConfigError` if a required variable is missing or
    /// the port is not a valid number.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ConfigError` if a required variable is missing or
    /// the port is not a valid number.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or_else(|| AppError::ConfigError(format!("{name} is not set")))
        };

        let hostname = normalize_hostname(&required(HOSTNAME_VAR)?);
        let port = required(PORT_VAR)?
            .parse::<u16>()
            .map_err(|e| AppError::ConfigError(format!("{PORT_VAR} is not a valid port: {e}")))?;
        let auth_token = required(AUTH_TOKEN_VAR)?;
        let ping_job_id = required(PING_JOB_VAR)?;
        let accept_invalid_certs = lookup(ACCEPT_INVALID_CERTS_VAR)
            .as_deref()
            .is_some_and(is_truthy);

        if accept_invalid_certs {
            warn!(
                variable = ACCEPT_INVALID_CERTS_VAR,
                "TLS certificate validation is DISABLED for Rundeck calls"
            );
        }

        Ok(Self {
            hostname,
            port,
            auth_token,
            ping_job_id,
            accept_invalid_certs,
        })
    }
}

/// Adds `https://` when no scheme is given and drops any trailing slash.
fn normalize_hostname(hostname: &str) -> String {
    let hostname = hostname.trim_end_matches('/');
    if hostname.contains("://") {
        hostname.to_string()
    } else {
        format!("https://{hostname}")
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
