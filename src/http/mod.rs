use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::config::Config;

/// Error type returned by [`HttpClient`] implementations.
pub type HttpError = Box<dyn std::error::Error + Send + Sync>;

/// An outbound JSON POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPost {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

/// Status line of the remote reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteStatus {
    pub code: u16,
    /// Reason phrase, empty when the code has none
    pub message: String,
}

/// Trait for HTTP client operations to enable testing with mocks.
///
/// This trait abstracts HTTP operations to allow dependency injection
/// for testing purposes, preventing tests from making real network calls.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Send a POST request with a JSON body and return the status line.
    ///
    /// A reply with any status code, including 4xx and 5xx, is `Ok`.
    ///
    /// # Errors
    ///
    /// Returns an error only if no HTTP response was received.
    async fn post_json(&self, request: JsonPost) -> Result<RemoteStatus, HttpError>;
}

/// Production HTTP client implementation using reqwest.
pub struct ReqwestClient {
    client: Client,
}

impl ReqwestClient {
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client honouring the certificate validation override.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder()
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .context("Failed to build the Rundeck HTTP client")?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn post_json(&self, request: JsonPost) -> Result<RemoteStatus, HttpError> {
        // Content-Type comes from `request.headers`, so the body is encoded here
        // rather than through `RequestBuilder::json`.
        let body = serde_json::to_vec(&request.body)?;
        let mut builder = self.client.post(&request.url).body(body);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let response = builder
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", request.url))?;

        let status = response.status();
        Ok(RemoteStatus {
            code: status.as_u16(),
            message: status.canonical_reason().unwrap_or_default().to_string(),
        })
    }
}
