//! HTTP client for the Azure Text Analytics service.
//!
//! This module provides [`TextAnalyticsClient`], the entry point for
//! interacting with a Cognitive Services / Text Analytics resource. The
//! client handles authentication, HTTP transport, and endpoint management;
//! operation crates layer the individual REST calls on top of it.
//!
//! # Examples
//!
//! ## Using an API key
//! ```rust,no_run
//! use azure_text_analytics_core::auth::TextAnalyticsCredential;
//! use azure_text_analytics_core::client::TextAnalyticsClient;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = TextAnalyticsClient::builder()
//!     .endpoint("https://your-resource.cognitiveservices.azure.com")
//!     .credential(TextAnalyticsCredential::api_key("your-key"))
//!     .build()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Using the default Entra ID credential chain
//! ```rust,no_run
//! use azure_text_analytics_core::auth::TextAnalyticsCredential;
//! use azure_text_analytics_core::client::TextAnalyticsClient;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = TextAnalyticsClient::builder()
//!     .endpoint("https://your-resource.cognitiveservices.azure.com")
//!     .credential(TextAnalyticsCredential::default_azure_credential()?)
//!     .build()?;
//! # Ok(())
//! # }
//! ```

use crate::auth::TextAnalyticsCredential;
use crate::error::{TextAnalyticsError, TextAnalyticsResult};
use reqwest::Client as HttpClient;
use url::Url;

use std::time::Duration;

/// Default Text Analytics REST API version, used as a path segment
/// (`/text/analytics/v3.1/...`).
pub const DEFAULT_API_VERSION: &str = "v3.1";

/// Default connection timeout (10 seconds).
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default read/response timeout (60 seconds).
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(60);

/// Determines if an HTTP status code represents a retriable error.
///
/// Retriable errors are transient server-side issues that may succeed on retry:
/// - 429 Too Many Requests (rate limiting)
/// - 500 Internal Server Error
/// - 502 Bad Gateway
/// - 503 Service Unavailable
/// - 504 Gateway Timeout
#[inline]
pub fn is_retriable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Configuration for automatic retry behavior on transient errors.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts (not counting the initial request).
    pub max_retries: u32,
    /// Initial backoff duration before the first retry.
    /// Subsequent retries use exponential backoff (2^attempt * initial_backoff).
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(500),
        }
    }
}

/// The base client for interacting with the Text Analytics API.
///
/// This client handles authentication, HTTP transport, and endpoint
/// management. Operation crates (`azure_text_analytics`) use it to make
/// API calls.
///
/// The client is cheaply cloneable and can be shared across threads. It is
/// stateless across calls.
#[derive(Debug, Clone)]
pub struct TextAnalyticsClient {
    pub(crate) http: HttpClient,
    pub(crate) endpoint: Url,
    pub(crate) credential: TextAnalyticsCredential,
    pub(crate) api_version: String,
    pub(crate) retry_policy: RetryPolicy,
}

/// Builder for constructing a [`TextAnalyticsClient`].
///
/// Use [`TextAnalyticsClient::builder()`] to create a new builder.
#[derive(Debug, Default)]
pub struct TextAnalyticsClientBuilder {
    endpoint: Option<String>,
    credential: Option<TextAnalyticsCredential>,
    api_version: Option<String>,
    http_client: Option<HttpClient>,
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
    retry_policy: Option<RetryPolicy>,
}

impl TextAnalyticsClient {
    /// Create a new builder for configuring a `TextAnalyticsClient`.
    pub fn builder() -> TextAnalyticsClientBuilder {
        TextAnalyticsClientBuilder::default()
    }

    /// Get the base endpoint URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Get the API version being used.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Get the retry policy configuration.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Build a full URL for an API path.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be joined to the endpoint URL.
    pub fn url(&self, path: &str) -> TextAnalyticsResult<Url> {
        self.endpoint.join(path).map_err(|e| {
            TextAnalyticsError::invalid_endpoint_with_source("failed to construct URL", e)
        })
    }

    /// Send a POST request with a JSON body, retrying transient errors.
    ///
    /// Resolves the credential to an authentication header before the first
    /// attempt. Retries on retriable HTTP errors (429, 500, 502, 503, 504)
    /// with exponential backoff.
    ///
    /// # Errors
    ///
    /// Returns an error if authentication fails, serialization fails,
    /// the request fails after all retries, or the server returns a
    /// non-retriable error response.
    pub async fn post<T: serde::Serialize>(
        &self,
        path: &str,
        body: &T,
    ) -> TextAnalyticsResult<reqwest::Response> {
        let url = self.url(path)?;
        let auth = self.credential.resolve().await?;

        for attempt in 0..=self.retry_policy.max_retries {
            let response = self
                .http
                .post(url.clone())
                .header(auth.name, &auth.value)
                .json(body)
                .send()
                .await?;

            let status = response.status().as_u16();

            if response.status().is_success() {
                return Ok(response);
            }

            // Non-retriable error or last attempt - return error
            if !is_retriable_status(status) || attempt == self.retry_policy.max_retries {
                return Self::check_response(response).await;
            }

            // Exponential backoff with jitter in [0.75, 1.25] of the base.
            let base_backoff = self.retry_policy.initial_backoff * 2_u32.pow(attempt);
            let jitter = 0.75 + fastrand::f64() * 0.5;
            let backoff = base_backoff.mul_f64(jitter);
            tracing::warn!(
                status,
                attempt,
                backoff_ms = backoff.as_millis() as u64,
                "transient error, retrying"
            );
            tokio::time::sleep(backoff).await;
        }

        unreachable!("retry loop should return before reaching here")
    }

    /// Maximum length for error messages to prevent sensitive data leaks.
    const MAX_ERROR_MESSAGE_LEN: usize = 1000;

    /// Sanitize error messages by removing bearer tokens and subscription
    /// keys echoed back by proxies or the service.
    pub(crate) fn sanitize_error_message(msg: &str) -> String {
        let result = redact_after_marker(msg, "Bearer ");
        redact_after_marker(&result, "Ocp-Apim-Subscription-Key: ")
    }

    /// Truncate a message if it exceeds the maximum length.
    /// Sanitizes sensitive data before truncating.
    pub(crate) fn truncate_message(msg: &str) -> String {
        let sanitized = Self::sanitize_error_message(msg);

        if sanitized.len() > Self::MAX_ERROR_MESSAGE_LEN {
            format!(
                "{}... (truncated)",
                &sanitized[..Self::MAX_ERROR_MESSAGE_LEN]
            )
        } else {
            sanitized
        }
    }

    /// Check the response status and return an error if not successful.
    async fn check_response(response: reqwest::Response) -> TextAnalyticsResult<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        if let Ok(envelope) = serde_json::from_str::<serde_json::Value>(&body) {
            if let Some(err_obj) = envelope.get("error") {
                // The specific cause, when present, is nested under
                // `innererror` (outer codes are broad categories like
                // `InvalidRequest`).
                let detail = err_obj.get("innererror").unwrap_or(err_obj);
                return Err(TextAnalyticsError::Api {
                    code: detail
                        .get("code")
                        .and_then(|c| c.as_str())
                        .unwrap_or("unknown")
                        .to_string(),
                    message: Self::truncate_message(
                        detail
                            .get("message")
                            .and_then(|m| m.as_str())
                            .unwrap_or(&body),
                    ),
                });
            }
        }

        Err(TextAnalyticsError::http(status, Self::truncate_message(&body)))
    }
}

/// Replace everything between `marker` and the next delimiter with
/// `[REDACTED]`, for every occurrence of `marker`.
fn redact_after_marker(msg: &str, marker: &str) -> String {
    const REDACTED: &str = "[REDACTED]";

    let mut result = msg.to_string();
    let mut search_start = 0;

    while let Some(relative_pos) = result[search_start..].find(marker) {
        let secret_start = search_start + relative_pos + marker.len();

        if result[secret_start..].starts_with(REDACTED) {
            search_start = secret_start + REDACTED.len();
            continue;
        }

        let secret_end = result[secret_start..]
            .find(|c: char| c.is_whitespace() || c == '"' || c == '\'' || c == ',')
            .map(|pos| secret_start + pos)
            .unwrap_or(result.len());

        if secret_end > secret_start {
            result.replace_range(secret_start..secret_end, REDACTED);
            search_start = secret_start + REDACTED.len();
        } else {
            search_start = secret_start;
        }
    }

    result
}

impl TextAnalyticsClientBuilder {
    /// Set the Text Analytics endpoint URL.
    ///
    /// This should be in the format:
    /// `https://<resource-name>.cognitiveservices.azure.com`
    ///
    /// If not set, the builder will check the `AZURE_TEXT_ANALYTICS_ENDPOINT`
    /// environment variable.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the credential to use for authentication.
    ///
    /// If not set, the builder will use
    /// [`TextAnalyticsCredential::from_env()`], which checks for an API key
    /// in `AZURE_TEXT_ANALYTICS_KEY` and falls back to the default Entra ID
    /// chain.
    pub fn credential(mut self, credential: TextAnalyticsCredential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Set the REST API version path segment.
    ///
    /// Defaults to [`DEFAULT_API_VERSION`] (`v3.1`).
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Set a custom HTTP client.
    ///
    /// Use this to configure proxies or other HTTP settings.
    ///
    /// **Note:** If you provide a custom HTTP client, any timeout
    /// configuration via [`connect_timeout`](Self::connect_timeout) or
    /// [`read_timeout`](Self::read_timeout) will be ignored.
    pub fn http_client(mut self, client: HttpClient) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Set the connection timeout.
    ///
    /// This is the maximum time allowed for establishing a connection to
    /// the server.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the read timeout.
    ///
    /// This is the maximum time allowed for the entire request/response
    /// cycle including reading the body.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Set the retry policy for transient errors.
    ///
    /// Defaults to 3 retries with 500ms initial backoff.
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    /// Build the `TextAnalyticsClient`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No endpoint is provided and `AZURE_TEXT_ANALYTICS_ENDPOINT` is not set
    /// - The endpoint URL is invalid
    /// - Credential creation fails (when using environment-based credentials)
    pub fn build(self) -> TextAnalyticsResult<TextAnalyticsClient> {
        let http = self.http_client.unwrap_or_else(|| {
            let connect_timeout = self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT);
            let read_timeout = self.read_timeout.unwrap_or(DEFAULT_READ_TIMEOUT);

            reqwest::Client::builder()
                .connect_timeout(connect_timeout)
                .timeout(read_timeout)
                .build()
                .expect("failed to build HTTP client")
        });

        let endpoint_str = self
            .endpoint
            .or_else(|| std::env::var("AZURE_TEXT_ANALYTICS_ENDPOINT").ok())
            .ok_or_else(|| {
                TextAnalyticsError::MissingConfig(
                    "endpoint is required. Set it via builder or AZURE_TEXT_ANALYTICS_ENDPOINT env var."
                        .into(),
                )
            })?;

        let endpoint = Url::parse(&endpoint_str).map_err(|e| {
            TextAnalyticsError::invalid_endpoint_with_source("invalid endpoint URL", e)
        })?;

        let credential = self
            .credential
            .map(Ok)
            .unwrap_or_else(TextAnalyticsCredential::from_env)?;

        Ok(TextAnalyticsClient {
            http,
            endpoint,
            credential,
            api_version: self
                .api_version
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            retry_policy: self.retry_policy.unwrap_or_default(),
        })
    }
}
