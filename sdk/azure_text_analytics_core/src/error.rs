use thiserror::Error;

/// Errors that can occur when interacting with the Text Analytics API.
#[derive(Error, Debug)]
pub enum TextAnalyticsError {
    /// The request failed due to an HTTP error.
    #[error("HTTP error: {status} - {message}")]
    Http { status: u16, message: String },

    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The request payload could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The HTTP request failed at the transport level.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint URL is invalid.
    #[error("Invalid endpoint URL: {message}")]
    InvalidEndpoint {
        message: String,
        #[source]
        source: Option<url::ParseError>,
    },

    /// A required configuration value is missing.
    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    /// The API returned an error response.
    #[error("API error ({code}): {message}")]
    Api { code: String, message: String },

    /// The service rejected a single document within an otherwise
    /// successful batch.
    #[error("Document '{id}' was rejected by the service ({code}): {message}")]
    Document {
        id: String,
        code: String,
        message: String,
    },

    /// The input was rejected before any request was sent.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl TextAnalyticsError {
    pub(crate) fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    pub(crate) fn invalid_endpoint_with_source(
        message: impl Into<String>,
        source: url::ParseError,
    ) -> Self {
        Self::InvalidEndpoint {
            message: message.into(),
            source: Some(source),
        }
    }
}

/// Result type alias for Text Analytics operations.
pub type TextAnalyticsResult<T> = std::result::Result<T, TextAnalyticsError>;
