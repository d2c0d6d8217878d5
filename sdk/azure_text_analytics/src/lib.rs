#![doc = include_str!("../README.md")]

pub mod language;

/// Test utilities shared across modules.
#[cfg(test)]
pub(crate) mod test_utils {
    use azure_text_analytics_core::auth::TextAnalyticsCredential;
    use azure_text_analytics_core::client::TextAnalyticsClient;
    use wiremock::MockServer;

    /// Test API key (not a real key).
    pub const TEST_API_KEY: &str = "test-api-key";

    /// Document used by the authentication sample and throughout the tests.
    pub const SAMPLE_DOCUMENT: &str = "I need to take my cat to the veterinarian.";

    /// Create a test client connected to a mock server.
    pub fn setup_mock_client(server: &MockServer) -> TextAnalyticsClient {
        TextAnalyticsClient::builder()
            .endpoint(server.uri())
            .credential(TextAnalyticsCredential::api_key(TEST_API_KEY))
            .build()
            .expect("should build client")
    }
}
