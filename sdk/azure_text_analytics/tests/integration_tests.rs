//! Integration tests for azure_text_analytics.
//!
//! These tests require a live Text Analytics endpoint.
//! Run with: `cargo test --features integration-tests`
//!
//! Required environment variables:
//! - `AZURE_TEXT_ANALYTICS_ENDPOINT`: The Text Analytics endpoint URL
//! - `AZURE_TEXT_ANALYTICS_KEY`: The API key for authentication
//!
//! The Entra ID test additionally needs credentials the default chain can
//! resolve (`AZURE_CLIENT_ID`, `AZURE_TENANT_ID`, `AZURE_CLIENT_SECRET`).

#![cfg(feature = "integration-tests")]

use azure_text_analytics::language::{
    detect_language, detect_language_batch, DetectLanguageInput, DetectLanguageOptions,
};
use azure_text_analytics_core::auth::TextAnalyticsCredential;
use azure_text_analytics_core::client::TextAnalyticsClient;

fn get_endpoint() -> String {
    std::env::var("AZURE_TEXT_ANALYTICS_ENDPOINT").expect("AZURE_TEXT_ANALYTICS_ENDPOINT not set")
}

fn get_api_key_client() -> TextAnalyticsClient {
    let api_key =
        std::env::var("AZURE_TEXT_ANALYTICS_KEY").expect("AZURE_TEXT_ANALYTICS_KEY not set");

    TextAnalyticsClient::builder()
        .endpoint(get_endpoint())
        .credential(TextAnalyticsCredential::api_key(api_key))
        .build()
        .expect("Failed to build client")
}

#[tokio::test]
async fn test_detect_language_with_api_key() {
    let client = get_api_key_client();

    let results = detect_language(&client, &["I need to take my cat to the veterinarian."])
        .await
        .expect("detect language");

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].primary_language.name, "English");
    assert!(results[0].primary_language.score > 0.5);
}

#[tokio::test]
async fn test_detect_language_with_entra_id() {
    let client = TextAnalyticsClient::builder()
        .endpoint(get_endpoint())
        .credential(
            TextAnalyticsCredential::default_azure_credential().expect("default credential"),
        )
        .build()
        .expect("Failed to build client");

    let results = detect_language(&client, &["I need to take my cat to the veterinarian."])
        .await
        .expect("detect language");

    assert_eq!(results[0].primary_language.iso6391_name, "en");
}

#[tokio::test]
async fn test_detect_language_batch_with_hints_and_stats() {
    let client = get_api_key_client();

    let documents = vec![
        DetectLanguageInput::new("1", "Este documento está en español."),
        DetectLanguageInput::new("2", "This one is in English.").with_country_hint("US"),
    ];
    let options = DetectLanguageOptions::default().show_stats();

    let collection = detect_language_batch(&client, &documents, &options)
        .await
        .expect("detect language batch");

    assert_eq!(collection.documents.len(), 2);
    assert_eq!(collection.documents[0].id, "1");
    assert_eq!(collection.documents[0].primary_language.iso6391_name, "es");
    assert!(collection.statistics.is_some());
}
