//! Demonstrates the two supported ways of authenticating to the Text
//! Analytics service:
//!
//! 1. A Cognitive Services / Text Analytics API key.
//! 2. A Microsoft Entra ID token obtained through the default credential
//!    chain.
//!
//! Set these environment variables before running:
//! - `AZURE_TEXT_ANALYTICS_ENDPOINT` - the endpoint of your Cognitive
//!   Services / Text Analytics resource
//! - `AZURE_TEXT_ANALYTICS_KEY` - your Text Analytics API key
//! - `AZURE_CLIENT_ID` - the client ID of your active directory application
//! - `AZURE_TENANT_ID` - the tenant ID of your active directory application
//! - `AZURE_CLIENT_SECRET` - the secret of your active directory application

use std::env;
use std::error::Error;

use azure_text_analytics::language::{detect_language, DetectLanguageResult};
use azure_text_analytics_core::auth::TextAnalyticsCredential;
use azure_text_analytics_core::client::TextAnalyticsClient;

const DOCUMENT: &str = "I need to take my cat to the veterinarian.";

async fn authentication_with_api_key_credential() -> Result<(), Box<dyn Error>> {
    let endpoint = env::var("AZURE_TEXT_ANALYTICS_ENDPOINT")?;
    let key = env::var("AZURE_TEXT_ANALYTICS_KEY")?;

    let client = TextAnalyticsClient::builder()
        .endpoint(endpoint)
        .credential(TextAnalyticsCredential::api_key(key))
        .build()?;

    let results = detect_language(&client, &[DOCUMENT]).await?;
    println!("{}", detection_summary(&results[0]));

    Ok(())
}

/// The default credential chain reads `AZURE_CLIENT_ID`, `AZURE_TENANT_ID`
/// and `AZURE_CLIENT_SECRET` from the environment.
async fn authentication_with_azure_active_directory() -> Result<(), Box<dyn Error>> {
    let endpoint = env::var("AZURE_TEXT_ANALYTICS_ENDPOINT")?;

    let client = TextAnalyticsClient::builder()
        .endpoint(endpoint)
        .credential(TextAnalyticsCredential::default_azure_credential()?)
        .build()?;

    let results = detect_language(&client, &[DOCUMENT]).await?;
    println!("{}", detection_summary(&results[0]));

    Ok(())
}

fn detection_summary(result: &DetectLanguageResult) -> String {
    format!(
        "Language detected: {}\nConfidence score: {:?}",
        result.primary_language.name, result.primary_language.score
    )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    authentication_with_api_key_credential().await?;
    authentication_with_azure_active_directory().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use azure_text_analytics::language::DetectedLanguage;

    fn result(name: &str, score: f64) -> DetectLanguageResult {
        DetectLanguageResult {
            id: "0".to_string(),
            primary_language: DetectedLanguage {
                name: name.to_string(),
                iso6391_name: "en".to_string(),
                score,
            },
            warnings: Vec::new(),
            statistics: None,
        }
    }

    #[test]
    fn summary_prints_name_then_score() {
        assert_eq!(
            detection_summary(&result("English", 1.0)),
            "Language detected: English\nConfidence score: 1.0"
        );
    }

    #[test]
    fn summary_keeps_fractional_scores() {
        assert_eq!(
            detection_summary(&result("Spanish", 0.85)),
            "Language detected: Spanish\nConfidence score: 0.85"
        );
    }
}
