//! Language detection types and API calls for Azure Text Analytics.

use std::collections::HashMap;

use azure_text_analytics_core::client::TextAnalyticsClient;
use azure_text_analytics_core::error::{TextAnalyticsError, TextAnalyticsResult};
use azure_text_analytics_core::models::{
    DocumentError, DocumentStatistics, RequestStatistics, Warning,
};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// A single document submitted for language detection.
#[derive(Debug, Clone)]
pub struct DetectLanguageInput {
    /// Unique, non-empty id for the document within the batch.
    pub id: String,
    /// The text to analyze.
    pub text: String,
    /// ISO 3166-1 alpha-2 country hint. When unset, the service default
    /// applies (currently `US`).
    pub country_hint: Option<String>,
}

impl DetectLanguageInput {
    /// Create an input document.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            country_hint: None,
        }
    }

    /// Set the country hint for this document.
    pub fn with_country_hint(mut self, hint: impl Into<String>) -> Self {
        self.country_hint = Some(hint.into());
        self
    }
}

/// Per-call options for language detection.
#[derive(Debug, Clone, Default)]
pub struct DetectLanguageOptions {
    country_hint: Option<String>,
    model_version: Option<String>,
    show_stats: bool,
}

impl DetectLanguageOptions {
    /// Country hint applied to every document that does not carry its own.
    pub fn country_hint(mut self, hint: impl Into<String>) -> Self {
        self.country_hint = Some(hint.into());
        self
    }

    /// Pin the service model version (e.g. `2021-11-20`). Defaults to
    /// `latest` on the service side.
    pub fn model_version(mut self, version: impl Into<String>) -> Self {
        self.model_version = Some(version.into());
        self
    }

    /// Ask the service to include document and request statistics.
    pub fn show_stats(mut self) -> Self {
        self.show_stats = true;
        self
    }
}

#[derive(Serialize)]
struct LanguageBatchRequest<'a> {
    documents: Vec<LanguageInputRef<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LanguageInputRef<'a> {
    id: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    country_hint: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// The full response for a language detection batch.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectLanguageResultCollection {
    /// Successfully analyzed documents, in request order.
    pub documents: Vec<DetectLanguageResult>,
    /// Documents the service rejected, in request order.
    #[serde(default)]
    pub errors: Vec<DocumentError>,
    /// The model version that produced the results.
    pub model_version: String,
    /// Request-level statistics, present when requested via
    /// [`DetectLanguageOptions::show_stats`].
    #[serde(default)]
    pub statistics: Option<RequestStatistics>,
}

/// The detection result for one document.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectLanguageResult {
    pub id: String,
    /// The service's best-guess language for the document.
    #[serde(rename = "detectedLanguage")]
    pub primary_language: DetectedLanguage,
    #[serde(default)]
    pub warnings: Vec<Warning>,
    #[serde(default)]
    pub statistics: Option<DocumentStatistics>,
}

/// A detected language with its confidence score.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectedLanguage {
    /// Human-readable language name, e.g. `English`.
    pub name: String,
    /// Two-letter ISO 639-1 code, e.g. `en`.
    #[serde(rename = "iso6391Name")]
    pub iso6391_name: String,
    /// Confidence in [0, 1].
    #[serde(rename = "confidenceScore")]
    pub score: f64,
}

// ---------------------------------------------------------------------------
// API functions
// ---------------------------------------------------------------------------

/// Detect the language of each document in `documents`.
///
/// Documents are assigned ids `"0"`, `"1"`, ... from their position.
/// Results come back in input order. If the service rejects any document,
/// the first rejection is returned as [`TextAnalyticsError::Document`].
///
/// # Example
///
/// ```rust,no_run
/// # use azure_text_analytics_core::client::TextAnalyticsClient;
/// # use azure_text_analytics::language::detect_language;
/// # async fn example(client: &TextAnalyticsClient) -> azure_text_analytics_core::error::TextAnalyticsResult<()> {
/// let results = detect_language(client, &["I need to take my cat to the veterinarian."]).await?;
///
/// println!("Language detected: {}", results[0].primary_language.name);
/// println!("Confidence score: {:?}", results[0].primary_language.score);
/// # Ok(())
/// # }
/// ```
///
/// # Tracing
///
/// Emits a span named `textanalytics::languages::detect` with field `count`.
#[tracing::instrument(
    name = "textanalytics::languages::detect",
    skip(client, documents),
    fields(count = documents.len())
)]
pub async fn detect_language(
    client: &TextAnalyticsClient,
    documents: &[&str],
) -> TextAnalyticsResult<Vec<DetectLanguageResult>> {
    let inputs: Vec<DetectLanguageInput> = documents
        .iter()
        .enumerate()
        .map(|(position, text)| DetectLanguageInput::new(position.to_string(), *text))
        .collect();

    let collection =
        detect_language_batch(client, &inputs, &DetectLanguageOptions::default()).await?;

    if let Some(rejected) = collection.errors.into_iter().next() {
        let (code, message) = rejected.error.innermost();
        return Err(TextAnalyticsError::Document {
            id: rejected.id,
            code,
            message,
        });
    }

    Ok(collection.documents)
}

/// Detect languages for a batch of documents with explicit ids and options.
///
/// The service may return documents and errors in any order; both are
/// re-sorted to request order before returning.
///
/// # Tracing
///
/// Emits a span named `textanalytics::languages::detect_batch` with field
/// `count`.
#[tracing::instrument(
    name = "textanalytics::languages::detect_batch",
    skip(client, documents, options),
    fields(count = documents.len())
)]
pub async fn detect_language_batch(
    client: &TextAnalyticsClient,
    documents: &[DetectLanguageInput],
    options: &DetectLanguageOptions,
) -> TextAnalyticsResult<DetectLanguageResultCollection> {
    if documents.is_empty() {
        return Err(TextAnalyticsError::InvalidInput(
            "input documents can not be empty".into(),
        ));
    }

    tracing::debug!("detecting language");

    let body = LanguageBatchRequest {
        documents: documents
            .iter()
            .map(|document| LanguageInputRef {
                id: &document.id,
                text: &document.text,
                country_hint: document
                    .country_hint
                    .as_deref()
                    .or(options.country_hint.as_deref()),
            })
            .collect(),
    };

    let path = languages_path(client.api_version(), options);
    let response = client.post(&path, &body).await?;
    let mut collection = response.json::<DetectLanguageResultCollection>().await?;

    restore_request_order(documents, &mut collection);

    tracing::debug!(
        documents = collection.documents.len(),
        errors = collection.errors.len(),
        "languages detected"
    );
    Ok(collection)
}

fn languages_path(api_version: &str, options: &DetectLanguageOptions) -> String {
    let mut path = format!("/text/analytics/{api_version}/languages");

    let mut query = Vec::new();
    if let Some(version) = &options.model_version {
        query.push(format!("model-version={version}"));
    }
    if options.show_stats {
        query.push("showStats=true".to_string());
    }
    if !query.is_empty() {
        path.push('?');
        path.push_str(&query.join("&"));
    }

    path
}

/// Sort `documents` and `errors` back into request order. Ids the request
/// never sent sort last.
fn restore_request_order(
    documents: &[DetectLanguageInput],
    collection: &mut DetectLanguageResultCollection,
) {
    let order: HashMap<&str, usize> = documents
        .iter()
        .enumerate()
        .map(|(position, document)| (document.id.as_str(), position))
        .collect();

    collection
        .documents
        .sort_by_key(|result| order.get(result.id.as_str()).copied().unwrap_or(usize::MAX));
    collection
        .errors
        .sort_by_key(|error| order.get(error.id.as_str()).copied().unwrap_or(usize::MAX));
}
