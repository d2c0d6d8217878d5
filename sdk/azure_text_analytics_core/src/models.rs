//! Common wire types shared across all Text Analytics operations.

use serde::{Deserialize, Serialize};

/// A warning the service attached to a single document result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warning {
    pub code: String,
    pub message: String,
}

/// Character and transaction accounting for one document.
///
/// Only present when the request asked for statistics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStatistics {
    pub characters_count: u32,
    pub transactions_count: u32,
}

/// Request-level accounting, present when statistics were requested.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestStatistics {
    pub documents_count: u32,
    pub valid_documents_count: u32,
    pub erroneous_documents_count: u32,
    pub transactions_count: u32,
}

/// The error payload the service attaches to a rejected document.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentError {
    pub id: String,
    pub error: ServiceError,
}

/// An error object as returned by the service.
///
/// The outer code is a broad category (`InvalidRequest`); the nested
/// `innererror`, when present, carries the specific cause
/// (`InvalidDocument`, `UnsupportedLanguageCode`, ...).
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceError {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub innererror: Option<InnerError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InnerError {
    pub code: String,
    pub message: String,
}

impl ServiceError {
    /// The most specific (code, message) pair, preferring `innererror`.
    pub fn innermost(&self) -> (String, String) {
        match &self.innererror {
            Some(inner) => (inner.code.clone(), inner.message.clone()),
            None => (self.code.clone(), self.message.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn innermost_prefers_nested_error() {
        let error: ServiceError = serde_json::from_value(serde_json::json!({
            "code": "InvalidRequest",
            "message": "Invalid document in request.",
            "innererror": {
                "code": "InvalidDocument",
                "message": "Document text is empty."
            }
        }))
        .unwrap();

        let (code, message) = error.innermost();
        assert_eq!(code, "InvalidDocument");
        assert_eq!(message, "Document text is empty.");
    }

    #[test]
    fn innermost_falls_back_to_outer_error() {
        let error: ServiceError = serde_json::from_value(serde_json::json!({
            "code": "InvalidRequest",
            "message": "Something was wrong with the request."
        }))
        .unwrap();

        let (code, message) = error.innermost();
        assert_eq!(code, "InvalidRequest");
        assert_eq!(message, "Something was wrong with the request.");
    }

    #[test]
    fn statistics_deserialize_from_camel_case() {
        let stats: RequestStatistics = serde_json::from_value(serde_json::json!({
            "documentsCount": 5,
            "validDocumentsCount": 4,
            "erroneousDocumentsCount": 1,
            "transactionsCount": 4
        }))
        .unwrap();

        assert_eq!(stats.documents_count, 5);
        assert_eq!(stats.valid_documents_count, 4);
        assert_eq!(stats.erroneous_documents_count, 1);
        assert_eq!(stats.transactions_count, 4);
    }
}
