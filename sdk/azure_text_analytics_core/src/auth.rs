use std::fmt;
use std::sync::Arc;

use azure_core::credentials::TokenCredential;
use azure_identity::DeveloperToolsCredential;
use secrecy::{ExposeSecret, SecretString};

use crate::error::{TextAnalyticsError, TextAnalyticsResult};

/// OAuth scope requested for Microsoft Entra ID tokens.
///
/// All Cognitive Services resources, Text Analytics included, accept tokens
/// issued for this scope.
pub const COGNITIVE_SERVICES_SCOPE: &str = "https://cognitiveservices.azure.com/.default";

/// Header carrying a static Cognitive Services subscription key.
const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Header carrying a bearer token.
const AUTHORIZATION_HEADER: &str = "Authorization";

/// Credential types supported by the Text Analytics SDK.
///
/// Exactly one variant authenticates a given client; the two are never
/// combined on a request.
#[derive(Clone)]
pub enum TextAnalyticsCredential {
    /// Static API key authentication, sent as the
    /// `Ocp-Apim-Subscription-Key` header.
    ApiKey(SecretString),

    /// Microsoft Entra ID (Azure AD) token-based authentication.
    ///
    /// Token acquisition and refresh are delegated to the credential
    /// implementation, typically `azure_identity::DefaultAzureCredential`.
    Entra(Arc<dyn TokenCredential>),
}

/// A resolved header proving identity for a single request.
#[derive(Clone)]
pub struct AuthHeader {
    pub name: &'static str,
    pub value: String,
}

impl TextAnalyticsCredential {
    /// Create a credential from the `AZURE_TEXT_ANALYTICS_KEY` environment
    /// variable. Falls back to the default Entra ID chain if the variable
    /// is not set.
    pub fn from_env() -> TextAnalyticsResult<Self> {
        match std::env::var("AZURE_TEXT_ANALYTICS_KEY") {
            Ok(key) if !key.is_empty() => Ok(Self::ApiKey(SecretString::from(key))),
            _ => Self::default_azure_credential(),
        }
    }

    /// Create an API key credential.
    pub fn api_key(key: impl Into<String>) -> Self {
        Self::ApiKey(SecretString::from(key.into()))
    }

    /// Create an Entra ID credential backed by
    /// `azure_identity::DefaultAzureCredential`.
    ///
    /// The default chain reads `AZURE_CLIENT_ID`, `AZURE_TENANT_ID` and
    /// `AZURE_CLIENT_SECRET` from the environment, among other sources.
    pub fn default_azure_credential() -> TextAnalyticsResult<Self> {
        let credential = DeveloperToolsCredential::new(None).map_err(|e| {
            TextAnalyticsError::Auth(format!("failed to build default credential chain: {e}"))
        })?;
        Ok(Self::Entra(credential))
    }

    /// Create an Entra ID credential from any `TokenCredential`
    /// implementation.
    pub fn token_credential(credential: Arc<dyn TokenCredential>) -> Self {
        Self::Entra(credential)
    }

    /// Resolve the credential to the request header that proves identity.
    pub async fn resolve(&self) -> TextAnalyticsResult<AuthHeader> {
        match self {
            Self::ApiKey(key) => Ok(AuthHeader {
                name: SUBSCRIPTION_KEY_HEADER,
                value: key.expose_secret().to_string(),
            }),
            Self::Entra(credential) => {
                let token = credential
                    .get_token(&[COGNITIVE_SERVICES_SCOPE], None)
                    .await
                    .map_err(|e| {
                        TextAnalyticsError::Auth(format!("token acquisition failed: {e}"))
                    })?;

                Ok(AuthHeader {
                    name: AUTHORIZATION_HEADER,
                    value: format!("Bearer {}", token.token.secret()),
                })
            }
        }
    }
}

impl fmt::Debug for TextAnalyticsCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiKey(_) => write!(f, "TextAnalyticsCredential::ApiKey(****)"),
            Self::Entra(_) => write!(f, "TextAnalyticsCredential::Entra(..)"),
        }
    }
}
