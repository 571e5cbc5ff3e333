/// Gemini HTTP client implementation.
///
/// This module provides `GeminiClient` for sending prompts to the Gemini
/// `generateContent` endpoint, along with the error taxonomy and the
/// `CompletionClient` trait that the rest of the crate programs against.
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Default Gemini API origin.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model used for every completion.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";

/// Errors that can occur when calling the completion provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Transport failures (connection refused, DNS, TLS, timeouts)
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Non-success HTTP status, carrying the provider's error message
    #[error("HTTP error: status {status}: {message}")]
    Http { status: u16, message: String },

    /// Response body was not valid JSON
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Well-formed response without usable text
    #[error("Gemini API error: {message}")]
    Api { message: String },

    /// Invalid URL configuration error
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ProviderError {
    /// Classifies this error by the content of its message.
    pub fn kind(&self) -> ProviderErrorKind {
        ProviderErrorKind::classify(&self.to_string())
    }
}

/// Externally visible category of a failed provider call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorKind {
    /// The credential was rejected.
    Unauthorized,
    /// Quota exhausted or rate limit hit.
    RateLimited,
    /// The provider could not be reached.
    UpstreamUnavailable,
    /// Anything else.
    Unknown,
}

impl ProviderErrorKind {
    /// Maps a failure message to a category.
    ///
    /// Matching is case-sensitive and checked in order: `"API key"`, then
    /// `"quota"`/`"limit"`, then `"network"`/`"fetch"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use startup_blog::gemini::ProviderErrorKind;
    ///
    /// assert_eq!(
    ///     ProviderErrorKind::classify("API key not valid"),
    ///     ProviderErrorKind::Unauthorized
    /// );
    /// assert_eq!(
    ///     ProviderErrorKind::classify("daily quota exceeded"),
    ///     ProviderErrorKind::RateLimited
    /// );
    /// assert_eq!(ProviderErrorKind::classify("boom"), ProviderErrorKind::Unknown);
    /// ```
    pub fn classify(message: &str) -> Self {
        if message.contains("API key") {
            ProviderErrorKind::Unauthorized
        } else if message.contains("quota") || message.contains("limit") {
            ProviderErrorKind::RateLimited
        } else if message.contains("network") || message.contains("fetch") {
            ProviderErrorKind::UpstreamUnavailable
        } else {
            ProviderErrorKind::Unknown
        }
    }

    /// HTTP status code surfaced to API callers for this category.
    pub fn status_code(self) -> u16 {
        match self {
            ProviderErrorKind::Unauthorized => 401,
            ProviderErrorKind::RateLimited => 429,
            ProviderErrorKind::UpstreamUnavailable => 502,
            ProviderErrorKind::Unknown => 500,
        }
    }

    /// Short user-facing description of this category.
    pub fn description(self) -> &'static str {
        match self {
            ProviderErrorKind::Unauthorized => "Invalid API key",
            ProviderErrorKind::RateLimited => "API quota exceeded or rate limit hit",
            ProviderErrorKind::UpstreamUnavailable => "Network error connecting to Gemini API",
            ProviderErrorKind::Unknown => "Failed to enhance content with AI",
        }
    }
}

/// Trait for text-completion providers.
///
/// This trait enables substituting a fake provider in tests and keeps the
/// assistant independent of the concrete HTTP client.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Sends `prompt` to the provider and returns the raw completion text.
    ///
    /// Exactly one outbound request is made per call; failures are returned
    /// as-is without retrying.
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Builder for constructing `GeminiClient` instances.
///
/// # Examples
///
/// ```
/// use startup_blog::gemini::GeminiClientBuilder;
///
/// let client = GeminiClientBuilder::new("my-api-key")
///     .base_url("http://localhost:8080")
///     .model("gemini-1.5-pro")
///     .build()
///     .expect("Failed to create client");
/// assert_eq!(client.model(), "gemini-1.5-pro");
/// ```
#[derive(Debug)]
pub struct GeminiClientBuilder {
    api_key: String,
    base_url: Option<String>,
    model: Option<String>,
    timeout: Option<Duration>,
}

impl GeminiClientBuilder {
    /// Creates a builder for the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            model: None,
            timeout: None,
        }
    }

    /// Sets the API origin (e.g., "https://generativelanguage.googleapis.com").
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the model name (e.g., "gemini-1.5-flash-latest").
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets an overall request timeout. Without it the transport default applies.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the `GeminiClient` with the configured settings.
    ///
    /// # Environment Variables
    ///
    /// If `base_url()` was not called, `GEMINI_BASE_URL` is consulted before
    /// falling back to [`DEFAULT_BASE_URL`]. If `model()` was not called,
    /// `GEMINI_MODEL` is consulted before falling back to [`DEFAULT_MODEL`].
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::InvalidUrl` if the base URL does not parse.
    pub fn build(self) -> Result<GeminiClient, ProviderError> {
        let base_url = match self.base_url {
            Some(url) => url,
            None => std::env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
        };

        let model = match self.model {
            Some(m) => m,
            None => std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
        };

        reqwest::Url::parse(&base_url)
            .map_err(|e| ProviderError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ProviderError::Network)?;

        Ok(GeminiClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            api_key: self.api_key,
        })
    }
}

/// Async HTTP client for the Gemini `generateContent` API.
///
/// Construct it with `GeminiClientBuilder`.
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    /// Returns the base URL configured for this client.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the model name configured for this client.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let request_body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "sending completion request");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(ProviderError::Network)?;

        let status = response.status();
        let body = response.text().await.map_err(ProviderError::Network)?;

        if !status.is_success() {
            return Err(ProviderError::Http {
                status: status.as_u16(),
                message: error_message(&body, status.canonical_reason()),
            });
        }

        let json: Value = serde_json::from_str(&body).map_err(ProviderError::Serialization)?;
        let text = extract_text(&json)?;

        tracing::debug!(response_len = text.len(), "received completion");
        Ok(text)
    }
}

/// Pulls the completion text out of a `generateContent` response.
///
/// Concatenates every text part of the first candidate. A response with no
/// candidates reports the block reason when the provider gives one.
fn extract_text(json: &Value) -> Result<String, ProviderError> {
    let Some(candidate) = json
        .get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
    else {
        let message = match json.pointer("/promptFeedback/blockReason").and_then(|r| r.as_str()) {
            Some(reason) => format!("Prompt blocked: {}", reason),
            None => "Missing 'candidates' field in API response".to_string(),
        };
        return Err(ProviderError::Api { message });
    };

    let parts = candidate
        .pointer("/content/parts")
        .and_then(|p| p.as_array())
        .ok_or_else(|| ProviderError::Api {
            message: "Missing 'content.parts' field in API response".to_string(),
        })?;

    Ok(parts
        .iter()
        .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
        .collect())
}

/// Extracts `error.message` from an error body, falling back to the raw body
/// or the status reason phrase.
fn error_message(body: &str, reason: Option<&str>) -> String {
    let parsed = serde_json::from_str::<Value>(body).ok().and_then(|json| {
        json.pointer("/error/message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
    });

    match parsed {
        Some(message) => message,
        None if !body.trim().is_empty() => body.trim().to_string(),
        None => reason.unwrap_or("unknown error").to_string(),
    }
}
