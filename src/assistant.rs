//! AI writing assistant for blog content.
//!
//! This module provides `ContentAssistant`, which renders prompts, sends them
//! through a `CompletionClient`, and normalizes structured responses. An
//! assistant built without a client is "unconfigured" and rejects every call
//! with `AssistError::ServiceUnavailable` before touching the network.

use std::sync::Arc;

use thiserror::Error;

use crate::gemini::{CompletionClient, ProviderError};
use crate::models::{EnhancementRequest, Idea, IdeaRequest, RelevanceReport};
use crate::normalizer::{Normalized, normalize_ideas, normalize_relevance};
use crate::prompts;

/// Prompt used to verify connectivity with the provider.
pub const CONNECTION_TEST_PROMPT: &str = "Say hello world in one sentence.";

/// Errors surfaced by assistant operations.
#[derive(Debug, Error)]
pub enum AssistError {
    /// Required input was missing from the request.
    #[error("{0}")]
    BadRequest(String),

    /// No provider credential was configured at startup.
    #[error("AI service is not available. Please ensure Gemini API is configured properly.")]
    ServiceUnavailable,

    /// The provider call itself failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Builder for constructing `ContentAssistant` instances.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use startup_blog::assistant::ContentAssistantBuilder;
/// use startup_blog::gemini::GeminiClientBuilder;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = GeminiClientBuilder::new("my-api-key").build()?;
/// let assistant = ContentAssistantBuilder::new()
///     .client(Arc::new(client))
///     .build();
/// assert!(assistant.is_available());
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct ContentAssistantBuilder {
    client: Option<Arc<dyn CompletionClient>>,
}

impl ContentAssistantBuilder {
    /// Creates a new `ContentAssistantBuilder` with no client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the completion client to use.
    pub fn client(mut self, client: Arc<dyn CompletionClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Sets the completion client if one is available.
    pub fn maybe_client(mut self, client: Option<Arc<dyn CompletionClient>>) -> Self {
        self.client = client;
        self
    }

    /// Builds the `ContentAssistant`. Without a client it is unconfigured.
    #[must_use]
    pub fn build(self) -> ContentAssistant {
        ContentAssistant {
            client: self.client,
        }
    }
}

/// Enhances blog content, suggests post ideas and scores relevance.
///
/// Each operation makes at most one provider call and never retries.
pub struct ContentAssistant {
    client: Option<Arc<dyn CompletionClient>>,
}

impl ContentAssistant {
    /// Creates an assistant backed by `client`.
    #[must_use]
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client: Some(client),
        }
    }

    /// Creates an assistant with no provider; every call fails fast.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self { client: None }
    }

    /// Returns `true` if a provider client is configured.
    pub fn is_available(&self) -> bool {
        self.client.is_some()
    }

    fn client(&self) -> Result<&dyn CompletionClient, AssistError> {
        self.client.as_deref().ok_or(AssistError::ServiceUnavailable)
    }

    /// Applies the requested enhancement and returns the trimmed completion.
    ///
    /// # Errors
    ///
    /// - `ServiceUnavailable` if no provider is configured
    /// - `BadRequest` if both content and instructions are empty (no call is made)
    /// - `Provider` if the completion call fails
    pub async fn enhance(&self, request: &EnhancementRequest) -> Result<String, AssistError> {
        let client = self.client()?;

        if request.is_empty() {
            return Err(AssistError::BadRequest(
                "Content or prompt is required".to_string(),
            ));
        }

        let kind = request.kind();
        let prompt =
            prompts::build_enhancement_prompt(kind, &request.current_content, request.instructions());
        tracing::info!(enhancement_type = %kind, prompt_len = prompt.len(), "enhancing content");

        let completion = client.complete(&prompt).await?;
        Ok(completion.trim().to_string())
    }

    /// Asks the provider for post ideas about the requested topic.
    ///
    /// Malformed provider output degrades to a one-element fallback list.
    ///
    /// # Errors
    ///
    /// - `ServiceUnavailable` if no provider is configured
    /// - `Provider` if the completion call fails
    pub async fn generate_ideas(
        &self,
        request: &IdeaRequest,
    ) -> Result<Normalized<Vec<Idea>>, AssistError> {
        let client = self.client()?;

        tracing::info!(topic = ?request.topic(), category = ?request.category(), "generating ideas");
        let prompt = prompts::ideas_prompt(request.topic(), request.category());
        let completion = client.complete(&prompt).await?;

        Ok(normalize_ideas(&completion, request.topic()))
    }

    /// Scores how relevant `content` is for a startup blog.
    ///
    /// Malformed provider output degrades to a fallback report.
    ///
    /// # Errors
    ///
    /// - `ServiceUnavailable` if no provider is configured
    /// - `BadRequest` if `content` is empty (no call is made)
    /// - `Provider` if the completion call fails
    pub async fn check_relevance(
        &self,
        content: &str,
    ) -> Result<Normalized<RelevanceReport>, AssistError> {
        let client = self.client()?;

        if content.is_empty() {
            return Err(AssistError::BadRequest("Content is required".to_string()));
        }

        tracing::info!(content_len = content.len(), "checking relevance");
        let completion = client.complete(&prompts::relevance_prompt(content)).await?;

        Ok(normalize_relevance(&completion))
    }

    /// Sends a fixed greeting prompt and returns the raw reply.
    ///
    /// # Errors
    ///
    /// - `ServiceUnavailable` if no provider is configured
    /// - `Provider` if the completion call fails
    pub async fn test_connection(&self) -> Result<String, AssistError> {
        let client = self.client()?;
        Ok(client.complete(CONNECTION_TEST_PROMPT).await?)
    }
}
