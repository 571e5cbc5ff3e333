/// Gemini completion client module.
///
/// This module provides an async HTTP client for the Gemini text-generation
/// API, the `CompletionClient` seam used by the assistant, and classification
/// of provider failures into caller-visible categories.
mod client;

pub use client::{
    CompletionClient, DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiClient, GeminiClientBuilder,
    ProviderError, ProviderErrorKind,
};
