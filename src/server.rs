//! HTTP server wiring: shared state, router and listener.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::assistant::{ContentAssistant, ContentAssistantBuilder};
use crate::config::{ApiKeyStatus, AppConfig};
use crate::gemini::{CompletionClient, GeminiClientBuilder};
use crate::routes;
use crate::{BlogService, Database};

/// Application state shared across handlers.
///
/// Everything here is built once at startup; handlers only read it, apart
/// from the blog store behind its mutex.
#[derive(Clone)]
pub struct AppState {
    pub blogs: Arc<Mutex<BlogService>>,
    pub assistant: Arc<ContentAssistant>,
    pub key_status: ApiKeyStatus,
}

impl AppState {
    pub fn new(blogs: BlogService, assistant: ContentAssistant, key_status: ApiKeyStatus) -> Self {
        Self {
            blogs: Arc::new(Mutex::new(blogs)),
            assistant: Arc::new(assistant),
            key_status,
        }
    }

    /// Opens the database and builds the assistant from `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let db = Database::open(&config.database_path)?;
        tracing::info!(path = %config.database_path.display(), "opened database");

        Ok(Self::new(
            BlogService::new(db),
            assistant_from_config(config)?,
            config.api_key_status(),
        ))
    }
}

/// Builds the assistant, leaving it unconfigured when no API key is set.
pub fn assistant_from_config(config: &AppConfig) -> Result<ContentAssistant> {
    let client: Option<Arc<dyn CompletionClient>> = match &config.api_key {
        Some(key) => {
            let client = GeminiClientBuilder::new(key.clone())
                .base_url(config.base_url.clone())
                .model(config.model.clone())
                .build()
                .context("Failed to build Gemini client")?;
            tracing::info!(model = client.model(), "Gemini client initialized");
            let client: Arc<dyn CompletionClient> = Arc::new(client);
            Some(client)
        }
        None => {
            tracing::warn!("GEMINI_API_KEY is not set; AI endpoints will answer 503");
            None
        }
    };

    Ok(ContentAssistantBuilder::new().maybe_client(client).build())
}

/// Builds the application router with tracing and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(routes::root_routes())
        .merge(routes::ai_routes())
        .merge(routes::blog_routes())
        .merge(routes::category_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Binds `config.host:config.port` and serves until the process exits.
pub async fn serve(config: &AppConfig, state: AppState) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Server is running on http://{}", addr);

    axum::serve(listener, router(state))
        .await
        .context("Server terminated unexpectedly")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};

    fn config(api_key: Option<&str>, database_path: PathBuf) -> AppConfig {
        AppConfig {
            api_key: api_key.map(str::to_string),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            database_path,
        }
    }

    #[test]
    fn assistant_without_key_is_unavailable() {
        let assistant = assistant_from_config(&config(None, PathBuf::from("unused.db"))).unwrap();
        assert!(!assistant.is_available());
    }

    #[test]
    fn assistant_with_key_is_available() {
        let assistant =
            assistant_from_config(&config(Some("k".repeat(39).as_str()), PathBuf::from("unused.db")))
                .unwrap();
        assert!(assistant.is_available());
    }

    #[test]
    fn from_config_opens_database_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("blog.db");

        let state = AppState::from_config(&config(None, path.clone())).unwrap();

        assert!(path.exists());
        assert!(!state.key_status.has_api_key);
    }
}
