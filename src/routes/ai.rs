//! AI writing-assistant endpoints under `/api/gemini`.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use super::{ApiError, ApiResult};
use crate::assistant::AssistError;
use crate::models::{EnhancementRequest, IdeaRequest};
use crate::server::AppState;

pub fn ai_routes() -> Router<AppState> {
    Router::new()
        .route("/api/gemini/enhance-content", post(enhance_content))
        .route("/api/gemini/generate-ideas", post(generate_ideas))
        .route("/api/gemini/check-relevance", post(check_relevance))
        .route("/api/gemini/health", get(health))
        .route("/api/gemini/test", post(test_connection))
}

#[derive(Debug, Default, Deserialize)]
struct RelevanceRequest {
    #[serde(default)]
    content: String,
}

async fn enhance_content(
    State(state): State<AppState>,
    payload: Result<Json<EnhancementRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(request) = payload?;
    let enhanced = state.assistant.enhance(&request).await.map_err(|error| match error {
        AssistError::Provider(error) => {
            let kind = error.kind();
            tracing::error!(error = %error, ?kind, "enhance-content failed");
            let status =
                StatusCode::from_u16(kind.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            ApiError::unsuccessful(status, kind.description()).with_details(error)
        }
        other => assist_error(other, "Failed to enhance content with AI"),
    })?;

    Ok(Json(json!({
        "enhancedContent": enhanced,
        "originalContent": request.current_content,
        "enhancementType": request.enhancement_type,
        "prompt": request.prompt,
        "success": true,
    })))
}

async fn generate_ideas(
    State(state): State<AppState>,
    payload: Result<Json<IdeaRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(request) = payload?;
    let ideas = state
        .assistant
        .generate_ideas(&request)
        .await
        .map_err(|error| assist_error(error, "Failed to generate ideas with AI"))?;

    Ok(Json(json!({
        "ideas": ideas.into_inner(),
        "success": true,
        "topic": request.topic().unwrap_or("startups"),
        "category": request.category().unwrap_or("general"),
    })))
}

async fn check_relevance(
    State(state): State<AppState>,
    payload: Result<Json<RelevanceRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(request) = payload?;
    let report = state
        .assistant
        .check_relevance(&request.content)
        .await
        .map_err(|error| assist_error(error, "Failed to analyze content relevance"))?;

    let mut body = serde_json::to_value(report.into_inner())
        .map_err(|e| ApiError::from(anyhow::Error::from(e)))?;
    if let Value::Object(map) = &mut body {
        map.insert("success".to_string(), Value::Bool(true));
    }
    Ok(Json(body))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    let available = state.assistant.is_available();
    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();

    Json(json!({
        "status": if available { "available" } else { "unavailable" },
        "hasApiKey": state.key_status.has_api_key,
        "hasValidApiKey": state.key_status.has_valid_api_key,
        "apiKeyLength": state.key_status.api_key_length,
        "message": if available { "AI service is ready" } else { "AI service is not configured" },
        "timestamp": timestamp,
    }))
}

async fn test_connection(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let response = state.assistant.test_connection().await.map_err(|error| {
        assist_error(error, "Gemini test failed")
            .with_field("hasApiKey", state.key_status.has_api_key)
            .with_field("apiKeyLength", state.key_status.api_key_length)
    })?;

    Ok(Json(json!({ "success": true, "response": response })))
}

/// Maps an assistant failure to a response; provider failures become a 500
/// with `message` and the provider's text as `details`.
fn assist_error(error: AssistError, message: &str) -> ApiError {
    match error {
        AssistError::BadRequest(reason) => ApiError::bad_request(reason),
        AssistError::ServiceUnavailable => {
            ApiError::new(StatusCode::SERVICE_UNAVAILABLE, error.to_string())
        }
        AssistError::Provider(error) => {
            tracing::error!(error = %error, "{message}");
            ApiError::unsuccessful(StatusCode::INTERNAL_SERVER_ERROR, message).with_details(error)
        }
    }
}
