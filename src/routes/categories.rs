use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};
use serde_json::{Value, json};

use super::{ApiError, ApiResult};
use crate::models::{Category, CategoryDetail, CategoryId, CategoryInput};
use crate::server::AppState;
use crate::service::is_constraint_violation;

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/api/categories", get(list_categories).post(create_category))
        .route(
            "/api/categories/{id}",
            get(get_category).put(update_category).delete(delete_category),
        )
}

async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    let categories = state.blogs.lock().await.list_categories()?;
    Ok(Json(categories))
}

async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<CategoryDetail>> {
    state
        .blogs
        .lock()
        .await
        .get_category(CategoryId::new(id))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Category not found"))
}

async fn create_category(
    State(state): State<AppState>,
    payload: Result<Json<CategoryInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let Json(input) = payload?;
    if input.name.trim().is_empty() {
        return Err(ApiError::bad_request("Category name is required"));
    }

    let created = state
        .blogs
        .lock()
        .await
        .create_category(&input)
        .map_err(duplicate_name)?;

    tracing::info!(id = %created.id, name = %created.name, "created category");
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<CategoryInput>, JsonRejection>,
) -> ApiResult<Json<Category>> {
    let Json(input) = payload?;
    if input.name.trim().is_empty() {
        return Err(ApiError::bad_request("Category name is required"));
    }

    state
        .blogs
        .lock()
        .await
        .update_category(CategoryId::new(id), &input)
        .map_err(duplicate_name)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Category not found"))
}

async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let deleted = state
        .blogs
        .lock()
        .await
        .delete_category(CategoryId::new(id))
        .map_err(|error| {
            if is_constraint_violation(&error) {
                ApiError::bad_request("Cannot delete category with existing blogs")
            } else {
                ApiError::from(error)
            }
        })?;

    if !deleted {
        return Err(ApiError::not_found("Category not found"));
    }
    Ok(Json(json!({ "message": "Category deleted successfully" })))
}

fn duplicate_name(error: anyhow::Error) -> ApiError {
    if is_constraint_violation(&error) {
        ApiError::bad_request("Category name already exists")
    } else {
        ApiError::from(error)
    }
}
