use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};
use serde_json::{Value, json};

use super::{ApiError, ApiResult};
use crate::models::{Blog, BlogId, BlogUpdate, CategoryId, NewBlog};
use crate::server::AppState;
use crate::service::is_constraint_violation;

pub fn blog_routes() -> Router<AppState> {
    Router::new()
        .route("/api/blogs", get(list_blogs).post(create_blog))
        .route(
            "/api/blogs/{id}",
            get(get_blog).put(update_blog).delete(delete_blog),
        )
        .route("/api/blogs/category/{id}", get(list_blogs_by_category))
}

async fn list_blogs(State(state): State<AppState>) -> ApiResult<Json<Vec<Blog>>> {
    let blogs = state.blogs.lock().await.list_blogs()?;
    Ok(Json(blogs))
}

async fn list_blogs_by_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<Blog>>> {
    let blogs = state
        .blogs
        .lock()
        .await
        .list_blogs_by_category(CategoryId::new(id))?;
    Ok(Json(blogs))
}

async fn get_blog(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Blog>> {
    state
        .blogs
        .lock()
        .await
        .get_blog(BlogId::new(id))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Blog not found"))
}

async fn create_blog(
    State(state): State<AppState>,
    payload: Result<Json<NewBlog>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Blog>)> {
    let Json(blog) = payload?;
    if let Some(field) = blog.missing_field() {
        tracing::debug!(field, "rejecting blog with missing field");
        return Err(ApiError::bad_request("Title, content, and author are required"));
    }

    let created = state
        .blogs
        .lock()
        .await
        .create_blog(&blog)
        .map_err(category_error)?;

    tracing::info!(id = %created.id, "created blog");
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_blog(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<BlogUpdate>, JsonRejection>,
) -> ApiResult<Json<Blog>> {
    let Json(update) = payload?;
    if !update.is_complete() {
        return Err(ApiError::bad_request("Title and content are required"));
    }

    state
        .blogs
        .lock()
        .await
        .update_blog(BlogId::new(id), &update)
        .map_err(category_error)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Blog not found"))
}

async fn delete_blog(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Value>> {
    if !state.blogs.lock().await.delete_blog(BlogId::new(id))? {
        return Err(ApiError::not_found("Blog not found"));
    }

    Ok(Json(json!({ "message": "Blog deleted successfully" })))
}

/// A constraint failure on a blog write means the referenced category is missing.
fn category_error(error: anyhow::Error) -> ApiError {
    if is_constraint_violation(&error) {
        ApiError::bad_request("Category not found")
    } else {
        ApiError::from(error)
    }
}
