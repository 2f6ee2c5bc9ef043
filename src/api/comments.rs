use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, CommentDto};
use crate::api::validation::{validate_comment_id, validate_episode_id, validate_user_id};
use crate::domain::Actor;
use crate::models::{CommentPatch, NewComment};

/// GET /comments/episode/{id}
pub async fn list_for_episode(
    State(state): State<Arc<AppState>>,
    Path(episode_id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<CommentDto>>>, ApiError> {
    let episode_id = validate_episode_id(episode_id)?;
    let comments = state
        .social_service()
        .list_comments_for_episode(episode_id)
        .await?;
    Ok(Json(ApiResponse::success(comments)))
}

/// GET /comments/user/{id}
pub async fn list_for_user(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(user_id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<CommentDto>>>, ApiError> {
    let user_id = validate_user_id(user_id)?;
    let comments = state
        .social_service()
        .list_comments_for_user(actor, user_id)
        .await?;
    Ok(Json(ApiResponse::success(comments)))
}

/// POST /comments/create
pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    payload: Result<Json<NewComment>, JsonRejection>,
) -> Result<Json<ApiResponse<CommentDto>>, ApiError> {
    let Json(input) = payload?;
    let comment = state.social_service().create_comment(actor, input).await?;
    Ok(Json(ApiResponse::success(comment)))
}

/// PUT /comments/{id}
pub async fn update_comment(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
    payload: Result<Json<CommentPatch>, JsonRejection>,
) -> Result<Json<ApiResponse<CommentDto>>, ApiError> {
    let id = validate_comment_id(id)?;
    let Json(patch) = payload?;
    let comment = state
        .social_service()
        .update_comment(actor, id, patch)
        .await?;
    Ok(Json(ApiResponse::success(comment)))
}

/// DELETE /comments/{id}
pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = validate_comment_id(id)?;
    state.social_service().delete_comment(actor, id).await?;
    Ok(Json(ApiResponse::success(())))
}
