//! Classifications and categories share one table shape, so each route pair
//! forwards to the same helper with its [`TagKind`].

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, TagDto};
use crate::api::validation::validate_path_id;
use crate::db::TagKind;
use crate::domain::Actor;
use crate::models::NewTag;

type TagResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

async fn list(state: &AppState, kind: TagKind) -> TagResult<Vec<TagDto>> {
    let tags = state.catalog_service().list_tags(kind).await?;
    Ok(Json(ApiResponse::success(tags)))
}

async fn create(
    state: &AppState,
    actor: Actor,
    kind: TagKind,
    payload: Result<Json<NewTag>, JsonRejection>,
) -> TagResult<TagDto> {
    let Json(input) = payload?;
    let tag = state.catalog_service().create_tag(actor, kind, input).await?;
    Ok(Json(ApiResponse::success(tag)))
}

async fn update(
    state: &AppState,
    actor: Actor,
    kind: TagKind,
    id: i32,
    payload: Result<Json<NewTag>, JsonRejection>,
) -> TagResult<TagDto> {
    let id = validate_path_id(id)?;
    let Json(input) = payload?;
    let tag = state
        .catalog_service()
        .update_tag(actor, kind, id, input)
        .await?;
    Ok(Json(ApiResponse::success(tag)))
}

async fn delete(state: &AppState, actor: Actor, kind: TagKind, id: i32) -> TagResult<()> {
    let id = validate_path_id(id)?;
    state.catalog_service().delete_tag(actor, kind, id).await?;
    Ok(Json(ApiResponse::success(())))
}

/// GET /classifications
pub async fn list_classifications(State(state): State<Arc<AppState>>) -> TagResult<Vec<TagDto>> {
    list(&state, TagKind::Classification).await
}

/// POST /classifications/create
pub async fn create_classification(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    payload: Result<Json<NewTag>, JsonRejection>,
) -> TagResult<TagDto> {
    create(&state, actor, TagKind::Classification, payload).await
}

/// PUT /classifications/{id}
pub async fn update_classification(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
    payload: Result<Json<NewTag>, JsonRejection>,
) -> TagResult<TagDto> {
    update(&state, actor, TagKind::Classification, id, payload).await
}

/// DELETE /classifications/{id}
pub async fn delete_classification(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
) -> TagResult<()> {
    delete(&state, actor, TagKind::Classification, id).await
}

/// GET /categories
pub async fn list_categories(State(state): State<Arc<AppState>>) -> TagResult<Vec<TagDto>> {
    list(&state, TagKind::Category).await
}

/// POST /categories/create
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    payload: Result<Json<NewTag>, JsonRejection>,
) -> TagResult<TagDto> {
    create(&state, actor, TagKind::Category, payload).await
}

/// PUT /categories/{id}
pub async fn update_category(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
    payload: Result<Json<NewTag>, JsonRejection>,
) -> TagResult<TagDto> {
    update(&state, actor, TagKind::Category, id, payload).await
}

/// DELETE /categories/{id}
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
) -> TagResult<()> {
    delete(&state, actor, TagKind::Category, id).await
}
