use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, EpisodeDto};
use crate::api::validation::validate_episode_id;
use crate::domain::Actor;
use crate::models::{EpisodePatch, NewEpisode};

/// POST /episodes/create
pub async fn create_episode(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    payload: Result<Json<NewEpisode>, JsonRejection>,
) -> Result<Json<ApiResponse<EpisodeDto>>, ApiError> {
    let Json(input) = payload?;
    let episode = state.catalog_service().create_episode(actor, input).await?;
    Ok(Json(ApiResponse::success(episode)))
}

/// PUT /episodes/{id}
pub async fn update_episode(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
    payload: Result<Json<EpisodePatch>, JsonRejection>,
) -> Result<Json<ApiResponse<EpisodeDto>>, ApiError> {
    let id = validate_episode_id(id)?;
    let Json(patch) = payload?;
    let episode = state
        .catalog_service()
        .update_episode(actor, id, patch)
        .await?;
    Ok(Json(ApiResponse::success(episode)))
}

/// DELETE /episodes/{id}
pub async fn delete_episode(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = validate_episode_id(id)?;
    state.catalog_service().delete_episode(actor, id).await?;
    Ok(Json(ApiResponse::success(())))
}
