use axum::{
    Extension, Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, FavoriteAnimeDto, FavoriteDto};
use crate::api::validation::{validate_anime_id, validate_path_id};
use crate::domain::Actor;

/// GET /favorites
pub async fn list_favorites(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<ApiResponse<Vec<FavoriteAnimeDto>>>, ApiError> {
    let favorites = state.social_service().list_favorites(actor).await?;
    Ok(Json(ApiResponse::success(favorites)))
}

/// POST /favorites/{anime_id}
pub async fn add_favorite(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(anime_id): Path<i32>,
) -> Result<Json<ApiResponse<FavoriteDto>>, ApiError> {
    let anime_id = validate_anime_id(anime_id)?;
    let favorite = state.social_service().add_favorite(actor, anime_id).await?;
    Ok(Json(ApiResponse::success(favorite)))
}

/// DELETE /favorites/{id}
pub async fn remove_favorite(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = validate_path_id(id)?;
    state.social_service().remove_favorite(actor, id).await?;
    Ok(Json(ApiResponse::success(())))
}
