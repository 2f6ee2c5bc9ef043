use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
};
use std::sync::Arc;

use super::{AnimeDto, ApiError, ApiResponse, AppState};
use crate::api::validation::{validate_anime_id, validate_search_query};
use crate::domain::Actor;
use crate::models::{AnimePatch, NewAnime};

/// GET /animes
pub async fn list_anime(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<AnimeDto>>>, ApiError> {
    let animes = state.catalog_service().list_all().await?;
    Ok(Json(ApiResponse::success(animes)))
}

/// GET /animes/features
pub async fn list_featured(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<AnimeDto>>>, ApiError> {
    let animes = state.catalog_service().list_featured().await?;
    Ok(Json(ApiResponse::success(animes)))
}

/// GET /animes/likes
pub async fn list_top_liked(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<AnimeDto>>>, ApiError> {
    let animes = state.catalog_service().list_top_liked().await?;
    Ok(Json(ApiResponse::success(animes)))
}

/// GET /animes/newest
pub async fn list_newest(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<AnimeDto>>>, ApiError> {
    let animes = state.catalog_service().list_newest().await?;
    Ok(Json(ApiResponse::success(animes)))
}

/// GET /animes/name/{name}
pub async fn find_by_name(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<AnimeDto>>, ApiError> {
    let name = validate_search_query(&name)?;
    let anime = state.catalog_service().find_by_name(name).await?;
    Ok(Json(ApiResponse::success(anime)))
}

/// GET /animes/id/{id}
pub async fn get_anime(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<AnimeDto>>, ApiError> {
    let id = validate_anime_id(id)?;
    let anime = state.catalog_service().find_by_id(id).await?;
    Ok(Json(ApiResponse::success(anime)))
}

/// POST /animes/create
pub async fn create_anime(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    payload: Result<Json<NewAnime>, JsonRejection>,
) -> Result<Json<ApiResponse<AnimeDto>>, ApiError> {
    let Json(input) = payload?;
    let anime = state.catalog_service().create_anime(actor, input).await?;
    Ok(Json(ApiResponse::success(anime)))
}

/// PUT /animes/{id}
pub async fn update_anime(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
    payload: Result<Json<AnimePatch>, JsonRejection>,
) -> Result<Json<ApiResponse<AnimeDto>>, ApiError> {
    let id = validate_anime_id(id)?;
    let Json(patch) = payload?;
    let anime = state
        .catalog_service()
        .update_anime(actor, id, patch)
        .await?;
    Ok(Json(ApiResponse::success(anime)))
}

/// DELETE /animes/{id}
pub async fn delete_anime(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = validate_anime_id(id)?;
    state.catalog_service().delete_anime(actor, id).await?;
    Ok(Json(ApiResponse::success(())))
}
