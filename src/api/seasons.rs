use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, SeasonDto};
use crate::api::validation::validate_season_id;
use crate::domain::Actor;
use crate::models::{NewSeason, SeasonPatch};

/// POST /seasons/create
pub async fn create_season(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    payload: Result<Json<NewSeason>, JsonRejection>,
) -> Result<Json<ApiResponse<SeasonDto>>, ApiError> {
    let Json(input) = payload?;
    let season = state.catalog_service().create_season(actor, input).await?;
    Ok(Json(ApiResponse::success(season)))
}

/// PUT /seasons/{id}
pub async fn update_season(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
    payload: Result<Json<SeasonPatch>, JsonRejection>,
) -> Result<Json<ApiResponse<SeasonDto>>, ApiError> {
    let id = validate_season_id(id)?;
    let Json(patch) = payload?;
    let season = state
        .catalog_service()
        .update_season(actor, id, patch)
        .await?;
    Ok(Json(ApiResponse::success(season)))
}

/// DELETE /seasons/{id}
pub async fn delete_season(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = validate_season_id(id)?;
    state.catalog_service().delete_season(actor, id).await?;
    Ok(Json(ApiResponse::success(())))
}
