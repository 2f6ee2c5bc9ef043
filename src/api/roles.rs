use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, RoleDto};
use crate::api::validation::validate_path_id;
use crate::domain::Actor;
use crate::models::NewRole;

/// GET /roles
pub async fn list_roles(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<ApiResponse<Vec<RoleDto>>>, ApiError> {
    let roles = state.user_service().list_roles(actor).await?;
    Ok(Json(ApiResponse::success(roles)))
}

/// POST /roles/create
pub async fn create_role(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    payload: Result<Json<NewRole>, JsonRejection>,
) -> Result<Json<ApiResponse<RoleDto>>, ApiError> {
    let Json(input) = payload?;
    let role = state.user_service().create_role(actor, input).await?;
    Ok(Json(ApiResponse::success(role)))
}

/// DELETE /roles/{id}
pub async fn delete_role(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = validate_path_id(id)?;
    state.user_service().delete_role(actor, id).await?;
    Ok(Json(ApiResponse::success(())))
}
