use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
};
use std::sync::Arc;
use tower_sessions::Session;

use super::{ApiError, ApiResponse, AppState, UserDto};
use crate::api::auth::MessageResponse;
use crate::api::validation::validate_user_id;
use crate::domain::Actor;
use crate::models::{NewAdmin, NewUser, PasswordChange, ProfilePatch, UserPatch};

/// POST /users/create
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let Json(input) = payload?;
    let user = state.user_service().register(input).await?;
    Ok(Json(ApiResponse::success(user)))
}

/// PUT /users/me
pub async fn update_me(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    payload: Result<Json<UserPatch>, JsonRejection>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let Json(patch) = payload?;
    let user = state.user_service().update(actor, patch).await?;
    Ok(Json(ApiResponse::success(user)))
}

/// PUT /users/me/profile
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    payload: Result<Json<ProfilePatch>, JsonRejection>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let Json(patch) = payload?;
    let user = state.user_service().update_profile(actor, patch).await?;
    Ok(Json(ApiResponse::success(user)))
}

/// PUT /users/me/password
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    payload: Result<Json<PasswordChange>, JsonRejection>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let Json(input) = payload?;
    state.user_service().change_password(actor, input).await?;

    Ok(Json(ApiResponse::success(MessageResponse {
        message: "Password changed successfully".to_string(),
    })))
}

/// DELETE /users/me
pub async fn delete_me(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    session: Session,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.user_service().delete_self(actor).await?;
    session
        .flush()
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?;
    Ok(Json(ApiResponse::success(())))
}

/// GET /users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<ApiResponse<Vec<UserDto>>>, ApiError> {
    let users = state.user_service().list(actor).await?;
    Ok(Json(ApiResponse::success(users)))
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let id = validate_user_id(id)?;
    let user = state.user_service().get(actor, id).await?;
    Ok(Json(ApiResponse::success(user)))
}

/// POST /users/admins
pub async fn create_admin(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    payload: Result<Json<NewAdmin>, JsonRejection>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let Json(input) = payload?;
    let user = state.user_service().create_admin(actor, input).await?;
    Ok(Json(ApiResponse::success(user)))
}

/// PUT /users/{id}
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
    payload: Result<Json<UserPatch>, JsonRejection>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let id = validate_user_id(id)?;
    let Json(patch) = payload?;
    let user = state.user_service().admin_update(actor, id, patch).await?;
    Ok(Json(ApiResponse::success(user)))
}

/// DELETE /users/{id}
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = validate_user_id(id)?;
    state.user_service().delete(actor, id).await?;
    Ok(Json(ApiResponse::success(())))
}
