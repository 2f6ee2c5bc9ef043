use axum::{
    Extension, Json,
    extract::{Request, State, rejection::JsonRejection},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use serde::Serialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::{ApiError, ApiKeyResponse, ApiResponse, AppState, LoginResponse, UserDto};
use crate::constants::session::USER_ID_KEY;
use crate::domain::Actor;
use crate::models::Credentials;

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ============================================================================
// Middleware
// ============================================================================

/// Authentication middleware that checks:
/// 1. Session cookie (from login)
/// 2. `X-Api-Key` header
/// 3. `Authorization: Bearer <api_key>` header
///
/// The resolved [`Actor`] is stored in the request extensions for handlers.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(actor) = resolve_actor(&state, &session, &headers).await? else {
        return Err(ApiError::unauthorized("Authentication required"));
    };

    tracing::Span::current().record("user_id", actor.user_id);
    request.extensions_mut().insert(actor);
    Ok(next.run(request).await)
}

async fn resolve_actor(
    state: &AppState,
    session: &Session,
    headers: &HeaderMap,
) -> Result<Option<Actor>, ApiError> {
    // A session whose user was deleted falls through to the API key check.
    if let Ok(Some(user_id)) = session.get::<i32>(USER_ID_KEY).await
        && let Some(actor) = state.user_service().resolve_user(user_id).await?
    {
        return Ok(Some(actor));
    }

    match extract_api_key(headers) {
        Some(key) => Ok(state.user_service().resolve_api_key(&key).await?),
        None => Ok(None),
    }
}

/// Extract API key from headers
fn extract_api_key(headers: &HeaderMap) -> Option<String> {
    if let Some(api_key) = headers.get("X-Api-Key")
        && let Ok(key_str) = api_key.to_str()
    {
        return Some(key_str.trim().to_string());
    }

    if let Some(auth_header) = headers.get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        return Some(token.trim().to_string());
    }

    None
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/login
/// Authenticate with user name (or email) and password, returns the API key on success
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let Json(credentials) = payload?;
    let response = state.user_service().authenticate(credentials).await?;

    session
        .cycle_id()
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?;
    session
        .insert(USER_ID_KEY, response.user.id)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?;

    Ok(Json(ApiResponse::success(response)))
}

/// POST /auth/logout
pub async fn logout(session: Session) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    session
        .flush()
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?;

    Ok(Json(ApiResponse::success(MessageResponse {
        message: "Logged out successfully".to_string(),
    })))
}

/// GET /auth/me
pub async fn me(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let user = state.user_service().me(actor).await?;
    Ok(Json(ApiResponse::success(user)))
}

/// GET /auth/api-key
pub async fn get_api_key(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<ApiResponse<ApiKeyResponse>>, ApiError> {
    let key = state.user_service().api_key(actor).await?;
    Ok(Json(ApiResponse::success(key)))
}

/// POST /auth/api-key/regenerate
pub async fn regenerate_api_key(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<ApiResponse<ApiKeyResponse>>, ApiError> {
    let key = state.user_service().regenerate_api_key(actor).await?;
    Ok(Json(ApiResponse::success(key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_api_key_header() {
        let mut headers = HeaderMap::new();
        headers.insert("X-Api-Key", HeaderValue::from_static("abc123"));
        assert_eq!(extract_api_key(&headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_static("Bearer  xyz "));
        assert_eq!(extract_api_key(&headers).as_deref(), Some("xyz"));
    }

    #[test]
    fn test_extract_prefers_api_key_header() {
        let mut headers = HeaderMap::new();
        headers.insert("X-Api-Key", HeaderValue::from_static("from-header"));
        headers.insert("Authorization", HeaderValue::from_static("Bearer other"));
        assert_eq!(extract_api_key(&headers).as_deref(), Some("from-header"));
    }

    #[test]
    fn test_extract_ignores_other_schemes() {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_static("Basic dXNlcg=="));
        assert_eq!(extract_api_key(&headers), None);
    }
}
