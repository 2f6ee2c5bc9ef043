use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::Config;
use crate::state::SharedState;

mod anime;
pub mod auth;
mod comments;
mod episodes;
mod error;
mod favorites;
mod likes;
mod observability;
mod roles;
mod seasons;
mod system;
mod taxonomy;
pub mod types;
mod users;
mod validation;

pub use error::ApiError;
pub use types::*;

use tokio::sync::RwLock;

use crate::services::{CatalogService, SocialService, UserService};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn catalog_service(&self) -> &Arc<dyn CatalogService> {
        &self.shared.catalog_service
    }

    #[must_use]
    pub fn social_service(&self) -> &Arc<dyn SocialService> {
        &self.shared.social_service
    }

    #[must_use]
    pub fn user_service(&self) -> &Arc<dyn UserService> {
        &self.shared.user_service
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub async fn router(state: Arc<AppState>) -> Router {
    let (cors_origins, secure_cookies, inactivity_minutes) = {
        let config = state.config().read().await;
        (
            config.server.cors_allowed_origins.clone(),
            config.server.secure_cookies,
            config.server.session_inactivity_minutes,
        )
    };

    let protected_routes = create_protected_router(state.clone());

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            inactivity_minutes,
        )));

    let api_router = Router::new()
        .merge(protected_routes)
        .merge(create_public_router())
        .layer(session_layer)
        .with_state(state);

    let cors_layer = if cors_origins.iter().any(|origin| origin == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(middleware::from_fn(observability::security_headers_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
}

fn create_public_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(system::health))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/users/create", post(users::register))
        .route("/animes", get(anime::list_anime))
        .route("/animes/features", get(anime::list_featured))
        .route("/animes/likes", get(anime::list_top_liked))
        .route("/animes/newest", get(anime::list_newest))
        .route("/animes/name/{name}", get(anime::find_by_name))
        .route("/animes/id/{id}", get(anime::get_anime))
        .route("/classifications", get(taxonomy::list_classifications))
        .route("/categories", get(taxonomy::list_categories))
        .route("/comments/episode/{id}", get(comments::list_for_episode))
}

fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/me", get(auth::me))
        .route("/auth/api-key", get(auth::get_api_key))
        .route(
            "/auth/api-key/regenerate",
            post(auth::regenerate_api_key),
        )
        .route("/users", get(users::list_users))
        .route("/users/admins", post(users::create_admin))
        .route(
            "/users/me",
            put(users::update_me).delete(users::delete_me),
        )
        .route("/users/me/profile", put(users::update_profile))
        .route("/users/me/password", put(users::change_password))
        .route(
            "/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/roles", get(roles::list_roles))
        .route("/roles/create", post(roles::create_role))
        .route("/roles/{id}", delete(roles::delete_role))
        .route("/animes/create", post(anime::create_anime))
        .route(
            "/animes/{id}",
            put(anime::update_anime).delete(anime::delete_anime),
        )
        .route("/seasons/create", post(seasons::create_season))
        .route(
            "/seasons/{id}",
            put(seasons::update_season).delete(seasons::delete_season),
        )
        .route("/episodes/create", post(episodes::create_episode))
        .route(
            "/episodes/{id}",
            put(episodes::update_episode).delete(episodes::delete_episode),
        )
        .route(
            "/classifications/create",
            post(taxonomy::create_classification),
        )
        .route(
            "/classifications/{id}",
            put(taxonomy::update_classification).delete(taxonomy::delete_classification),
        )
        .route("/categories/create", post(taxonomy::create_category))
        .route(
            "/categories/{id}",
            put(taxonomy::update_category).delete(taxonomy::delete_category),
        )
        .route("/comments/create", post(comments::create_comment))
        .route(
            "/comments/{id}",
            put(comments::update_comment).delete(comments::delete_comment),
        )
        .route("/comments/user/{id}", get(comments::list_for_user))
        .route(
            "/likes/{target}/{id}",
            post(likes::like).delete(likes::unlike),
        )
        .route("/favorites", get(favorites::list_favorites))
        .route(
            "/favorites/{id}",
            post(favorites::add_favorite).delete(favorites::remove_favorite),
        )
        .route("/metrics", get(system::get_metrics))
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}
