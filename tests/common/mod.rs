#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use anicat::api::AppState;
use anicat::config::Config;
use anicat::state::SharedState;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

/// Seeded by migration (must match `constants::BOOTSTRAP_API_KEY`)
pub const ADMIN_API_KEY: &str = "anicat_bootstrap_api_key_please_regenerate";

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    db_path: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut path = self.db_path.clone().into_os_string();
            path.push(suffix);
            std::fs::remove_file(path).ok();
        }
    }
}

pub fn test_config() -> (Config, PathBuf) {
    let db_path = std::env::temp_dir().join(format!("anicat-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}?mode=rwc", db_path.display());
    config.server.secure_cookies = false;
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;
    config.observability.metrics_enabled = false;

    (config, db_path)
}

pub async fn spawn_app() -> TestApp {
    let (config, db_path) = test_config();

    let shared = Arc::new(
        SharedState::new(config)
            .await
            .expect("Failed to create shared state"),
    );
    let state = anicat::api::create_app_state(shared, None);
    let router = anicat::api::router(state.clone()).await;

    TestApp {
        router,
        state,
        db_path,
    }
}

impl TestApp {
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        api_key: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(key) = api_key {
            builder = builder.header("X-Api-Key", key);
        }

        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(&value).unwrap())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request("GET", uri, None, None).await
    }

    pub async fn admin(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.request(method, uri, Some(ADMIN_API_KEY), body).await
    }

    /// Registers a user and logs in, returning `(user_id, api_key)`.
    pub async fn register_user(&self, user_name: &str, password: &str) -> (i32, String) {
        let (status, body) = self
            .request(
                "POST",
                "/api/users/create",
                None,
                Some(json!({
                    "userName": user_name,
                    "email": format!("{user_name}@example.com"),
                    "password": password,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "register failed: {body}");

        let (status, body) = self
            .request(
                "POST",
                "/api/auth/login",
                None,
                Some(json!({ "login": user_name, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");

        let id = body["data"]["user"]["id"].as_i64().unwrap() as i32;
        let api_key = body["data"]["apiKey"].as_str().unwrap().to_string();
        (id, api_key)
    }

    pub async fn create_anime(&self, name: &str, feature: bool) -> i32 {
        let (status, body) = self
            .admin(
                "POST",
                "/api/animes/create",
                Some(json!({
                    "name": name,
                    "synopsis": format!("Synopsis of {name}"),
                    "thumbnailUrl": "https://images.example.com/thumb.jpg",
                    "feature": feature,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create anime failed: {body}");
        body["data"]["id"].as_i64().unwrap() as i32
    }

    pub async fn create_season(&self, anime_id: i32, name: &str) -> i32 {
        let (status, body) = self
            .admin(
                "POST",
                "/api/seasons/create",
                Some(json!({ "name": name, "animeId": anime_id })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create season failed: {body}");
        body["data"]["id"].as_i64().unwrap() as i32
    }

    pub async fn create_episode(&self, season_id: i32, name: &str, order: i32) -> i32 {
        let (status, body) = self
            .admin(
                "POST",
                "/api/episodes/create",
                Some(json!({
                    "name": name,
                    "url": "https://videos.example.com/ep.mp4",
                    "episodeOrder": order,
                    "seasonId": season_id,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create episode failed: {body}");
        body["data"]["id"].as_i64().unwrap() as i32
    }
}
