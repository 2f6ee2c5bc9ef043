mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use common::spawn_app;
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_register_and_login() {
    let app = spawn_app().await;
    let (user_id, api_key) = app.register_user("mika", "password123").await;

    let (status, body) = app.request("GET", "/api/auth/me", Some(&api_key), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], user_id);
    assert_eq!(body["data"]["role"], "user");
    assert!(body["data"].get("passwordHash").is_none());
    assert!(body["data"].get("apiKey").is_none());
}

#[tokio::test]
async fn test_login_by_email() {
    let app = spawn_app().await;
    app.register_user("mika", "password123").await;

    let (status, _) = app
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "MIKA@example.com", "password": "password123" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_rejects_bad_password() {
    let app = spawn_app().await;
    app.register_user("mika", "password123").await;

    let (status, body) = app
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "login": "mika", "password": "wrong-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");

    let (status, _) = app
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "login": "nobody", "password": "password123" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_conflicts() {
    let app = spawn_app().await;
    app.register_user("mika", "password123").await;

    let (status, body) = app
        .request(
            "POST",
            "/api/users/create",
            None,
            Some(json!({
                "userName": "mika",
                "email": "other@example.com",
                "password": "password123",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "User name is already taken");

    let (status, _) = app
        .request(
            "POST",
            "/api/users/create",
            None,
            Some(json!({
                "userName": "mika2",
                "email": "Mika@Example.com",
                "password": "password123",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_validation() {
    let app = spawn_app().await;

    let (status, body) = app
        .request(
            "POST",
            "/api/users/create",
            None,
            Some(json!({
                "userName": "x",
                "email": "not-an-email",
                "password": "short",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_password_change_round_trip() {
    let app = spawn_app().await;
    let (_, api_key) = app.register_user("mika", "password123").await;

    let (status, _) = app
        .request(
            "PUT",
            "/api/users/me/password",
            Some(&api_key),
            Some(json!({ "currentPassword": "not-the-password", "newPassword": "password456" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .request(
            "PUT",
            "/api/users/me/password",
            Some(&api_key),
            Some(json!({ "currentPassword": "password123", "newPassword": "password456" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "login": "mika", "password": "password123" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "login": "mika", "password": "password456" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_session_cookie_login() {
    let app = spawn_app().await;
    app.register_user("mika", "password123").await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({ "login": "mika", "password": "password123" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .unwrap()
        .to_string();

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/auth/me")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["data"]["userName"], "mika");
}

#[tokio::test]
async fn test_regenerate_api_key() {
    let app = spawn_app().await;
    let (_, old_key) = app.register_user("mika", "password123").await;

    let (status, body) = app
        .request("POST", "/api/auth/api-key/regenerate", Some(&old_key), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let new_key = body["data"]["apiKey"].as_str().unwrap().to_string();
    assert_ne!(new_key, old_key);

    let (status, _) = app.request("GET", "/api/auth/me", Some(&old_key), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.request("GET", "/api/auth/api-key", Some(&new_key), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["apiKey"], new_key);
}

#[tokio::test]
async fn test_update_profile_and_account() {
    let app = spawn_app().await;
    let (_, key) = app.register_user("mika", "password123").await;

    let (status, body) = app
        .request(
            "PUT",
            "/api/users/me/profile",
            Some(&key),
            Some(json!({ "profile": "https://images.example.com/me.png" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["profile"], "https://images.example.com/me.png");

    let (status, body) = app
        .request(
            "PUT",
            "/api/users/me",
            Some(&key),
            Some(json!({ "birthday": "1999-02-30" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"][0]["field"], "birthday");

    let (status, body) = app
        .request(
            "PUT",
            "/api/users/me",
            Some(&key),
            Some(json!({ "userName": "mika_renamed", "birthday": "1999-02-03" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["userName"], "mika_renamed");
    assert_eq!(body["data"]["birthday"], "1999-02-03");
}

#[tokio::test]
async fn test_update_rechecks_uniqueness_against_other_users() {
    let app = spawn_app().await;
    let (_, key) = app.register_user("mika", "password123").await;
    app.register_user("rin", "password123").await;

    // Resubmitting your own name and email is not a conflict.
    let (status, body) = app
        .request(
            "PUT",
            "/api/users/me",
            Some(&key),
            Some(json!({ "userName": "mika", "email": "MIKA@example.com" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "mika@example.com");

    let (status, _) = app
        .request(
            "PUT",
            "/api/users/me",
            Some(&key),
            Some(json!({ "email": "rin@example.com" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .request("PUT", "/api/users/me", Some(&key), Some(json!({ "userName": "rin" })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = app.request("GET", "/api/auth/me", Some(&key), None).await;
    assert_eq!(body["data"]["userName"], "mika");
    assert_eq!(body["data"]["email"], "mika@example.com");
}

#[tokio::test]
async fn test_delete_self() {
    let app = spawn_app().await;
    let (_, key) = app.register_user("mika", "password123").await;

    let (status, _) = app.request("DELETE", "/api/users/me", Some(&key), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.request("GET", "/api/auth/me", Some(&key), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_user_management() {
    let app = spawn_app().await;
    let (user_id, _) = app.register_user("mika", "password123").await;

    let (status, body) = app.admin("GET", "/api/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, body) = app.admin("GET", &format!("/api/users/{user_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["userName"], "mika");

    let (status, body) = app
        .admin(
            "POST",
            "/api/users/admins",
            Some(json!({
                "userName": "second_admin",
                "email": "second@example.com",
                "password": "password123",
                "roleId": 2,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], "admin");

    let (status, _) = app
        .admin("DELETE", &format!("/api/users/{user_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.admin("GET", &format!("/api/users/{user_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_roles() {
    let app = spawn_app().await;

    let (status, body) = app.admin("GET", "/api/roles", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, body) = app
        .admin("POST", "/api/roles/create", Some(json!({ "name": "moderator" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    let role_id = body["data"]["id"].as_i64().unwrap();

    let (status, _) = app
        .admin("POST", "/api/roles/create", Some(json!({ "name": "moderator" })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app.admin("DELETE", "/api/roles/1", None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Role names are case-insensitive, so "ADMIN" is the built-in admin role.
    let (status, _) = app
        .admin("POST", "/api/roles/create", Some(json!({ "name": "ADMIN" })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app
        .admin("POST", "/api/roles/create", Some(json!({ "name": "Editor" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "editor");

    let (status, _) = app
        .admin("DELETE", &format!("/api/roles/{role_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}
