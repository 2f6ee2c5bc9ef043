mod common;

use std::sync::Arc;

use anicat::domain::{Actor, ServiceError};
use anicat::models::{NewAnime, NewUser};
use anicat::state::SharedState;
use axum::http::StatusCode;
use common::{spawn_app, test_config};
use serde_json::json;

async fn episode_fixture(app: &common::TestApp) -> (i32, i32) {
    let anime_id = app.create_anime("Social Show", false).await;
    let season_id = app.create_season(anime_id, "S1").await;
    let episode_id = app.create_episode(season_id, "E1", 1).await;
    (anime_id, episode_id)
}

#[tokio::test]
async fn test_comment_ownership() {
    let app = spawn_app().await;
    let (_, episode_id) = episode_fixture(&app).await;
    let (author_id, author) = app.register_user("author", "password123").await;
    let (_, stranger) = app.register_user("stranger", "password123").await;

    let (status, body) = app
        .request(
            "POST",
            "/api/comments/create",
            Some(&author),
            Some(json!({ "episodeId": episode_id, "text": "Great episode" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["userId"], author_id);
    assert_eq!(body["data"]["likes"], 0);
    let comment_id = body["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/comments/{comment_id}");

    let (status, _) = app
        .request("PUT", &uri, Some(&stranger), Some(json!({ "text": "Hijacked" })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.request("DELETE", &uri, Some(&stranger), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Admins may remove comments but not reword them.
    let (status, _) = app
        .admin("PUT", &uri, Some(json!({ "text": "Moderated" })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .request("PUT", &uri, Some(&author), Some(json!({ "text": "Edited" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["text"], "Edited");

    let (status, _) = app.admin("DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.request("DELETE", &uri, Some(&author), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_comment_validation_and_missing_episode() {
    let app = spawn_app().await;
    let (_, episode_id) = episode_fixture(&app).await;
    let (_, key) = app.register_user("author", "password123").await;

    let (status, body) = app
        .request(
            "POST",
            "/api/comments/create",
            Some(&key),
            Some(json!({ "episodeId": episode_id, "text": "   " })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"][0]["field"], "text");

    let (status, _) = app
        .request(
            "POST",
            "/api/comments/create",
            Some(&key),
            Some(json!({ "episodeId": 999, "text": "Hello" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_comments_listing() {
    let app = spawn_app().await;
    let (anime_id, episode_id) = episode_fixture(&app).await;
    let (author_id, key) = app.register_user("author", "password123").await;

    for text in ["first", "second"] {
        let (status, _) = app
            .request(
                "POST",
                "/api/comments/create",
                Some(&key),
                Some(json!({ "episodeId": episode_id, "text": text })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = app.get(&format!("/api/comments/episode/{episode_id}")).await;
    assert_eq!(status, StatusCode::OK);
    let texts: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["first", "second"]);

    let (status, _) = app
        .request("GET", &format!("/api/comments/user/{author_id}"), Some(&key), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .admin("GET", &format!("/api/comments/user/{author_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (_, body) = app.get(&format!("/api/animes/id/{anime_id}")).await;
    let comments = body["data"]["seasons"][0]["episodes"][0]["comments"]
        .as_array()
        .unwrap();
    assert_eq!(comments.len(), 2);
}

#[tokio::test]
async fn test_like_twice_conflicts() {
    let app = spawn_app().await;
    let (anime_id, episode_id) = episode_fixture(&app).await;
    let (_, key) = app.register_user("fan", "password123").await;

    for uri in [
        format!("/api/likes/animes/{anime_id}"),
        format!("/api/likes/episodes/{episode_id}"),
    ] {
        let (status, _) = app.request("POST", &uri, Some(&key), None).await;
        assert_eq!(status, StatusCode::OK, "{uri}");

        let (status, body) = app.request("POST", &uri, Some(&key), None).await;
        assert_eq!(status, StatusCode::CONFLICT, "{uri}");
        assert_eq!(body["success"], false);
    }

    let (_, body) = app.get(&format!("/api/animes/id/{anime_id}")).await;
    assert_eq!(body["data"]["likes"], 1);
    assert_eq!(body["data"]["seasons"][0]["episodes"][0]["likes"], 1);
}

#[tokio::test]
async fn test_unlike_missing_is_not_found() {
    let app = spawn_app().await;
    let (anime_id, _) = episode_fixture(&app).await;
    let (_, key) = app.register_user("fan", "password123").await;
    let uri = format!("/api/likes/animes/{anime_id}");

    let (status, _) = app.request("DELETE", &uri, Some(&key), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.request("POST", &uri, Some(&key), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.request("DELETE", &uri, Some(&key), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.request("DELETE", &uri, Some(&key), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .request("POST", "/api/likes/animes/999", Some(&key), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_comment_likes_are_counted() {
    let app = spawn_app().await;
    let (_, episode_id) = episode_fixture(&app).await;
    let (_, author) = app.register_user("author", "password123").await;
    let (_, fan) = app.register_user("fan", "password123").await;

    let (_, body) = app
        .request(
            "POST",
            "/api/comments/create",
            Some(&author),
            Some(json!({ "episodeId": episode_id, "text": "Like me" })),
        )
        .await;
    let comment_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = app
        .request("POST", &format!("/api/likes/comments/{comment_id}"), Some(&fan), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["target"], "comment");

    let (_, body) = app.get(&format!("/api/comments/episode/{episode_id}")).await;
    assert_eq!(body["data"][0]["likes"], 1);
}

#[tokio::test]
async fn test_favorites_lifecycle() {
    let app = spawn_app().await;
    let (anime_id, _) = episode_fixture(&app).await;
    let (_, owner) = app.register_user("owner", "password123").await;
    let (_, other) = app.register_user("other", "password123").await;
    let uri = format!("/api/favorites/{anime_id}");

    let (status, body) = app.request("POST", &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);
    let favorite_id = body["data"]["id"].as_i64().unwrap();

    let (status, _) = app.request("POST", &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app.request("GET", "/api/favorites", Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["favoriteId"], favorite_id);
    assert_eq!(body["data"][0]["anime"]["name"], "Social Show");

    let (_, body) = app.request("GET", "/api/favorites", Some(&other), None).await;
    assert_eq!(body["data"], json!([]));

    let delete_uri = format!("/api/favorites/{favorite_id}");
    let (status, _) = app.request("DELETE", &delete_uri, Some(&other), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.request("DELETE", &delete_uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .request("POST", "/api/favorites/999", Some(&owner), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_favorites_yield_one_conflict() {
    let (config, db_path) = test_config();
    let state = SharedState::new(config).await.unwrap();
    let admin = Actor::admin(1);

    // Bootstrap admin is user 1; users 2..=7 follow.
    for i in 2..=7 {
        let input = NewUser {
            user_name: format!("user{i}"),
            email: format!("user{i}@example.com"),
            password: "unused".to_string(),
            profile: None,
            birthday: None,
        };
        let user = state
            .store
            .users()
            .create(&input, "not-a-real-hash".to_string(), 1)
            .await
            .unwrap();
        assert_eq!(user.id, i);
    }

    for i in 1..=3 {
        let anime = state
            .catalog_service
            .create_anime(
                admin,
                NewAnime {
                    name: format!("Anime {i}"),
                    synopsis: "x".to_string(),
                    thumbnail_url: "https://images.example.com/t.jpg".to_string(),
                    background_url: None,
                    feature: false,
                    classification_ids: vec![],
                    category_ids: vec![],
                },
            )
            .await
            .unwrap();
        assert_eq!(anime.id, i);
    }

    let social = Arc::clone(&state.social_service);
    let actor = Actor::user(7);

    let first = tokio::spawn({
        let social = social.clone();
        async move { social.add_favorite(actor, 3).await }
    });
    let second = tokio::spawn({
        let social = social.clone();
        async move { social.add_favorite(actor, 3).await }
    });

    let results = [first.await.unwrap(), second.await.unwrap()];
    let successes = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(ServiceError::Conflict(_))))
        .count();
    assert_eq!(successes, 1, "{results:?}");
    assert_eq!(conflicts, 1, "{results:?}");

    let favorites = social.list_favorites(actor).await.unwrap();
    assert_eq!(favorites.len(), 1);

    for suffix in ["", "-wal", "-shm"] {
        let mut path = db_path.clone().into_os_string();
        path.push(suffix);
        std::fs::remove_file(path).ok();
    }
}
