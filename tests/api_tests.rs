mod common;

use axum::http::StatusCode;
use common::{ADMIN_API_KEY, spawn_app};
use serde_json::json;

#[tokio::test]
async fn test_health_is_public() {
    let app = spawn_app().await;

    let (status, body) = app.get("/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["database"], true);
}

#[tokio::test]
async fn test_protected_routes_require_auth() {
    let app = spawn_app().await;

    let (status, body) = app.get("/api/auth/me").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let (status, _) = app
        .request("GET", "/api/favorites", Some("wrong-key"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.request("GET", "/api/auth/me", Some(ADMIN_API_KEY), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["userName"], "admin");
    assert_eq!(body["data"]["role"], "admin");
}

#[tokio::test]
async fn test_bearer_token_is_accepted() {
    let app = spawn_app().await;

    let request = axum::http::Request::builder()
        .uri("/api/auth/me")
        .header("Authorization", format!("Bearer {ADMIN_API_KEY}"))
        .body(axum::body::Body::empty())
        .unwrap();

    use tower::ServiceExt;
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_public_catalog_routes() {
    let app = spawn_app().await;

    for uri in [
        "/api/animes",
        "/api/animes/features",
        "/api/animes/likes",
        "/api/animes/newest",
        "/api/classifications",
        "/api/categories",
    ] {
        let (status, body) = app.get(uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body["data"], json!([]), "{uri}");
    }
}

#[tokio::test]
async fn test_test_show_scenario() {
    let app = spawn_app().await;

    let anime_id = app.create_anime("Test Show", true).await;
    let season_id = app.create_season(anime_id, "S1").await;
    app.create_episode(season_id, "E1", 1).await;

    let (status, body) = app.get("/api/animes/name/test").await;
    assert_eq!(status, StatusCode::OK);

    let anime = &body["data"];
    assert_eq!(anime["name"], "Test Show");
    assert_eq!(anime["feature"], true);
    assert_eq!(anime["likes"], 0);

    let seasons = anime["seasons"].as_array().unwrap();
    assert_eq!(seasons.len(), 1);
    assert_eq!(seasons[0]["name"], "S1");

    let episodes = seasons[0]["episodes"].as_array().unwrap();
    assert_eq!(episodes.len(), 1);
    assert_eq!(episodes[0]["name"], "E1");
    assert_eq!(episodes[0]["likes"], 0);
    assert_eq!(episodes[0]["comments"], json!([]));
}

#[tokio::test]
async fn test_find_by_name_miss_is_not_found() {
    let app = spawn_app().await;
    app.create_anime("Test Show", false).await;

    let (status, body) = app.get("/api/animes/name/nothing-like-it").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_find_by_name_treats_wildcards_literally() {
    let app = spawn_app().await;
    app.create_anime("Test Show", false).await;

    let (status, _) = app.get("/api/animes/name/%25").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_find_by_name_folds_non_ascii_case() {
    let app = spawn_app().await;
    app.create_anime("Test Show", false).await;
    let anime_id = app.create_anime("Élan Vital", false).await;

    // "élan", "Élan" and "ÉLAN", percent-encoded.
    for uri in [
        "/api/animes/name/%C3%A9lan",
        "/api/animes/name/%C3%89lan",
        "/api/animes/name/%C3%89LAN",
    ] {
        let (status, body) = app.get(uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body["data"]["id"], anime_id, "{uri}");
        assert_eq!(body["data"]["name"], "Élan Vital", "{uri}");
    }

    let (status, _) = app.get("/api/animes/name/elan").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_featured_and_top_liked_are_capped() {
    let app = spawn_app().await;

    for i in 0..12 {
        app.create_anime(&format!("Show {i}"), true).await;
    }

    let (_, featured) = app.get("/api/animes/features").await;
    assert_eq!(featured["data"].as_array().unwrap().len(), 10);

    let (_, top) = app.get("/api/animes/likes").await;
    assert_eq!(top["data"].as_array().unwrap().len(), 10);

    let (_, newest) = app.get("/api/animes/newest").await;
    let newest = newest["data"].as_array().unwrap();
    assert_eq!(newest.len(), 10);
    assert_eq!(newest[0]["name"], "Show 11");

    let (_, all) = app.get("/api/animes").await;
    assert_eq!(all["data"].as_array().unwrap().len(), 12);
}

#[tokio::test]
async fn test_featured_excludes_unfeatured() {
    let app = spawn_app().await;
    app.create_anime("Plain", false).await;
    app.create_anime("Spotlight", true).await;

    let (_, body) = app.get("/api/animes/features").await;
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Spotlight"]);
}

#[tokio::test]
async fn test_top_liked_orders_by_likes() {
    let app = spawn_app().await;
    let quiet = app.create_anime("Quiet", false).await;
    let popular = app.create_anime("Popular", false).await;

    let (_, key_a) = app.register_user("alice", "password123").await;
    let (_, key_b) = app.register_user("bruno", "password123").await;

    for key in [&key_a, &key_b] {
        let (status, _) = app
            .request("POST", &format!("/api/likes/animes/{popular}"), Some(key), None)
            .await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, _) = app
        .request("POST", &format!("/api/likes/animes/{quiet}"), Some(&key_a), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get("/api/animes/likes").await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data[0]["name"], "Popular");
    assert_eq!(data[0]["likes"], 2);
    assert_eq!(data[1]["name"], "Quiet");
    assert_eq!(data[1]["likes"], 1);
}

#[tokio::test]
async fn test_read_model_is_idempotent() {
    let app = spawn_app().await;
    let anime_id = app.create_anime("Stable", true).await;
    let season_id = app.create_season(anime_id, "S1").await;
    app.create_episode(season_id, "E2", 2).await;
    app.create_episode(season_id, "E1", 1).await;

    let (_, first) = app.get(&format!("/api/animes/id/{anime_id}")).await;
    let (_, second) = app.get(&format!("/api/animes/id/{anime_id}")).await;
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );

    let episodes = first["data"]["seasons"][0]["episodes"].as_array().unwrap();
    assert_eq!(episodes[0]["name"], "E1");
    assert_eq!(episodes[1]["name"], "E2");
}

#[tokio::test]
async fn test_short_listings_omit_comments() {
    let app = spawn_app().await;
    let anime_id = app.create_anime("Brief", true).await;
    let season_id = app.create_season(anime_id, "S1").await;
    app.create_episode(season_id, "E1", 1).await;

    let (_, body) = app.get("/api/animes/features").await;
    let episode = &body["data"][0]["seasons"][0]["episodes"][0];
    assert!(episode.get("comments").is_none());
}

#[tokio::test]
async fn test_validation_errors_are_bad_request() {
    let app = spawn_app().await;

    let (status, body) = app
        .admin(
            "POST",
            "/api/animes/create",
            Some(json!({
                "name": "  ",
                "synopsis": "x",
                "thumbnailUrl": "not a url",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"name"));
    assert!(fields.contains(&"thumbnailUrl"));

    let (status, _) = app.get("/api/animes/id/0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = spawn_app().await;

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/animes/create")
        .header("X-Api-Key", ADMIN_API_KEY)
        .header("Content-Type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();

    use tower::ServiceExt;
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_non_admin_cannot_manage_catalog() {
    let app = spawn_app().await;
    let anime_id = app.create_anime("Guarded", false).await;
    let (_, key) = app.register_user("viewer", "password123").await;

    let (status, _) = app
        .request(
            "POST",
            "/api/animes/create",
            Some(&key),
            Some(json!({
                "name": "Sneaky",
                "synopsis": "x",
                "thumbnailUrl": "https://images.example.com/t.jpg",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .request("DELETE", &format!("/api/animes/{anime_id}"), Some(&key), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.request("GET", "/api/users", Some(&key), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.request("GET", "/api/metrics", Some(&key), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_anime_tags_and_update() {
    let app = spawn_app().await;

    let (status, action) = app
        .admin("POST", "/api/categories/create", Some(json!({ "name": "Action" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, teen) = app
        .admin("POST", "/api/classifications/create", Some(json!({ "name": "Teen" })))
        .await;

    let (status, _) = app
        .admin("POST", "/api/categories/create", Some(json!({ "name": "Action" })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app
        .admin(
            "POST",
            "/api/animes/create",
            Some(json!({
                "name": "Tagged",
                "synopsis": "x",
                "thumbnailUrl": "https://images.example.com/t.jpg",
                "categoryIds": [action["data"]["id"]],
                "classificationIds": [teen["data"]["id"]],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["categories"], json!(["Action"]));
    assert_eq!(body["data"]["classifications"], json!(["Teen"]));
    let anime_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = app
        .admin(
            "PUT",
            &format!("/api/animes/{anime_id}"),
            Some(json!({ "name": "Renamed", "categoryIds": [] })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Renamed");
    assert_eq!(body["data"]["categories"], json!([]));
    assert_eq!(body["data"]["classifications"], json!(["Teen"]));

    let (status, _) = app
        .admin(
            "PUT",
            &format!("/api/animes/{anime_id}"),
            Some(json!({ "categoryIds": [999] })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_anime_cascades() {
    let app = spawn_app().await;
    let anime_id = app.create_anime("Doomed", false).await;
    let season_id = app.create_season(anime_id, "S1").await;
    let episode_id = app.create_episode(season_id, "E1", 1).await;

    let (status, _) = app
        .admin("DELETE", &format!("/api/animes/{anime_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get(&format!("/api/animes/id/{anime_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.get(&format!("/api/comments/episode/{episode_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .admin("DELETE", &format!("/api/animes/{anime_id}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_season_requires_existing_anime() {
    let app = spawn_app().await;

    let (status, _) = app
        .admin(
            "POST",
            "/api/seasons/create",
            Some(json!({ "name": "Orphan", "animeId": 42 })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_all_with_more_episodes_than_sqlite_parameters() {
    use anicat::entities::episodes;
    use sea_orm::{EntityTrait, Set};

    const EPISODES: i32 = 33_000;

    let app = spawn_app().await;
    let anime_id = app.create_anime("Long Runner", false).await;
    let season_id = app.create_season(anime_id, "S1").await;

    let now = chrono::Utc::now().to_rfc3339();
    let orders: Vec<i32> = (1..=EPISODES).collect();
    for batch in orders.chunks(1_000) {
        let rows = batch.iter().map(|&order| episodes::ActiveModel {
            name: Set(format!("E{order}")),
            url: Set("https://videos.example.com/ep.mp4".to_string()),
            episode_order: Set(order),
            season_id: Set(season_id),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        });
        episodes::Entity::insert_many(rows)
            .exec_without_returning(&app.state.store().conn)
            .await
            .unwrap();
    }

    let (status, body) = app.get("/api/animes").await;
    assert_eq!(status, StatusCode::OK);

    let episodes = body["data"][0]["seasons"][0]["episodes"].as_array().unwrap();
    assert_eq!(episodes.len(), EPISODES as usize);
    assert_eq!(episodes[0]["name"], "E1");
    assert_eq!(episodes[episodes.len() - 1]["name"], format!("E{EPISODES}"));
}
