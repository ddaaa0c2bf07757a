use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use castlog::api::AppState;
use castlog::auth::Role;
use castlog::config::Config;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

/// Admin account seeded by the initial migration
const ADMIN_USERNAME: &str = "admin";
const ADMIN_PASSWORD: &str = "password";

async fn spawn_app() -> (Router, Arc<AppState>) {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    // One pooled connection keeps every query on the same in-memory database
    config.general.max_db_connections = 1;
    config.general.min_db_connections = 1;

    let state = castlog::api::create_app_state(config)
        .await
        .expect("Failed to create app state");

    (castlog::api::router(state.clone()), state)
}

async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }

    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

async fn login(app: &Router, username: &str, password: &str) -> String {
    let (status, body) = request(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"username": username, "password": password})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["data"]["access_token"].as_str().unwrap().to_string()
}

async fn register_user(app: &Router, username: &str, password: &str) {
    let (status, body) = request(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({"username": username, "password": password})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
}

/// Show -> season -> episode chain, returning the three ids.
async fn create_fixture(app: &Router, token: &str) -> (i64, i64, i64) {
    let (status, body) = request(
        app,
        "POST",
        "/api/tv/shows",
        Some(token),
        Some(json!({"title": "Severance"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let show_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = request(
        app,
        "POST",
        "/api/tv/seasons",
        Some(token),
        Some(json!({"tvshow_id": show_id, "season_number": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let season_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = request(
        app,
        "POST",
        "/api/tv/episodes",
        Some(token),
        Some(json!({"season_id": season_id, "episode_number": 1, "title": "Good News About Hell"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let episode_id = body["data"]["id"].as_i64().unwrap();

    (show_id, season_id, episode_id)
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _state) = spawn_app().await;

    let (status, body) = request(&app, "GET", "/api/system/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn test_seeded_admin_can_log_in() {
    let (app, _state) = spawn_app().await;
    let token = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    let (status, body) = request(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "admin");
    assert_eq!(body["data"]["role"], "admin");
}

#[tokio::test]
async fn test_register_login_me_flow() {
    let (app, _state) = spawn_app().await;
    register_user(&app, "alice", "pw123456").await;

    let token = login(&app, "alice", "pw123456").await;
    let (status, body) = request(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "alice");
    assert_eq!(body["data"]["role"], "user");
}

#[tokio::test]
async fn test_register_duplicate_username_is_field_error() {
    let (app, _state) = spawn_app().await;
    register_user(&app, "bob", "pw123456").await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({"username": "bob", "password": "other"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["username"].is_string(), "expected field map: {body}");
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let (app, _state) = spawn_app().await;

    let (status, _) = request(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"username": ADMIN_USERNAME, "password": "nope"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_requires_valid_token() {
    let (app, _state) = spawn_app().await;

    let (status, _) = request(&app, "GET", "/api/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = request(&app, "GET", "/api/auth/me", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_show_crud_as_admin() {
    let (app, _state) = spawn_app().await;
    let token = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/tv/shows",
        Some(&token),
        Some(json!({"title": "The Wire", "description": "Baltimore"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = request(&app, "GET", &format!("/api/tv/shows/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "The Wire");

    // Partial update: only the title changes
    let (status, body) = request(
        &app,
        "PUT",
        &format!("/api/tv/shows/{id}"),
        Some(&token),
        Some(json!({"title": "The Wire (2002)"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "The Wire (2002)");
    assert_eq!(body["data"]["description"], "Baltimore");

    let (status, body) = request(
        &app,
        "DELETE",
        &format!("/api/tv/shows/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"].as_i64().unwrap(), id);

    let (status, _) = request(&app, "GET", &format!("/api/tv/shows/{id}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_admin_mutation_is_forbidden_not_invalid() {
    let (app, _state) = spawn_app().await;
    register_user(&app, "carol", "pw123456").await;
    let token = login(&app, "carol", "pw123456").await;

    // Even with a well-formed payload the answer is 403, never 400
    let (status, _) = request(
        &app,
        "POST",
        "/api/tv/shows",
        Some(&token),
        Some(json!({"title": "Fargo"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = request(&app, "POST", "/api/tv/shows", None, Some(json!({"title": "Fargo"}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_validation_failure_returns_field_map() {
    let (app, _state) = spawn_app().await;
    let token = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/tv/shows",
        Some(&token),
        Some(json!({"title": "   "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["title"].is_string(), "expected field map: {body}");
}

#[tokio::test]
async fn test_season_number_unique_per_show() {
    let (app, _state) = spawn_app().await;
    let token = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;
    let (show_id, _, _) = create_fixture(&app, &token).await;

    let (status, _) = request(
        &app,
        "POST",
        "/api/tv/seasons",
        Some(&token),
        Some(json!({"tvshow_id": show_id, "season_number": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Season 1 of a different show is fine
    let (status, body) = request(
        &app,
        "POST",
        "/api/tv/shows",
        Some(&token),
        Some(json!({"title": "Other Show"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let other_show = body["data"]["id"].as_i64().unwrap();

    let (status, _) = request(
        &app,
        "POST",
        "/api/tv/seasons",
        Some(&token),
        Some(json!({"tvshow_id": other_show, "season_number": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Missing parent show is a 404, not a conflict
    let (status, _) = request(
        &app,
        "POST",
        "/api/tv/seasons",
        Some(&token),
        Some(json!({"tvshow_id": 9999, "season_number": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_episode_number_unique_per_season() {
    let (app, _state) = spawn_app().await;
    let token = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;
    let (_, season_id, _) = create_fixture(&app, &token).await;

    let (status, _) = request(
        &app,
        "POST",
        "/api/tv/episodes",
        Some(&token),
        Some(json!({"season_id": season_id, "episode_number": 1, "title": "Duplicate"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_episode_rating_bounds() {
    let (app, _state) = spawn_app().await;
    let token = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;
    let (_, season_id, _) = create_fixture(&app, &token).await;

    for (number, rating, expected) in [
        (2, -1, StatusCode::BAD_REQUEST),
        (3, 11, StatusCode::BAD_REQUEST),
        (4, 0, StatusCode::CREATED),
        (5, 10, StatusCode::CREATED),
    ] {
        let (status, body) = request(
            &app,
            "POST",
            "/api/tv/episodes",
            Some(&token),
            Some(json!({
                "season_id": season_id,
                "episode_number": number,
                "title": "Rated",
                "rating": rating,
            })),
        )
        .await;
        assert_eq!(status, expected, "rating {rating}: {body}");
    }
}

#[tokio::test]
async fn test_partial_episode_update_preserves_other_fields() {
    let (app, _state) = spawn_app().await;
    let token = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;
    let (_, _, episode_id) = create_fixture(&app, &token).await;

    let (status, body) = request(
        &app,
        "PUT",
        &format!("/api/tv/episodes/{episode_id}"),
        Some(&token),
        Some(json!({"rating": 9})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["rating"], 9);
    assert_eq!(body["data"]["title"], "Good News About Hell");
}

#[tokio::test]
async fn test_role_change_takes_effect_on_next_login() {
    let (app, state) = spawn_app().await;
    register_user(&app, "dave", "pw123456").await;
    let old_token = login(&app, "dave", "pw123456").await;

    let user = state
        .store
        .get_user_by_username("dave")
        .await
        .unwrap()
        .unwrap();
    state
        .store
        .update_user_role(user.id, Role::Admin)
        .await
        .unwrap();

    // The role claim was embedded at issuance; the old token stays a user
    let (status, _) = request(
        &app,
        "POST",
        "/api/tv/shows",
        Some(&old_token),
        Some(json!({"title": "Promoted"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let new_token = login(&app, "dave", "pw123456").await;
    let (status, _) = request(
        &app,
        "POST",
        "/api/tv/shows",
        Some(&new_token),
        Some(json!({"title": "Promoted"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_episode_actor_membership_replace() {
    let (app, _state) = spawn_app().await;
    let token = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;
    let (_, _, episode_id) = create_fixture(&app, &token).await;

    let mut actor_ids = Vec::new();
    for name in ["Adam", "Britt"] {
        let (status, body) = request(
            &app,
            "POST",
            "/api/people/actors",
            Some(&token),
            Some(json!({"first_name": name})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        actor_ids.push(body["data"]["id"].as_i64().unwrap());
    }

    let (status, body) = request(
        &app,
        "PUT",
        &format!("/api/tv/episodes/{episode_id}/actors"),
        Some(&token),
        Some(json!({"ids": actor_ids})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    // Unknown member leaves the membership untouched
    let (status, _) = request(
        &app,
        "PUT",
        &format!("/api/tv/episodes/{episode_id}/actors"),
        Some(&token),
        Some(json!({"ids": [9999]})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = request(
        &app,
        "GET",
        &format!("/api/tv/episodes/{episode_id}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["actor_ids"].as_array().unwrap().len(), 2);

    // Empty set clears everything
    let (status, body) = request(
        &app,
        "PUT",
        &format!("/api/tv/episodes/{episode_id}/actors"),
        Some(&token),
        Some(json!({"ids": []})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_screen_time_needs_auth_but_not_admin() {
    let (app, _state) = spawn_app().await;
    let admin_token = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;
    let (_, _, episode_id) = create_fixture(&app, &admin_token).await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/people/actors",
        Some(&admin_token),
        Some(json!({"first_name": "Tramell"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let actor_id = body["data"]["id"].as_i64().unwrap();

    register_user(&app, "erin", "pw123456").await;
    let user_token = login(&app, "erin", "pw123456").await;

    let payload = json!({
        "actor_id": actor_id,
        "episode_id": episode_id,
        "start_time": "00:01:00",
        "end_time": "00:05:00",
        "role_name": "Dylan",
    });

    let (status, _) = request(&app, "POST", "/api/people/screentimes", None, Some(payload.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = request(
        &app,
        "POST",
        "/api/people/screentimes",
        Some(&user_token),
        Some(payload.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Same (actor, episode, start_time) again
    let (status, _) = request(
        &app,
        "POST",
        "/api/people/screentimes",
        Some(&user_token),
        Some(payload),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Unknown actor is a 404
    let (status, _) = request(
        &app,
        "POST",
        "/api/people/screentimes",
        Some(&user_token),
        Some(json!({"actor_id": 9999, "episode_id": episode_id})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_nested_listings() {
    let (app, _state) = spawn_app().await;
    let token = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;
    let (show_id, season_id, _) = create_fixture(&app, &token).await;

    let (status, body) = request(
        &app,
        "GET",
        &format!("/api/tv/shows/{show_id}/seasons"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = request(
        &app,
        "GET",
        &format!("/api/tv/seasons/{season_id}/episodes"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = request(&app, "GET", "/api/tv/shows/9999/seasons", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
