use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use castlog::api::AppState;
use castlog::auth::Role;
use castlog::config::{Config, SecurityConfig};
use castlog::models::{EpisodeInput, RegistrationInput, SeasonInput, ShowInput};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

async fn spawn_app() -> (Router, Arc<AppState>) {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    // One pooled connection keeps every query on the same in-memory database
    config.general.max_db_connections = 1;
    config.general.min_db_connections = 1;

    let state = castlog::api::create_app_state(config)
        .await
        .expect("Failed to create app state");

    let app = Router::new()
        .merge(castlog::api::router(state.clone()))
        .merge(castlog::ui::router(state.clone()));

    (app, state)
}

fn session_cookie(response: &Response<Body>) -> String {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("id="))
        .and_then(|v| v.split(';').next())
        .expect("no session cookie set")
        .to_string()
}

async fn get(app: &Router, uri: &str, cookie: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn form_post(app: &Router, uri: &str, cookie: Option<&str>, body: &str) -> Response<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    app.clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

async fn body_string(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("no Location header")
}

/// Log in through the form and hand back the session cookie.
async fn log_in(app: &Router, username: &str, password: &str) -> String {
    let response = form_post(
        app,
        "/login",
        None,
        &format!("username={username}&password={password}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");
    session_cookie(&response)
}

#[tokio::test]
async fn test_login_page_renders() {
    let (app, _state) = spawn_app().await;

    let response = get(&app, "/login", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_string(response).await;
    assert!(html.contains("<form"));
    assert!(html.contains("name=\"password\""));
}

#[tokio::test]
async fn test_unauthenticated_pages_redirect_to_login() {
    let (app, _state) = spawn_app().await;

    for uri in ["/shows", "/dashboard", "/actors", "/crew"] {
        let response = get(&app, uri, None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&response), "/login", "{uri}");
    }

    let response = get(&app, "/", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_login_logout_session_flow() {
    let (app, _state) = spawn_app().await;
    let cookie = log_in(&app, "admin", "password").await;

    let response = get(&app, "/dashboard", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("admin"));

    let response = get(&app, "/logout", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");

    // The old cookie no longer carries an identity
    let response = get(&app, "/dashboard", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_failed_login_flashes_a_message() {
    let (app, _state) = spawn_app().await;

    let response = form_post(&app, "/login", None, "username=admin&password=wrong").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
    let cookie = session_cookie(&response);

    let html = body_string(get(&app, "/login", Some(&cookie)).await).await;
    assert!(html.contains("Invalid username or password"));

    // Flash messages are transient
    let html = body_string(get(&app, "/login", Some(&cookie)).await).await;
    assert!(!html.contains("Invalid username or password"));
}

#[tokio::test]
async fn test_non_admin_mutation_bounces_with_flash() {
    let (app, state) = spawn_app().await;
    state
        .store
        .create_user(
            &RegistrationInput {
                username: "viewer".to_string(),
                password: "pw123456".to_string(),
                email: None,
            },
            Role::User,
            &SecurityConfig::default(),
        )
        .await
        .unwrap();

    let cookie = log_in(&app, "viewer", "pw123456").await;

    let response = form_post(&app, "/shows/add", Some(&cookie), "title=Nope").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/shows");

    assert!(state.store.list_shows().await.unwrap().is_empty());

    let html = body_string(get(&app, "/shows", Some(&cookie)).await).await;
    assert!(html.contains("Admin privileges required"));
}

#[tokio::test]
async fn test_admin_creates_show_via_form() {
    let (app, state) = spawn_app().await;
    let cookie = log_in(&app, "admin", "password").await;

    let response = form_post(
        &app,
        "/shows/add",
        Some(&cookie),
        "title=Severance&description=Lumon",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/shows");

    let shows = state.store.list_shows().await.unwrap();
    assert_eq!(shows.len(), 1);
    assert_eq!(shows[0].title, "Severance");

    let html = body_string(get(&app, "/shows", Some(&cookie)).await).await;
    assert!(html.contains("Severance"));
}

#[tokio::test]
async fn test_episode_edit_multiselect_replaces_membership() {
    let (app, state) = spawn_app().await;

    let show = state
        .store
        .create_show(&ShowInput {
            title: "Andor".to_string(),
            description: None,
        })
        .await
        .unwrap();
    let season = state
        .store
        .create_season(&SeasonInput {
            tvshow_id: show.id,
            season_number: 1,
            title: None,
            description: None,
            date_started: None,
            date_ended: None,
        })
        .await
        .unwrap();
    let episode = state
        .store
        .create_episode(&EpisodeInput {
            season_id: season.id,
            episode_number: 1,
            title: "Kassa".to_string(),
            description: None,
            rating: None,
            date_published: None,
        })
        .await
        .unwrap();

    let mut actor_ids = Vec::new();
    for name in ["Diego", "Stellan"] {
        let actor = state
            .store
            .create_actor(&castlog::models::ActorInput {
                first_name: name.to_string(),
                last_name: None,
            })
            .await
            .unwrap();
        actor_ids.push(actor.id);
    }

    let cookie = log_in(&app, "admin", "password").await;

    // Repeated actor_ids keys come from the multi-select
    let body = format!(
        "episode_number=1&title=Kassa&description=&rating=&date_published=&actor_ids={}&actor_ids={}",
        actor_ids[0], actor_ids[1]
    );
    let response = form_post(
        &app,
        &format!("/episodes/{}/edit", episode.id),
        Some(&cookie),
        &body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let mut current = state.store.episode_actor_ids(episode.id).await.unwrap();
    current.sort_unstable();
    let mut expected = actor_ids.clone();
    expected.sort_unstable();
    assert_eq!(current, expected);

    // Submitting with nothing selected clears the membership
    let response = form_post(
        &app,
        &format!("/episodes/{}/edit", episode.id),
        Some(&cookie),
        "episode_number=1&title=Kassa&description=&rating=&date_published=",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(state.store.episode_actor_ids(episode.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_episode_edit_is_all_or_nothing() {
    let (app, state) = spawn_app().await;

    let show = state
        .store
        .create_show(&ShowInput {
            title: "Chernobyl".to_string(),
            description: None,
        })
        .await
        .unwrap();
    let season = state
        .store
        .create_season(&SeasonInput {
            tvshow_id: show.id,
            season_number: 1,
            title: None,
            description: None,
            date_started: None,
            date_ended: None,
        })
        .await
        .unwrap();
    let episode = state
        .store
        .create_episode(&EpisodeInput {
            season_id: season.id,
            episode_number: 1,
            title: "1:23:45".to_string(),
            description: None,
            rating: None,
            date_published: None,
        })
        .await
        .unwrap();
    let actor = state
        .store
        .create_actor(&castlog::models::ActorInput {
            first_name: "Jared".to_string(),
            last_name: None,
        })
        .await
        .unwrap();
    state
        .store
        .set_episode_actors(episode.id, &[actor.id])
        .await
        .unwrap();

    let cookie = log_in(&app, "admin", "password").await;

    // A vanished actor id in the submission bounces with a flash, and the
    // title change rolls back with the membership replace
    let response = form_post(
        &app,
        &format!("/episodes/{}/edit", episode.id),
        Some(&cookie),
        "episode_number=1&title=Changed+Title&description=&rating=&date_published=&actor_ids=9999",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        format!("/episodes/{}/edit", episode.id)
    );

    let unchanged = state.store.get_episode(episode.id).await.unwrap().unwrap();
    assert_eq!(unchanged.title, "1:23:45");
    assert_eq!(
        state.store.episode_actor_ids(episode.id).await.unwrap(),
        vec![actor.id]
    );

    let html = body_string(
        get(&app, &format!("/episodes/{}/edit", episode.id), Some(&cookie)).await,
    )
    .await;
    assert!(html.contains("A selected person no longer exists"));
}

#[tokio::test]
async fn test_blank_edit_field_clears_the_value() {
    let (app, state) = spawn_app().await;
    let cookie = log_in(&app, "admin", "password").await;

    let show = state
        .store
        .create_show(&ShowInput {
            title: "Mindhunter".to_string(),
            description: Some("FBI profilers".to_string()),
        })
        .await
        .unwrap();

    // An always-submitted form field left blank is an explicit clear
    let response = form_post(
        &app,
        &format!("/shows/{}/edit", show.id),
        Some(&cookie),
        "title=Mindhunter&description=",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let updated = state.store.get_show(show.id).await.unwrap().unwrap();
    assert_eq!(updated.description, None);

    // Same semantics on season edit
    let season = state
        .store
        .create_season(&SeasonInput {
            tvshow_id: show.id,
            season_number: 1,
            title: Some("Volume One".to_string()),
            description: None,
            date_started: Some("2017-10-13".to_string()),
            date_ended: None,
        })
        .await
        .unwrap();

    let response = form_post(
        &app,
        &format!("/seasons/{}/edit", season.id),
        Some(&cookie),
        "season_number=1&title=&description=&date_started=&date_ended=",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let updated = state.store.get_season(season.id).await.unwrap().unwrap();
    assert_eq!(updated.title, None);
    assert_eq!(updated.date_started, None);
}
