//! A stand-in for the Spotify accounts service and Web API, plus helpers
//! that run the proxy against it on ephemeral ports.
#![allow(dead_code)]

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
    },
};

use axum::{
    Extension, Form, Json, Router,
    extract::{Path, Query},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde_json::{Value, json};
use spotproxy::{
    config::{Config, RefreshPolicy},
    server,
    session::Session,
    spotify::SpotifyClient,
};

pub const CLIENT_ID: &str = "test-client";
pub const CLIENT_SECRET: &str = "test-secret";
pub const VALID_CODE: &str = "valid-code";
pub const REDIRECT_URI: &str = "http://127.0.0.1:5000/spotify/callback";
pub const AVAILABLE_TOP_TRACKS: usize = 20;

#[derive(Debug)]
pub struct MockSpotify {
    pub token_requests: AtomicUsize,
    pub refresh_requests: AtomicUsize,
    pub issued: AtomicUsize,
    pub expires_in: AtomicU64,
    pub fail_refresh: AtomicBool,
    pub fail_top_tracks: AtomicBool,
    pub nothing_playing: AtomicBool,
    pub empty_playing_body: AtomicBool,
    pub idle_player: AtomicBool,
    pub no_active_device: AtomicBool,
    pub playing: Mutex<Vec<String>>,
    pub paused: AtomicBool,
    pub last_bearer: Mutex<Option<String>>,
}

impl Default for MockSpotify {
    fn default() -> Self {
        MockSpotify {
            token_requests: AtomicUsize::new(0),
            refresh_requests: AtomicUsize::new(0),
            issued: AtomicUsize::new(0),
            expires_in: AtomicU64::new(3600),
            fail_refresh: AtomicBool::new(false),
            fail_top_tracks: AtomicBool::new(false),
            nothing_playing: AtomicBool::new(false),
            empty_playing_body: AtomicBool::new(false),
            idle_player: AtomicBool::new(false),
            no_active_device: AtomicBool::new(false),
            playing: Mutex::new(Vec::new()),
            paused: AtomicBool::new(false),
            last_bearer: Mutex::new(None),
        }
    }
}

type Mock = Extension<Arc<MockSpotify>>;

fn api_error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({"error": {"status": status.as_u16(), "message": message}})),
    )
        .into_response()
}

fn auth_error(error: &str, description: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"error": error, "error_description": description})),
    )
        .into_response()
}

/// Checks the bearer token; every token the mock ever issued is accepted.
fn authorize(mock: &MockSpotify, headers: &HeaderMap) -> Result<(), Response> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);

    *mock.last_bearer.lock().unwrap() = bearer.clone();

    match bearer {
        Some(token) if token.starts_with("access-") => Ok(()),
        _ => Err(api_error(StatusCode::UNAUTHORIZED, "Invalid access token")),
    }
}

fn track_json(index: usize) -> Value {
    json!({
        "id": format!("track-{index}"),
        "name": format!("Track {index}"),
        "uri": format!("spotify:track:track-{index}"),
        "artists": [
            {"id": format!("artist-{index}"), "name": format!("Artist {index}")},
            {"id": "feature", "name": "Featured"}
        ],
        "popularity": 50
    })
}

async fn token(
    Extension(mock): Mock,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    mock.token_requests.fetch_add(1, Ordering::SeqCst);

    let expected = format!("Basic {}", base64_credentials(CLIENT_ID, CLIENT_SECRET));
    if headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) != Some(expected.as_str()) {
        return auth_error("invalid_client", "Invalid client");
    }

    let expires_in = mock.expires_in.load(Ordering::SeqCst);
    let n = mock.issued.fetch_add(1, Ordering::SeqCst) + 1;

    match form.get("grant_type").map(String::as_str) {
        Some("authorization_code") => {
            if form.get("code").map(String::as_str) != Some(VALID_CODE) {
                return auth_error("invalid_grant", "Invalid authorization code");
            }
            if form.get("redirect_uri").map(String::as_str) != Some(REDIRECT_URI) {
                return auth_error("invalid_grant", "Invalid redirect URI");
            }
            Json(json!({
                "access_token": format!("access-{n}"),
                "token_type": "Bearer",
                "scope": "user-top-read user-read-currently-playing user-modify-playback-state user-follow-read",
                "expires_in": expires_in,
                "refresh_token": "refresh-1"
            }))
            .into_response()
        }
        Some("refresh_token") => {
            mock.refresh_requests.fetch_add(1, Ordering::SeqCst);
            if mock.fail_refresh.load(Ordering::SeqCst)
                || form.get("refresh_token").map(String::as_str) != Some("refresh-1")
            {
                return auth_error("invalid_grant", "Refresh token revoked");
            }
            Json(json!({
                "access_token": format!("access-{n}"),
                "token_type": "Bearer",
                "scope": "user-top-read",
                "expires_in": expires_in
            }))
            .into_response()
        }
        _ => auth_error("unsupported_grant_type", "grant_type must be supplied"),
    }
}

async fn top_tracks(
    Extension(mock): Mock,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Err(rejected) = authorize(&mock, &headers) {
        return rejected;
    }
    if mock.fail_top_tracks.load(Ordering::SeqCst) {
        return api_error(StatusCode::SERVICE_UNAVAILABLE, "Service unavailable");
    }

    let limit = query
        .get("limit")
        .and_then(|l| l.parse::<usize>().ok())
        .unwrap_or(20)
        .min(AVAILABLE_TOP_TRACKS);
    let items: Vec<Value> = (0..limit).map(track_json).collect();
    Json(json!({"items": items, "total": AVAILABLE_TOP_TRACKS, "limit": limit})).into_response()
}

async fn currently_playing(Extension(mock): Mock, headers: HeaderMap) -> Response {
    if let Err(rejected) = authorize(&mock, &headers) {
        return rejected;
    }
    if mock.nothing_playing.load(Ordering::SeqCst) {
        return StatusCode::NO_CONTENT.into_response();
    }
    if mock.empty_playing_body.load(Ordering::SeqCst) {
        return StatusCode::OK.into_response();
    }
    if mock.idle_player.load(Ordering::SeqCst) {
        return Json(json!({
            "is_playing": false,
            "progress_ms": null,
            "currently_playing_type": "unknown",
            "item": null
        }))
        .into_response();
    }
    Json(json!({
        "is_playing": true,
        "progress_ms": 1000,
        "currently_playing_type": "track",
        "item": track_json(3)
    }))
    .into_response()
}

async fn following(
    Extension(mock): Mock,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Err(rejected) = authorize(&mock, &headers) {
        return rejected;
    }
    if query.get("type").map(String::as_str) != Some("artist") {
        return api_error(StatusCode::BAD_REQUEST, "type must be artist");
    }
    let limit = query
        .get("limit")
        .and_then(|l| l.parse::<usize>().ok())
        .unwrap_or(20);
    let items: Vec<Value> = (0..60usize.min(limit))
        .map(|i| {
            json!({
                "id": format!("followed-{i}"),
                "name": format!("Followed {i}"),
                "uri": format!("spotify:artist:followed-{i}"),
                "genres": ["indie"]
            })
        })
        .collect();
    Json(json!({
        "artists": {
            "items": items,
            "next": null,
            "cursors": {"after": null},
            "total": 60
        }
    }))
    .into_response()
}

async fn track(Extension(mock): Mock, headers: HeaderMap, Path(id): Path<String>) -> Response {
    if let Err(rejected) = authorize(&mock, &headers) {
        return rejected;
    }
    match id.strip_prefix("track-").and_then(|n| n.parse::<usize>().ok()) {
        Some(n) if n < AVAILABLE_TOP_TRACKS => Json(track_json(n)).into_response(),
        _ => api_error(StatusCode::BAD_REQUEST, "Invalid base62 id"),
    }
}

fn no_device() -> Response {
    api_error(StatusCode::NOT_FOUND, "Player command failed: No active device found")
}

async fn pause(Extension(mock): Mock, headers: HeaderMap) -> Response {
    if let Err(rejected) = authorize(&mock, &headers) {
        return rejected;
    }
    if mock.no_active_device.load(Ordering::SeqCst) {
        return no_device();
    }
    mock.paused.store(true, Ordering::SeqCst);
    StatusCode::NO_CONTENT.into_response()
}

async fn play(Extension(mock): Mock, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if let Err(rejected) = authorize(&mock, &headers) {
        return rejected;
    }
    if mock.no_active_device.load(Ordering::SeqCst) {
        return no_device();
    }
    let uris: Vec<String> = body["uris"]
        .as_array()
        .map(|uris| {
            uris.iter()
                .filter_map(|u| u.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();
    *mock.playing.lock().unwrap() = uris;
    mock.paused.store(false, Ordering::SeqCst);
    StatusCode::NO_CONTENT.into_response()
}

fn base64_credentials(id: &str, secret: &str) -> String {
    use base64::{Engine, engine::general_purpose::STANDARD};
    STANDARD.encode(format!("{id}:{secret}"))
}

async fn spawn(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

pub async fn spawn_mock(mock: Arc<MockSpotify>) -> SocketAddr {
    let router = Router::new()
        .route("/api/token", post(token))
        .route("/v1/me/top/tracks", get(top_tracks))
        .route("/v1/me/player/currently-playing", get(currently_playing))
        .route("/v1/me/following", get(following))
        .route("/v1/tracks/{id}", get(track))
        .route("/v1/me/player/pause", put(pause))
        .route("/v1/me/player/play", put(play))
        .layer(Extension(mock));
    spawn(router).await
}

pub fn test_config(mock_addr: SocketAddr, policy: RefreshPolicy) -> Config {
    Config {
        client_id: CLIENT_ID.into(),
        client_secret: CLIENT_SECRET.into(),
        redirect_uri: REDIRECT_URI.into(),
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        api_url: format!("http://{mock_addr}/v1"),
        auth_url: format!("http://{mock_addr}/authorize"),
        token_url: format!("http://{mock_addr}/api/token"),
        refresh_policy: policy,
    }
}

pub struct TestApp {
    pub url: String,
    pub client: reqwest::Client,
    pub mock: Arc<MockSpotify>,
    pub session: Arc<Session>,
    pub config: Config,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_policy(RefreshPolicy::Always).await
    }

    pub async fn spawn_with_policy(policy: RefreshPolicy) -> Self {
        let mock = Arc::new(MockSpotify::default());
        let mock_addr = spawn_mock(Arc::clone(&mock)).await;
        let config = test_config(mock_addr, policy);

        let session = Arc::new(Session::new(SpotifyClient::new(&config), config.refresh_policy));
        let addr = spawn(server::router(Arc::clone(&session))).await;

        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        TestApp {
            url: format!("http://{addr}"),
            client,
            mock,
            session,
            config,
        }
    }

    /// Runs the callback with the code the mock accepts.
    pub async fn login(&self) {
        let resp = self
            .client
            .get(format!("{}/spotify/callback?code={VALID_CODE}", self.url))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
    }
}
