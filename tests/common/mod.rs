#![allow(dead_code)]

use std::{
    collections::HashMap,
    net::SocketAddr,
    path::PathBuf,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use axum::{
    Extension, Router,
    extract::Path,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use studybeat::{
    channel::CommandChannel,
    config::{AuthSettings, ClientCredentials},
    management::{CredentialStore, TokenManager},
    types::{Channel, Command, Credential, Outcome},
    utils,
    web::ScriptSurface,
};

/// Configurable behaviour of the fake Spotify service.
#[derive(Clone)]
pub struct Scenario {
    pub token_status: u16,
    pub token_delay: Duration,
    pub token_expires_in: i64,
    pub player_status: u16,
    pub player_reason: Option<&'static str>,
    pub player_delay: Duration,
    /// Body of `GET /v1/me/player`; `None` answers 204.
    pub playback: Option<Value>,
    /// Access token answered with 401.
    pub rejected_token: Option<String>,
}

impl Default for Scenario {
    fn default() -> Self {
        Scenario {
            token_status: 200,
            token_delay: Duration::ZERO,
            token_expires_in: 3600,
            player_status: 204,
            player_reason: None,
            player_delay: Duration::ZERO,
            playback: None,
            rejected_token: None,
        }
    }
}

#[derive(Default)]
pub struct Hits {
    pub token: AtomicUsize,
    pub playback: AtomicUsize,
    pub player: Mutex<HashMap<String, usize>>,
}

impl Hits {
    pub fn token(&self) -> usize {
        self.token.load(Ordering::SeqCst)
    }

    pub fn playback(&self) -> usize {
        self.playback.load(Ordering::SeqCst)
    }

    pub fn player(&self, action: &str) -> usize {
        self.player
            .lock()
            .unwrap()
            .get(action)
            .copied()
            .unwrap_or(0)
    }
}

struct FakeState {
    scenario: Scenario,
    hits: Arc<Hits>,
}

pub struct FakeSpotify {
    pub addr: SocketAddr,
    pub hits: Arc<Hits>,
}

impl FakeSpotify {
    pub async fn start(scenario: Scenario) -> Self {
        let hits = Arc::new(Hits::default());
        let state = Arc::new(FakeState {
            scenario,
            hits: Arc::clone(&hits),
        });

        let app = Router::new()
            .route("/api/token", post(token))
            .route("/v1/me/player", get(playback))
            .route("/v1/me/player/{action}", post(player).put(player))
            .layer(Extension(state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        FakeSpotify { addr, hits }
    }

    pub fn api_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    pub fn token_url(&self) -> String {
        format!("http://{}/api/token", self.addr)
    }
}

async fn token(Extension(state): Extension<Arc<FakeState>>) -> Response {
    let n = state.hits.token.fetch_add(1, Ordering::SeqCst) + 1;
    tokio::time::sleep(state.scenario.token_delay).await;

    let status = StatusCode::from_u16(state.scenario.token_status).unwrap();
    if status.is_success() {
        return Json(json!({
            "access_token": format!("fresh-{}", n),
            "token_type": "Bearer",
            "expires_in": state.scenario.token_expires_in,
            "scope": "user-read-playback-state user-modify-playback-state"
        }))
        .into_response();
    }

    (
        status,
        Json(json!({
            "error": "invalid_grant",
            "error_description": "Refresh token revoked"
        })),
    )
        .into_response()
}

fn is_rejected(state: &FakeState, headers: &HeaderMap) -> bool {
    let Some(rejected) = state.scenario.rejected_token.as_ref() else {
        return false;
    };
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", rejected))
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": { "status": 401, "message": "The access token expired" } })),
    )
        .into_response()
}

async fn playback(Extension(state): Extension<Arc<FakeState>>, headers: HeaderMap) -> Response {
    state.hits.playback.fetch_add(1, Ordering::SeqCst);
    if is_rejected(&state, &headers) {
        return unauthorized();
    }

    match state.scenario.playback.clone() {
        Some(body) => Json(body).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

async fn player(
    Path(action): Path<String>,
    Extension(state): Extension<Arc<FakeState>>,
    headers: HeaderMap,
) -> Response {
    *state
        .hits
        .player
        .lock()
        .unwrap()
        .entry(action)
        .or_insert(0) += 1;

    if is_rejected(&state, &headers) {
        return unauthorized();
    }
    tokio::time::sleep(state.scenario.player_delay).await;

    let status = StatusCode::from_u16(state.scenario.player_status).unwrap();
    if status.is_success() {
        return status.into_response();
    }

    let mut error = json!({ "status": status.as_u16(), "message": "Player command failed" });
    if let Some(reason) = state.scenario.player_reason {
        error["reason"] = json!(reason);
    }
    (status, Json(json!({ "error": error }))).into_response()
}

pub fn playing_state(is_playing: bool) -> Value {
    json!({
        "device": { "id": "dev-1", "name": "Desk Speaker", "is_active": true },
        "is_playing": is_playing,
        "progress_ms": 61000,
        "item": {
            "name": "Clair de Lune",
            "duration_ms": 300000,
            "artists": [{ "name": "Claude Debussy" }, { "name": "Isao Tomita" }],
            "album": { "name": "Snowflakes Are Dancing" }
        }
    })
}

pub fn temp_credential_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("studybeat-test-{}", utils::generate_state()))
        .join("token.json")
}

pub fn auth_settings(token_url: &str) -> AuthSettings {
    AuthSettings {
        client: Some(ClientCredentials {
            client_id: "client-id".to_string(),
            client_secret: "client-secret".to_string(),
            redirect_uri: "http://127.0.0.1:8888/callback".to_string(),
        }),
        authorize_url: "https://accounts.example.test/authorize".to_string(),
        token_url: token_url.to_string(),
        scope: "user-read-playback-state user-modify-playback-state".to_string(),
        refresh_margin_secs: 60,
        request_timeout: Duration::from_secs(2),
    }
}

pub fn unconfigured_settings() -> AuthSettings {
    AuthSettings {
        client: None,
        ..auth_settings("http://127.0.0.1:9/api/token")
    }
}

pub fn fresh_credential(access_token: &str) -> Credential {
    Credential {
        access_token: access_token.to_string(),
        refresh_token: "refresh-1".to_string(),
        scope: String::new(),
        expires_at: utils::now_timestamp() + 3600,
    }
}

pub fn expired_credential() -> Credential {
    Credential {
        access_token: "expired".to_string(),
        refresh_token: "refresh-1".to_string(),
        scope: String::new(),
        expires_at: utils::now_timestamp() - 10,
    }
}

pub fn token_manager(settings: AuthSettings, credential: Option<Credential>) -> Arc<TokenManager> {
    let store = CredentialStore::new(temp_credential_path());
    Arc::new(TokenManager::new(settings, store, credential).unwrap())
}

/// Channel double that records every command it receives.
pub struct RecordingChannel {
    kind: Channel,
    respond: Box<dyn Fn(Command) -> Outcome + Send + Sync>,
    calls: Mutex<Vec<Command>>,
}

impl RecordingChannel {
    pub fn new(
        kind: Channel,
        respond: impl Fn(Command) -> Outcome + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(RecordingChannel {
            kind,
            respond: Box::new(respond),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<Command> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandChannel for RecordingChannel {
    fn kind(&self) -> Channel {
        self.kind
    }

    async fn send(&self, command: Command) -> Outcome {
        self.calls.lock().unwrap().push(command);
        (self.respond)(command)
    }
}

/// Script surface double that records injected scripts.
#[derive(Default)]
pub struct RecordingSurface {
    scripts: Mutex<Vec<String>>,
}

impl RecordingSurface {
    pub fn scripts(&self) -> Vec<String> {
        self.scripts.lock().unwrap().clone()
    }
}

impl ScriptSurface for RecordingSurface {
    fn run_script(&self, script: &str) {
        self.scripts.lock().unwrap().push(script.to_string());
    }
}
