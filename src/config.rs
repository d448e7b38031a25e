//! Configuration management for Studybeat.
//!
//! Configuration comes from environment variables, optionally seeded from a
//! `.env` file in the local data directory. Every value has a default except
//! the Spotify client credentials: when those are missing the application
//! runs in web-player-only mode instead of failing.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults

use std::{
    env,
    net::{Ipv4Addr, SocketAddr},
    path::PathBuf,
    str::FromStr,
    time::Duration,
};

use crate::warning;

pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8888/callback";
pub const DEFAULT_SCOPE: &str = "user-read-playback-state user-modify-playback-state";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_REFRESH_MARGIN_SECS: i64 = 60;

/// Loads environment variables from a `.env` file in the local data directory.
///
/// The directory is created when missing. A missing `.env` file is not an
/// error: every setting has a default, and missing client credentials only
/// disable the Web API channel.
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/studybeat/.env`
/// - macOS: `~/Library/Application Support/studybeat/.env`
/// - Windows: `%LOCALAPPDATA%/studybeat/.env`
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Returns the application's directory in the platform data dir.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("studybeat");
    path
}

/// Returns the location of the cached credential file.
pub fn credential_path() -> PathBuf {
    data_dir().join("cache/token.json")
}

/// OAuth client credentials registered with the Spotify developer dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

/// Endpoints and parameters for the OAuth flow.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// `None` means the application is unconfigured.
    pub client: Option<ClientCredentials>,
    pub authorize_url: String,
    pub token_url: String,
    pub scope: String,
    /// Tokens closer than this to their expiry are refreshed before use.
    pub refresh_margin_secs: i64,
    pub request_timeout: Duration,
}

/// Raw key sequences bound to playback actions.
#[derive(Debug, Clone)]
pub struct ShortcutSettings {
    pub play_pause: String,
    pub next: String,
    pub previous: String,
    pub toggle_widget: String,
}

impl Default for ShortcutSettings {
    fn default() -> Self {
        Self {
            play_pause: "Space".to_string(),
            next: "Shift+Right".to_string(),
            previous: "Shift+Left".to_string(),
            toggle_widget: "Ctrl+Shift+S".to_string(),
        }
    }
}

/// Complete runtime configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    pub auth: AuthSettings,
    pub api_url: String,
    pub server_addr: SocketAddr,
    pub credential_path: PathBuf,
    pub shortcuts: ShortcutSettings,
}

impl Settings {
    /// Assembles settings from the process environment.
    ///
    /// Invalid values are reported with a warning and replaced by their
    /// defaults.
    pub fn from_env() -> Self {
        let request_timeout = Duration::from_secs(parse_or(
            "REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        ));

        let shortcuts = ShortcutSettings::default();

        Settings {
            auth: AuthSettings {
                client: client_credentials(),
                authorize_url: var_or("SPOTIFY_AUTH_URL", DEFAULT_AUTH_URL),
                token_url: var_or("SPOTIFY_TOKEN_URL", DEFAULT_TOKEN_URL),
                scope: var_or("SPOTIFY_AUTH_SCOPE", DEFAULT_SCOPE),
                refresh_margin_secs: parse_or(
                    "TOKEN_REFRESH_MARGIN_SECS",
                    DEFAULT_REFRESH_MARGIN_SECS,
                ),
                request_timeout,
            },
            api_url: var_or("SPOTIFY_API_URL", DEFAULT_API_URL),
            server_addr: server_addr(),
            credential_path: credential_path(),
            shortcuts: ShortcutSettings {
                play_pause: var_or("SHORTCUT_PLAY_PAUSE", &shortcuts.play_pause),
                next: var_or("SHORTCUT_NEXT", &shortcuts.next),
                previous: var_or("SHORTCUT_PREVIOUS", &shortcuts.previous),
                toggle_widget: var_or("SHORTCUT_TOGGLE_WIDGET", &shortcuts.toggle_widget),
            },
        }
    }
}

/// Returns the Spotify client credentials, if both id and secret are set.
///
/// Reads `SPOTIFY_CLIENT_ID`, `SPOTIFY_CLIENT_SECRET` and
/// `SPOTIFY_REDIRECT_URI`. Blank values count as missing.
pub fn client_credentials() -> Option<ClientCredentials> {
    let client_id = non_empty_var("SPOTIFY_CLIENT_ID")?;
    let client_secret = non_empty_var("SPOTIFY_CLIENT_SECRET")?;
    Some(ClientCredentials {
        client_id,
        client_secret,
        redirect_uri: var_or("SPOTIFY_REDIRECT_URI", DEFAULT_REDIRECT_URI),
    })
}

/// Returns the address the local control server binds to.
///
/// Reads `SERVER_ADDRESS`; falls back to `127.0.0.1:8888` when unset or
/// unparsable.
pub fn server_addr() -> SocketAddr {
    match env::var("SERVER_ADDRESS") {
        Ok(raw) => SocketAddr::from_str(raw.trim()).unwrap_or_else(|e| {
            warning!("Invalid SERVER_ADDRESS {:?} ({}), using default", raw, e);
            default_server_addr()
        }),
        Err(_) => default_server_addr(),
    }
}

fn default_server_addr() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::LOCALHOST, 8888))
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn var_or(key: &str, default: &str) -> String {
    non_empty_var(key).unwrap_or_else(|| default.to_string())
}

fn parse_or<T: FromStr + Copy>(key: &str, default: T) -> T {
    match non_empty_var(key) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warning!("Invalid value {:?} for {}, using default", raw, key);
            default
        }),
        None => default,
    }
}
