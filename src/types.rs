use std::fmt;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::error::ControlError;

/// Cached OAuth token set for the single configured user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub scope: String,
    /// Unix timestamp (seconds) after which the access token is unusable.
    pub expires_at: i64,
}

impl Credential {
    /// True when the access token can be used without a refresh exchange.
    pub fn is_fresh(&self, now: i64, margin_secs: i64) -> bool {
        !self.access_token.is_empty() && now < self.expires_at.saturating_sub(margin_secs)
    }

    /// Drops the access token but keeps the refresh token for a later
    /// re-authorization.
    pub fn revoke_access(&mut self) {
        self.access_token.clear();
        self.expires_at = 0;
    }
}

/// Successful response of the token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    pub expires_in: i64,
}

/// OAuth error body returned by the token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenErrorResponse {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthState {
    /// No client credentials supplied.
    Unconfigured,
    /// Client credentials present but no usable token.
    Unauthenticated,
    /// Valid or refreshable token available.
    Authenticated,
}

impl fmt::Display for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AuthState::Unconfigured => "not configured",
            AuthState::Unauthenticated => "not authenticated",
            AuthState::Authenticated => "authenticated",
        };
        f.write_str(label)
    }
}

/// A logical playback command. Carries no payload beyond its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Play,
    Pause,
    TogglePlayPause,
    Next,
    Previous,
    GetStatus,
    GetNowPlaying,
}

impl Command {
    pub fn success_message(&self) -> &'static str {
        match self {
            Command::Play => "Playing",
            Command::Pause => "Paused",
            Command::TogglePlayPause => "Toggled",
            Command::Next => "Next track",
            Command::Previous => "Previous track",
            Command::GetStatus => "Status",
            Command::GetNowPlaying => "Now playing",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Command::Play => "play",
            Command::Pause => "pause",
            Command::TogglePlayPause => "toggle",
            Command::Next => "next",
            Command::Previous => "previous",
            Command::GetStatus => "status",
            Command::GetNowPlaying => "now playing",
        };
        f.write_str(label)
    }
}

/// Path a command travelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Api,
    WebChannel,
    None,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Channel::Api => "Web API",
            Channel::WebChannel => "web player",
            Channel::None => "none",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackStatus {
    pub is_playing: bool,
    pub device: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NowPlaying {
    pub name: String,
    pub artist: String,
    pub album: String,
    pub is_playing: bool,
    pub progress_ms: u64,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Status(PlaybackStatus),
    NowPlaying(NowPlaying),
}

/// Normalized result of one command execution. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub succeeded: bool,
    pub channel_used: Channel,
    pub message: String,
    pub payload: Option<Payload>,
    #[serde(skip)]
    pub error: Option<ControlError>,
}

impl Outcome {
    pub fn success(channel: Channel, message: impl Into<String>, payload: Option<Payload>) -> Self {
        Outcome {
            succeeded: true,
            channel_used: channel,
            message: message.into(),
            payload,
            error: None,
        }
    }

    pub fn failure(channel: Channel, error: ControlError) -> Self {
        Outcome {
            succeeded: false,
            channel_used: channel,
            message: error.to_string(),
            payload: None,
            error: Some(error),
        }
    }

    /// True when the command failed and another channel may still deliver it.
    pub fn allows_fallback(&self) -> bool {
        !self.succeeded && self.error.as_ref().is_none_or(ControlError::allows_fallback)
    }

    pub fn status(&self) -> Option<&PlaybackStatus> {
        match &self.payload {
            Some(Payload::Status(status)) => Some(status),
            _ => None,
        }
    }

    pub fn now_playing(&self) -> Option<&NowPlaying> {
        match &self.payload {
            Some(Payload::NowPlaying(track)) => Some(track),
            _ => None,
        }
    }
}

/// Body of every control route response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    pub message: String,
}

impl From<&Outcome> for CommandResponse {
    fn from(outcome: &Outcome) -> Self {
        CommandResponse {
            success: outcome.succeeded,
            message: outcome.message.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub configured: bool,
    pub playing: bool,
}

// Spotify Web API player objects. Only the fields we read are modelled.

#[derive(Debug, Clone, Deserialize)]
pub struct PlaybackState {
    pub device: Option<Device>,
    #[serde(default)]
    pub is_playing: bool,
    pub progress_ms: Option<u64>,
    pub item: Option<PlaybackItem>,
}

impl PlaybackState {
    pub fn status(&self) -> PlaybackStatus {
        PlaybackStatus {
            is_playing: self.is_playing,
            device: self.device.as_ref().map(|d| d.name.clone()),
        }
    }

    pub fn now_playing(&self) -> Option<NowPlaying> {
        let item = self.item.as_ref()?;
        Some(NowPlaying {
            name: item.name.clone(),
            artist: item
                .artists
                .iter()
                .map(|a| a.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            album: item
                .album
                .as_ref()
                .map(|a| a.name.clone())
                .unwrap_or_else(|| "Unknown".to_string()),
            is_playing: self.is_playing,
            progress_ms: self.progress_ms.unwrap_or(0),
            duration_ms: item.duration_ms,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Device {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaybackItem {
    pub name: String,
    #[serde(default)]
    pub artists: Vec<ItemArtist>,
    pub album: Option<ItemAlbum>,
    #[serde(default)]
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemArtist {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemAlbum {
    pub name: String,
}

/// Error envelope of the Spotify Web API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub status: u16,
    #[serde(default)]
    pub message: String,
    pub reason: Option<PlayerErrorReason>,
}

/// Structured reason codes attached to failed player commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerErrorReason {
    NoPrevTrack,
    NoNextTrack,
    NoSpecificTrack,
    AlreadyPaused,
    NotPaused,
    NotPlayingLocally,
    NotPlayingTrack,
    NotPlayingContext,
    EndlessContext,
    ContextDisallow,
    AlreadyPlaying,
    RateLimited,
    RemoteControlDisallow,
    DeviceNotControllable,
    VolumeControlDisallow,
    NoActiveDevice,
    PremiumRequired,
    #[serde(other)]
    Unknown,
}

#[derive(Tabled)]
pub struct NowPlayingTableRow {
    pub track: String,
    pub artist: String,
    pub album: String,
    pub position: String,
}
