use thiserror::Error;

use crate::types::{Command, PlayerErrorReason};

/// Everything that can go wrong while delivering a playback command.
///
/// None of these are fatal: the mediator turns each into an
/// [`Outcome`](crate::types::Outcome), and [`ControlError::allows_fallback`]
/// decides whether the web player is tried next.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControlError {
    #[error("Spotify client credentials are not configured")]
    ConfigurationMissing,

    #[error("authentication failed, please re-authorize ({0})")]
    AuthenticationFailed(String),

    #[error("access token rejected")]
    Unauthorized,

    #[error("no active device")]
    NoActiveDevice,

    #[error("Spotify Premium is required for remote control")]
    PremiumRequired,

    #[error("command rejected by Spotify ({0:?})")]
    Rejected(PlayerErrorReason),

    #[error("nothing is playing")]
    NothingPlaying,

    #[error("request failed: {0}")]
    Transport(String),

    #[error("player window is not open")]
    ChannelUnavailable,

    #[error("{0} is not supported by the web player")]
    Unsupported(Command),

    #[error("credential storage failed: {0}")]
    Storage(String),

    #[error("control server error: {0}")]
    Server(String),
}

impl ControlError {
    /// Whether the web player should be tried after the API failed.
    ///
    /// Every failure qualifies except `NoActiveDevice`: the web player cannot
    /// start playback on a remote device either.
    pub fn allows_fallback(&self) -> bool {
        !matches!(self, ControlError::NoActiveDevice)
    }
}

impl From<reqwest::Error> for ControlError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ControlError::Transport("timed out".to_string())
        } else {
            ControlError::Transport(err.to_string())
        }
    }
}
