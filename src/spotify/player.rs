use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{
    Client, Method, Response, StatusCode,
    header::CONTENT_LENGTH,
};

use crate::{
    channel::CommandChannel,
    error::ControlError,
    info,
    management::TokenManager,
    types::{
        ApiErrorResponse, AuthState, Channel, Command, Outcome, Payload, PlaybackState,
        PlaybackStatus, PlayerErrorReason,
    },
};

/// Delivers commands through the Spotify Web API player endpoints.
///
/// Stateless apart from the shared [`TokenManager`]: whether a device is
/// active is re-derived from every response, never cached.
pub struct ApiChannel {
    http: Client,
    api_url: String,
    tokens: Arc<TokenManager>,
}

impl ApiChannel {
    pub fn new(
        api_url: impl Into<String>,
        timeout: Duration,
        tokens: Arc<TokenManager>,
    ) -> Result<Self, ControlError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ControlError::Transport(e.to_string()))?;

        Ok(ApiChannel {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            tokens,
        })
    }

    /// Issues `command` with an explicit access token.
    ///
    /// Write commands target whichever device Spotify reports as active.
    /// Toggle reads the playback state first and then plays or pauses.
    pub async fn send_with_token(
        &self,
        command: Command,
        token: &str,
    ) -> Result<Option<Payload>, ControlError> {
        match command {
            Command::Play => {
                self.player_command(Method::PUT, "play", token, Some(PlayerErrorReason::AlreadyPlaying))
                    .await?;
            }
            Command::Pause => {
                self.player_command(Method::PUT, "pause", token, Some(PlayerErrorReason::AlreadyPaused))
                    .await?;
            }
            Command::TogglePlayPause => match self.playback(token).await? {
                Some(state) if state.is_playing => {
                    self.player_command(Method::PUT, "pause", token, Some(PlayerErrorReason::AlreadyPaused))
                        .await?;
                }
                Some(_) => {
                    self.player_command(Method::PUT, "play", token, Some(PlayerErrorReason::AlreadyPlaying))
                        .await?;
                }
                None => return Err(ControlError::NoActiveDevice),
            },
            Command::Next => {
                self.player_command(Method::POST, "next", token, None).await?;
            }
            Command::Previous => {
                self.player_command(Method::POST, "previous", token, None)
                    .await?;
            }
            Command::GetStatus => {
                let status = match self.playback(token).await? {
                    Some(state) => state.status(),
                    None => PlaybackStatus {
                        is_playing: false,
                        device: None,
                    },
                };
                return Ok(Some(Payload::Status(status)));
            }
            Command::GetNowPlaying => {
                let state = self
                    .playback(token)
                    .await?
                    .ok_or(ControlError::NoActiveDevice)?;
                let track = state.now_playing().ok_or(ControlError::NothingPlaying)?;
                return Ok(Some(Payload::NowPlaying(track)));
            }
        }

        Ok(None)
    }

    async fn player_command(
        &self,
        method: Method,
        endpoint: &str,
        token: &str,
        tolerated: Option<PlayerErrorReason>,
    ) -> Result<(), ControlError> {
        let url = format!("{}/me/player/{}", self.api_url, endpoint);
        let res = self
            .http
            .request(method, &url)
            .bearer_auth(token)
            .header(CONTENT_LENGTH, 0)
            .send()
            .await?;

        match check_status(res).await {
            Ok(_) => Ok(()),
            // The requested state already holds.
            Err(ControlError::Rejected(reason)) if Some(reason) == tolerated => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Reads the current playback state. `None` means no active session.
    async fn playback(&self, token: &str) -> Result<Option<PlaybackState>, ControlError> {
        let url = format!("{}/me/player", self.api_url);
        let res = self.http.get(&url).bearer_auth(token).send().await?;
        let res = check_status(res).await?;

        if res.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let body = res.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| ControlError::Transport(format!("unexpected playback payload: {}", e)))
    }

    async fn retry_after_refresh(
        &self,
        command: Command,
        stale_token: &str,
    ) -> Result<Option<Payload>, ControlError> {
        info!("Access token rejected, refreshing");
        if self.tokens.force_refresh(stale_token).await != AuthState::Authenticated {
            return Err(ControlError::Unauthorized);
        }

        let token = self
            .tokens
            .access_token()
            .await
            .ok_or(ControlError::Unauthorized)?;
        self.send_with_token(command, &token).await
    }
}

#[async_trait]
impl CommandChannel for ApiChannel {
    fn kind(&self) -> Channel {
        Channel::Api
    }

    /// Sends `command`, refreshing once and retrying if the token is
    /// rejected mid-session.
    async fn send(&self, command: Command) -> Outcome {
        let Some(token) = self.tokens.access_token().await else {
            return Outcome::failure(
                Channel::Api,
                ControlError::AuthenticationFailed("no valid access token".to_string()),
            );
        };

        let result = match self.send_with_token(command, &token).await {
            Err(ControlError::Unauthorized) => self.retry_after_refresh(command, &token).await,
            other => other,
        };

        match result {
            Ok(payload) => Outcome::success(Channel::Api, command.success_message(), payload),
            Err(e) => Outcome::failure(Channel::Api, e),
        }
    }
}

/// Maps a non-2xx response onto the error taxonomy.
///
/// Classification relies on the structured `error.reason` code, not on the
/// message text.
async fn check_status(res: Response) -> Result<Response, ControlError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(ControlError::Unauthorized);
    }

    let body = res.json::<ApiErrorResponse>().await.ok();
    let message = body
        .as_ref()
        .map(|b| b.error.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| status.to_string());

    Err(match body.and_then(|b| b.error.reason) {
        Some(PlayerErrorReason::NoActiveDevice) => ControlError::NoActiveDevice,
        Some(PlayerErrorReason::PremiumRequired) => ControlError::PremiumRequired,
        Some(PlayerErrorReason::RateLimited) | Some(PlayerErrorReason::Unknown) | None => {
            ControlError::Transport(format!("{} ({})", message, status.as_u16()))
        }
        Some(reason) => ControlError::Rejected(reason),
    })
}
