mod common;

use std::{sync::Arc, time::Duration};

use common::{FakeSpotify, Scenario};
use studybeat::{
    channel::CommandChannel,
    error::ControlError,
    management::TokenManager,
    spotify::player::ApiChannel,
    types::{Channel, Command, PlaybackStatus, PlayerErrorReason},
};

async fn api_channel(scenario: Scenario, access_token: &str) -> (FakeSpotify, ApiChannel) {
    let fake = FakeSpotify::start(scenario).await;
    let tokens: Arc<TokenManager> = common::token_manager(
        common::auth_settings(&fake.token_url()),
        Some(common::fresh_credential(access_token)),
    );
    let api = ApiChannel::new(fake.api_url(), Duration::from_millis(500), tokens).unwrap();
    (fake, api)
}

#[tokio::test]
async fn test_next_succeeds() {
    let (fake, api) = api_channel(Scenario::default(), "token").await;

    let outcome = api.send(Command::Next).await;

    assert!(outcome.succeeded);
    assert_eq!(outcome.channel_used, Channel::Api);
    assert_eq!(outcome.message, "Next track");
    assert_eq!(fake.hits.player("next"), 1);
}

#[tokio::test]
async fn test_no_active_device_is_classified_from_reason() {
    let (_fake, api) = api_channel(
        Scenario {
            player_status: 404,
            player_reason: Some("NO_ACTIVE_DEVICE"),
            ..Scenario::default()
        },
        "token",
    )
    .await;

    let outcome = api.send(Command::Previous).await;

    assert!(!outcome.succeeded);
    assert_eq!(outcome.error, Some(ControlError::NoActiveDevice));
    assert_eq!(outcome.message, "no active device");
    assert!(!outcome.allows_fallback());
}

#[tokio::test]
async fn test_premium_required_allows_fallback() {
    let (_fake, api) = api_channel(
        Scenario {
            player_status: 403,
            player_reason: Some("PREMIUM_REQUIRED"),
            ..Scenario::default()
        },
        "token",
    )
    .await;

    let outcome = api.send(Command::Play).await;

    assert_eq!(outcome.error, Some(ControlError::PremiumRequired));
    assert!(outcome.allows_fallback());
}

#[tokio::test]
async fn test_server_error_is_transport_failure() {
    let (_fake, api) = api_channel(
        Scenario {
            player_status: 502,
            ..Scenario::default()
        },
        "token",
    )
    .await;

    let outcome = api.send(Command::Next).await;

    assert!(matches!(outcome.error, Some(ControlError::Transport(_))));
    assert!(outcome.allows_fallback());
}

#[tokio::test]
async fn test_timeout_is_transport_failure() {
    let (_fake, api) = api_channel(
        Scenario {
            player_delay: Duration::from_secs(3),
            ..Scenario::default()
        },
        "token",
    )
    .await;

    let outcome = api.send(Command::Next).await;

    assert_eq!(
        outcome.error,
        Some(ControlError::Transport("timed out".to_string()))
    );
    assert!(outcome.allows_fallback());
}

#[tokio::test]
async fn test_already_paused_counts_as_success() {
    let (fake, api) = api_channel(
        Scenario {
            player_status: 403,
            player_reason: Some("ALREADY_PAUSED"),
            ..Scenario::default()
        },
        "token",
    )
    .await;

    let outcome = api.send(Command::Pause).await;

    assert!(outcome.succeeded);
    assert_eq!(outcome.message, "Paused");
    assert_eq!(fake.hits.player("pause"), 1);
}

#[tokio::test]
async fn test_device_rejection_allows_fallback() {
    let (_fake, api) = api_channel(
        Scenario {
            player_status: 403,
            player_reason: Some("DEVICE_NOT_CONTROLLABLE"),
            ..Scenario::default()
        },
        "token",
    )
    .await;

    let outcome = api.send(Command::Next).await;

    assert_eq!(
        outcome.error,
        Some(ControlError::Rejected(PlayerErrorReason::DeviceNotControllable))
    );
    assert!(outcome.allows_fallback());
}

#[tokio::test]
async fn test_unauthorized_refreshes_once_and_retries() {
    let (fake, api) = api_channel(
        Scenario {
            rejected_token: Some("revoked".to_string()),
            ..Scenario::default()
        },
        "revoked",
    )
    .await;

    let outcome = api.send(Command::Next).await;

    assert!(outcome.succeeded);
    assert_eq!(fake.hits.token(), 1);
    assert_eq!(fake.hits.player("next"), 2);
}

#[tokio::test]
async fn test_unauthorized_after_failed_refresh() {
    let (fake, api) = api_channel(
        Scenario {
            rejected_token: Some("revoked".to_string()),
            token_status: 400,
            ..Scenario::default()
        },
        "revoked",
    )
    .await;

    let outcome = api.send(Command::Next).await;

    assert_eq!(outcome.error, Some(ControlError::Unauthorized));
    assert!(outcome.allows_fallback());
    assert_eq!(fake.hits.player("next"), 1);
}

#[tokio::test]
async fn test_toggle_pauses_when_playing() {
    let (fake, api) = api_channel(
        Scenario {
            playback: Some(common::playing_state(true)),
            ..Scenario::default()
        },
        "token",
    )
    .await;

    let outcome = api.send(Command::TogglePlayPause).await;

    assert!(outcome.succeeded);
    assert_eq!(fake.hits.playback(), 1);
    assert_eq!(fake.hits.player("pause"), 1);
    assert_eq!(fake.hits.player("play"), 0);
}

#[tokio::test]
async fn test_toggle_plays_when_paused() {
    let (fake, api) = api_channel(
        Scenario {
            playback: Some(common::playing_state(false)),
            ..Scenario::default()
        },
        "token",
    )
    .await;

    assert!(api.send(Command::TogglePlayPause).await.succeeded);
    assert_eq!(fake.hits.player("play"), 1);
    assert_eq!(fake.hits.player("pause"), 0);
}

#[tokio::test]
async fn test_toggle_without_session_reports_no_active_device() {
    let (fake, api) = api_channel(Scenario::default(), "token").await;

    let outcome = api.send(Command::TogglePlayPause).await;

    assert_eq!(outcome.error, Some(ControlError::NoActiveDevice));
    assert_eq!(fake.hits.player("play"), 0);
    assert_eq!(fake.hits.player("pause"), 0);
}

#[tokio::test]
async fn test_status_without_session() {
    let (_fake, api) = api_channel(Scenario::default(), "token").await;

    let outcome = api.send(Command::GetStatus).await;

    assert!(outcome.succeeded);
    assert_eq!(
        outcome.status(),
        Some(&PlaybackStatus {
            is_playing: false,
            device: None,
        })
    );
}

#[tokio::test]
async fn test_status_is_idempotent() {
    let (fake, api) = api_channel(
        Scenario {
            playback: Some(common::playing_state(true)),
            ..Scenario::default()
        },
        "token",
    )
    .await;

    let first = api.send(Command::GetStatus).await;
    let second = api.send(Command::GetStatus).await;

    assert_eq!(first, second);
    assert_eq!(
        first.status().map(|s| s.device.as_deref()),
        Some(Some("Desk Speaker"))
    );
    assert_eq!(fake.hits.playback(), 2);
}

#[tokio::test]
async fn test_now_playing_payload() {
    let (_fake, api) = api_channel(
        Scenario {
            playback: Some(common::playing_state(true)),
            ..Scenario::default()
        },
        "token",
    )
    .await;

    let outcome = api.send(Command::GetNowPlaying).await;
    let track = outcome.now_playing().unwrap();

    assert_eq!(track.name, "Clair de Lune");
    assert_eq!(track.artist, "Claude Debussy, Isao Tomita");
    assert_eq!(track.album, "Snowflakes Are Dancing");
    assert!(track.is_playing);
    assert_eq!(track.progress_ms, 61000);
    assert_eq!(track.duration_ms, 300000);
}

#[tokio::test]
async fn test_now_playing_without_item() {
    let mut playback = common::playing_state(false);
    playback["item"] = serde_json::Value::Null;
    let (_fake, api) = api_channel(
        Scenario {
            playback: Some(playback),
            ..Scenario::default()
        },
        "token",
    )
    .await;

    let outcome = api.send(Command::GetNowPlaying).await;

    assert_eq!(outcome.error, Some(ControlError::NothingPlaying));
}

#[tokio::test]
async fn test_missing_token_fails_without_request() {
    let fake = FakeSpotify::start(Scenario::default()).await;
    let tokens = common::token_manager(common::auth_settings(&fake.token_url()), None);
    let api = ApiChannel::new(fake.api_url(), Duration::from_millis(500), tokens).unwrap();

    let outcome = api.send(Command::Next).await;

    assert!(matches!(
        outcome.error,
        Some(ControlError::AuthenticationFailed(_))
    ));
    assert_eq!(fake.hits.player("next"), 0);
}
