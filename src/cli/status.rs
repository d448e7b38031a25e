use tabled::Table;

use crate::{
    app::App,
    info,
    types::{AuthState, Command, NowPlayingTableRow},
    utils, warning,
};

/// Prints the authorization state and, when possible, the playback state.
pub async fn status(app: &App) {
    let state = app.mediator().auth_state().await;
    info!("Spotify: {}", state);

    match state {
        AuthState::Unconfigured => {
            warning!("Set SPOTIFY_CLIENT_ID and SPOTIFY_CLIENT_SECRET to enable the Web API");
            return;
        }
        AuthState::Unauthenticated => {
            warning!("Run studybeat auth to connect your Spotify account");
            return;
        }
        AuthState::Authenticated => {}
    }

    let outcome = app.mediator().execute(Command::GetStatus).await;
    match outcome.status() {
        Some(status) => info!(
            "Playback: {} on {}",
            if status.is_playing { "playing" } else { "paused" },
            status.device.as_deref().unwrap_or("no active device")
        ),
        None => warning!("Playback state unavailable: {}", outcome.message),
    }
}

/// Prints the current track as a table.
pub async fn now_playing(app: &App) {
    let outcome = app.mediator().execute(Command::GetNowPlaying).await;

    let Some(track) = outcome.now_playing() else {
        warning!("Nothing to show: {}", outcome.message);
        return;
    };

    let row = NowPlayingTableRow {
        track: track.name.clone(),
        artist: track.artist.clone(),
        album: track.album.clone(),
        position: format!(
            "{} / {}{}",
            utils::format_duration_ms(track.progress_ms),
            utils::format_duration_ms(track.duration_ms),
            if track.is_playing { "" } else { " (paused)" }
        ),
    };
    println!("{}", Table::new(vec![row]));
}
