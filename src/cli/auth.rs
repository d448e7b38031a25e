use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{app::App, error, info, success, warning};

const AUTHORIZATION_TIMEOUT: Duration = Duration::from_secs(120);

/// Runs the browser-based authorization flow to completion.
///
/// The control server has to be up for the `/callback` redirect, so it is
/// started for the duration of the flow unless it is already running.
pub async fn auth(app: &App) {
    let started_here = !app.server().is_running().await;
    if let Err(e) = app.server().start().await {
        error!("Cannot start control server for the callback: {}", e);
    }

    let handle = match app.tokens().begin_authorization().await {
        Ok(handle) => handle,
        Err(e) => {
            if started_here {
                app.server().stop().await;
            }
            error!("Cannot start authorization: {}", e);
        }
    };
    info!("Opened the Spotify consent page in your browser");

    let pb = ProgressBar::new_spinner();
    pb.set_message("Waiting for Spotify authorization...");
    pb.enable_steady_tick(Duration::from_millis(100));
    match ProgressStyle::with_template("{spinner:.blue} {msg}") {
        Ok(style) => pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")),
        Err(e) => warning!("Cannot style progress spinner: {}", e),
    }

    let result = handle.wait(AUTHORIZATION_TIMEOUT).await;
    pb.finish_and_clear();

    if started_here {
        app.server().stop().await;
    }

    match result {
        Ok(()) => success!("Authentication successful!"),
        Err(e) => error!("Authentication failed: {}", e),
    }
}

/// Forgets the cached credential.
pub async fn logout(app: &App) {
    match app.tokens().logout().await {
        Ok(()) => success!("Cached Spotify credential removed"),
        Err(e) => error!("Cannot remove cached credential: {}", e),
    }
}
