use crate::{app::App, error, success, types::Command};

/// Executes a single playback command and reports the outcome.
///
/// Without an attached web player only the Web API channel can succeed.
pub async fn control(app: &App, command: Command) {
    let outcome = app.mediator().execute(command).await;

    if outcome.succeeded {
        success!("{} (via {})", outcome.message, outcome.channel_used);
    } else {
        error!("{} failed: {}", command, outcome.message);
    }
}
