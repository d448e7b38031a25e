use axum::{Extension, response::Json};

use crate::{
    api::ControlState,
    types::{Command, CommandResponse},
};

/// Runs `command` through the mediator.
///
/// Command failures are still HTTP 200, reported as `success: false`.
async fn run(state: &ControlState, command: Command) -> Json<CommandResponse> {
    let outcome = state.mediator.execute(command).await;
    Json(CommandResponse::from(&outcome))
}

pub async fn play(Extension(state): Extension<ControlState>) -> Json<CommandResponse> {
    run(&state, Command::Play).await
}

pub async fn pause(Extension(state): Extension<ControlState>) -> Json<CommandResponse> {
    run(&state, Command::Pause).await
}

pub async fn toggle(Extension(state): Extension<ControlState>) -> Json<CommandResponse> {
    run(&state, Command::TogglePlayPause).await
}

pub async fn next(Extension(state): Extension<ControlState>) -> Json<CommandResponse> {
    run(&state, Command::Next).await
}

pub async fn previous(Extension(state): Extension<ControlState>) -> Json<CommandResponse> {
    run(&state, Command::Previous).await
}
