use axum::{Extension, response::Json};
use serde_json::{Value, json};

use crate::{
    api::ControlState,
    types::{AuthState, Command, StatusResponse},
};

pub async fn status(Extension(state): Extension<ControlState>) -> Json<StatusResponse> {
    let auth = state.mediator.auth_state().await;

    let playing = if auth == AuthState::Authenticated {
        state
            .mediator
            .execute(Command::GetStatus)
            .await
            .status()
            .is_some_and(|s| s.is_playing)
    } else {
        false
    };

    Json(StatusResponse {
        configured: auth != AuthState::Unconfigured,
        playing,
    })
}

/// Now-playing metadata, or `{}` when nothing can be reported.
pub async fn current(Extension(state): Extension<ControlState>) -> Json<Value> {
    let outcome = state.mediator.execute(Command::GetNowPlaying).await;

    match outcome.now_playing().map(serde_json::to_value) {
        Some(Ok(track)) => Json(track),
        _ => Json(json!({})),
    }
}
