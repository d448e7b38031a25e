use axum::{Extension, response::Json};
use serde_json::{Value, json};

use crate::api::ControlState;

/// Liveness probe. Never touches the network.
pub async fn health(Extension(state): Extension<ControlState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "configured": state.mediator.tokens().is_configured()
    }))
}
