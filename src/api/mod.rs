//! # API Module
//!
//! HTTP handlers of the loopback control server.
//!
//! ## Endpoints
//!
//! | Method | Path        | Response                                   |
//! |--------|-------------|--------------------------------------------|
//! | GET    | `/health`   | `{status, service, version, configured}`   |
//! | GET    | `/status`   | `{configured, playing}`                    |
//! | GET    | `/current`  | now-playing metadata or `{}`               |
//! | GET    | `/callback` | HTML page; completes the authorization flow |
//! | POST   | `/play`, `/pause`, `/toggle`, `/next`, `/previous` | `{success, message}` |
//!
//! Control routes go through the [`CommandMediator`] and answer 200 even
//! when the command failed. Unknown routes get 404 and wrong methods 405.
//! Every routed response carries `Access-Control-Allow-Origin: *` so the embedded
//! page can call the server.

mod callback;
mod control;
mod health;
mod status;

use std::sync::Arc;

use axum::{
    Extension, Router,
    http::{HeaderValue, header::ACCESS_CONTROL_ALLOW_ORIGIN},
    middleware,
    response::Response,
    routing::{get, post},
};

use crate::mediator::CommandMediator;

pub use callback::callback;
pub use control::{next, pause, play, previous, toggle};
pub use health::health;
pub use status::{current, status};

/// Shared handler state.
#[derive(Clone)]
pub struct ControlState {
    pub mediator: Arc<CommandMediator>,
}

pub fn router(state: ControlState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/status", get(status))
        .route("/current", get(current))
        .route("/callback", get(callback))
        .route("/play", post(play))
        .route("/pause", post(pause))
        .route("/toggle", post(toggle))
        .route("/next", post(next))
        .route("/previous", post(previous))
        .layer(middleware::map_response(allow_any_origin))
        .layer(Extension(state))
}

async fn allow_any_origin(mut response: Response) -> Response {
    response
        .headers_mut()
        .insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    response
}
