use std::collections::HashMap;

use axum::{Extension, extract::Query, response::Html};

use crate::{api::ControlState, warning};

/// Completes the authorization flow started by `begin_authorization`.
///
/// Spotify redirects here with either `code` and `state`, or `error` when
/// the user denied access.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(state): Extension<ControlState>,
) -> Html<&'static str> {
    let tokens = state.mediator.tokens();

    if let Some(error) = params.get("error") {
        warning!("Authorization denied: {}", error);
        tokens.fail_authorization(error).await;
        return Html("<h4>Authorization was denied.</h4><p>You can close this window.</p>");
    }

    let Some(code) = params.get("code") else {
        return Html("<h4>Missing authorization code.</h4>");
    };

    match tokens
        .complete_authorization(code, params.get("state").map(String::as_str))
        .await
    {
        Ok(()) => Html(
            "<h2>Authorization successful.</h2><p>Spotify is now connected. You can close this window.</p>",
        ),
        Err(e) => {
            warning!("Authorization failed: {}", e);
            Html("<h4>Login failed.</h4><p>Please start the authorization again.</p>")
        }
    }
}
