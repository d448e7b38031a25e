use reqwest::{Client, Url};

use crate::{
    config::{AuthSettings, ClientCredentials},
    error::ControlError,
    types::{Credential, TokenErrorResponse, TokenResponse},
    utils,
};

/// Builds the consent URL the user opens in a browser.
///
/// The URL carries the PKCE `code_challenge` (S256) and the `state` value
/// that `/callback` later checks.
pub fn authorize_url(
    settings: &AuthSettings,
    client: &ClientCredentials,
    code_challenge: &str,
    state: &str,
) -> Result<String, ControlError> {
    let url = Url::parse_with_params(
        &settings.authorize_url,
        &[
            ("client_id", client.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", client.redirect_uri.as_str()),
            ("code_challenge_method", "S256"),
            ("code_challenge", code_challenge),
            ("state", state),
            ("scope", settings.scope.as_str()),
        ],
    )
    .map_err(|e| ControlError::AuthenticationFailed(format!("invalid authorize url: {}", e)))?;

    Ok(url.to_string())
}

/// Exchanges an authorization code for a credential.
///
/// Completes the authorization-code flow: the client authenticates with its
/// secret (HTTP Basic) and proves possession of the PKCE verifier generated
/// when the flow began.
pub async fn exchange_code(
    http: &Client,
    settings: &AuthSettings,
    client: &ClientCredentials,
    code: &str,
    verifier: &str,
) -> Result<Credential, ControlError> {
    request_token(
        http,
        settings,
        client,
        &[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", client.redirect_uri.as_str()),
        ],
        None,
    )
    .await
}

/// Exchanges a refresh token for a fresh access token.
///
/// Spotify may omit `refresh_token` in the response; the previous one is
/// kept in that case.
pub async fn refresh_token(
    http: &Client,
    settings: &AuthSettings,
    client: &ClientCredentials,
    refresh_token: &str,
) -> Result<Credential, ControlError> {
    request_token(
        http,
        settings,
        client,
        &[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ],
        Some(refresh_token),
    )
    .await
}

/// Posts a grant to the token endpoint.
///
/// A 4xx answer means the grant or the client was rejected and maps to
/// `AuthenticationFailed`; network errors and 5xx map to `Transport`.
async fn request_token(
    http: &Client,
    settings: &AuthSettings,
    client: &ClientCredentials,
    form: &[(&str, &str)],
    previous_refresh_token: Option<&str>,
) -> Result<Credential, ControlError> {
    let res = http
        .post(&settings.token_url)
        .basic_auth(&client.client_id, Some(&client.client_secret))
        .form(form)
        .send()
        .await?;

    let status = res.status();
    if status.is_success() {
        let token: TokenResponse = res.json().await?;
        return Ok(Credential {
            access_token: token.access_token,
            refresh_token: token
                .refresh_token
                .or_else(|| previous_refresh_token.map(str::to_string))
                .unwrap_or_default(),
            scope: token.scope.unwrap_or_else(|| settings.scope.clone()),
            expires_at: utils::now_timestamp().saturating_add(token.expires_in),
        });
    }

    if status.is_client_error() {
        let detail = match res.json::<TokenErrorResponse>().await {
            Ok(body) => body.error_description.unwrap_or(body.error),
            Err(_) => status.to_string(),
        };
        return Err(ControlError::AuthenticationFailed(detail));
    }

    Err(ControlError::Transport(format!(
        "token endpoint returned {}",
        status
    )))
}
