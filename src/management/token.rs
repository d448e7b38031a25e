use std::time::Duration;

use reqwest::Client;
use tokio::sync::{Mutex, watch};

use crate::{
    config::{AuthSettings, ClientCredentials},
    error::ControlError,
    info,
    management::CredentialStore,
    spotify::auth,
    success,
    types::{AuthState, Credential},
    utils, warning,
};

/// Owns token freshness for the process.
///
/// The cached credential lives behind an async mutex that is held across
/// refresh exchanges, so at most one refresh is in flight at a time. A caller
/// arriving during a refresh waits for the lock and then sees the refreshed
/// credential instead of starting a second exchange.
pub struct TokenManager {
    settings: AuthSettings,
    http: Client,
    store: CredentialStore,
    session: Mutex<Session>,
    pending: Mutex<Option<PendingAuthorization>>,
}

struct Session {
    credential: Option<Credential>,
    // Set when the token endpoint rejected the refresh token. Cleared by the
    // next successful authorization.
    refresh_rejected: bool,
}

struct PendingAuthorization {
    verifier: String,
    state: String,
    completion: watch::Sender<Option<Result<(), ControlError>>>,
}

/// An authorization flow waiting for its `/callback` redirect.
pub struct AuthorizationHandle {
    url: String,
    completion: watch::Receiver<Option<Result<(), ControlError>>>,
}

impl AuthorizationHandle {
    /// The consent URL the user has to visit.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Waits until the callback completes the flow or `timeout` elapses.
    pub async fn wait(mut self, timeout: Duration) -> Result<(), ControlError> {
        let waited = tokio::time::timeout(timeout, self.completion.wait_for(Option::is_some))
            .await
            .map(|r| r.map(|value| (*value).clone()));

        match waited {
            Ok(Ok(Some(result))) => result,
            Ok(Ok(None)) | Ok(Err(_)) => Err(ControlError::AuthenticationFailed(
                "authorization was superseded".to_string(),
            )),
            Err(_) => Err(ControlError::AuthenticationFailed(
                "timed out waiting for authorization".to_string(),
            )),
        }
    }
}

impl TokenManager {
    pub fn new(
        settings: AuthSettings,
        store: CredentialStore,
        credential: Option<Credential>,
    ) -> Result<Self, ControlError> {
        let http = Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|e| ControlError::Transport(e.to_string()))?;

        Ok(TokenManager {
            settings,
            http,
            store,
            session: Mutex::new(Session {
                credential,
                refresh_rejected: false,
            }),
            pending: Mutex::new(None),
        })
    }

    /// Creates a manager seeded from the credential file.
    ///
    /// An unreadable cache is reported and treated as absent.
    pub async fn load(settings: AuthSettings, store: CredentialStore) -> Result<Self, ControlError> {
        let credential = match store.load().await {
            Ok(credential) => credential,
            Err(e) => {
                warning!("Ignoring unreadable credential cache: {}", e);
                None
            }
        };
        Self::new(settings, store, credential)
    }

    pub fn is_configured(&self) -> bool {
        self.settings.client.is_some()
    }

    /// Makes sure a usable access token exists.
    ///
    /// A fresh token costs no network call. An expired or nearly expired one
    /// triggers exactly one refresh exchange. A failed refresh clears the
    /// access token, keeps the refresh token and demotes the state to
    /// `Unauthenticated`; it never fails the caller.
    pub async fn ensure_valid(&self) -> AuthState {
        let Some(client) = self.settings.client.as_ref() else {
            return AuthState::Unconfigured;
        };

        let mut session = self.session.lock().await;
        let refresh_token = match session.credential.as_ref() {
            None => return AuthState::Unauthenticated,
            Some(c) if c.is_fresh(utils::now_timestamp(), self.settings.refresh_margin_secs) => {
                return AuthState::Authenticated;
            }
            Some(c) => c.refresh_token.clone(),
        };

        if session.refresh_rejected || refresh_token.is_empty() {
            return AuthState::Unauthenticated;
        }

        self.refresh_locked(&mut session, client, &refresh_token)
            .await
    }

    /// Refreshes after the API rejected `stale_token` with a 401.
    ///
    /// If another caller already replaced `stale_token`, the newer token is
    /// used and no exchange happens.
    pub async fn force_refresh(&self, stale_token: &str) -> AuthState {
        let Some(client) = self.settings.client.as_ref() else {
            return AuthState::Unconfigured;
        };

        let mut session = self.session.lock().await;
        let refresh_token = match session.credential.as_ref() {
            None => return AuthState::Unauthenticated,
            Some(c)
                if c.access_token != stale_token
                    && c.is_fresh(utils::now_timestamp(), 0) =>
            {
                return AuthState::Authenticated;
            }
            Some(c) => c.refresh_token.clone(),
        };

        if session.refresh_rejected || refresh_token.is_empty() {
            return AuthState::Unauthenticated;
        }

        self.refresh_locked(&mut session, client, &refresh_token)
            .await
    }

    /// Returns the cached access token if it has not expired yet.
    pub async fn access_token(&self) -> Option<String> {
        let session = self.session.lock().await;
        session
            .credential
            .as_ref()
            .filter(|c| c.is_fresh(utils::now_timestamp(), 0))
            .map(|c| c.access_token.clone())
    }

    async fn refresh_locked(
        &self,
        session: &mut Session,
        client: &ClientCredentials,
        refresh_token: &str,
    ) -> AuthState {
        match auth::refresh_token(&self.http, &self.settings, client, refresh_token).await {
            Ok(credential) => {
                info!("Access token refreshed");
                self.save(&credential).await;
                session.credential = Some(credential);
                AuthState::Authenticated
            }
            Err(e) => {
                warning!("Token refresh failed: {}", e);
                if matches!(e, ControlError::AuthenticationFailed(_)) {
                    session.refresh_rejected = true;
                }
                if let Some(credential) = session.credential.as_mut() {
                    credential.revoke_access();
                }
                if let Some(credential) = session.credential.as_ref() {
                    self.save(credential).await;
                }
                AuthState::Unauthenticated
            }
        }
    }

    /// Starts the browser-based authorization flow.
    ///
    /// Opens the consent page in the system browser and returns immediately.
    /// The flow completes when the redirect reaches `/callback`.
    pub async fn begin_authorization(&self) -> Result<AuthorizationHandle, ControlError> {
        let handle = self.prepare_authorization().await?;

        if webbrowser::open(handle.url()).is_err() {
            warning!(
                "Failed to open browser. Please navigate to the following URL manually:\n{}",
                handle.url()
            );
        }

        Ok(handle)
    }

    /// Registers a new pending flow without opening a browser.
    ///
    /// Any earlier pending flow is superseded.
    pub async fn prepare_authorization(&self) -> Result<AuthorizationHandle, ControlError> {
        let client = self
            .settings
            .client
            .as_ref()
            .ok_or(ControlError::ConfigurationMissing)?;

        let verifier = utils::generate_code_verifier();
        let challenge = utils::generate_code_challenge(&verifier);
        let state = utils::generate_state();
        let url = auth::authorize_url(&self.settings, client, &challenge, &state)?;

        let (completion, receiver) = watch::channel(None);
        *self.pending.lock().await = Some(PendingAuthorization {
            verifier,
            state,
            completion,
        });

        Ok(AuthorizationHandle {
            url,
            completion: receiver,
        })
    }

    /// Finishes the pending flow with the code delivered to `/callback`.
    ///
    /// A `state` that does not match the pending flow is rejected and leaves
    /// the flow pending.
    pub async fn complete_authorization(
        &self,
        code: &str,
        state: Option<&str>,
    ) -> Result<(), ControlError> {
        let client = self
            .settings
            .client
            .as_ref()
            .ok_or(ControlError::ConfigurationMissing)?;

        let pending = {
            let mut slot = self.pending.lock().await;
            match slot.as_ref() {
                None => {
                    return Err(ControlError::AuthenticationFailed(
                        "no authorization in progress".to_string(),
                    ));
                }
                Some(p) if state != Some(p.state.as_str()) => {
                    return Err(ControlError::AuthenticationFailed(
                        "state mismatch".to_string(),
                    ));
                }
                Some(_) => {}
            }
            match slot.take() {
                Some(p) => p,
                None => {
                    return Err(ControlError::AuthenticationFailed(
                        "no authorization in progress".to_string(),
                    ));
                }
            }
        };

        let result =
            auth::exchange_code(&self.http, &self.settings, client, code, &pending.verifier).await;

        match result {
            Ok(credential) => {
                let mut session = self.session.lock().await;
                self.save(&credential).await;
                session.credential = Some(credential);
                session.refresh_rejected = false;
                drop(session);

                success!("Spotify authorization completed");
                pending.completion.send_replace(Some(Ok(())));
                Ok(())
            }
            Err(e) => {
                warning!("Token exchange failed: {}", e);
                pending.completion.send_replace(Some(Err(e.clone())));
                Err(e)
            }
        }
    }

    /// Aborts the pending flow, e.g. when the user denied consent.
    pub async fn fail_authorization(&self, reason: &str) {
        if let Some(pending) = self.pending.lock().await.take() {
            pending
                .completion
                .send_replace(Some(Err(ControlError::AuthenticationFailed(
                    reason.to_string(),
                ))));
        }
    }

    /// Forgets the cached credential and deletes the credential file.
    pub async fn logout(&self) -> Result<(), ControlError> {
        let mut session = self.session.lock().await;
        session.credential = None;
        session.refresh_rejected = false;
        self.store.clear().await
    }

    async fn save(&self, credential: &Credential) {
        if let Err(e) = self.store.persist(credential).await {
            warning!("Failed to save token to cache: {}", e);
        }
    }
}
