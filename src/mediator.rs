use std::sync::Arc;

use crate::{
    channel::CommandChannel,
    info,
    management::TokenManager,
    types::{AuthState, Command, Outcome},
    warning,
};

/// Picks a channel for each command and applies the fallback policy.
///
/// The Web API is preferred when a token is available; the web player is
/// used when the application is unconfigured, unauthenticated, or the API
/// call failed. `NoActiveDevice` is reported without a fallback. The
/// mediator keeps no state between calls.
pub struct CommandMediator {
    tokens: Arc<TokenManager>,
    api: Arc<dyn CommandChannel>,
    web: Arc<dyn CommandChannel>,
}

impl CommandMediator {
    pub fn new(
        tokens: Arc<TokenManager>,
        api: Arc<dyn CommandChannel>,
        web: Arc<dyn CommandChannel>,
    ) -> Self {
        CommandMediator { tokens, api, web }
    }

    /// Executes `command` and always returns a well-formed outcome.
    pub async fn execute(&self, command: Command) -> Outcome {
        let state = self.tokens.ensure_valid().await;

        let api_failure = if state == AuthState::Authenticated {
            let outcome = self.api.send(command).await;
            if !outcome.allows_fallback() {
                return outcome;
            }
            warning!(
                "{} via {} failed ({}), falling back to {}",
                command,
                self.api.kind(),
                outcome.message,
                self.web.kind()
            );
            Some(outcome.message)
        } else {
            info!("{} via {} ({})", command, self.web.kind(), state);
            None
        };

        let mut outcome = self.web.send(command).await;
        if let Some(reason) = api_failure {
            outcome.message = format!("{} (fallback: {})", outcome.message, reason);
        }
        outcome
    }

    /// Current authorization state, refreshing the token if needed.
    pub async fn auth_state(&self) -> AuthState {
        self.tokens.ensure_valid().await
    }

    pub fn tokens(&self) -> &Arc<TokenManager> {
        &self.tokens
    }
}
