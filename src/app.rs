use std::{collections::HashMap, net::SocketAddr, sync::Arc};

use tokio::{runtime::Handle, sync::oneshot};

use crate::{
    Res,
    config::{Settings, ShortcutSettings},
    error::ControlError,
    management::{CredentialStore, TokenManager},
    mediator::CommandMediator,
    server::ControlServer,
    spotify::player::ApiChannel,
    types::{Command, Outcome},
    utils, warning,
    web::{ScriptSurface, WebChannel},
};

/// What a keyboard shortcut triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    ToggleWidget,
    Playback(Command),
}

/// Lookup table from normalised key sequences to actions.
#[derive(Debug, Clone, Default)]
pub struct Shortcuts {
    bindings: HashMap<String, ShortcutAction>,
}

impl Shortcuts {
    pub fn from_settings(settings: &ShortcutSettings) -> Self {
        let mut shortcuts = Shortcuts::default();
        shortcuts.bind(&settings.toggle_widget, ShortcutAction::ToggleWidget);
        shortcuts.bind(
            &settings.play_pause,
            ShortcutAction::Playback(Command::TogglePlayPause),
        );
        shortcuts.bind(&settings.next, ShortcutAction::Playback(Command::Next));
        shortcuts.bind(
            &settings.previous,
            ShortcutAction::Playback(Command::Previous),
        );
        shortcuts
    }

    /// Binds `sequence`, replacing an earlier binding of the same keys.
    pub fn bind(&mut self, sequence: &str, action: ShortcutAction) {
        match utils::normalize_key_sequence(sequence) {
            Some(keys) => {
                if let Some(previous) = self.bindings.insert(keys, action) {
                    warning!("Shortcut {} rebound from {:?} to {:?}", sequence, previous, action);
                }
            }
            None => warning!("Ignoring invalid shortcut {:?}", sequence),
        }
    }

    pub fn lookup(&self, sequence: &str) -> Option<ShortcutAction> {
        utils::normalize_key_sequence(sequence).and_then(|keys| self.bindings.get(&keys).copied())
    }
}

/// Composition root.
///
/// Owns the process-wide [`TokenManager`] and hands the same instance to the
/// API channel, the mediator and the control server. The host UI talks to
/// the application only through this type.
pub struct App {
    runtime: Handle,
    tokens: Arc<TokenManager>,
    web: Arc<WebChannel>,
    mediator: Arc<CommandMediator>,
    server: ControlServer,
    shortcuts: Shortcuts,
}

impl App {
    /// Builds the application. Must be called from within a tokio runtime.
    pub async fn from_settings(settings: Settings) -> Res<Self> {
        let store = CredentialStore::new(settings.credential_path.clone());
        let tokens = Arc::new(TokenManager::load(settings.auth.clone(), store).await?);
        if !tokens.is_configured() {
            warning!("{}; using the web player only", ControlError::ConfigurationMissing);
        }

        let api = Arc::new(ApiChannel::new(
            settings.api_url.clone(),
            settings.auth.request_timeout,
            Arc::clone(&tokens),
        )?);
        let web = Arc::new(WebChannel::new());
        let mediator = Arc::new(CommandMediator::new(
            Arc::clone(&tokens),
            api,
            web.clone(),
        ));
        let server = ControlServer::new(settings.server_addr, Arc::clone(&mediator));

        Ok(App {
            runtime: Handle::current(),
            tokens,
            web,
            mediator,
            server,
            shortcuts: Shortcuts::from_settings(&settings.shortcuts),
        })
    }

    /// Called when the widget becomes visible.
    ///
    /// Attaches the embedded player and starts the control server.
    pub async fn show_widget(
        &self,
        surface: Arc<dyn ScriptSurface>,
    ) -> Result<SocketAddr, ControlError> {
        self.web.attach(surface);
        self.server.start().await
    }

    /// Called when the widget closes.
    pub async fn hide_widget(&self) {
        self.web.detach();
        self.server.stop().await;
    }

    /// Runs `command` on the runtime and returns immediately.
    ///
    /// Safe to call from a UI thread that is not part of the runtime; the
    /// outcome arrives on the returned receiver.
    pub fn dispatch(&self, command: Command) -> oneshot::Receiver<Outcome> {
        let (tx, rx) = oneshot::channel();
        let mediator = Arc::clone(&self.mediator);
        self.runtime.spawn(async move {
            let _ = tx.send(mediator.execute(command).await);
        });
        rx
    }

    /// Resolves a pressed key sequence. Playback actions are dispatched;
    /// the caller handles widget toggling.
    pub fn handle_shortcut(
        &self,
        sequence: &str,
    ) -> Option<(ShortcutAction, Option<oneshot::Receiver<Outcome>>)> {
        let action = self.shortcuts.lookup(sequence)?;
        let pending = match action {
            ShortcutAction::Playback(command) => Some(self.dispatch(command)),
            ShortcutAction::ToggleWidget => None,
        };
        Some((action, pending))
    }

    pub fn tokens(&self) -> &Arc<TokenManager> {
        &self.tokens
    }

    pub fn mediator(&self) -> &Arc<CommandMediator> {
        &self.mediator
    }

    pub fn server(&self) -> &ControlServer {
        &self.server
    }

    pub fn web(&self) -> &Arc<WebChannel> {
        &self.web
    }
}
