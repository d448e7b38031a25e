mod common;

use std::sync::Arc;

use common::{FakeSpotify, RecordingSurface, Scenario};
use studybeat::{
    app::{App, ShortcutAction},
    config::{Settings, ShortcutSettings},
    management::CredentialStore,
    types::{AuthState, Channel, Command},
    web::scripts,
};

fn settings(fake: &FakeSpotify, configured: bool) -> Settings {
    Settings {
        auth: if configured {
            common::auth_settings(&fake.token_url())
        } else {
            common::unconfigured_settings()
        },
        api_url: fake.api_url(),
        server_addr: "127.0.0.1:0".parse().unwrap(),
        credential_path: common::temp_credential_path(),
        shortcuts: ShortcutSettings::default(),
    }
}

#[tokio::test]
async fn test_cached_credential_is_loaded() {
    let fake = FakeSpotify::start(Scenario::default()).await;
    let settings = settings(&fake, true);
    CredentialStore::new(settings.credential_path.clone())
        .persist(&common::fresh_credential("cached"))
        .await
        .unwrap();

    let app = App::from_settings(settings).await.unwrap();

    assert_eq!(app.tokens().ensure_valid().await, AuthState::Authenticated);

    let outcome = app.dispatch(Command::Next).await.unwrap();
    assert!(outcome.succeeded);
    assert_eq!(outcome.channel_used, Channel::Api);
    assert_eq!(fake.hits.player("next"), 1);
}

#[tokio::test]
async fn test_widget_lifecycle() {
    let fake = FakeSpotify::start(Scenario::default()).await;
    let app = App::from_settings(settings(&fake, false)).await.unwrap();
    let surface = Arc::new(RecordingSurface::default());

    let addr = app.show_widget(surface.clone()).await.unwrap();
    assert!(addr.ip().is_loopback());
    assert!(app.web().is_attached());
    assert!(app.server().is_running().await);

    let outcome = app.dispatch(Command::Previous).await.unwrap();
    assert!(outcome.succeeded);
    assert_eq!(outcome.channel_used, Channel::WebChannel);
    assert_eq!(surface.scripts(), vec![scripts::PREVIOUS]);

    app.hide_widget().await;
    assert!(!app.web().is_attached());
    assert!(!app.server().is_running().await);

    // Hiding twice is harmless
    app.hide_widget().await;
}

#[tokio::test]
async fn test_shortcuts_dispatch_playback_commands() {
    let fake = FakeSpotify::start(Scenario::default()).await;
    let app = App::from_settings(settings(&fake, false)).await.unwrap();
    let surface = Arc::new(RecordingSurface::default());
    app.web().attach(surface.clone());

    let (action, pending) = app.handle_shortcut("shift+right").unwrap();
    assert_eq!(action, ShortcutAction::Playback(Command::Next));
    assert!(pending.unwrap().await.unwrap().succeeded);

    let (action, pending) = app.handle_shortcut("Space").unwrap();
    assert_eq!(action, ShortcutAction::Playback(Command::TogglePlayPause));
    assert!(pending.unwrap().await.unwrap().succeeded);

    let (action, pending) = app.handle_shortcut("Ctrl+Shift+S").unwrap();
    assert_eq!(action, ShortcutAction::ToggleWidget);
    assert!(pending.is_none());

    assert!(app.handle_shortcut("Alt+F4").is_none());
    assert_eq!(surface.scripts(), vec![scripts::NEXT, scripts::TOGGLE]);
}
