//! Control scripts injected into the embedded Spotify web player.
//!
//! Each script clicks the matching player button and falls back to the web
//! player's keyboard shortcut when the button cannot be found. Scripts return
//! nothing; the embedded view gives no reliable result channel.

use crate::types::Command;

pub const PLAY: &str = r#"(function() {
    var btn = document.querySelector('[data-testid="control-button-playpause"]');
    if (btn && /play/i.test(btn.getAttribute('aria-label') || '')) { btn.click(); return; }
    if (!btn) { document.body.dispatchEvent(new KeyboardEvent('keydown', { key: ' ', code: 'Space', keyCode: 32, bubbles: true })); }
})();"#;

pub const PAUSE: &str = r#"(function() {
    var btn = document.querySelector('[data-testid="control-button-playpause"]');
    if (btn && /pause/i.test(btn.getAttribute('aria-label') || '')) { btn.click(); return; }
    if (!btn) { document.body.dispatchEvent(new KeyboardEvent('keydown', { key: ' ', code: 'Space', keyCode: 32, bubbles: true })); }
})();"#;

pub const TOGGLE: &str = r#"(function() {
    var btn = document.querySelector('[data-testid="control-button-playpause"]') ||
              document.querySelector('button[aria-label*="Play"]') ||
              document.querySelector('button[aria-label*="Pause"]');
    if (btn) { btn.click(); return; }
    document.body.dispatchEvent(new KeyboardEvent('keydown', { key: ' ', code: 'Space', keyCode: 32, bubbles: true }));
})();"#;

pub const NEXT: &str = r#"(function() {
    var btn = document.querySelector('[data-testid="control-button-skip-forward"]') ||
              document.querySelector('button[aria-label*="Next"]');
    if (btn) { btn.click(); return; }
    document.body.dispatchEvent(new KeyboardEvent('keydown', { key: 'ArrowRight', code: 'ArrowRight', keyCode: 39, altKey: true, bubbles: true }));
})();"#;

pub const PREVIOUS: &str = r#"(function() {
    var btn = document.querySelector('[data-testid="control-button-skip-back"]') ||
              document.querySelector('button[aria-label*="Previous"]');
    if (btn) { btn.click(); return; }
    document.body.dispatchEvent(new KeyboardEvent('keydown', { key: 'ArrowLeft', code: 'ArrowLeft', keyCode: 37, altKey: true, bubbles: true }));
})();"#;

/// Script for `command`, or `None` for queries that need a result.
pub fn for_command(command: Command) -> Option<&'static str> {
    match command {
        Command::Play => Some(PLAY),
        Command::Pause => Some(PAUSE),
        Command::TogglePlayPause => Some(TOGGLE),
        Command::Next => Some(NEXT),
        Command::Previous => Some(PREVIOUS),
        Command::GetStatus | Command::GetNowPlaying => None,
    }
}
