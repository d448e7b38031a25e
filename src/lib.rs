//! Studybeat playback control library
//!
//! This library drives a floating music widget that sits on top of a review
//! screen. Playback commands (play, pause, next, ...) are delivered to Spotify
//! through one of two channels: the Spotify Web API when an OAuth token is
//! available, or script injection into an embedded web player otherwise. The
//! same capability is exposed to keyboard shortcuts and to a loopback-only
//! HTTP control server.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the local control server
//! - `app` - Composition root wiring tokens, channels and the server together
//! - `channel` - The `CommandChannel` trait shared by both delivery channels
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Error taxonomy for playback control
//! - `management` - Credential persistence and token lifecycle
//! - `mediator` - Channel selection and fallback policy
//! - `server` - Loopback HTTP control server lifecycle
//! - `spotify` - Spotify Web API and OAuth client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//! - `web` - Embedded web player channel
//!
//! # Example
//!
//! ```
//! use studybeat::{app::App, config, types::Command};
//!
//! #[tokio::main]
//! async fn main() -> studybeat::Res<()> {
//!     config::load_env().await?;
//!     let app = App::from_settings(config::Settings::from_env()).await?;
//!     let outcome = app.mediator().execute(Command::Next).await;
//!     println!("{}", outcome.message);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod app;
pub mod channel;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod mediator;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;
pub mod web;

/// A convenient Result type alias for operations that may fail.
///
/// Used for startup and command-line plumbing where any error simply needs
/// to be reported. Playback paths use [`error::ControlError`] instead and
/// never surface a `Res` to their callers.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Control server listening on {}", addr);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Authorization completed");
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only the binary uses this macro. Library code never terminates the
/// process: playback failures end in an [`types::Outcome`] instead.
///
/// # Example
///
/// ```
/// error!("Cannot bind control server: {}", e);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues such as a failed refresh exchange or a
/// command that had to fall back to the web player.
///
/// # Example
///
/// ```
/// warning!("Token refresh failed: {}", e);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
