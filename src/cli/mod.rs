//! # CLI Module
//!
//! Command-line front end. Each subcommand builds on the same [`App`]
//! composition root the widget host uses, so the CLI exercises exactly the
//! token lifecycle, channel selection and control server the widget relies
//! on.
//!
//! ## Commands
//!
//! - [`auth`] - Runs the browser-based authorization flow
//! - [`logout`] - Removes the cached credential
//! - [`serve`] - Runs the loopback control server until Ctrl+C
//! - [`control`] - Executes one playback command
//! - [`status`] - Shows authorization and playback state
//! - [`now_playing`] - Shows the current track
//!
//! ## Usage
//!
//! ```bash
//! studybeat auth          # Connect a Spotify account
//! studybeat serve         # Expose /play, /pause, ... on 127.0.0.1:8888
//! studybeat next          # Skip one track
//! studybeat now           # Show the current track
//! ```
//!
//! [`App`]: crate::app::App

mod auth;
mod control;
mod serve;
mod status;

pub use auth::auth;
pub use auth::logout;
pub use control::control;
pub use serve::serve;
pub use status::now_playing;
pub use status::status;
