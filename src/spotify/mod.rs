//! # Spotify Integration Module
//!
//! HTTP communication with Spotify: the OAuth 2.0 endpoints used to obtain
//! and refresh tokens, and the Web API player endpoints used as the
//! preferred command channel.
//!
//! ## Modules
//!
//! - [`auth`] - Authorization URL construction, code exchange and refresh
//!   exchange against the accounts service. Failures are split into
//!   rejections (`AuthenticationFailed`, the grant is unusable) and
//!   transport errors (tried again on the next refresh).
//! - [`player`] - [`player::ApiChannel`], which maps each
//!   [`Command`](crate::types::Command) onto one player endpoint:
//!
//! ```text
//! Play            PUT  /me/player/play
//! Pause           PUT  /me/player/pause
//! TogglePlayPause GET  /me/player, then play or pause
//! Next            POST /me/player/next
//! Previous        POST /me/player/previous
//! GetStatus       GET  /me/player
//! GetNowPlaying   GET  /me/player
//! ```
//!
//! ## Error Handling
//!
//! Every request carries the configured timeout. Player failures are
//! classified by the `reason` code in Spotify's error body:
//! `NO_ACTIVE_DEVICE` is reported as-is and never falls back, while every
//! other failure (timeouts, 5xx, rate limiting, `PREMIUM_REQUIRED`, device
//! rejections) is handed to the web player. A 401 triggers one token refresh
//! and one retry.

pub mod auth;
pub mod player;
