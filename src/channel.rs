use async_trait::async_trait;

use crate::types::{Channel, Command, Outcome};

/// One path by which a playback command can reach the player.
///
/// Implementations never fail the caller: every error ends in a failed
/// [`Outcome`] tagged with the implementation's [`Channel`].
#[async_trait]
pub trait CommandChannel: Send + Sync {
    fn kind(&self) -> Channel;

    async fn send(&self, command: Command) -> Outcome;
}
