//! # Web Player Channel
//!
//! Fallback command channel that injects a fixed control script into the
//! embedded Spotify web player. It needs no credentials and works whenever
//! the widget is open, but it cannot observe whether the click had any
//! effect: a dispatched script is reported as `"attempted"`, nothing more.

pub mod scripts;

use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::{
    channel::CommandChannel,
    error::ControlError,
    types::{Channel, Command, Outcome},
};

pub const ATTEMPTED: &str = "attempted";

/// An embedded browser view that can run a script fragment.
///
/// Execution is asynchronous and yields no return value.
pub trait ScriptSurface: Send + Sync {
    fn run_script(&self, script: &str);
}

/// Fire-and-forget command sender backed by the embedded web player.
#[derive(Default)]
pub struct WebChannel {
    surface: RwLock<Option<Arc<dyn ScriptSurface>>>,
}

impl WebChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches the surface of a newly opened widget.
    pub fn attach(&self, surface: Arc<dyn ScriptSurface>) {
        let mut slot = self.surface.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(surface);
    }

    /// Detaches the surface when the widget closes.
    pub fn detach(&self) {
        let mut slot = self.surface.write().unwrap_or_else(|e| e.into_inner());
        *slot = None;
    }

    pub fn is_attached(&self) -> bool {
        self.surface
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    fn current_surface(&self) -> Option<Arc<dyn ScriptSurface>> {
        self.surface
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl CommandChannel for WebChannel {
    fn kind(&self) -> Channel {
        Channel::WebChannel
    }

    async fn send(&self, command: Command) -> Outcome {
        let Some(surface) = self.current_surface() else {
            return Outcome::failure(Channel::WebChannel, ControlError::ChannelUnavailable);
        };
        let Some(script) = scripts::for_command(command) else {
            return Outcome::failure(Channel::WebChannel, ControlError::Unsupported(command));
        };

        surface.run_script(script);
        Outcome::success(Channel::WebChannel, ATTEMPTED, None)
    }
}
