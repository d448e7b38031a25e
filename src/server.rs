use std::{net::SocketAddr, sync::Arc};

use tokio::{
    net::TcpListener,
    sync::{Mutex, oneshot},
    task::JoinHandle,
};

use crate::{
    api::{self, ControlState},
    error::ControlError,
    info,
    mediator::CommandMediator,
    warning,
};

/// Loopback-only HTTP control server.
///
/// `start` and `stop` are idempotent: starting a running server returns its
/// address, stopping a stopped one does nothing. The server refuses to bind
/// to anything but a loopback address since callers are not authenticated.
pub struct ControlServer {
    addr: SocketAddr,
    mediator: Arc<CommandMediator>,
    running: Mutex<Option<RunningServer>>,
}

struct RunningServer {
    local_addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl ControlServer {
    pub fn new(addr: SocketAddr, mediator: Arc<CommandMediator>) -> Self {
        ControlServer {
            addr,
            mediator,
            running: Mutex::new(None),
        }
    }

    /// Binds and starts serving in a background task.
    ///
    /// Returns the bound address, which differs from the configured one when
    /// port 0 was requested.
    pub async fn start(&self) -> Result<SocketAddr, ControlError> {
        let mut running = self.running.lock().await;
        if let Some(server) = running.as_ref() {
            return Ok(server.local_addr);
        }

        if !self.addr.ip().is_loopback() {
            return Err(ControlError::Server(format!(
                "refusing to bind non-loopback address {}",
                self.addr
            )));
        }

        let listener = TcpListener::bind(self.addr)
            .await
            .map_err(|e| ControlError::Server(format!("cannot bind {}: {}", self.addr, e)))?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| ControlError::Server(e.to_string()))?;

        let app = api::router(ControlState {
            mediator: Arc::clone(&self.mediator),
        });
        let (shutdown, signal) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let served = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = signal.await;
                })
                .await;
            if let Err(e) = served {
                warning!("Control server error: {}", e);
            }
        });

        info!("Control server listening on http://{}", local_addr);
        *running = Some(RunningServer {
            local_addr,
            shutdown,
            task,
        });
        Ok(local_addr)
    }

    /// Stops the server and waits for in-flight requests to finish.
    pub async fn stop(&self) {
        let Some(server) = self.running.lock().await.take() else {
            return;
        };

        let _ = server.shutdown.send(());
        if let Err(e) = server.task.await {
            warning!("Control server task ended abnormally: {}", e);
        }
        info!("Control server stopped");
    }

    pub async fn is_running(&self) -> bool {
        self.running.lock().await.is_some()
    }

    pub async fn local_addr(&self) -> Option<SocketAddr> {
        self.running.lock().await.as_ref().map(|s| s.local_addr)
    }
}
