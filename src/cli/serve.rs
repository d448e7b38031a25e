use crate::{app::App, error, info, success, warning};

/// Runs the control server until Ctrl+C.
pub async fn serve(app: &App) {
    match app.server().start().await {
        Ok(addr) => success!("Control server running on http://{}", addr),
        Err(e) => error!("Cannot start control server: {}", e),
    }

    info!("Press Ctrl+C to stop");
    if let Err(e) = tokio::signal::ctrl_c().await {
        warning!("Cannot listen for Ctrl+C: {}", e);
    }

    app.server().stop().await;
}
