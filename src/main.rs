use tokio::signal;
use tracing::{info, warn};

use smartflow_api as api;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = api::config::load_config()?;
    api::config::init_tracing(cfg.log_level(), cfg.log_json);

    let state = api::AppState::from_config(cfg.clone());

    // Warm the classifier so a missing artifact is visible at startup; the
    // stockout endpoint retries the load on first call either way.
    if let Err(err) = state.stockout.classifier() {
        warn!("Stockout classifier not available yet: {}", err);
    }

    let app = api::app(state);

    // Bind and serve
    let addr = cfg.socket_addr()?;
    info!("🚀 smartflow-api listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install signal handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
