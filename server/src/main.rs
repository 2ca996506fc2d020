use relay_core::Relay;
use relay_server::config::Config;
use relay_server::logging::setup_tracing;
use relay_server::{app, AppState};
use reqwest::Client;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::new()?;
    setup_tracing(&config);

    info!("Starting relay server...");

    let http_client = Client::builder().build()?;
    let relay = Relay::new(http_client).with_default_timeout(config.default_timeout_ms);
    let app_state = Arc::new(AppState { relay });

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app(app_state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Relay server shut down.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Ctrl-C received, shutting down..."),
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("SIGTERM received, shutting down...");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
