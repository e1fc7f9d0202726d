use anyhow::Result;
use tokio::net::TcpListener;
use tokio::signal;

use survey_sms_router::config::Settings;
use survey_sms_router::server::{create_app, AppState};
use survey_sms_router::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::new()?;

    // Keep the guard alive until shutdown
    let _telemetry = init_telemetry(&settings.otel)?;
    tracing::info!("Configuration loaded");

    let redis = if settings.store.backend == "redis" {
        let client = redis::Client::open(settings.redis.url.as_str())?;
        let manager = redis::aio::ConnectionManager::new(client).await?;
        tracing::info!("Connected to Redis settings store");
        Some(manager)
    } else {
        None
    };

    let state = AppState::new(settings.clone(), redis)?;
    tracing::info!(
        store = state.store.backend_type(),
        provider = state.provider_type,
        "Application state initialized"
    );

    let app = create_app(state);

    let addr = settings.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
