use anyhow::Context;
use api_server::{router, AppState};
use application::UserApp;
use config::{Config, LogFormat};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str =
    "user_api=info,api_server=info,application=info,domain=info,infrastructure=info,tower_http=info";

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    };
    if let Err(e) = result {
        warn!(error = %e, "tracing init failed");
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        return;
    }
    info!("shutting down user api");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment
    let config = Config::from_env(None).context("invalid configuration")?;

    init_tracing(config.log_format);

    info!("Starting user API");
    info!(storage = ?config.storage, address = %config.api_address(), "configuration loaded");

    let user_app = Arc::new(UserApp::new(&config).await?);
    let app = router(AppState::new(user_app));

    let bind_address = config.api_address();
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {bind_address}"))?;
    info!("API Server listening on http://{}", bind_address);
    info!("   GET    /v1/users            - List users (filters: email, country, nickname, lastName, firstName)");
    info!("   POST   /v1/users            - Create user");
    info!("   GET    /v1/users/:nickname  - Get user");
    info!("   PUT    /v1/users/:nickname  - Update user and notify");
    info!("   DELETE /v1/users/:nickname  - Delete user");
    info!("   GET    /health              - Health check");
    info!("   GET    /swagger/doc.json    - OpenAPI document");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
