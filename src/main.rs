//! Graph Sheets Gateway server binary.

use anyhow::Context;
use core_runtime::config::GatewayConfig;
use core_runtime::logging::{init_logging, LoggingConfig};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the process environment still applies.
    dotenv::dotenv().ok();

    let config = GatewayConfig::from_env().context("invalid gateway configuration")?;

    let mut logging = LoggingConfig::default();
    if let Some(format) = config.server.log_format {
        logging = logging.with_format(format);
    }
    if let Some(level) = config.server.log_level {
        logging = logging.with_level(level);
    }
    init_logging(logging).context("failed to initialize logging")?;

    let state = core_service::build_state(&config)?;
    let app = core_service::router(state);

    let listener = TcpListener::bind(config.server.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind_addr))?;

    info!(
        addr = %config.server.bind_addr,
        drive_root = config.graph.drive_root.as_deref().unwrap_or("<unset>"),
        credentials_configured = config.credentials.is_complete(),
        "Graph Sheets Gateway listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // Without a signal handler, run until killed.
        std::future::pending::<()>().await;
    }
}
