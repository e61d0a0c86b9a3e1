//! Opsdeck Server - Main entry point

use anyhow::Result;
use opsdeck_common::logging::{init_logging, LogConfig};
use tracing::info;

use opsdeck_server::{api, config::Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; environment variables take precedence over the
    // built-in defaults.
    let log_config = LogConfig::from_env()
        .unwrap_or_default()
        .with_prefix("opsdeck-server")
        .with_filter("opsdeck_server=debug,tower_http=debug,sqlx=info");
    init_logging(&log_config)?;

    info!("Starting Opsdeck Server");

    let config = Config::load()?;
    info!(
        "Configuration loaded - server will bind to {}:{}",
        config.server.host, config.server.port
    );

    api::serve(config).await
}
