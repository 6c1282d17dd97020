//! SQLite MCP Server - Main entry point.
//!
//! Exposes one SQLite database file to MCP clients over stdio or HTTP.

use clap::Parser;
use sqlite_mcp_server::config::{Config, TransportMode};
use sqlite_mcp_server::db::SqliteHandler;
use sqlite_mcp_server::tools::OperationRouter;
use sqlite_mcp_server::transport::{HttpTransport, StdioTransport, Transport};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
///
/// Everything goes to stderr; stdout belongs to the stdio transport.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();

    init_tracing(&config);

    info!(
        transport = %config.transport,
        "Starting SQLite MCP Server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let db_path = config.resolve_database_path()?;
    info!(path = %db_path.display(), "Using database file");

    // A failed open is not fatal; operations report it individually.
    let handler = Arc::new(SqliteHandler::open(db_path).await);
    let router = Arc::new(OperationRouter::new(handler));

    let result = match config.transport {
        TransportMode::Stdio => {
            let transport = StdioTransport::new(router);
            transport.run().await
        }
        TransportMode::Http => {
            info!(
                addr = %config.http_bind_addr(),
                endpoint = %config.mcp_endpoint,
                "Using HTTP transport"
            );
            let transport = HttpTransport::new(
                router,
                &config.http_host,
                config.http_port,
                &config.mcp_endpoint,
            );
            transport.run().await
        }
    };

    if let Err(e) = result {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}
