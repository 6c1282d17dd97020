//! HTTP transport with Streamable HTTP support for the MCP server.
//!
//! Every HTTP session gets its own [`SqliteService`], all sharing the one
//! [`OperationRouter`] and therefore the one database connection.

use crate::error::{DbError, DbResult};
use crate::mcp::SqliteService;
use crate::tools::OperationRouter;
use crate::transport::{Transport, wait_for_signal};
use rmcp::transport::streamable_http_server::{
    StreamableHttpService, session::local::LocalSessionManager,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tracing::{error, info, warn};

/// How long open streams may delay exit after a shutdown signal.
const GRACEFUL_TIMEOUT: Duration = Duration::from_secs(30);

pub struct HttpTransport {
    router: Arc<OperationRouter>,
    host: String,
    port: u16,
    /// MCP endpoint path
    endpoint: String,
}

impl HttpTransport {
    pub fn new(
        router: Arc<OperationRouter>,
        host: impl Into<String>,
        port: u16,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            router,
            host: host.into(),
            port,
            endpoint: endpoint.into(),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn app(&self) -> axum::Router {
        let router = self.router.clone();
        let service = StreamableHttpService::new(
            move || Ok(SqliteService::new(router.clone())),
            LocalSessionManager::default().into(),
            Default::default(),
        );

        // nest_service rejects "/", so the root endpoint is mounted as fallback.
        if self.endpoint == "/" {
            axum::Router::new().fallback_service(service)
        } else {
            axum::Router::new().nest_service(&self.endpoint, service)
        }
    }
}

impl Transport for HttpTransport {
    async fn run(&self) -> DbResult<()> {
        let bind_addr = self.bind_addr();
        let listener = TcpListener::bind(&bind_addr)
            .await
            .map_err(|e| DbError::transport(format!("Failed to bind to {}: {}", bind_addr, e)))?;

        info!(
            addr = %bind_addr,
            endpoint = %self.endpoint,
            "Serving MCP over streamable HTTP"
        );

        let signalled = Arc::new(Notify::new());
        let on_signal = signalled.clone();
        let server = axum::serve(listener, self.app()).with_graceful_shutdown(async move {
            wait_for_signal().await;
            on_signal.notify_one();
        });

        tokio::select! {
            result = server => match result {
                Ok(()) => info!("HTTP server stopped"),
                Err(e) => {
                    error!(error = %e, "HTTP server failed");
                    return Err(DbError::transport(format!("HTTP server error: {}", e)));
                }
            },
            _ = drain_deadline(&signalled) => {}
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Resolves once a shutdown has been signalled and open streams had
/// `GRACEFUL_TIMEOUT` to finish, or a second signal arrived.
async fn drain_deadline(signalled: &Notify) {
    signalled.notified().await;
    info!(
        timeout_secs = GRACEFUL_TIMEOUT.as_secs(),
        "Draining open streams; signal again to stop now"
    );

    tokio::select! {
        _ = tokio::time::sleep(GRACEFUL_TIMEOUT) => warn!("Drain timeout reached"),
        _ = wait_for_signal() => warn!("Second signal received"),
    }
}
