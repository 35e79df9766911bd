//! Startup orchestration.
//!
//! # Responsibilities
//! - Apply the route table under the configured mount prefix
//! - Bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: a route the server rejects aborts startup
//! - Routes are applied before the listener is bound (traffic only when ready)

use std::future::Future;
use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::http::{Handler, HttpServer, ServerError};
use crate::routing::Router;

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("route rejected: {0}")]
    Route(#[from] ServerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Apply `routes` to a fresh server under the configured prefix.
pub fn build_server(config: &ServerConfig, routes: &Router<Handler>) -> Result<HttpServer, ServerError> {
    let mut server = HttpServer::new();
    routes.apply_routes(&mut server, &config.mount.prefix)?;
    Ok(server)
}

/// Bind the configured address.
pub async fn bind(config: &ServerConfig) -> Result<TcpListener, std::io::Error> {
    TcpListener::bind(&config.listener.bind_address).await
}

/// Apply routes, then serve on `listener` until `shutdown` resolves.
pub async fn serve<F>(
    config: &ServerConfig,
    routes: &Router<Handler>,
    listener: TcpListener,
    shutdown: F,
) -> Result<(), StartupError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let server = build_server(config, routes)?;
    let local_addr: SocketAddr = listener.local_addr()?;
    tracing::info!(
        address = %local_addr,
        prefix = %config.mount.prefix,
        "Route table mounted"
    );
    server.run(listener, shutdown).await?;
    Ok(())
}
