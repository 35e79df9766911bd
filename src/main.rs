//! Demo server for the route registry.
//!
//! Declares a small route table, applies it to an HTTP server under the
//! configured mount prefix and serves until SIGINT/SIGTERM.

use std::path::PathBuf;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use clap::Parser;
use regex::Regex;

use route_registry::config::{apply_overrides, load_config, ServerConfig};
use route_registry::http::{handler, Handler, RequestIdExt, RouteParams};
use route_registry::lifecycle::{self, shutdown_signal};
use route_registry::observability::init_logging;
use route_registry::routing::{RouteDescriptor, Router};

const MAX_ECHO_BYTES: usize = 64 * 1024;

#[derive(Parser)]
#[command(name = "route-registry")]
#[command(about = "Serve a demo route table under a mount prefix", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Mount prefix, overrides the configuration.
    #[arg(short, long)]
    prefix: Option<String>,

    /// Bind address, overrides the configuration.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    let config = apply_overrides(config, cli.prefix, cli.bind)?;

    init_logging(&config.observability)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "route-registry starting");

    let routes = demo_routes()?;
    tracing::info!(routes = routes.len(), "Route table declared");

    let listener = lifecycle::startup::bind(&config).await?;
    lifecycle::serve(&config, &routes, listener, shutdown_signal()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn demo_routes() -> Result<Router<Handler>, Box<dyn std::error::Error>> {
    let mut routes: Router<Handler> = Router::new();

    routes.get("/hello", handler(|_req| async { "Hello World" }))?;

    routes.get(
        RouteDescriptor::new("/greeting").version("1.0.0"),
        handler(|_req| async { "hello from 1.0.0" }),
    )?;
    routes.get(
        RouteDescriptor::new("/greeting").version("2.0.0"),
        handler(|_req| async { "hello from 2.0.0" }),
    )?;

    routes.get(
        RouteDescriptor::new("/health").name("health"),
        handler(|req: Request<Body>| async move {
            format!("ok ({})", req.request_id().unwrap_or("-"))
        }),
    )?;

    routes.post("/echo", handler(echo))?;

    routes.del(
        "/items/:id",
        handler(|req: Request<Body>| async move {
            let params = RouteParams::of(&req);
            format!("deleted {}", params.get("id").unwrap_or_default())
        }),
    )?;

    routes.get(
        Regex::new(r"^/files/(.+)$")?,
        handler(|req: Request<Body>| async move {
            let params = RouteParams::of(&req);
            params.get("0").unwrap_or_default().to_string()
        }),
    )?;

    Ok(routes)
}

async fn echo(req: Request<Body>) -> Result<Vec<u8>, StatusCode> {
    to_bytes(req.into_body(), MAX_ECHO_BYTES)
        .await
        .map(|bytes| bytes.to_vec())
        .map_err(|_| StatusCode::PAYLOAD_TOO_LARGE)
}
