//! HTTP server subsystem.
//!
//! # Data Flow
//! ```text
//! Router::apply_routes(&mut HttpServer, prefix)
//!     → server.rs (group routes per path/method, check conflicts)
//!
//! HttpServer::into_router()
//!     → axum Router (literal paths, params.rs translates `:id`)
//!     → fallback (pattern routes in registration order)
//!
//! Incoming request
//!     → request-id + trace middleware
//!     → version.rs (Accept-Version → handler)
//!     → handler.rs (user handler, params in extensions)
//! ```

pub mod handler;
pub mod params;
pub mod request;
pub mod server;
pub mod version;

pub use handler::{handler, Handler};
pub use params::RouteParams;
pub use request::{RequestIdExt, X_REQUEST_ID};
pub use server::{HttpServer, ServerError};
