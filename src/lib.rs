//! Route registry: declare HTTP routes independently of a server, then
//! apply the whole table to one under a mount prefix.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use error::{RegistryError, RegistryResult};
pub use http::{handler, Handler, HttpServer};
pub use routing::{Method, RouteDescriptor, RouteServer, RouteTarget, Router};
