//! The route registry.
//!
//! # Responsibilities
//! - Accept route declarations independently of any server
//! - Keep them in a table owned by this instance
//! - Apply the whole table to a server under an optional mount prefix
//!
//! # Design Decisions
//! - No global state: every `Router` owns its own table
//! - A failed declaration leaves the table untouched
//! - Verb shortcuts are written out, one per verb, and only fix the method

use crate::error::RegistryResult;
use crate::routing::apply::{apply_table, RouteServer};
use crate::routing::method::Method;
use crate::routing::path::{normalize, PathArg};
use crate::routing::table::{RouteEntry, RouteTable};

/// A table of route declarations, detached from any server.
///
/// ```
/// use route_registry::routing::{Method, Router};
///
/// let mut router: Router<&str> = Router::new();
/// router.get("/hello", "hello handler").unwrap();
/// router.del("/hello/:id", "delete handler").unwrap();
///
/// assert_eq!(router.routes(Method::Get).len(), 1);
/// assert_eq!(router.routes(Method::Delete).len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Router<H> {
    table: RouteTable<H>,
}

impl<H> Default for Router<H> {
    fn default() -> Self {
        Self {
            table: RouteTable::new(),
        }
    }
}

impl<H> Router<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a route for `method`.
    pub fn register(
        &mut self,
        method: Method,
        path: impl Into<PathArg>,
        handler: impl Into<Option<H>>,
    ) -> RegistryResult<()> {
        let entry = normalize(method, path, handler.into())?;
        tracing::trace!(method = %method, path = %entry.spec().matcher(), "Route registered");
        self.table.push(entry);
        Ok(())
    }

    pub fn get(&mut self, path: impl Into<PathArg>, handler: impl Into<Option<H>>) -> RegistryResult<()> {
        self.register(Method::Get, path, handler)
    }

    pub fn post(&mut self, path: impl Into<PathArg>, handler: impl Into<Option<H>>) -> RegistryResult<()> {
        self.register(Method::Post, path, handler)
    }

    pub fn put(&mut self, path: impl Into<PathArg>, handler: impl Into<Option<H>>) -> RegistryResult<()> {
        self.register(Method::Put, path, handler)
    }

    /// Declare a `DELETE` route.
    pub fn del(&mut self, path: impl Into<PathArg>, handler: impl Into<Option<H>>) -> RegistryResult<()> {
        self.register(Method::Delete, path, handler)
    }

    pub fn patch(&mut self, path: impl Into<PathArg>, handler: impl Into<Option<H>>) -> RegistryResult<()> {
        self.register(Method::Patch, path, handler)
    }

    pub fn head(&mut self, path: impl Into<PathArg>, handler: impl Into<Option<H>>) -> RegistryResult<()> {
        self.register(Method::Head, path, handler)
    }

    /// Declare an `OPTIONS` route.
    pub fn opts(&mut self, path: impl Into<PathArg>, handler: impl Into<Option<H>>) -> RegistryResult<()> {
        self.register(Method::Options, path, handler)
    }

    /// Routes declared for `method`, in declaration order.
    pub fn routes(&self, method: Method) -> &[RouteEntry<H>] {
        self.table.routes(method)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl<H: Clone> Router<H> {
    /// Bind every declared route to `server`, joining literal paths onto
    /// `prefix`. Pattern routes are bound unprefixed.
    ///
    /// Calling this twice against the same server binds everything twice.
    pub fn apply_routes<S>(&self, server: &mut S, prefix: &str) -> Result<(), S::Error>
    where
        S: RouteServer<H>,
    {
        apply_table(&self.table, server, prefix)
    }

    /// Bind every declared route to `server` at its declared path.
    pub fn apply<S>(&self, server: &mut S) -> Result<(), S::Error>
    where
        S: RouteServer<H>,
    {
        self.apply_routes(server, "")
    }
}
