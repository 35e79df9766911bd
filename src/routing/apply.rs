//! Binding a route table onto a server.
//!
//! # Responsibilities
//! - Walk the table method by method, entries in registration order
//! - Compose each path with the mount prefix
//! - Hand each route to the server's registration call for its verb
//!
//! # Design Decisions
//! - The table is only borrowed; applying never changes it
//! - Applying twice binds every route twice. Servers see each call
//!   separately and no bookkeeping is kept between calls
//! - Server errors are returned as the server produced them
//! - `&mut S` means one apply per server at a time; the borrow checker
//!   serializes callers

use std::fmt;

use crate::routing::method::Method;
use crate::routing::path::{PathExpr, PathMatcher, Pattern};
use crate::routing::prefix::compose;
use crate::routing::table::RouteTable;

/// What a server receives for one route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteTarget {
    /// A bare literal path.
    Path(String),
    /// A bare pattern.
    Pattern(Pattern),
    /// A descriptor, rebuilt because the route was declared with a name
    /// or a version.
    Descriptor {
        name: Option<String>,
        path: PathExpr,
        version: Option<String>,
    },
}

impl RouteTarget {
    pub fn name(&self) -> Option<&str> {
        match self {
            RouteTarget::Descriptor { name, .. } => name.as_deref(),
            _ => None,
        }
    }

    pub fn version(&self) -> Option<&str> {
        match self {
            RouteTarget::Descriptor { version, .. } => version.as_deref(),
            _ => None,
        }
    }
}

impl From<PathMatcher> for RouteTarget {
    fn from(matcher: PathMatcher) -> Self {
        match matcher {
            PathMatcher::Literal(path) => RouteTarget::Path(path),
            PathMatcher::Pattern(pattern) => RouteTarget::Pattern(pattern),
            PathMatcher::Named {
                path,
                name: None,
                version: None,
            } => match path {
                PathExpr::Literal(path) => RouteTarget::Path(path),
                PathExpr::Pattern(pattern) => RouteTarget::Pattern(pattern),
            },
            PathMatcher::Named {
                path,
                name,
                version,
            } => RouteTarget::Descriptor {
                name,
                path,
                version,
            },
        }
    }
}

impl fmt::Display for RouteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteTarget::Path(path) => f.write_str(path),
            RouteTarget::Pattern(pattern) => write!(f, "/{}/", pattern.as_str()),
            RouteTarget::Descriptor { path, version, .. } => match version {
                Some(version) => write!(f, "{} (version {})", path, version),
                None => fmt::Display::fmt(path, f),
            },
        }
    }
}

/// A server that routes can be bound to.
///
/// One registration call per verb. Implementations own version selection
/// among routes sharing a path.
pub trait RouteServer<H> {
    type Error;

    fn get(&mut self, target: RouteTarget, handler: H) -> Result<(), Self::Error>;
    fn post(&mut self, target: RouteTarget, handler: H) -> Result<(), Self::Error>;
    fn put(&mut self, target: RouteTarget, handler: H) -> Result<(), Self::Error>;
    fn del(&mut self, target: RouteTarget, handler: H) -> Result<(), Self::Error>;
    fn patch(&mut self, target: RouteTarget, handler: H) -> Result<(), Self::Error>;
    fn head(&mut self, target: RouteTarget, handler: H) -> Result<(), Self::Error>;
    fn opts(&mut self, target: RouteTarget, handler: H) -> Result<(), Self::Error>;
}

/// Bind every entry of `table` to `server` under `prefix`.
///
/// Stops at the first error the server reports; routes bound before it
/// stay bound.
pub fn apply_table<H, S>(table: &RouteTable<H>, server: &mut S, prefix: &str) -> Result<(), S::Error>
where
    H: Clone,
    S: RouteServer<H>,
{
    let mut bound = 0usize;
    for method in Method::ALL {
        for entry in table.routes(method) {
            let target = RouteTarget::from(compose(prefix, entry.spec().matcher()));
            tracing::debug!(method = %method, verb = method.verb(), target = %target, "Binding route");
            bind(server, method, target, entry.handler().clone())?;
            bound += 1;
        }
    }

    tracing::info!(routes = bound, prefix = %prefix, "Routes applied");
    Ok(())
}

fn bind<H, S>(server: &mut S, method: Method, target: RouteTarget, handler: H) -> Result<(), S::Error>
where
    S: RouteServer<H>,
{
    match method {
        Method::Get => server.get(target, handler),
        Method::Post => server.post(target, handler),
        Method::Put => server.put(target, handler),
        Method::Delete => server.del(target, handler),
        Method::Patch => server.patch(target, handler),
        Method::Head => server.head(target, handler),
        Method::Options => server.opts(target, handler),
    }
}
