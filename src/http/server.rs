//! HTTP server that route tables are applied to.
//!
//! # Responsibilities
//! - Accept routes from `Router::apply_routes` through `RouteServer`
//! - Group literal routes per path and method; keep pattern routes ordered
//! - Resolve `Accept-Version` among routes sharing a method and path
//! - Build the axum router with tracing and request-id middleware
//! - Serve with graceful shutdown
//!
//! # Design Decisions
//! - Literal routes are matched by axum; pattern routes are tried in
//!   registration order only when no literal route matched the path and
//!   method
//! - A literal path is checked against axum's matcher when first bound, so
//!   building the router cannot fail
//! - `HEAD` falls back to `GET`, for literal and pattern routes alike
//! - A method and path take one unversioned route and one route per
//!   version; anything beyond that is rejected when bound
//! - Route names are unique per server

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{rejection::RawPathParamsRejection, RawPathParams},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{MethodFilter, MethodRouter},
};
use futures_util::future::{self, BoxFuture, FutureExt};
use semver::Version;
use thiserror::Error;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::http::handler::Handler;
use crate::http::params::{axum_path, RouteParams};
use crate::http::version::{requested_version, Candidates};
use crate::routing::{Method, PathExpr, Pattern, RouteServer, RouteTarget};

/// Errors raised while binding a route.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The route's version is not a semver version.
    #[error("invalid route version {version:?}: {source}")]
    InvalidVersion {
        version: String,
        #[source]
        source: semver::Error,
    },

    /// Another route already uses this name.
    #[error("route name {0:?} is already in use")]
    DuplicateName(String),

    /// The method and path already have a route for this version.
    #[error("{method} {path} is already routed{}", .version.as_ref().map(|v| format!(" for version {}", v)).unwrap_or_default())]
    Conflict {
        method: Method,
        path: String,
        version: Option<Version>,
    },

    /// The path cannot be matched alongside the paths bound before it.
    #[error("invalid route {path}: {source}")]
    InvalidRoute {
        path: String,
        #[source]
        source: matchit::InsertError,
    },
}

struct LiteralRoute {
    path: String,
    methods: BTreeMap<Method, Candidates>,
}

struct PatternRoute {
    method: Method,
    pattern: Pattern,
    candidates: Candidates,
}

/// An axum-backed server that route tables are applied to.
pub struct HttpServer {
    literals: Vec<LiteralRoute>,
    patterns: Vec<PatternRoute>,
    names: HashMap<String, String>,
    /// Mirrors the paths axum will be given, in binding order.
    matcher: matchit::Router<()>,
}

impl Default for HttpServer {
    fn default() -> Self {
        Self {
            literals: Vec::new(),
            patterns: Vec::new(),
            names: HashMap::new(),
            matcher: matchit::Router::new(),
        }
    }
}

impl HttpServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind one route.
    pub fn register(
        &mut self,
        method: Method,
        target: RouteTarget,
        handler: Handler,
    ) -> Result<(), ServerError> {
        let (path, name, version) = match target {
            RouteTarget::Path(path) => (PathExpr::Literal(path), None, None),
            RouteTarget::Pattern(pattern) => (PathExpr::Pattern(pattern), None, None),
            RouteTarget::Descriptor {
                name,
                path,
                version,
            } => (path, name, version),
        };

        let version = match version {
            Some(raw) => match Version::parse(raw.trim()) {
                Ok(version) => Some(version),
                Err(source) => {
                    return Err(ServerError::InvalidVersion {
                        version: raw,
                        source,
                    })
                }
            },
            None => None,
        };

        if let Some(name) = &name {
            if self.names.contains_key(name) {
                return Err(ServerError::DuplicateName(name.clone()));
            }
        }

        let shown = path.to_string();
        if let PathExpr::Literal(literal) = &path {
            self.claim_literal(literal)?;
        }
        let candidates = match path {
            PathExpr::Literal(path) => self.literal_slot(method, path),
            PathExpr::Pattern(pattern) => self.pattern_slot(method, pattern),
        };
        if candidates.contains(version.as_ref()) {
            return Err(ServerError::Conflict {
                method,
                path: shown,
                version,
            });
        }

        tracing::debug!(
            method = %method,
            path = %shown,
            version = ?version.as_ref().map(Version::to_string),
            "Route bound"
        );
        candidates.push(version, handler);

        if let Some(name) = name {
            self.names.insert(name, shown);
        }
        Ok(())
    }

    /// The path a named route was bound at.
    pub fn route_path(&self, name: &str) -> Option<&str> {
        self.names.get(name).map(String::as_str)
    }

    /// Number of bound routes.
    pub fn len(&self) -> usize {
        let literal: usize = self
            .literals
            .iter()
            .flat_map(|route| route.methods.values())
            .map(Candidates::len)
            .sum();
        let pattern: usize = self.patterns.iter().map(|route| route.candidates.len()).sum();
        literal + pattern
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build the axum router.
    pub fn into_router(self) -> axum::Router {
        let patterns = Arc::new(self.patterns);
        let mut app = axum::Router::new();

        for route in self.literals {
            let path = Arc::new(route.path);
            let mut method_router: MethodRouter = MethodRouter::new();
            for (method, candidates) in route.methods {
                let candidates = Arc::new(candidates);
                let path = path.clone();
                method_router = method_router.on(
                    method_filter(method),
                    move |params: Result<RawPathParams, RawPathParamsRejection>,
                          request: Request<Body>| {
                        let params: RouteParams = params
                            .map(|params| {
                                params
                                    .iter()
                                    .map(|(k, v)| (k.to_string(), v.to_string()))
                                    .collect()
                            })
                            .unwrap_or_default();
                        dispatch(&candidates, method, &path, params, request)
                    },
                );
            }
            let fallback = patterns.clone();
            method_router = method_router.fallback(move |request: Request<Body>| {
                dispatch_pattern(&fallback, request, true)
            });
            app = app.route(&axum_path(&path), method_router);
        }

        app.fallback(move |request: Request<Body>| dispatch_pattern(&patterns, request, false))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// Serve on `listener` until `shutdown` resolves.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.into_router())
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Reserve a literal path in the matcher unless it is already bound.
    fn claim_literal(&mut self, path: &str) -> Result<(), ServerError> {
        if self.literals.iter().any(|route| route.path == path) {
            return Ok(());
        }
        self.matcher
            .insert(axum_path(path), ())
            .map_err(|source| ServerError::InvalidRoute {
                path: path.to_string(),
                source,
            })
    }

    fn literal_slot(&mut self, method: Method, path: String) -> &mut Candidates {
        let index = match self.literals.iter().position(|route| route.path == path) {
            Some(index) => index,
            None => {
                self.literals.push(LiteralRoute {
                    path,
                    methods: BTreeMap::new(),
                });
                self.literals.len() - 1
            }
        };
        self.literals[index].methods.entry(method).or_default()
    }

    fn pattern_slot(&mut self, method: Method, pattern: Pattern) -> &mut Candidates {
        let index = match self
            .patterns
            .iter()
            .position(|route| route.method == method && route.pattern == pattern)
        {
            Some(index) => index,
            None => {
                self.patterns.push(PatternRoute {
                    method,
                    pattern,
                    candidates: Candidates::default(),
                });
                self.patterns.len() - 1
            }
        };
        &mut self.patterns[index].candidates
    }
}

impl RouteServer<Handler> for HttpServer {
    type Error = ServerError;

    fn get(&mut self, target: RouteTarget, handler: Handler) -> Result<(), ServerError> {
        self.register(Method::Get, target, handler)
    }

    fn post(&mut self, target: RouteTarget, handler: Handler) -> Result<(), ServerError> {
        self.register(Method::Post, target, handler)
    }

    fn put(&mut self, target: RouteTarget, handler: Handler) -> Result<(), ServerError> {
        self.register(Method::Put, target, handler)
    }

    fn del(&mut self, target: RouteTarget, handler: Handler) -> Result<(), ServerError> {
        self.register(Method::Delete, target, handler)
    }

    fn patch(&mut self, target: RouteTarget, handler: Handler) -> Result<(), ServerError> {
        self.register(Method::Patch, target, handler)
    }

    fn head(&mut self, target: RouteTarget, handler: Handler) -> Result<(), ServerError> {
        self.register(Method::Head, target, handler)
    }

    fn opts(&mut self, target: RouteTarget, handler: Handler) -> Result<(), ServerError> {
        self.register(Method::Options, target, handler)
    }
}

fn method_filter(method: Method) -> MethodFilter {
    match method {
        Method::Get => MethodFilter::GET,
        Method::Post => MethodFilter::POST,
        Method::Put => MethodFilter::PUT,
        Method::Delete => MethodFilter::DELETE,
        Method::Patch => MethodFilter::PATCH,
        Method::Head => MethodFilter::HEAD,
        Method::Options => MethodFilter::OPTIONS,
    }
}

/// Hand the request to the handler its requested version selects.
fn dispatch(
    candidates: &Candidates,
    method: Method,
    path: &str,
    params: RouteParams,
    mut request: Request<Body>,
) -> BoxFuture<'static, Response> {
    let requested = match requested_version(request.headers()) {
        Ok(requested) => requested,
        Err(e) => {
            return ready((StatusCode::BAD_REQUEST, format!("invalid version: {}", e)));
        }
    };

    match candidates.select(&requested) {
        Some(handler) => {
            request.extensions_mut().insert(params);
            handler(request)
        }
        None => {
            tracing::debug!(method = %method, path = %path, requested = %requested, "No route for requested version");
            ready((
                StatusCode::BAD_REQUEST,
                format!(
                    "{} {} supports versions: {}",
                    method,
                    path,
                    candidates.versions().join(", ")
                ),
            ))
        }
    }
}

/// Try pattern routes in registration order.
///
/// `path_routed` is set when a literal route owns the path under other
/// methods.
fn dispatch_pattern(
    patterns: &[PatternRoute],
    request: Request<Body>,
    path_routed: bool,
) -> BoxFuture<'static, Response> {
    let path = request.uri().path().to_string();
    let found = request
        .method()
        .as_str()
        .parse::<Method>()
        .ok()
        .and_then(|method| match find_pattern(patterns, method, &path) {
            None if method == Method::Head => find_pattern(patterns, Method::Get, &path),
            found => found,
        });

    match found {
        Some((route, params)) => dispatch(&route.candidates, route.method, &path, params, request),
        None if path_routed || patterns.iter().any(|route| route.pattern.regex().is_match(&path)) => {
            ready(StatusCode::METHOD_NOT_ALLOWED)
        }
        None => ready(StatusCode::NOT_FOUND),
    }
}

fn find_pattern<'a>(
    patterns: &'a [PatternRoute],
    method: Method,
    path: &str,
) -> Option<(&'a PatternRoute, RouteParams)> {
    patterns
        .iter()
        .filter(|route| route.method == method)
        .find_map(|route| {
            let captures = route.pattern.regex().captures(path)?;
            Some((route, RouteParams::from_captures(route.pattern.regex(), &captures)))
        })
}

fn ready(response: impl IntoResponse) -> BoxFuture<'static, Response> {
    future::ready(response.into_response()).boxed()
}
