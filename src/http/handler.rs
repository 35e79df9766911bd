//! Request handlers bound by `HttpServer`.

use std::future::Future;
use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::{IntoResponse, Response};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;

/// A type-erased, cheaply cloneable request handler.
pub type Handler = Arc<dyn Fn(Request<Body>) -> BoxFuture<'static, Response> + Send + Sync>;

/// Wrap an async function into a `Handler`.
///
/// Path parameters captured for the route are available through
/// [`RouteParams`](crate::http::RouteParams) in the request extensions.
pub fn handler<F, Fut, R>(f: F) -> Handler
where
    F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + 'static,
{
    Arc::new(move |request| f(request).map(IntoResponse::into_response).boxed())
}
