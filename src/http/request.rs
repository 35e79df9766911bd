//! Request metadata helpers.
//!
//! # Design Decisions
//! - Request IDs are assigned by middleware before any handler runs and
//!   echoed back on the response
//! - Handlers read them through `RequestIdExt` rather than the raw header

use axum::body::Body;
use axum::http::Request;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Access to the request ID assigned by the server.
pub trait RequestIdExt {
    fn request_id(&self) -> Option<&str>;
}

impl RequestIdExt for Request<Body> {
    fn request_id(&self) -> Option<&str> {
        self.headers()
            .get(X_REQUEST_ID)
            .and_then(|value| value.to_str().ok())
    }
}
