//! Shared utilities for integration tests.

#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{Request, Response};
use route_registry::{RouteServer, RouteTarget};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tower::ServiceExt;

/// A server that records every registration call it receives.
#[derive(Debug)]
pub struct RecordingServer<H> {
    /// `(verb, target, handler)` per call, in call order.
    pub calls: Vec<(&'static str, RouteTarget, H)>,
    /// Reject any route whose target displays as this string.
    pub reject: Option<String>,
}

impl<H> Default for RecordingServer<H> {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            reject: None,
        }
    }
}

/// Error returned by `RecordingServer` for rejected routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected(pub String);

impl<H> RecordingServer<H> {
    pub fn rejecting(target: &str) -> Self {
        Self {
            calls: Vec::new(),
            reject: Some(target.to_string()),
        }
    }

    /// `(verb, target display)` per call.
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        self.calls
            .iter()
            .map(|(verb, target, _)| (*verb, target.to_string()))
            .collect()
    }

    fn record(&mut self, verb: &'static str, target: RouteTarget, handler: H) -> Result<(), Rejected> {
        let shown = target.to_string();
        if self.reject.as_deref() == Some(shown.as_str()) {
            return Err(Rejected(shown));
        }
        self.calls.push((verb, target, handler));
        Ok(())
    }
}

impl<H> RouteServer<H> for RecordingServer<H> {
    type Error = Rejected;

    fn get(&mut self, target: RouteTarget, handler: H) -> Result<(), Rejected> {
        self.record("get", target, handler)
    }

    fn post(&mut self, target: RouteTarget, handler: H) -> Result<(), Rejected> {
        self.record("post", target, handler)
    }

    fn put(&mut self, target: RouteTarget, handler: H) -> Result<(), Rejected> {
        self.record("put", target, handler)
    }

    fn del(&mut self, target: RouteTarget, handler: H) -> Result<(), Rejected> {
        self.record("del", target, handler)
    }

    fn patch(&mut self, target: RouteTarget, handler: H) -> Result<(), Rejected> {
        self.record("patch", target, handler)
    }

    fn head(&mut self, target: RouteTarget, handler: H) -> Result<(), Rejected> {
        self.record("head", target, handler)
    }

    fn opts(&mut self, target: RouteTarget, handler: H) -> Result<(), Rejected> {
        self.record("opts", target, handler)
    }
}

/// Send one request through an axum router in-process.
pub async fn send(app: &axum::Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

/// Collect a response body as UTF-8.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Issue a raw HTTP/1.1 GET over TCP and return the full response text.
pub async fn raw_get(addr: std::net::SocketAddr, path: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!(
        "GET {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        path
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    response
}
