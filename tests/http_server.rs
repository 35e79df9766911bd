//! End-to-end routing through the axum-backed server.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use regex::Regex;
use route_registry::http::{handler, Handler, HttpServer, RouteParams, ServerError, X_REQUEST_ID};
use route_registry::{RouteDescriptor, Router};

mod common;

use common::{body_text, send};

fn build(routes: &Router<Handler>, prefix: &str) -> axum::Router {
    let mut server = HttpServer::new();
    routes.apply_routes(&mut server, prefix).unwrap();
    server.into_router()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Reads `{"name": ...}` from the body and answers with the name.
fn echo_name() -> Handler {
    handler(|req: Request<Body>| async move {
        let bytes = to_bytes(req.into_body(), 1024).await.unwrap_or_default();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap_or_default();
        value["name"].as_str().unwrap_or_default().to_string()
    })
}

#[tokio::test]
async fn test_simple_get() {
    let mut routes: Router<Handler> = Router::new();
    routes.get("/hello", handler(|_req| async { "Hello World" })).unwrap();
    let app = build(&routes, "");

    let response = send(&app, get("/hello")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "Hello World");
}

#[tokio::test]
async fn test_get_with_prefix() {
    let mut routes: Router<Handler> = Router::new();
    routes.get("/world", handler(|_req| async { "Hello World" })).unwrap();
    let app = build(&routes, "/hello");

    let response = send(&app, get("/hello/world")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "Hello World");

    let response = send(&app, get("/world")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_regex_get() {
    let mut routes: Router<Handler> = Router::new();
    routes
        .get(
            Regex::new(r"^/([a-zA-Z0-9_\.~-]+)/(.*)").unwrap(),
            handler(|req: Request<Body>| async move {
                let params = RouteParams::of(&req);
                format!(
                    "{}-{}",
                    params.get("0").unwrap_or_default(),
                    params.get("1").unwrap_or_default()
                )
            }),
        )
        .unwrap();
    let app = build(&routes, "");

    let response = send(&app, get("/hello/test")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "hello-test");
}

#[tokio::test]
async fn test_regex_ignores_prefix() {
    let mut routes: Router<Handler> = Router::new();
    routes
        .get(Regex::new(r"^/files/(.+)$").unwrap(), handler(|_req| async { "file" }))
        .unwrap();
    let app = build(&routes, "/api");

    assert_eq!(send(&app, get("/files/a.txt")).await.status(), StatusCode::OK);
    assert_eq!(send(&app, get("/api/files/a.txt")).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_regex_wrong_method() {
    let mut routes: Router<Handler> = Router::new();
    routes
        .get(Regex::new(r"^/only-get$").unwrap(), handler(|_req| async { "ok" }))
        .unwrap();
    let app = build(&routes, "");

    let response = send(&app, json_request("POST", "/only-get", "{}")).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_pattern_reachable_behind_literal_path() {
    let mut routes: Router<Handler> = Router::new();
    routes.get("/x", handler(|_req| async { "literal get" })).unwrap();
    routes
        .post(Regex::new(r"^/x$").unwrap(), handler(|_req| async { "pattern post" }))
        .unwrap();
    let app = build(&routes, "");

    let response = send(&app, get("/x")).await;
    assert_eq!(body_text(response).await, "literal get");

    let response = send(&app, json_request("POST", "/x", "{}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "pattern post");

    // The literal path still owns the route for methods nobody handles.
    let response = send(&app, json_request("PUT", "/x", "{}")).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_head_served_by_get_routes() {
    let mut routes: Router<Handler> = Router::new();
    routes.get("/literal", handler(|_req| async { "literal" })).unwrap();
    routes
        .get(Regex::new(r"^/pattern/(.+)$").unwrap(), handler(|_req| async { "pattern" }))
        .unwrap();
    let app = build(&routes, "");

    for uri in ["/literal", "/pattern/a"] {
        let request = Request::builder()
            .method("HEAD")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = send(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK, "HEAD {uri}");
    }
}

#[tokio::test]
async fn test_post_put_patch_bodies() {
    let mut routes: Router<Handler> = Router::new();
    routes.post("/postme", echo_name()).unwrap();
    routes.put("/puttme", echo_name()).unwrap();
    routes.patch("/patchme", echo_name()).unwrap();
    let app = build(&routes, "");

    for (method, uri) in [("POST", "/postme"), ("PUT", "/puttme"), ("PATCH", "/patchme")] {
        let response = send(&app, json_request(method, uri, r#"{"name":"test"}"#)).await;
        assert_eq!(response.status(), StatusCode::OK, "{method} {uri}");
        assert_eq!(body_text(response).await, "test");
    }
}

#[tokio::test]
async fn test_delete_with_param() {
    let mut routes: Router<Handler> = Router::new();
    routes
        .del(
            "/deleteme/:id",
            handler(|req: Request<Body>| async move {
                RouteParams::of(&req).get("id").unwrap_or_default().to_string()
            }),
        )
        .unwrap();
    let app = build(&routes, "");

    let request = Request::builder()
        .method("DELETE")
        .uri("/deleteme/2")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "2");
}

#[tokio::test]
async fn test_head() {
    let mut routes: Router<Handler> = Router::new();
    routes
        .head(
            "/head",
            handler(|_req| async { (StatusCode::OK, [("x-test", "testing")]) }),
        )
        .unwrap();
    let app = build(&routes, "");

    let request = Request::builder()
        .method("HEAD")
        .uri("/head")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-test"], "testing");
}

#[tokio::test]
async fn test_options() {
    let mut routes: Router<Handler> = Router::new();
    routes
        .opts(
            "/opts",
            handler(|_req| async { (StatusCode::OK, [(header::ALLOW, "GET,POST,OPTIONS")]) }),
        )
        .unwrap();
    let app = build(&routes, "");

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/opts")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::ALLOW], "GET,POST,OPTIONS");
}

#[tokio::test]
async fn test_named_route() {
    let mut routes: Router<Handler> = Router::new();
    routes
        .get(
            RouteDescriptor::new("/hello").name("hello"),
            handler(|_req| async { "Hello World" }),
        )
        .unwrap();

    let mut server = HttpServer::new();
    routes.apply_routes(&mut server, "/v").unwrap();
    assert_eq!(server.route_path("hello"), Some("/v/hello"));

    let app = server.into_router();
    let response = send(&app, get("/v/hello")).await;
    assert_eq!(body_text(response).await, "Hello World");
}

fn versioned_routes() -> Router<Handler> {
    let mut routes: Router<Handler> = Router::new();
    routes
        .get(
            RouteDescriptor::new("/hello").version("1.0.0"),
            handler(|_req| async { "1.0.0" }),
        )
        .unwrap();
    routes
        .get(
            RouteDescriptor::new("/hello").version("2.0.0"),
            handler(|_req| async { "2.0.0" }),
        )
        .unwrap();
    routes
}

fn with_version(uri: &str, range: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("accept-version", range)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_versioned_routes() {
    let app = build(&versioned_routes(), "");

    let response = send(&app, with_version("/hello", "~2")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "2.0.0");

    let response = send(&app, with_version("/hello", "~1")).await;
    assert_eq!(body_text(response).await, "1.0.0");

    let response = send(&app, get("/hello")).await;
    assert_eq!(body_text(response).await, "2.0.0");
}

#[tokio::test]
async fn test_unsupported_version() {
    let app = build(&versioned_routes(), "");

    let response = send(&app, with_version("/hello", "~3")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_text(response).await,
        "GET /hello supports versions: 1.0.0, 2.0.0"
    );

    let response = send(&app, with_version("/hello", "garbage")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_request_id_assigned() {
    let mut routes: Router<Handler> = Router::new();
    routes.get("/id", handler(|_req| async { "ok" })).unwrap();
    let app = build(&routes, "");

    let response = send(&app, get("/id")).await;
    assert!(response.headers().contains_key(X_REQUEST_ID));

    let request = Request::builder()
        .uri("/id")
        .header(X_REQUEST_ID, "given-id")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.headers()[X_REQUEST_ID], "given-id");
}

#[test]
fn test_applying_twice_is_rejected_by_server() {
    let mut routes: Router<Handler> = Router::new();
    routes.get("/once", handler(|_req| async { "ok" })).unwrap();

    let mut server = HttpServer::new();
    routes.apply(&mut server).unwrap();
    let err = routes.apply(&mut server).unwrap_err();
    assert!(matches!(err, ServerError::Conflict { .. }));
}

#[test]
fn test_clashing_param_names_fail_at_apply() {
    let mut routes: Router<Handler> = Router::new();
    routes.get("/items/:id", handler(|_req| async { "get" })).unwrap();
    routes.del("/items/:key", handler(|_req| async { "del" })).unwrap();

    let mut server = HttpServer::new();
    let err = routes.apply(&mut server).unwrap_err();
    assert!(matches!(err, ServerError::InvalidRoute { .. }));

    // What was bound before the failure still builds.
    server.into_router();
}

#[test]
fn test_invalid_version_surfaces_at_apply() {
    let mut routes: Router<Handler> = Router::new();
    routes
        .get(
            RouteDescriptor::new("/v").version("latest"),
            handler(|_req| async { "ok" }),
        )
        .unwrap();

    let mut server = HttpServer::new();
    let err = routes.apply(&mut server).unwrap_err();
    assert!(matches!(err, ServerError::InvalidVersion { .. }));
}
