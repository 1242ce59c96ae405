//! HTTP 路由集成测试

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use booking_backend::build_router;
use crate::common::{create_test_app_state, issue_token};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn send(app: Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();
    (status, headers, body)
}

fn graphql_post(query: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/graphql")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder
        .body(Body::from(json!({ "query": query }).to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_serves_qr_code_with_mime_type() {
    let (state, _temp_dir) = create_test_app_state().await;
    std::fs::write(state.config.qr_codes_dir.join("route-1.png"), b"\x89PNG fake").unwrap();
    std::fs::write(state.config.qr_codes_dir.join("route-1.PNG"), b"upper").unwrap();
    let app = build_router(state);

    let (status, headers, body) = send(
        app.clone(),
        Request::get("/assets/qr-codes/route-1.png").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "image/png");
    assert_eq!(body, b"\x89PNG fake");

    let (status, headers, _) = send(
        app,
        Request::get("/assets/qr-codes/route-1.PNG").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "application/octet-stream");
}

#[tokio::test]
async fn test_qr_code_errors() {
    let (state, _temp_dir) = create_test_app_state().await;
    let app = build_router(state);

    let (status, _, _) = send(
        app.clone(),
        Request::get("/assets/qr-codes/missing.png").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, body) = send(
        app,
        Request::get("/assets/qr-codes/..%2Fsecret.png").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_graphql_endpoint_creates_feedback() {
    let (state, _temp_dir) = create_test_app_state().await;
    let app = build_router(state);

    let (status, _, body) = send(
        app,
        graphql_post(
            r#"mutation { createFeedback(input: { reason: "bug", replyTo: "a@b.com", message: "broken" }) { reason replyTo message } }"#,
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        body["data"]["createFeedback"],
        json!({ "reason": "bug", "replyTo": "a@b.com", "message": "broken" })
    );
}

#[tokio::test]
async fn test_graphql_reads_access_token_cookie() {
    let (state, _temp_dir) = create_test_app_state().await;
    let token = issue_token(&state.db, "user-1", None).await;
    let app = build_router(state);

    let cookie = format!("theme=dark; accessToken={}", token);
    let (_, _, body) = send(app.clone(), graphql_post("{ myBookings { id } }", Some(&cookie))).await;
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["data"]["myBookings"], json!([]));

    let (_, _, body) = send(app, graphql_post("{ myBookings { id } }", None)).await;
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["errors"][0]["extensions"]["code"], "AUTHENTICATION_REQUIRED");
}

#[tokio::test]
async fn test_sign_out_sets_removal_cookie() {
    let (state, _temp_dir) = create_test_app_state().await;
    let token = issue_token(&state.db, "user-1", None).await;
    let app = build_router(state);

    let cookie = format!("accessToken={}", token);
    let (status, headers, _) = send(app, graphql_post("mutation { signOut }", Some(&cookie))).await;
    assert_eq!(status, StatusCode::OK);

    let set_cookie = headers[header::SET_COOKIE].to_str().unwrap();
    assert!(set_cookie.starts_with("accessToken="));
    assert!(set_cookie.contains("SameSite=Lax"));
    // 开发环境不带 Secure
    assert!(!set_cookie.contains("Secure"));
}

#[tokio::test]
async fn test_graphiql_and_health() {
    let (state, _temp_dir) = create_test_app_state().await;
    let app = build_router(state);

    let (status, headers, _) = send(
        app.clone(),
        Request::get("/graphql").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/html"));

    let (status, _, body) = send(app, Request::get("/api/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_stream_endpoint_requires_websocket_upgrade() {
    let (state, _temp_dir) = create_test_app_state().await;
    let app = build_router(state);

    let (status, _, _) = send(
        app,
        Request::get("/graphql/stream").body(Body::empty()).unwrap(),
    )
    .await;
    assert!(status.is_client_error(), "unexpected status {}", status);
    assert_ne!(status, StatusCode::NOT_FOUND);
}
