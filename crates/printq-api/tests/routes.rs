//! Router tests over the in-memory stores.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use printq_api::{AppState, build_app};
use printq_core::config::{
    AppConfig, AuthConfig, DatabaseConfig, LoggingConfig, QueueConfig, ServerConfig,
};
use printq_core::types::UnitId;
use printq_database::{MemoryJobStore, MemoryUserStore};

const API_KEY: &str = "producer-test-key";

fn test_config() -> AppConfig {
    AppConfig {
        environment: "test".to_string(),
        server: ServerConfig::default(),
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 1,
            min_connections: 0,
            connect_timeout_seconds: 1,
            idle_timeout_seconds: 1,
        },
        auth: AuthConfig {
            jwt_secret: "router-test-secret".to_string(),
            token_ttl_hours: 24,
            producer_api_key: API_KEY.to_string(),
        },
        queue: QueueConfig::default(),
        logging: LoggingConfig::default(),
    }
}

/// App plus a handle to the state for provisioning accounts.
async fn test_app() -> (Router, AppState) {
    let config = test_config();
    let state = AppState::new(
        config.clone(),
        Arc::new(MemoryJobStore::new()),
        Arc::new(MemoryUserStore::new()),
    );
    for (name, unit) in [("unit-one", 1), ("unit-two", 2)] {
        state
            .auth
            .create_user(name, "secret", UnitId::from(unit))
            .await
            .unwrap();
    }
    (build_app(state.clone(), &config.server.cors), state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn enqueue_request(unit: i64, job_data: Value) -> Request<Body> {
    let mut request = post_json("/jobs/new", json!({"unit_id": unit, "job_data": job_data}));
    request
        .headers_mut()
        .insert("x-api-key", API_KEY.parse().unwrap());
    request
}

fn authed(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

async fn login(app: &Router, username: &str) -> String {
    let (status, body) = send(
        app,
        post_json("/login", json!({"username": username, "password": "secret"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

async fn enqueue(app: &Router, unit: i64, job_data: Value) -> i64 {
    let (status, body) = send(app, enqueue_request(unit, job_data)).await;
    assert_eq!(status, StatusCode::CREATED);
    body["jobId"].as_i64().unwrap()
}

#[tokio::test]
async fn test_root_reports_online() {
    let (app, _) = test_app().await;
    let (status, body) = send(&app, Request::get("/").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "online");
}

#[tokio::test]
async fn test_health_reports_store() {
    let (app, _) = test_app().await;
    let (status, body) = send(&app, Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_login_failures() {
    let (app, _) = test_app().await;

    let (status, _) = send(&app, post_json("/login", json!({"username": "unit-one"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        post_json("/login", json!({"username": "unit-one", "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_enqueue_requires_api_key() {
    let (app, _) = test_app().await;

    let request = post_json("/jobs/new", json!({"unit_id": 1, "job_data": {"a": 1}}));
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let mut request = post_json("/jobs/new", json!({"unit_id": 1, "job_data": {"a": 1}}));
    request
        .headers_mut()
        .insert("x-api-key", "wrong".parse().unwrap());
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_enqueue_rejects_bad_job_data() {
    let (app, _) = test_app().await;
    for job_data in [json!({}), json!("text"), json!([1, 2]), Value::Null] {
        let (status, body) = send(&app, enqueue_request(1, job_data)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn test_consumer_routes_need_a_token() {
    let (app, _) = test_app().await;

    let (status, _) = send(&app, Request::get("/jobs/next").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, authed("GET", "/jobs/next", "garbage")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "FORBIDDEN");
}

#[tokio::test]
async fn test_claim_complete_lifecycle() {
    let (app, _) = test_app().await;
    let token = login(&app, "unit-one").await;
    let job_id = enqueue(&app, 1, json!({"orderId": "A1"})).await;

    let (status, job) = send(&app, authed("GET", "/jobs/next", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(job["id"], job_id);
    assert_eq!(job["status"], "processing");
    assert_eq!(job["job_data"], json!({"orderId": "A1"}));

    let (status, body) = send(&app, authed("GET", "/jobs/next", &token)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let uri = format!("/jobs/{job_id}/complete");
    let (status, _) = send(&app, authed("POST", &uri, &token)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, authed("POST", &uri, &token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_concurrent_claims_over_http() {
    let (app, _) = test_app().await;
    let token = login(&app, "unit-one").await;
    let job_id = enqueue(&app, 1, json!({"orderId": "A1"})).await;

    let (a, b) = tokio::join!(
        send(&app, authed("GET", "/jobs/next", &token)),
        send(&app, authed("GET", "/jobs/next", &token)),
    );
    let mut statuses = [a.0.as_u16(), b.0.as_u16()];
    statuses.sort_unstable();
    assert_eq!(statuses, [200, 204]);

    let winner = if a.0 == StatusCode::OK { a.1 } else { b.1 };
    assert_eq!(winner["id"], job_id);
}

#[tokio::test]
async fn test_reprint_after_completion() {
    let (app, _) = test_app().await;
    let token = login(&app, "unit-one").await;
    let original = enqueue(&app, 1, json!({"orderId": "A1"})).await;
    send(&app, authed("GET", "/jobs/next", &token)).await;
    send(&app, authed("POST", &format!("/jobs/{original}/complete"), &token)).await;

    let (_, before) = send(&app, authed("GET", &format!("/jobs/{original}"), &token)).await;

    let (status, body) = send(
        &app,
        authed("POST", &format!("/jobs/{original}/reprint"), &token),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let copy_id = body["jobId"].as_i64().unwrap();
    assert_ne!(copy_id, original);

    let (_, copy) = send(&app, authed("GET", &format!("/jobs/{copy_id}"), &token)).await;
    assert_eq!(copy["status"], "pending");
    assert_eq!(copy["job_data"], json!({"orderId": "A1", "reprintOf": original}));

    let (_, after) = send(&app, authed("GET", &format!("/jobs/{original}"), &token)).await;
    assert_eq!(after, before);
    assert_eq!(after["status"], "completed");
}

#[tokio::test]
async fn test_units_are_isolated() {
    let (app, _) = test_app().await;
    let one = login(&app, "unit-one").await;
    let two = login(&app, "unit-two").await;
    let job_id = enqueue(&app, 2, json!({"orderId": "B1"})).await;

    let (status, _) = send(&app, authed("GET", "/jobs/next", &one)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    for uri in [format!("/jobs/{job_id}"), format!("/jobs/{job_id}/reprint")] {
        let method = if uri.ends_with("reprint") { "POST" } else { "GET" };
        let (status, _) = send(&app, authed(method, &uri, &one)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    let (_, history) = send(&app, authed("GET", "/jobs/history", &one)).await;
    assert_eq!(history, json!([]));

    let (status, job) = send(&app, authed("GET", "/jobs/next", &two)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(job["id"], job_id);

    // Unit one cannot finish unit two's job even while it is processing.
    let (status, _) = send(
        &app,
        authed("POST", &format!("/jobs/{job_id}/complete"), &one),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_history_limit_and_order() {
    let (app, _) = test_app().await;
    let token = login(&app, "unit-one").await;
    let mut ids = Vec::new();
    for n in 0..3 {
        ids.push(enqueue(&app, 1, json!({"n": n})).await);
    }

    let (status, history) = send(&app, authed("GET", "/jobs/history?limit=2", &token)).await;
    assert_eq!(status, StatusCode::OK);
    let listed: Vec<i64> = history
        .as_array()
        .unwrap()
        .iter()
        .map(|job| job["id"].as_i64().unwrap())
        .collect();
    assert_eq!(listed, vec![ids[2], ids[1]]);

    for bad in ["0", "101", "abc"] {
        let (status, _) = send(
            &app,
            authed("GET", &format!("/jobs/history?limit={bad}"), &token),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_non_numeric_job_id_is_bad_request() {
    let (app, _) = test_app().await;
    let token = login(&app, "unit-one").await;

    for (method, uri) in [
        ("POST", "/jobs/abc/complete"),
        ("POST", "/jobs/abc/reprint"),
        ("GET", "/jobs/abc"),
    ] {
        let (status, _) = send(&app, authed(method, uri, &token)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
