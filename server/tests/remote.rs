//! Routes served by `RemoteStore` against the mock upstream.
//!
//! Each test starts its own upstream on an ephemeral port so tables are
//! never shared between tests.

use std::sync::Arc;

use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use mock_upstream::{Row, Upstream};
use todo_core::Todo;
use todo_server::{app, RemoteStore, SharedStore};
use tokio::net::TcpListener;
use tower::ServiceExt;

const KEY: &str = "service-role";

async fn spawn_upstream(upstream: Upstream) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_upstream::run(listener, upstream));
    format!("http://{addr}")
}

async fn remote_app(upstream: &Upstream, api_key: &str) -> axum::Router {
    let base_url = spawn_upstream(upstream.clone()).await;
    let store: SharedStore = Arc::new(RemoteStore::new(&base_url, api_key));
    app(store)
}

async fn send(app: &axum::Router, method: &str, uri: &str, body: &str) -> axum::response::Response {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.to_string())
        .unwrap();
    app.clone().oneshot(req).await.unwrap()
}

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn remote_scenario() {
    let upstream = Upstream::new(KEY);
    let app = remote_app(&upstream, KEY).await;

    let resp = send(&app, "GET", "/todos", "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let todos: Vec<Todo> = body_json(resp).await;
    assert!(todos.is_empty());

    let resp = send(&app, "POST", "/todos", r#"{"text":"buy milk","completed":false}"#).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let created: Todo = body_json(resp).await;
    assert_eq!(created, Todo::new(1, "buy milk", false));

    let resp = send(&app, "PATCH", "/todos/1/toggle", "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let toggled: Todo = body_json(resp).await;
    assert_eq!(toggled, Todo::new(1, "buy milk", true));
    assert_eq!(
        upstream.rows().await,
        vec![Row {
            id: 1,
            text: "buy milk".to_string(),
            completed: true
        }]
    );

    let resp = send(&app, "PUT", "/todos/1", r#"{"text":"buy oat milk","completed":false}"#).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Todo = body_json(resp).await;
    assert_eq!(updated, Todo::new(1, "buy oat milk", false));

    let resp = send(&app, "GET", "/todos", "").await;
    let todos: Vec<Todo> = body_json(resp).await;
    assert_eq!(todos, vec![updated]);

    let resp = send(&app, "DELETE", "/todos/1", "").await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(upstream.rows().await.is_empty());
}

// The upstream upserts on PUT, so a missing id must not be written back.
#[tokio::test]
async fn remote_missing_ids_are_not_found() {
    let upstream = Upstream::new(KEY);
    let app = remote_app(&upstream, KEY).await;

    let resp = send(&app, "PUT", "/todos/5", r#"{"text":"ghost","completed":true}"#).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(resp).await, "Todo not found");

    let resp = send(&app, "PATCH", "/todos/5/toggle", "").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = send(&app, "DELETE", "/todos/5", "").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    assert!(upstream.rows().await.is_empty());
}

// An upstream that answers writes without rows cannot tell a missing id
// from a successful delete. Update and toggle read first, so they still do.
#[tokio::test]
async fn remote_without_echo_cannot_detect_missing_deletes() {
    let upstream = Upstream::new(KEY).minimal();
    let app = remote_app(&upstream, KEY).await;

    let resp = send(&app, "DELETE", "/todos/5", "").await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = send(&app, "PUT", "/todos/5", r#"{"text":"ghost","completed":true}"#).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = send(&app, "PATCH", "/todos/5/toggle", "").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    assert!(upstream.rows().await.is_empty());
}

#[tokio::test]
async fn remote_update_without_echo_returns_submitted_record() {
    let upstream = Upstream::new(KEY).minimal();
    let app = remote_app(&upstream, KEY).await;

    send(&app, "POST", "/todos", r#"{"text":"draft"}"#).await;
    let resp = send(&app, "PUT", "/todos/1", r#"{"text":"final","completed":true}"#).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let echoed: Todo = body_json(resp).await;
    assert_eq!(echoed, Todo::new(1, "final", true));
    assert_eq!(
        upstream.rows().await,
        vec![Row {
            id: 1,
            text: "final".to_string(),
            completed: true
        }]
    );
}

#[tokio::test]
async fn remote_create_without_echo_returns_zero_value() {
    let upstream = Upstream::new(KEY).minimal();
    let app = remote_app(&upstream, KEY).await;

    let resp = send(&app, "POST", "/todos", r#"{"text":"quiet","completed":true}"#).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let todo: Todo = body_json(resp).await;
    assert_eq!(todo, Todo::default());
    assert_eq!(upstream.rows().await.len(), 1);
}

#[tokio::test]
async fn rejected_api_key_returns_500() {
    let upstream = Upstream::new(KEY);
    let app = remote_app(&upstream, "wrong-key").await;

    let resp = send(&app, "GET", "/todos", "").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(resp).await, "Failed to fetch todos");
}

#[tokio::test]
async fn unreachable_upstream_returns_500() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let store: SharedStore = Arc::new(RemoteStore::new(&format!("http://{addr}"), KEY));
    let app = app(store);

    let resp = send(&app, "POST", "/todos", r#"{"text":"lost"}"#).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(resp).await, "Failed to create todo");

    let resp = send(&app, "DELETE", "/todos/1", "").await;
    assert_eq!(body_text(resp).await, "Failed to delete todo");
}

#[tokio::test]
async fn invalid_input_never_reaches_upstream() {
    let upstream = Upstream::new(KEY);
    let app = remote_app(&upstream, KEY).await;

    let resp = send(&app, "PUT", "/todos/abc", r#"{"text":"y","completed":true}"#).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = send(&app, "POST", "/todos", "not json").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    assert!(upstream.rows().await.is_empty());
}
