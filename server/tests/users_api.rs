//! Router tests for the mock users resource.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use umapp_server::{create_app, seed, AppState};

fn app() -> Router {
    create_app(AppState::new(seed::default_users()))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let (status, body) = send(app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["users"], 10);
}

#[tokio::test]
async fn index_counts_the_served_users() {
    let users = seed::default_users().into_iter().take(3).collect();
    let (status, body) = send(create_app(AppState::new(users)), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["users"], 3);
    assert_eq!(body["resources"], json!(["/users", "/users/{id}"]));
}

#[tokio::test]
async fn list_returns_seed() {
    let (status, body) = send(app(), get("/users")).await;
    assert_eq!(status, StatusCode::OK);

    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 10);
    assert_eq!(users[0]["id"], 1);
    assert_eq!(users[0]["name"], "Leanne Graham");
}

#[tokio::test]
async fn get_known_and_unknown_user() {
    let (status, body) = send(app(), get("/users/3")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Clementine Bauch");

    let (status, body) = send(app(), get("/users/99")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("99"));
}

#[tokio::test]
async fn create_echoes_with_next_id() {
    let request = json_request(
        "POST",
        "/users",
        json!({"name": "Bob", "email": "b@x.com", "phone": "1"}),
    );
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({"id": 11, "name": "Bob", "email": "b@x.com", "phone": "1"})
    );
}

#[tokio::test]
async fn create_with_malformed_body_is_bad_request() {
    let request = Request::builder()
        .method("POST")
        .uri("/users")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn writes_are_not_persisted() {
    let app = app();

    let update = json_request(
        "PUT",
        "/users/1",
        json!({"name": "Changed", "email": "c@x.com", "phone": "2"}),
    );
    let (status, body) = send(app.clone(), update).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
    assert_eq!(body["name"], "Changed");

    let delete = Request::builder()
        .method("DELETE")
        .uri("/users/2")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app.clone(), delete).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));

    let (_, body) = send(app, get("/users")).await;
    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 10);
    assert_eq!(users[0]["name"], "Leanne Graham");
    assert_eq!(users[1]["id"], 2);
}

#[tokio::test]
async fn update_of_unknown_id_is_echoed() {
    let update = json_request(
        "PUT",
        "/users/1700000000000",
        json!({"name": "Local", "email": "l@x.com", "phone": "3"}),
    );
    let (status, body) = send(app(), update).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1700000000000u64);
}
