//! Integration tests for the REST surface.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;
use uuid::Uuid;

use crate::api::rate_limit::RateLimiter;
use crate::api::{AppState, build_router};
use crate::auth::TokenValidator;
use crate::db::SqliteDatabase;

const SECRET: &str = "test-secret";

async fn test_app_with_limit(max_requests: u32) -> (axum::Router, String) {
    let db = SqliteDatabase::in_memory().await.unwrap();
    db.migrate().await.unwrap();

    let validator = TokenValidator::new(SECRET);
    let credential = validator.issue(Uuid::new_v4(), 3600).unwrap();

    let state = AppState::new(
        Arc::new(db),
        validator,
        Arc::new(RateLimiter::new(max_requests, 60)),
    );
    (
        build_router(state, CancellationToken::new()),
        format!("Bearer {credential}"),
    )
}

async fn test_app() -> (axum::Router, String) {
    test_app_with_limit(0).await
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

fn json_request(method: &str, uri: &str, auth: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", auth)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn get_request(uri: &str, auth: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("authorization", auth)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn health_is_public() {
    let (app, _) = test_app().await;

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_credential_is_unauthorized() {
    let (app, _) = test_app().await;

    let response = app
        .oneshot(Request::builder().uri("/tasks").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "authentication_error");
}

#[tokio::test(flavor = "multi_thread")]
async fn expired_credential_is_unauthorized() {
    let (app, _) = test_app().await;
    let expired = TokenValidator::new(SECRET)
        .issue(Uuid::new_v4(), -3600)
        .unwrap();

    let response = app
        .oneshot(get_request("/tasks", &format!("Bearer {expired}")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test(flavor = "multi_thread")]
async fn task_crud_round_trip() {
    let (app, auth) = test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/tasks",
            &auth,
            json!({ "title": "Buy milk", "description": "2 liters" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = json_body(response).await;
    let task_id = created["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(get_request(&format!("/tasks/{task_id}"), &auth))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/tasks/{task_id}"),
            &auth,
            json!({ "title": "Buy oat milk" }),
        ))
        .await
        .unwrap();
    let updated = json_body(response).await;
    assert_eq!(updated["title"], "Buy oat milk");
    assert_eq!(updated["description"], "2 liters");

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/tasks/{task_id}/complete"),
            &auth,
            json!({}),
        ))
        .await
        .unwrap();
    let completed = json_body(response).await;
    assert_eq!(completed["is_completed"], true);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/tasks/{task_id}"))
                .header("authorization", &auth)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let deleted = json_body(response).await;
    assert_eq!(deleted["deleted"], true);

    let response = app
        .oneshot(get_request(&format!("/tasks/{task_id}"), &auth))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread")]
async fn list_supports_query_filters() {
    let (app, auth) = test_app().await;

    for title in ["a", "b", "c"] {
        app.clone()
            .oneshot(json_request(
                "POST",
                "/tasks",
                &auth,
                json!({ "title": title }),
            ))
            .await
            .unwrap();
    }

    let response = app
        .clone()
        .oneshot(get_request("/tasks?page=2&page_size=2", &auth))
        .await
        .unwrap();
    let page = json_body(response).await;
    assert_eq!(page["total"], 3);
    assert_eq!(page["total_pages"], 2);
    assert_eq!(page["items"].as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(get_request("/tasks?completed=true", &auth))
        .await
        .unwrap();
    let page = json_body(response).await;
    assert_eq!(page["total"], 0);

    let response = app
        .oneshot(get_request("/tasks?page=0", &auth))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test(flavor = "multi_thread")]
async fn validation_error_shape() {
    let (app, auth) = test_app().await;

    let response = app
        .oneshot(json_request("POST", "/tasks", &auth, json!({ "title": " " })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "validation_error");
}

#[tokio::test(flavor = "multi_thread")]
async fn cross_owner_task_is_not_found() {
    let (app, auth) = test_app().await;
    let stranger = TokenValidator::new(SECRET)
        .issue(Uuid::new_v4(), 3600)
        .unwrap();
    let stranger_auth = format!("Bearer {stranger}");

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/tasks",
            &auth,
            json!({ "title": "private" }),
        ))
        .await
        .unwrap();
    let created = json_body(response).await;
    let task_id = created["id"].as_str().unwrap();

    let response = app
        .oneshot(get_request(&format!("/tasks/{task_id}"), &stranger_auth))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test(flavor = "multi_thread")]
async fn conversation_round_trip() {
    let (app, auth) = test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/conversations",
            &auth,
            json!({ "title": "Groceries" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let conversation = json_body(response).await;
    let conversation_id = conversation["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/conversations/{conversation_id}/messages"),
            &auth,
            json!({ "role": "user", "content": "add milk" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(get_request(
            &format!("/conversations/{conversation_id}"),
            &auth,
        ))
        .await
        .unwrap();
    let detail = json_body(response).await;
    assert_eq!(detail["messages"].as_array().unwrap().len(), 1);
    assert_eq!(detail["messages"][0]["content"], "add milk");

    let response = app
        .oneshot(get_request("/conversations", &auth))
        .await
        .unwrap();
    let list = json_body(response).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn message_append_is_rate_limited() {
    let (app, auth) = test_app_with_limit(2).await;

    let response = app
        .clone()
        .oneshot(json_request("POST", "/conversations", &auth, json!({})))
        .await
        .unwrap();
    let conversation = json_body(response).await;
    let uri = format!(
        "/conversations/{}/messages",
        conversation["id"].as_str().unwrap()
    );

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &uri,
                &auth,
                json!({ "role": "user", "content": "hi" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &uri,
            &auth,
            json!({ "role": "user", "content": "one too many" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key("retry-after"));
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "rate_limited");

    // Unmetered routes still work for the same subject.
    let response = app
        .oneshot(get_request("/conversations", &auth))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test(flavor = "multi_thread")]
async fn rate_limit_is_per_subject() {
    let (app, auth) = test_app_with_limit(1).await;
    let other = TokenValidator::new(SECRET)
        .issue(Uuid::new_v4(), 3600)
        .unwrap();
    let other_auth = format!("Bearer {other}");

    for auth in [&auth, &other_auth] {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/conversations", auth, json!({})))
            .await
            .unwrap();
        let conversation = json_body(response).await;
        let uri = format!(
            "/conversations/{}/messages",
            conversation["id"].as_str().unwrap()
        );

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &uri,
                auth,
                json!({ "role": "user", "content": "hello" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
