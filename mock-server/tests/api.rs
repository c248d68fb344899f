use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Subscriber};
use serde_json::Value;
use tower::ServiceExt;

const KEY: &str = "test-key";
const URI: &str = "/api/v1/subscribers";

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn subscribe_request(token: &str, body: &str) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri(URI)
        .header(http::header::CONTENT_TYPE, "application/json")
        .header("X-AUTH-TOKEN", token)
        .body(body.to_string())
        .unwrap()
}

// --- create ---

#[tokio::test]
async fn create_subscriber_returns_201() {
    let app = app(KEY);
    let resp = app
        .oneshot(subscribe_request(
            KEY,
            r#"{"email":"ana@example.com","status":"active","merge_fields":{"name":"Ana"}}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let subscriber: Subscriber = body_json(resp).await;
    assert_eq!(subscriber.email, "ana@example.com");
    assert_eq!(subscriber.status, "active");
    assert_eq!(subscriber.merge_fields["name"], "Ana");
}

#[tokio::test]
async fn create_subscriber_without_token_returns_401() {
    let app = app(KEY);
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(URI)
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(r#"{"email":"ana@example.com"}"#.to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = body_json(resp).await;
    assert!(body.get("errors").is_none());
}

#[tokio::test]
async fn create_subscriber_with_wrong_token_returns_401() {
    let app = app(KEY);
    let resp = app
        .oneshot(subscribe_request("nope", r#"{"email":"ana@example.com"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_subscriber_invalid_email_returns_422() {
    let app = app(KEY);
    let resp = app
        .oneshot(subscribe_request(KEY, r#"{"email":"not-an-email"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = body_json(resp).await;
    assert_eq!(body["errors"]["email"][0], "is invalid");
}

#[tokio::test]
async fn create_subscriber_malformed_json_is_rejected() {
    let app = app(KEY);
    let resp = app
        .oneshot(subscribe_request(KEY, r#"{"not_email":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let bytes = body_bytes(resp).await;
    assert!(serde_json::from_slice::<Value>(&bytes).is_err());
}

// --- duplicate / list ---

#[tokio::test]
async fn duplicate_subscriber_returns_email_error() {
    let app = app(KEY);

    let resp = app
        .clone()
        .oneshot(subscribe_request(KEY, r#"{"email":"ana@example.com"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = app
        .clone()
        .oneshot(subscribe_request(KEY, r#"{"email":"ANA@example.com"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = body_json(resp).await;
    assert_eq!(body["errors"]["email"][0], "has already been taken");

    let resp = app
        .oneshot(
            Request::builder()
                .uri(URI)
                .header("X-AUTH-TOKEN", KEY)
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["subscribers"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn list_subscribers_requires_token() {
    let app = app(KEY);
    let resp = app
        .oneshot(Request::builder().uri(URI).body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = app(KEY);
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/lists")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
