use serde_json::json;

use reqwest::Url;

use super::api_client::{ApiClient, endpoint};
use crate::config::Config;
use crate::error::TickTickError;
use crate::testing::{FakeApi, TOKEN, init_crypto};

fn url(raw: &str) -> Url {
    Url::parse(raw).unwrap()
}

#[test]
fn test_new_keeps_configured_bases() {
    init_crypto();
    let client =
        ApiClient::new(&Config::new("t", "http://custom:8080/", "http://custom:8080/v2")).unwrap();
    assert_eq!(client.api_url().as_str(), "http://custom:8080/");
    assert_eq!(client.api_v2_url().as_str(), "http://custom:8080/v2");
}

#[test]
fn test_new_rejects_relative_base() {
    init_crypto();
    let err = ApiClient::new(&Config::new("t", "api.ticktick.com/open/v1", "http://h/v2"))
        .err()
        .unwrap();
    assert!(matches!(
        err,
        TickTickError::InvalidBaseUrl { ref url, .. } if url == "api.ticktick.com/open/v1"
    ));
}

#[test]
fn test_new_rejects_base_without_path() {
    init_crypto();
    let err = ApiClient::new(&Config::new("t", "http://h/open/v1", "mailto:someone@example.com"))
        .err()
        .unwrap();
    assert!(matches!(err, TickTickError::InvalidBaseUrl { .. }));
}

#[test]
fn test_endpoint_appends_segments() {
    let base = url("http://h/open/v1");
    assert_eq!(
        endpoint(&base, &["project", "p1", "data"]).as_str(),
        "http://h/open/v1/project/p1/data"
    );
    assert_eq!(
        endpoint(&url("http://h"), &["user"]).as_str(),
        "http://h/user"
    );
}

#[test]
fn test_endpoint_keeps_plain_ids() {
    let base = url("http://h/open/v1");
    assert_eq!(
        endpoint(&base, &["project", "6247ee29630c800f064fd145"]).path(),
        "/open/v1/project/6247ee29630c800f064fd145"
    );
}

#[test]
fn test_endpoint_escapes_separators_in_ids() {
    let base = url("http://h/open/v1");
    let target = endpoint(&base, &["project", "a/b?c#d"]);
    assert_eq!(target.path(), "/open/v1/project/a%2Fb%3Fc%23d");
    assert_eq!(target.query(), None);
    assert_eq!(target.fragment(), None);
}

#[test]
fn test_endpoint_trailing_empty_segment_keeps_slash() {
    let base = url("http://h/api/v2");
    assert_eq!(
        endpoint(&base, &["project", "all", "completedInAll", ""]).path(),
        "/api/v2/project/all/completedInAll/"
    );
}

#[tokio::test]
async fn test_send_attaches_bearer_token() {
    let api = FakeApi::start().await;
    api.respond("GET", "/user", 200, json!({ "id": "u1" }));

    let client = api.client();
    client.send(client.get(&["user"])).await.unwrap();

    let request = api.single_request();
    assert_eq!(request.authorization.as_deref(), Some(format!("Bearer {TOKEN}").as_str()));
}

#[tokio::test]
async fn test_send_serializes_json_body() {
    let api = FakeApi::start().await;
    api.respond("POST", "/task", 200, json!({ "ok": true }));

    let client = api.client();
    let value = client
        .send_json(client.post(&["task"]).json(&json!({ "title": "x" })))
        .await
        .unwrap();

    assert_eq!(value, json!({ "ok": true }));
    assert_eq!(api.single_request().body, Some(json!({ "title": "x" })));
}

#[tokio::test]
async fn test_empty_success_body_is_none() {
    let api = FakeApi::start().await;
    api.respond_empty("DELETE", "/project/p1", 200);

    let client = api.client();
    let result = client.send(client.delete(&["project", "p1"])).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_send_json_rejects_empty_body() {
    let api = FakeApi::start().await;
    api.respond_empty("GET", "/user", 200);

    let client = api.client();
    let err = client.send_json(client.get(&["user"])).await.unwrap_err();
    assert!(matches!(err, TickTickError::InvalidResponse { .. }));
}

#[tokio::test]
async fn test_non_json_success_body_is_invalid_response() {
    let api = FakeApi::start().await;
    api.respond_raw("GET", "/user", 200, "<html>oops</html>");

    let client = api.client();
    let err = client.send(client.get(&["user"])).await.unwrap_err();
    assert!(matches!(err, TickTickError::InvalidResponse { .. }));
}

#[tokio::test]
async fn test_error_status_carries_remote_message() {
    let api = FakeApi::start().await;
    api.respond(
        "GET",
        "/project/missing",
        404,
        json!({ "errorCode": "project_not_found", "errorMessage": "Project not found" }),
    );

    let client = api.client();
    let err = client.send(client.get(&["project", "missing"])).await.unwrap_err();

    match err {
        TickTickError::Api { status, message, body } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Project not found");
            assert_eq!(body.unwrap()["errorCode"], "project_not_found");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
    // One attempt only.
    assert_eq!(api.requests().len(), 1);
}

#[tokio::test]
async fn test_error_status_with_plain_text_body() {
    let api = FakeApi::start().await;
    api.respond_raw("GET", "/user", 500, "upstream exploded");

    let client = api.client();
    let err = client.send(client.get(&["user"])).await.unwrap_err();
    assert!(matches!(
        err,
        TickTickError::Api { status: 500, ref message, body: None } if message == "upstream exploded"
    ));
}

#[tokio::test]
async fn test_error_status_without_body_uses_reason_phrase() {
    let api = FakeApi::start().await;
    api.respond_empty("GET", "/user", 401);

    let client = api.client();
    let err = client.send(client.get(&["user"])).await.unwrap_err();
    assert_eq!(err.to_string(), "TickTick API error (401): Unauthorized");
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    init_crypto();
    // Bind then drop to obtain a port with nothing listening on it.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let base = format!("http://127.0.0.1:{port}");
    let client = ApiClient::new(&Config::new("t", &base, &base)).unwrap();

    let err = client.send(client.get(&["user"])).await.unwrap_err();
    assert!(matches!(err, TickTickError::Transport { .. }));
    assert!(err.is_remote());
    assert!(err.describe().starts_with("TickTick API"));
}

#[tokio::test]
async fn test_query_values_arrive_decoded() {
    let api = FakeApi::start().await;
    api.respond("GET", "/user", 200, json!({ "id": "u1" }));

    let client = api.client();
    let request = client
        .get(&["user"])
        .query(&[("from", "2026-02-19T00:00:00.000+0000"), ("note", "a b&c")]);
    client.send(request).await.unwrap();

    let request = api.single_request();
    assert_eq!(
        request.query_param("from").as_deref(),
        Some("2026-02-19T00:00:00.000+0000")
    );
    assert_eq!(request.query_param("note").as_deref(), Some("a b&c"));
}

#[tokio::test]
async fn test_ids_with_separators_stay_one_segment() {
    let api = FakeApi::start().await;
    api.respond_empty("DELETE", "/project/a%2Fb", 200);

    let client = api.client();
    client.send(client.delete(&["project", "a/b"])).await.unwrap();

    assert_eq!(api.single_request().path, "/open/v1/project/a%2Fb");
}
