//! E2E tests for account registration, lookup and search

mod common;

use common::{TestServer, ids};
use reqwest::Method;
use serde_json::{Value, json};

#[tokio::test]
async fn test_register_returns_account_and_token() {
    let server = TestServer::new().await;

    let response = server
        .client
        .post(&server.url("/api/v1/accounts"))
        .json(&json!({
            "name": "Alice Smith",
            "email": "Alice@Example.com",
            "position": "Engineer",
            "expertise": ["rust", "  ", "sql"],
            "social_links": { "github": "https://github.com/alice" }
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["account"]["name"], "Alice Smith");
    assert_eq!(body["account"]["email"], "alice@example.com");
    assert_eq!(body["account"]["expertise"], json!(["rust", "sql"]));
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn test_register_rejects_invalid_input() {
    let server = TestServer::new().await;

    let response = server
        .client
        .post(&server.url("/api/v1/accounts"))
        .json(&json!({ "name": "Alice", "email": "not-an-email" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("email"));
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let server = TestServer::new().await;
    server.register("Alice", "alice@example.com").await;

    let response = server
        .client
        .post(&server.url("/api/v1/accounts"))
        .json(&json!({ "name": "Other Alice", "email": "alice@example.com" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 409);
}

#[tokio::test]
async fn test_get_account_requires_authentication() {
    let server = TestServer::new().await;
    let alice = server.register("Alice", "alice@example.com").await;

    let response = server
        .client
        .get(&server.url(&format!("/api/v1/accounts/{}", alice.id)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);

    let response = server
        .client
        .get(&server.url(&format!("/api/v1/accounts/{}", alice.id)))
        .header("Authorization", "Bearer not-a-token")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_get_account_by_id() {
    let server = TestServer::new().await;
    let alice = server.register("Alice", "alice@example.com").await;
    let bob = server.register("Bob", "bob@example.com").await;

    let response = server
        .authed(Method::GET, &format!("/api/v1/accounts/{}", bob.id), &alice)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["name"], "Bob");

    let response = server
        .authed(Method::GET, "/api/v1/accounts/01HNOSUCHACCOUNT", &alice)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_session_cookie_is_accepted() {
    let server = TestServer::new().await;
    let alice = server.register("Alice", "alice@example.com").await;

    let response = server
        .client
        .get(&server.url("/api/v1/friends"))
        .header("Cookie", format!("session={}", alice.token))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_search_excludes_caller() {
    let server = TestServer::new().await;
    let alice = server.register("Alice Anders", "alice@example.com").await;
    let alina = server.register("Alina Berg", "alina@example.com").await;
    server.register("Bob", "bob@example.com").await;

    let response = server
        .authed(Method::GET, "/api/v1/accounts/search?q=ali", &alice)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(ids(&body), vec![alina.id]);

    let response = server
        .authed(Method::GET, "/api/v1/accounts/search?q=", &alice)
        .send()
        .await
        .unwrap();
    let body: Value = response.json().await.unwrap();
    assert!(ids(&body).is_empty());
}
