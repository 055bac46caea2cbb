//! Integration tests for the plain HTTP endpoints

use std::net::TcpListener;
use std::sync::Arc;

use sprintboard::configuration::JwtSettings;
use sprintboard::startup::run;
use sprintboard::store::InMemoryCredentialStore;

fn spawn_app() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let jwt_config = JwtSettings {
        secret: "health-access-secret-at-least-32-characters".to_string(),
        refresh_secret: "health-refresh-secret-at-least-32-characters".to_string(),
        access_token_expiry: 900,
        refresh_token_expiry: 604800,
        issuer: "sprintboard".to_string(),
    };
    let server = run(
        listener,
        Arc::new(InMemoryCredentialStore::new()),
        jwt_config,
        false,
    )
    .expect("Failed to create server");
    let _ = tokio::spawn(server);

    format!("http://127.0.0.1:{}", port)
}

#[tokio::test]
async fn health_check_works() {
    let addr = spawn_app();

    let response = reqwest::Client::new()
        .get(&format!("{}/health_check", addr))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    assert_eq!(Some(0), response.content_length());
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let addr = spawn_app();

    let response = reqwest::Client::new()
        .get(&format!("{}/health_check", addr))
        .send()
        .await
        .expect("Failed to execute request");

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Missing x-request-id header")
        .to_str()
        .unwrap();
    assert!(uuid::Uuid::parse_str(request_id).is_ok());
}

#[tokio::test]
async fn get_graphql_serves_the_playground() {
    let addr = spawn_app();

    let response = reqwest::Client::new()
        .get(&format!("{}/graphql", addr))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(200, response.status().as_u16());
    let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));
    assert!(response.text().await.unwrap().contains("graphiql"));
}

#[tokio::test]
async fn unknown_routes_return_404() {
    let addr = spawn_app();

    let response = reqwest::Client::new()
        .get(&format!("{}/auth/login", addr))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(404, response.status().as_u16());
}
