//! Integration tests for client-credentials token acquisition using wiremock.
//!
//! The mock server stands in for login.microsoftonline.com and serves
//! `/{tenant}/oauth2/v2.0/token`.

use graph_user_admin::auth::TokenProvider;
use graph_user_admin::error::GraphError;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider(server: &MockServer) -> TokenProvider {
    TokenProvider::with_authority(&server.uri(), "tenant-1", "client-2", "s3cret").unwrap()
}

#[tokio::test]
async fn acquire_token_posts_client_credentials_form() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tenant-1/oauth2/v2.0/token"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("client_id=client-2"))
        .and(body_string_contains("client_secret=s3cret"))
        .and(body_string_contains(
            "scope=https%3A%2F%2Fgraph.microsoft.com%2F.default",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token_type": "Bearer",
            "expires_in": 3599,
            "ext_expires_in": 3599,
            "access_token": "eyJ0eXAi.graph.token"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let token = provider(&server).acquire_token().await.unwrap();
    assert_eq!(token, "eyJ0eXAi.graph.token");
}

#[tokio::test]
async fn rejected_credentials_surface_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tenant-1/oauth2/v2.0/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": "invalid_client",
            "error_description": "AADSTS7000215: Invalid client secret provided."
        })))
        .mount(&server)
        .await;

    let err = provider(&server).acquire_token().await.unwrap_err();
    assert!(matches!(err, GraphError::Auth { .. }));

    let msg = err.to_string();
    assert!(msg.contains("401"), "got: {msg}");
    assert!(msg.contains("AADSTS7000215"), "got: {msg}");
}

#[tokio::test]
async fn unparsable_token_response_is_an_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tenant-1/oauth2/v2.0/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = provider(&server).acquire_token().await.unwrap_err();
    assert!(matches!(err, GraphError::Auth { .. }));

    let msg = err.to_string();
    assert!(msg.contains("200"), "got: {msg}");
    assert!(msg.contains("<html>maintenance</html>"), "got: {msg}");
}
