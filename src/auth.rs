//! OAuth2 client-credentials authentication for Microsoft identity platform.
//!
//! Exchanges tenant/client credentials for a Microsoft Graph bearer token at
//! the `/oauth2/v2.0/token` endpoint. One token is acquired per process and
//! reused read-only for every Graph call made during the run; there is no
//! caching across runs, expiry tracking, or refresh.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{GraphError, Result};

/// Microsoft identity platform authority. The tenant id is appended at runtime.
const AUTHORITY_URL: &str = "https://login.microsoftonline.com";

/// Default scope for app-only access to Microsoft Graph.
pub const GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Token requests are small; only the TCP + TLS handshake is bounded.
const TOKEN_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Form body sent to the token endpoint.
/// Fields are serialized as `application/x-www-form-urlencoded` by reqwest's `.form()`.
#[derive(Serialize)]
pub struct TokenRequest<'a> {
    client_id: &'a str,
    scope: &'a str,
    client_secret: &'a str,
    grant_type: &'a str,
}

/// Subset of the token response that we need. Extra fields such as
/// `ext_expires_in` are ignored.
#[derive(Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    #[serde(default)]
    pub expires_in: u64,
}

/// Acquires app-only bearer tokens for Microsoft Graph.
pub struct TokenProvider {
    client: reqwest::Client,
    authority: String,
    tenant_id: String,
    client_id: String,
    client_secret: String,
}

impl TokenProvider {
    pub fn new(tenant_id: &str, client_id: &str, client_secret: &str) -> Result<Self> {
        Self::with_authority(AUTHORITY_URL, tenant_id, client_id, client_secret)
    }

    /// Constructor that accepts a custom authority URL, used by tests to
    /// point at a local mock server instead of login.microsoftonline.com.
    pub fn with_authority(
        authority: &str,
        tenant_id: &str,
        client_id: &str,
        client_secret: &str,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(TOKEN_CONNECT_TIMEOUT)
            .build()?;
        Ok(TokenProvider {
            client,
            authority: authority.trim_end_matches('/').to_string(),
            tenant_id: tenant_id.to_string(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
        })
    }

    fn token_url(&self) -> String {
        format!("{}/{}/oauth2/v2.0/token", self.authority, self.tenant_id)
    }

    /// Performs a single client-credentials exchange and returns the access token.
    ///
    /// The response body is read as text before the status is checked so
    /// that on failure the raw AADSTS error is preserved in the error.
    pub async fn acquire_token(&self) -> Result<String> {
        let form = TokenRequest {
            client_id: &self.client_id,
            scope: GRAPH_SCOPE,
            client_secret: &self.client_secret,
            grant_type: "client_credentials",
        };

        let url = self.token_url();
        debug!(%url, tenant_id = %self.tenant_id, client_id = %self.client_id, "requesting token");

        let response = self
            .client
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(|e| GraphError::Auth {
                message: format!("could not reach token endpoint {url}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| GraphError::Auth {
            message: format!("failed to read token response ({status})"),
            source: Some(Box::new(e)),
        })?;

        if !status.is_success() {
            return Err(GraphError::Auth {
                message: format!("token request failed ({status}): {body}"),
                source: None,
            });
        }

        let token: TokenResponse =
            serde_json::from_str(&body).map_err(|e| GraphError::Auth {
                message: format!("failed to parse token response ({status}): {body}"),
                source: Some(Box::new(e)),
            })?;

        info!(token_type = %token.token_type, expires_in = token.expires_in, "token acquired");
        debug!(token_len = token.access_token.len(), "token length");
        Ok(token.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_url_interpolation() {
        let tp = TokenProvider::new("abc-123", "client", "secret").unwrap();
        assert_eq!(
            tp.token_url(),
            "https://login.microsoftonline.com/abc-123/oauth2/v2.0/token"
        );
    }

    #[test]
    fn custom_authority_trailing_slash_is_trimmed() {
        let tp = TokenProvider::with_authority("http://127.0.0.1:9999/", "t", "c", "s").unwrap();
        assert_eq!(tp.token_url(), "http://127.0.0.1:9999/t/oauth2/v2.0/token");
    }

    #[test]
    fn token_request_serializes_as_form() {
        let req = TokenRequest {
            client_id: "cid",
            scope: GRAPH_SCOPE,
            client_secret: "secret~value",
            grant_type: "client_credentials",
        };
        let encoded = serde_urlencoded::to_string(&req).unwrap();
        assert!(encoded.contains("client_id=cid"));
        assert!(encoded.contains("grant_type=client_credentials"));
        assert!(encoded.contains("scope=https%3A%2F%2Fgraph.microsoft.com%2F.default"));
    }

    #[test]
    fn token_response_deserializes_from_azure_format() {
        let json = r#"{
            "token_type": "Bearer",
            "expires_in": 3599,
            "ext_expires_in": 3599,
            "access_token": "eyJ0eXAi.test.token"
        }"#;
        let resp: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.access_token, "eyJ0eXAi.test.token");
        assert_eq!(resp.token_type, "Bearer");
        assert_eq!(resp.expires_in, 3599);
    }
}
