//! Authenticated HTTP client for the Microsoft Graph REST API.
//!
//! `GraphClient` wraps a `reqwest::Client` and the bearer token acquired at
//! startup. Every request carries `Authorization: Bearer {token}`, and every
//! response is checked against the exact status the operation expects. On a
//! mismatch the raw body is kept in [`GraphError::Api`].
//!
//! Collection endpoints go through [`GraphClient::get_all`], which follows
//! `@odata.nextLink` until it is absent and returns the concatenated items in
//! arrival order. A failure on any page aborts the whole listing.

use std::borrow::Cow;
use std::time::Duration;

use reqwest::{Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::error::{GraphError, Result};

const BASE_URL: &str = "https://graph.microsoft.com/v1.0";

/// Covers TCP + TLS handshake only. Requests themselves are not bounded.
const API_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// One page of an OData collection: `{ "value": [...], "@odata.nextLink": "..." }`.
#[derive(Debug, Deserialize)]
pub struct ODataPage<T> {
    /// The items on this page.
    pub value: Vec<T>,
    /// Opaque continuation URL for the next page, absent on the last page.
    #[serde(rename = "@odata.nextLink", default)]
    pub next_link: Option<String>,
}

/// Authenticated HTTP client for Microsoft Graph.
///
/// `base_url` is stored as a `String` so tests can point it at a wiremock server.
pub struct GraphClient {
    client: Client,
    base_url: String,
    token: String,
}

impl GraphClient {
    pub fn new(token: String) -> Result<Self> {
        Self::with_base_url(token, BASE_URL)
    }

    /// Constructor that accepts a custom base URL, used by tests to point
    /// at a local mock server instead of graph.microsoft.com.
    pub fn with_base_url(token: String, base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(API_CONNECT_TIMEOUT)
            .build()?;
        Ok(GraphClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// The Graph service root, e.g. `https://graph.microsoft.com/v1.0`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Sends one authenticated request and returns the body text when the
    /// status equals `expected`.
    ///
    /// `url` is absolute so that continuation links can be followed unmodified.
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
        expected: StatusCode,
    ) -> Result<String> {
        debug!(%method, %url, "graph request");

        let mut req = self
            .client
            .request(method, url)
            .bearer_auth(&self.token);
        if let Some(payload) = body {
            req = req.json(payload);
        }

        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        debug!(%status, bytes = text.len(), "graph response");

        if status != expected {
            return Err(GraphError::Api { status, body: text });
        }
        Ok(text)
    }

    /// GET a single resource; 200 required.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let body = self
            .send::<()>(Method::GET, &self.url(path), None, StatusCode::OK)
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// GET every page of a collection, following `@odata.nextLink` until absent.
    pub async fn get_all<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut next = Some(self.url(path));
        let mut pages = 0usize;

        while let Some(url) = next {
            let body = self
                .send::<()>(Method::GET, &url, None, StatusCode::OK)
                .await?;
            let page: ODataPage<T> = serde_json::from_str(&body)?;
            pages += 1;
            debug!(page = pages, items = page.value.len(), "collected page");
            items.extend(page.value);
            next = page.next_link;
        }

        Ok(items)
    }

    /// POST a JSON body and decode the response; `expected` is usually 201.
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        expected: StatusCode,
    ) -> Result<T> {
        let text = self
            .send(Method::POST, &self.url(path), Some(body), expected)
            .await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// POST a JSON body whose response body is not needed.
    pub async fn post_no_content<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        expected: StatusCode,
    ) -> Result<()> {
        self.send(Method::POST, &self.url(path), Some(body), expected)
            .await?;
        Ok(())
    }

    /// PATCH a partial JSON object; Graph answers 204 with an empty body.
    pub async fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        self.send(Method::PATCH, &self.url(path), Some(body), StatusCode::NO_CONTENT)
            .await?;
        Ok(())
    }

    /// DELETE a resource or reference; 204 required.
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.send::<()>(Method::DELETE, &self.url(path), None, StatusCode::NO_CONTENT)
            .await?;
        Ok(())
    }
}

/// Escapes `#` in an identifier used as a path segment. Guest principal names
/// contain `#EXT#`, which would otherwise start a URL fragment.
pub fn path_segment(id: &str) -> Cow<'_, str> {
    if id.contains('#') {
        Cow::Owned(id.replace('#', "%23"))
    } else {
        Cow::Borrowed(id)
    }
}
