//! Directory API HTTP client (reqwest-based).
//!
//! [`DirectoryClient::do_request`] is the single request helper every
//! resource goes through: method + path + optional body in, raw bytes or a
//! classified [`ClientError`] out. There is no retry and no backoff.

use reqwest::{header, Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, trace};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Page size used by [`DirectoryClient::list_all`].
pub const PAGE_LIMIT: usize = 100;

const USER_AGENT: &str = concat!("cloudir-provider/", env!("CARGO_PKG_VERSION"));
const API_KEY_HEADER: &str = "x-api-key";
const ORG_ID_HEADER: &str = "x-org-id";

/// HTTP client for the directory service REST API.
#[derive(Clone)]
pub struct DirectoryClient {
    /// API base URL without a trailing slash.
    api_url: String,
    api_key: String,
    org_id: Option<String>,
    http_client: Client,
}

impl std::fmt::Debug for DirectoryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryClient")
            .field("api_url", &self.api_url)
            .field("org_id", &self.org_id)
            .finish_non_exhaustive()
    }
}

impl DirectoryClient {
    /// Create a client from validated configuration.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        config.validate()?;

        let http_client = Client::builder()
            .timeout(config.timeout())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ClientError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

        Ok(Self::with_http_client(config, http_client))
    }

    /// Create a client around a pre-built `reqwest::Client` (for testing).
    #[must_use]
    pub fn with_http_client(config: ClientConfig, http_client: Client) -> Self {
        Self {
            api_url: config.normalized_api_url().to_string(),
            api_key: config.api_key,
            org_id: config.org_id,
            http_client,
        }
    }

    /// API base URL.
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Organization id sent with every request, if configured.
    #[must_use]
    pub fn org_id(&self) -> Option<&str> {
        self.org_id.as_deref()
    }

    // ── Request helper ────────────────────────────────────────────────

    /// Send one request and return the raw response body.
    ///
    /// `path` is appended to the API URL and must start with `/`.
    #[instrument(skip(self, query, body))]
    pub async fn do_request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Vec<u8>>,
    ) -> ClientResult<Vec<u8>> {
        let url = format!("{}{}", self.api_url, path);
        debug!(url = %url, "Sending directory API request");

        let mut builder = self
            .http_client
            .request(method, &url)
            .header(API_KEY_HEADER, &self.api_key)
            .header(header::ACCEPT, "application/json");

        if let Some(ref org_id) = self.org_id {
            builder = builder.header(ORG_ID_HEADER, org_id);
        }
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            trace!(bytes = body.len(), "Request body attached");
            builder = builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        debug!(url = %url, status = %status, "Received directory API response");

        if status.is_success() {
            return Ok(bytes.to_vec());
        }

        Err(classify_error(status, &bytes))
    }

    // ── Typed conveniences ────────────────────────────────────────────

    /// GET `path` and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.get_json_with_query(path, &[]).await
    }

    /// GET `path` with query parameters and decode the JSON body.
    pub async fn get_json_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ClientResult<T> {
        let bytes = self.do_request(Method::GET, path, query, None).await?;
        decode(&bytes)
    }

    /// POST a JSON body and decode the JSON response.
    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.send_json(Method::POST, path, body).await
    }

    /// PUT a JSON body and decode the JSON response.
    pub async fn put_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.send_json(Method::PUT, path, body).await
    }

    /// PATCH a JSON body and decode the JSON response.
    pub async fn patch_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.send_json(Method::PATCH, path, body).await
    }

    /// Send a JSON body with any method and decode the JSON response.
    pub async fn send_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let bytes = self
            .do_request(method, path, &[], Some(encode(body)?))
            .await?;
        decode(&bytes)
    }

    /// Send a JSON body and ignore the response body (e.g. 204 operations).
    pub async fn send_json_no_content<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> ClientResult<()> {
        self.do_request(method, path, &[], Some(encode(body)?))
            .await?;
        Ok(())
    }

    /// DELETE `path`.
    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        self.do_request(Method::DELETE, path, &[], None).await?;
        Ok(())
    }

    /// Fetch every item of a collection, following `limit`/`skip` paging.
    ///
    /// Pages are either a JSON array or an object with a `results` array.
    pub async fn list_all<T: DeserializeOwned>(
        &self,
        path: &str,
        filter: Option<&str>,
    ) -> ClientResult<Vec<T>> {
        match filter {
            Some(filter) => {
                self.list_all_with_query(path, &[("filter", filter.to_string())])
                    .await
            }
            None => self.list_all_with_query(path, &[]).await,
        }
    }

    /// Like [`list_all`](Self::list_all) with extra query parameters on
    /// every page request.
    #[instrument(skip(self, extra))]
    pub async fn list_all_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        extra: &[(&str, String)],
    ) -> ClientResult<Vec<T>> {
        let mut items = Vec::new();
        let mut skip = 0usize;

        loop {
            let mut query = vec![("limit", PAGE_LIMIT.to_string()), ("skip", skip.to_string())];
            query.extend(extra.iter().cloned());

            let page: Value = self.get_json_with_query(path, &query).await?;
            let page_items = page_items(page)?;
            let count = page_items.len();

            for item in page_items {
                items.push(serde_json::from_value(item)?);
            }

            if count < PAGE_LIMIT {
                break;
            }
            skip += count;
        }

        debug!(path = %path, count = items.len(), "Listed collection");
        Ok(items)
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> ClientResult<Vec<u8>> {
    serde_json::to_vec(body).map_err(|e| ClientError::Encode(e.to_string()))
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> ClientResult<T> {
    serde_json::from_slice(bytes).map_err(|e| ClientError::Parse(e.to_string()))
}

fn page_items(page: Value) -> ClientResult<Vec<Value>> {
    match page {
        Value::Array(items) => Ok(items),
        Value::Object(mut obj) => match obj.remove("results") {
            Some(Value::Array(items)) => Ok(items),
            Some(Value::Null) | None => Ok(Vec::new()),
            Some(other) => Err(ClientError::Parse(format!(
                "expected 'results' to be an array, got {other}"
            ))),
        },
        other => Err(ClientError::Parse(format!(
            "expected a list response, got {other}"
        ))),
    }
}

/// Map a non-success response to a [`ClientError`].
fn classify_error(status: StatusCode, body: &[u8]) -> ClientError {
    let text = String::from_utf8_lossy(body).trim().to_string();

    let message = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|json| {
            json.get("message")
                .or_else(|| json.get("error"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| {
            if text.is_empty() {
                format!("HTTP {status}")
            } else {
                text
            }
        });

    if status == StatusCode::NOT_FOUND {
        ClientError::NotFound(message)
    } else {
        ClientError::api(status.as_u16(), message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_not_found() {
        let err = classify_error(StatusCode::NOT_FOUND, b"");
        assert!(matches!(err, ClientError::NotFound(ref m) if m == "HTTP 404 Not Found"));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_classify_uses_json_message() {
        let body = serde_json::to_vec(&json!({"message": "name must be unique"})).unwrap();
        let err = classify_error(StatusCode::CONFLICT, &body);
        assert_eq!(err.to_string(), "API error (status 409): name must be unique");
    }

    #[test]
    fn test_classify_uses_json_error_field() {
        let body = serde_json::to_vec(&json!({"error": "invalid api key"})).unwrap();
        let err = classify_error(StatusCode::UNAUTHORIZED, &body);
        assert!(err.is_auth_failure());
        assert!(err.to_string().contains("invalid api key"));
    }

    #[test]
    fn test_classify_plain_text_body() {
        let err = classify_error(StatusCode::BAD_REQUEST, b"group not found");
        assert!(err.is_not_found());
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_page_items_shapes() {
        assert_eq!(page_items(json!([1, 2])).unwrap().len(), 2);
        assert_eq!(
            page_items(json!({"totalCount": 1, "results": [{"_id": "a"}]}))
                .unwrap()
                .len(),
            1
        );
        assert!(page_items(json!({"totalCount": 0})).unwrap().is_empty());
        assert!(page_items(json!("nope")).is_err());
    }

    #[test]
    fn test_debug_hides_api_key() {
        let client = DirectoryClient::with_http_client(
            ClientConfig::new("very-secret"),
            Client::new(),
        );
        assert!(!format!("{client:?}").contains("very-secret"));
    }
}
