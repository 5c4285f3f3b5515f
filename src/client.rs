//! HTTP client, configuration and request building.

use crate::error::{ApiError, InvalidHeaderError};
use crate::routes::Route;
use http::Method;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

const APPLICATION_JSON: &str = "application/json";

/// A Graylog REST API client.
///
/// The client is cloneable and can be shared across threads.
/// It manages connection pooling.
#[derive(Clone)]
pub struct Client {
    pub(crate) inner: reqwest::Client,
    pub(crate) base_url: Option<String>,
    pub(crate) default_headers: HeaderMap,
    pub(crate) header_provider: Option<Arc<dyn Fn() -> HeaderMap + Send + Sync>>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("default_headers", &self.default_headers)
            .field("has_header_provider", &self.header_provider.is_some())
            .finish()
    }
}

impl Client {
    /// Create a client builder for customization.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// The configured base URL, if any.
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Start a request against a named route.
    ///
    /// No network request is made until a terminal method
    /// (`execute`, `fetch`, `fetch_optional`) is awaited.
    pub fn route(&self, route: &Route, params: &[(&str, &str)]) -> ApiRequest {
        self.request(route.method.clone(), &route.resolve(params))
    }

    /// Start a request with an explicit method and path.
    ///
    /// The path can be:
    /// - A full URL: "https://graylog.example.com/api/streams"
    /// - A path (if base_url was set): "/streams"
    pub fn request(&self, method: Method, path: &str) -> ApiRequest {
        ApiRequest {
            client: self.clone(),
            method,
            url: self.url_for(path),
            query: Vec::new(),
            body: None,
            expected: vec![200],
            timeout: None,
        }
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if let Some(base) = &self.base_url {
            format!("{}{}", base.trim_end_matches('/'), path)
        } else {
            path.to_string()
        }
    }

    /// Get headers for a request, including dynamic headers if configured.
    pub(crate) fn get_headers(&self) -> HeaderMap {
        let mut headers = self.default_headers.clone();
        if let Some(provider) = &self.header_provider {
            for (key, value) in provider().iter() {
                headers.insert(key.clone(), value.clone());
            }
        }
        headers
    }
}

/// Builder for configuring a Client.
#[must_use = "builders do nothing unless you call .build()"]
pub struct ClientBuilder {
    base_url: Option<String>,
    default_headers: HeaderMap,
    timeout: Option<Duration>,
    header_provider: Option<Arc<dyn Fn() -> HeaderMap + Send + Sync>>,
}

impl ClientBuilder {
    /// Create a new client builder.
    pub fn new() -> Self {
        Self {
            base_url: None,
            default_headers: HeaderMap::new(),
            timeout: None,
            header_provider: None,
        }
    }

    /// Set the base URL of the Graylog API, e.g. "http://graylog:12900".
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Add a default header for all requests.
    ///
    /// Invalid header names or values are silently ignored. Use
    /// [`try_default_header`](Self::try_default_header) if you need error handling.
    pub fn default_header(mut self, key: &str, value: &str) -> Self {
        if let (Ok(name), Ok(val)) = (
            reqwest::header::HeaderName::from_bytes(key.as_bytes()),
            reqwest::header::HeaderValue::from_str(value),
        ) {
            self.default_headers.insert(name, val);
        }
        self
    }

    /// Add a default header, returning an error if the name or value is invalid.
    pub fn try_default_header(
        mut self,
        key: &str,
        value: &str,
    ) -> std::result::Result<Self, InvalidHeaderError> {
        let name = reqwest::header::HeaderName::from_bytes(key.as_bytes())
            .map_err(|_| InvalidHeaderError::InvalidName(key.to_string()))?;
        let val = reqwest::header::HeaderValue::from_str(value)
            .map_err(|_| InvalidHeaderError::InvalidValue(value.to_string()))?;
        self.default_headers.insert(name, val);
        Ok(self)
    }

    /// Set all default headers.
    pub fn default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = headers;
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set a dynamic header provider (called per-request).
    ///
    /// Useful for session tokens that rotate while the client is alive.
    pub fn header_provider<F>(mut self, provider: F) -> Self
    where
        F: Fn() -> HeaderMap + Send + Sync + 'static,
    {
        self.header_provider = Some(Arc::new(provider));
        self
    }

    /// Build the client.
    ///
    /// Returns an error if the underlying HTTP client fails to build
    /// (e.g., due to TLS configuration issues).
    pub fn build(self) -> Result<Client, ApiError> {
        let mut builder = reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90));

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let inner = builder.build()?;

        Ok(Client {
            inner,
            base_url: self.base_url,
            default_headers: self.default_headers,
            header_provider: self.header_provider,
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A single API call under construction.
///
/// Defaults to expecting HTTP 200. Any other status fails with
/// [`ApiError::UnexpectedStatus`] unless declared through [`expect`](Self::expect).
#[derive(Debug)]
#[must_use = "requests do nothing unless executed"]
pub struct ApiRequest {
    client: Client,
    method: Method,
    url: String,
    query: Vec<(String, String)>,
    body: Option<Vec<u8>>,
    expected: Vec<u16>,
    timeout: Option<Duration>,
}

impl ApiRequest {
    /// Append a query parameter.
    pub fn query_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Serialize `body` as the JSON request payload.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        let bytes = serde_json::to_vec(body).map_err(|e| ApiError::Serialize {
            url: self.url.clone(),
            message: e.to_string(),
        })?;
        self.body = Some(bytes);
        Ok(self)
    }

    /// Replace the set of accepted status codes.
    pub fn expect(mut self, statuses: impl IntoIterator<Item = u16>) -> Self {
        self.expected = statuses.into_iter().collect();
        self
    }

    /// Override the client timeout for this call.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The resolved request URL, without query parameters.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send the request, discarding the response body.
    pub async fn execute(self) -> Result<(), ApiError> {
        self.send().await.map(|_| ())
    }

    /// Send the request and decode a required JSON body.
    pub async fn fetch<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        let (_, url, body) = self.send().await?;
        if body.is_empty() {
            return Err(ApiError::EmptyBody { url });
        }
        serde_json::from_slice(&body).map_err(|e| ApiError::json(&url, e))
    }

    /// Send the request and decode the JSON body if there is one.
    ///
    /// An accepted 404 or 204 yields `None`. Any other accepted status
    /// must carry a body.
    pub async fn fetch_optional<T: DeserializeOwned>(self) -> Result<Option<T>, ApiError> {
        let (status, url, body) = self.send().await?;
        if status == 404 || status == 204 {
            return Ok(None);
        }
        if body.is_empty() {
            return Err(ApiError::EmptyBody { url });
        }
        serde_json::from_slice(&body)
            .map(Some)
            .map_err(|e| ApiError::json(&url, e))
    }

    /// Headers sent with this call. Client headers replace the default
    /// `accept`; a JSON body always sets `content-type`.
    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));

        for (key, value) in self.client.get_headers().iter() {
            headers.insert(key.clone(), value.clone());
        }

        if self.body.is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
        }
        headers
    }

    async fn send(self) -> Result<(u16, String, Vec<u8>), ApiError> {
        tracing::debug!(method = %self.method, url = %self.url, "sending api request");

        let mut req = self
            .client
            .inner
            .request(self.method.clone(), &self.url)
            .headers(self.headers());

        if !self.query.is_empty() {
            req = req.query(&self.query);
        }

        if let Some(body) = self.body {
            req = req.body(body);
        }

        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }

        let resp = req.send().await?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await?.to_vec();

        tracing::debug!(status, url = %self.url, "received api response");

        if !self.expected.contains(&status) {
            tracing::warn!(
                status,
                expected = ?self.expected,
                url = %self.url,
                "api request returned unexpected status"
            );
            return Err(ApiError::UnexpectedStatus {
                status,
                url: self.url,
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok((status, self.url, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes;

    fn client() -> Client {
        Client::builder()
            .base_url("http://graylog.local:12900/")
            .build()
            .unwrap()
    }

    #[test]
    fn test_route_joins_base_url() {
        let req = client().route(&routes::STREAM, &[("streamId", "abc")]);
        assert_eq!(req.url(), "http://graylog.local:12900/streams/abc");
        assert_eq!(req.method, Method::GET);
        assert_eq!(req.expected, vec![200]);
    }

    #[test]
    fn test_absolute_url_bypasses_base() {
        let req = client().request(Method::GET, "https://other.local/api/users/jane");
        assert_eq!(req.url(), "https://other.local/api/users/jane");
    }

    #[test]
    fn test_expect_replaces_default() {
        let req = client()
            .route(&routes::ALERT_RECEIVER_REMOVE, &[("streamId", "abc")])
            .expect([204]);
        assert_eq!(req.expected, vec![204]);
        assert_eq!(req.method, Method::DELETE);
    }

    #[test]
    fn test_try_default_header_rejects_bad_name() {
        let result = Client::builder().try_default_header("bad header", "x");
        assert!(matches!(result, Err(InvalidHeaderError::InvalidName(_))));
    }

    #[test]
    fn test_header_provider_overrides_defaults() {
        let client = Client::builder()
            .default_header("x-session", "old")
            .header_provider(|| {
                let mut headers = HeaderMap::new();
                headers.insert("x-session", "fresh".parse().unwrap());
                headers
            })
            .build()
            .unwrap();
        assert_eq!(client.get_headers()["x-session"], "fresh");
    }

    #[test]
    fn test_accept_header_not_duplicated() {
        let client = Client::builder()
            .default_header("accept", "application/json")
            .build()
            .unwrap();
        let headers = client.request(Method::GET, "/streams").headers();
        assert_eq!(headers.get_all(ACCEPT).iter().count(), 1);
    }

    #[test]
    fn test_json_body_sets_content_type() {
        let req = client()
            .route(&routes::STREAM_CREATE, &[])
            .json(&serde_json::json!({"title": "errors"}))
            .unwrap();
        let headers = req.headers();
        assert_eq!(headers[CONTENT_TYPE], APPLICATION_JSON);
        assert_eq!(headers[ACCEPT], APPLICATION_JSON);
    }

    #[test]
    fn test_unserializable_body_is_transport_error() {
        use std::collections::HashMap;

        // JSON object keys must be strings.
        let mut body = HashMap::new();
        body.insert((1, 2), "pair");

        let err = client()
            .route(&routes::STREAM_CREATE, &[])
            .json(&body)
            .unwrap_err();
        assert!(matches!(err, ApiError::Serialize { .. }));
        assert!(err.is_transport());
    }
}
