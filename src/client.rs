//! Primer API client: construction, request dispatch and response decoding

use crate::types::{ApiResponse, Envelope};
use crate::{PrimerError, Result};
use http::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use http::{Method, StatusCode};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// `X-Api-Key`: carries the API key
pub const API_KEY_HEADER: HeaderName = HeaderName::from_static("x-api-key");
/// `X-Idempotency-Key`: carries the caller's idempotency key
pub const IDEMPOTENCY_KEY_HEADER: HeaderName = HeaderName::from_static("x-idempotency-key");
/// `X-Grabkit-Grab-Requestid`: response header carrying the server-assigned request id
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-grabkit-grab-requestid");

/// Base URL of the Primer sandbox
pub const SANDBOX_BASE_URL: &str = "https://api.sandbox.primer.io";
/// Base URL of the Primer production API
pub const PRODUCTION_BASE_URL: &str = "https://api.primer.io";

/// Primer deployment to connect to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Sandbox,
    Production,
}

impl Environment {
    /// Base URL of the environment
    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::Sandbox => SANDBOX_BASE_URL,
            Environment::Production => PRODUCTION_BASE_URL,
        }
    }
}

/// Client for the Primer payments API.
///
/// Configuration is fixed at construction. The client holds no per-call state, so a single
/// instance can be cloned or shared across tasks freely.
#[derive(Clone)]
pub struct PrimerClient {
    /// Underlying HTTP client
    http: Client,
    /// Sent as `X-Api-Key` on every request
    api_key: String,
    /// Prefix of every request path, without a trailing slash
    base_url: String,
    /// Optional per-request timeout
    timeout: Option<Duration>,
}

impl std::fmt::Debug for PrimerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrimerClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Builder for [`PrimerClient`]
#[derive(Clone, Default)]
pub struct PrimerClientBuilder {
    http: Option<Client>,
    api_key: String,
    base_url: String,
    timeout: Option<Duration>,
}

impl std::fmt::Debug for PrimerClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrimerClientBuilder")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("custom_http_client", &self.http.is_some())
            .finish()
    }
}

impl PrimerClientBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Reads `PRIMER_API_KEY`, `PRIMER_BASE_URL` and `PRIMER_TIMEOUT_SECS`. Missing
    /// credentials are reported by [`PrimerClientBuilder::build`], not here.
    pub fn from_env() -> Result<Self> {
        let mut builder = Self::new();

        if let Ok(api_key) = std::env::var("PRIMER_API_KEY") {
            builder.api_key = api_key;
        }

        if let Ok(base_url) = std::env::var("PRIMER_BASE_URL") {
            builder.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var("PRIMER_TIMEOUT_SECS") {
            let secs: u64 = timeout.trim().parse().map_err(|e| {
                PrimerError::config(format!("Invalid PRIMER_TIMEOUT_SECS: {}", e))
            })?;
            builder.timeout = Some(Duration::from_secs(secs));
        }

        Ok(builder)
    }

    /// Send requests through a caller-configured HTTP client
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = Some(client);
        self
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Set a custom base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Use the base URL of a Primer environment
    pub fn with_environment(self, environment: Environment) -> Self {
        self.with_base_url(environment.base_url())
    }

    /// Bound every request by a timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Validate the configuration and build the client.
    ///
    /// The API key is checked before the base URL.
    pub fn build(self) -> Result<PrimerClient> {
        if self.api_key.trim().is_empty() {
            return Err(PrimerError::CredentialsMissing);
        }
        if self.base_url.trim().is_empty() {
            return Err(PrimerError::BaseUrlMissing);
        }

        Ok(PrimerClient {
            http: self.http.unwrap_or_default(),
            api_key: self.api_key,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            timeout: self.timeout,
        })
    }
}

impl PrimerClient {
    /// Start building a client
    pub fn builder() -> PrimerClientBuilder {
        PrimerClientBuilder::new()
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Configured request timeout, if any
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Send a `GET` request and decode the response
    pub(crate) async fn get<Q, R>(
        &self,
        idempotency_key: &str,
        path: &str,
        query: Option<&Q>,
    ) -> Result<ApiResponse<R>>
    where
        Q: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let mut request = self
            .http
            .get(self.url(path))
            .headers(self.headers(idempotency_key)?);
        if let Some(query) = query {
            request = request.query(query);
        }
        self.execute(Method::GET, path, request).await
    }

    /// Send a `POST` request with an optional JSON body and decode the response
    pub(crate) async fn post<B, R>(
        &self,
        idempotency_key: &str,
        path: &str,
        body: Option<&B>,
    ) -> Result<ApiResponse<R>>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let mut request = self
            .http
            .post(self.url(path))
            .headers(self.headers(idempotency_key)?);
        if let Some(body) = body {
            request = request.body(serde_json::to_vec(body)?);
        }
        self.execute(Method::POST, path, request).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn headers(&self, idempotency_key: &str) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, header_value(API_KEY_HEADER, &self.api_key)?);
        headers.insert(
            IDEMPOTENCY_KEY_HEADER,
            header_value(IDEMPOTENCY_KEY_HEADER, idempotency_key)?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    #[instrument(name = "primer.request", skip_all, fields(method = %method, path = %path))]
    async fn execute<R>(
        &self,
        method: Method,
        path: &str,
        mut request: reqwest::RequestBuilder,
    ) -> Result<ApiResponse<R>>
    where
        R: DeserializeOwned,
    {
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        debug!("sending request");
        let response = request.send().await?;
        decode_response(response).await
    }
}

fn header_value(name: HeaderName, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|source| PrimerError::InvalidHeader { name, source })
}

/// Value of the request id header; bytes outside visible ASCII are decoded lossily
fn request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
}

/// Map an HTTP response onto a typed response or a structured error.
///
/// The request id header is read before the status is inspected so it is available on
/// both paths.
async fn decode_response<R>(response: reqwest::Response) -> Result<ApiResponse<R>>
where
    R: DeserializeOwned,
{
    let request_id = request_id(response.headers());
    let status = response.status();

    match status {
        StatusCode::OK => {
            let bytes = response.bytes().await?;
            let data: R = serde_json::from_slice(&bytes)?;
            debug!(%status, request_id = ?request_id, "decoded response");
            Ok(ApiResponse {
                envelope: Envelope {
                    request_id,
                    idempotency_key: None,
                },
                data: Some(data),
            })
        }
        StatusCode::NO_CONTENT => {
            debug!(%status, request_id = ?request_id, "empty response");
            Ok(ApiResponse {
                envelope: Envelope {
                    request_id,
                    idempotency_key: None,
                },
                data: None,
            })
        }
        _ => {
            let message = if response.content_length() == Some(0) {
                String::new()
            } else {
                response.text().await?
            };
            warn!(%status, request_id = ?request_id, "Primer API returned an error");
            Err(PrimerError::api(status, message, request_id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_requires_api_key() {
        let result = PrimerClient::builder()
            .with_base_url("https://api.example.com")
            .build();
        assert!(matches!(result, Err(PrimerError::CredentialsMissing)));

        let result = PrimerClient::builder()
            .with_api_key("   ")
            .with_base_url("https://api.example.com")
            .build();
        assert!(matches!(result, Err(PrimerError::CredentialsMissing)));
    }

    #[test]
    fn test_build_requires_base_url() {
        let result = PrimerClient::builder().with_api_key("key").build();
        assert!(matches!(result, Err(PrimerError::BaseUrlMissing)));

        let result = PrimerClient::builder()
            .with_base_url(" \t")
            .with_api_key("key")
            .build();
        assert!(matches!(result, Err(PrimerError::BaseUrlMissing)));
    }

    #[test]
    fn test_api_key_checked_before_base_url() {
        let result = PrimerClient::builder().with_base_url("").with_api_key("").build();
        assert!(matches!(result, Err(PrimerError::CredentialsMissing)));
    }

    #[test]
    fn test_build_trims_trailing_slash() {
        let client = PrimerClient::builder()
            .with_api_key("key")
            .with_base_url("https://api.example.com/")
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "https://api.example.com");
        assert_eq!(client.url("/payments"), "https://api.example.com/payments");
    }

    #[test]
    fn test_environment_presets() {
        let client = PrimerClient::builder()
            .with_api_key("key")
            .with_environment(Environment::Sandbox)
            .with_timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        assert_eq!(client.base_url(), SANDBOX_BASE_URL);
        assert_eq!(client.timeout(), Some(Duration::from_secs(5)));
        assert_eq!(Environment::Production.base_url(), PRODUCTION_BASE_URL);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let client = PrimerClient::builder()
            .with_api_key("super-secret")
            .with_base_url("https://api.example.com")
            .build()
            .unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_builder_debug_redacts_api_key() {
        let builder = PrimerClient::builder()
            .with_api_key("super-secret")
            .with_base_url("https://api.example.com");
        let debug = format!("{:?}", builder);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
        assert!(debug.contains("https://api.example.com"));
    }

    #[test]
    fn test_request_id_keeps_non_ascii_bytes() {
        let mut headers = HeaderMap::new();
        assert_eq!(request_id(&headers), None);

        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("r-123"));
        assert_eq!(request_id(&headers).as_deref(), Some("r-123"));

        headers.insert(
            REQUEST_ID_HEADER,
            HeaderValue::from_bytes("r-\u{e9}t\u{e9}".as_bytes()).unwrap(),
        );
        assert_eq!(request_id(&headers).as_deref(), Some("r-\u{e9}t\u{e9}"));

        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_bytes(b"r-\xff").unwrap());
        assert_eq!(request_id(&headers).as_deref(), Some("r-\u{fffd}"));
    }

    #[test]
    fn test_headers() {
        let client = PrimerClient::builder()
            .with_api_key("key")
            .with_base_url("https://api.example.com")
            .build()
            .unwrap();

        let headers = client.headers("").unwrap();
        assert_eq!(headers[API_KEY_HEADER], "key");
        assert_eq!(headers[IDEMPOTENCY_KEY_HEADER], "");
        assert_eq!(headers[CONTENT_TYPE], "application/json");

        let error = client.headers("bad\nkey").unwrap_err();
        assert!(matches!(
            &error,
            PrimerError::InvalidHeader { name, .. } if *name == IDEMPOTENCY_KEY_HEADER
        ));
        assert!(error.is_transport());
    }
}
