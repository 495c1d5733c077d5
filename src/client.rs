use std::fmt;
use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    decode::parse, ClientOptions, N1qlError, QueryDescriptor, QueryRequest, QueryResult, Result,
};

/// Default port of the query service REST endpoint.
pub const QUERY_PORT: u16 = 8093;

/// Formats a host name into the canonical query endpoint URL.
///
/// Example: `"10.0.0.5"` → `"http://10.0.0.5:8093/query"`
pub fn host_to_query_url(host: &str) -> std::result::Result<Url, url::ParseError> {
    Url::parse(&format!("http://{}:{QUERY_PORT}/query", host.trim()))
}

#[derive(Clone)]
/// HTTP client for the query service.
///
/// Each call performs exactly one HTTP round trip. Cloning is cheap and
/// clones share the underlying connection pool.
pub struct QueryClient {
    http: reqwest::Client,
    base_uri: Option<Url>,
    options: ClientOptions,
}

impl fmt::Debug for QueryClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryClient")
            .field("base_uri", &self.base_uri.as_ref().map(Url::as_str))
            .field("options", &self.options)
            .finish()
    }
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryClient {
    pub fn new() -> Self {
        Self::with_http(reqwest::Client::new())
    }

    /// Creates a client on top of an existing `reqwest` client.
    pub fn with_http(http: reqwest::Client) -> Self {
        Self {
            http,
            base_uri: None,
            options: ClientOptions::default(),
        }
    }

    /// Creates a client from environment variables.
    ///
    /// Reads `N1QL_QUERY_URL` (full endpoint URL) or, when that is absent,
    /// `N1QL_HOST`, which is expanded with [`host_to_query_url`]. The result
    /// becomes the base URI of requests created by [`QueryClient::request`].
    ///
    /// **Not available on `wasm32` targets.**
    ///
    /// # Example
    ///
    /// ```no_run
    /// use n1ql_http::QueryClient;
    ///
    /// let client = QueryClient::from_env().expect("missing N1QL_* env vars");
    /// ```
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> std::result::Result<Self, String> {
        let base_uri = match std::env::var("N1QL_QUERY_URL") {
            Ok(url) if url.trim().is_empty() => {
                return Err("N1QL_QUERY_URL is set but empty".to_owned())
            }
            Ok(url) => Url::parse(url.trim())
                .map_err(|err| format!("N1QL_QUERY_URL is not a valid URL: {err}"))?,
            Err(_) => {
                let host = std::env::var("N1QL_HOST").map_err(|_| {
                    "missing N1QL_QUERY_URL or N1QL_HOST environment variable".to_owned()
                })?;
                if host.trim().is_empty() {
                    return Err("N1QL_HOST is set but empty".to_owned());
                }
                host_to_query_url(&host)
                    .map_err(|err| format!("N1QL_HOST is not a valid host: {err}"))?
            }
        };
        Ok(Self::new().with_base_uri(base_uri))
    }

    /// Sets the endpoint used by [`QueryClient::request`].
    pub fn with_base_uri(mut self, base_uri: Url) -> Self {
        self.base_uri = Some(base_uri);
        self
    }

    /// Applies transport options such as the HTTP timeout.
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        self.options = opts;
        self
    }

    pub fn base_uri(&self) -> Option<&Url> {
        self.base_uri.as_ref()
    }

    /// Starts a request aimed at this client's base URI, if it has one.
    pub fn request(&self) -> QueryRequest {
        let mut request = QueryRequest::new();
        if let Some(base_uri) = &self.base_uri {
            request.base_uri(base_uri.clone());
        }
        request
    }

    /// Runs a single statement against `base_uri`.
    pub async fn query<T: DeserializeOwned>(
        &self,
        base_uri: &Url,
        statement: &str,
    ) -> Result<QueryResult<T>> {
        let mut request = QueryRequest::create(statement, false);
        request.base_uri(base_uri.clone());
        self.send(&request).await
    }

    /// Produces the descriptor for `request` and executes it.
    pub async fn send<T: DeserializeOwned>(&self, request: &QueryRequest) -> Result<QueryResult<T>> {
        let descriptor = request.produce()?;
        self.execute(&descriptor).await
    }

    /// Executes a descriptor and maps the response body.
    ///
    /// Only transport failures are returned as errors. Any body that
    /// arrives, whatever its HTTP status, is handed to the mapper, and
    /// service-side errors show up in [`QueryResult::errors`].
    pub async fn execute<T: DeserializeOwned>(
        &self,
        descriptor: &QueryDescriptor,
    ) -> Result<QueryResult<T>> {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            method = %descriptor.method(),
            endpoint = descriptor.endpoint(),
            "executing query"
        );

        let response = self
            .http
            .request(descriptor.method().into(), descriptor.uri())
            .timeout(Duration::from_millis(self.options.timeout_ms))
            .send()
            .await
            .map_err(N1qlError::Transport)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(status = response.status().as_u16(), "query response received");

        let body = response.text().await.map_err(N1qlError::Transport)?;
        Ok(parse(&body))
    }
}
