use std::fmt;
use std::time::Duration;

use indexmap::IndexMap;
use serde::Serialize;
use url::Url;

use crate::{
    encode::{encode, escape, format_duration, to_json_value},
    wire::Credential,
    Compression, Encoding, Format, HttpMethod, N1qlError, Result, ScanConsistency, ScanVector,
};

const PARAMETER_PREFIX: &str = "$";
const ADMIN_PREFIX: &str = "admin:";
const LOCAL_PREFIX: &str = "local:";

/// Accumulates the options of a single query.
///
/// Setters that can fail leave the builder untouched when they do. Call
/// [`QueryRequest::produce`] to get the immutable [`QueryDescriptor`] that
/// [`QueryClient::execute`](crate::QueryClient::execute) sends.
///
/// ```
/// use n1ql_http::{QueryRequest, Url};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut request = QueryRequest::new();
/// request
///     .base_uri(Url::parse("http://localhost:8093/query")?)
///     .statement("SELECT * FROM `beer-sample` WHERE type = $1")?
///     .add_positional_parameter("beer")?;
///
/// let descriptor = request.produce()?;
/// assert!(descriptor.uri().ends_with("&args=%5B%22beer%22%5D"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Default)]
pub struct QueryRequest {
    method: Option<HttpMethod>,
    statement: Option<String>,
    prepared_statement: Option<String>,
    timeout: Option<Duration>,
    read_only: bool,
    include_metrics: bool,
    named_parameters: IndexMap<String, serde_json::Value>,
    positional_parameters: Vec<serde_json::Value>,
    format: Option<Format>,
    encoding: Option<Encoding>,
    compression: Option<Compression>,
    include_signature: bool,
    scan_consistency: Option<ScanConsistency>,
    scan_vector: Option<ScanVector>,
    scan_wait: Option<Duration>,
    pretty: bool,
    credentials: IndexMap<String, String>,
    client_context_id: Option<String>,
    base_uri: Option<Url>,
}

impl QueryRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a request from either statement text or a prepared statement name.
    pub fn create(text: impl Into<String>, is_prepared: bool) -> Self {
        let text = Some(text.into());
        if is_prepared {
            Self {
                prepared_statement: text,
                ..Self::default()
            }
        } else {
            Self {
                statement: text,
                ..Self::default()
            }
        }
    }

    /// Forces the HTTP verb instead of inferring it from the statement.
    pub fn http_method(&mut self, method: HttpMethod) -> &mut Self {
        self.method = Some(method);
        self
    }

    /// Sets the statement text. Fails if a prepared statement is already set.
    pub fn statement(&mut self, statement: impl Into<String>) -> Result<&mut Self> {
        if !is_blank(self.prepared_statement.as_deref()) {
            return Err(N1qlError::validation(
                "statement",
                "a prepared statement has already been provided",
            ));
        }
        self.statement = Some(statement.into());
        Ok(self)
    }

    /// Sets the prepared statement name. Fails if a statement is already set.
    pub fn prepared_statement(&mut self, prepared: impl Into<String>) -> Result<&mut Self> {
        if !is_blank(self.statement.as_deref()) {
            return Err(N1qlError::validation(
                "prepared_statement",
                "a statement has already been provided",
            ));
        }
        self.prepared_statement = Some(prepared.into());
        Ok(self)
    }

    /// Server-side execution budget. A zero duration is not sent.
    pub fn timeout(&mut self, timeout: Duration) -> &mut Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn read_only(&mut self, read_only: bool) -> &mut Self {
        self.read_only = read_only;
        self
    }

    pub fn metrics(&mut self, include_metrics: bool) -> &mut Self {
        self.include_metrics = include_metrics;
        self
    }

    /// Binds `$name` to `value`. The `$` prefix is added when missing.
    pub fn add_named_parameter<K, V>(&mut self, name: K, value: V) -> Result<&mut Self>
    where
        K: Into<String>,
        V: Serialize,
    {
        self.add_named_parameters([(name, value)])
    }

    /// Binds several named parameters. Nothing is stored if any of them fails.
    pub fn add_named_parameters<I, K, V>(&mut self, parameters: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Serialize,
    {
        let mut staged: IndexMap<String, serde_json::Value> = IndexMap::new();
        for (name, value) in parameters {
            let key = named_parameter_key(name.into())?;
            if self.named_parameters.contains_key(&key) || staged.contains_key(&key) {
                return Err(N1qlError::DuplicateKey {
                    field: "named parameter",
                    key,
                });
            }
            let value = to_json_value(&key, value)?;
            staged.insert(key, value);
        }
        self.named_parameters.extend(staged);
        Ok(self)
    }

    /// Appends a value bound to the next `$n` placeholder.
    pub fn add_positional_parameter<V: Serialize>(&mut self, value: V) -> Result<&mut Self> {
        self.add_positional_parameters([value])
    }

    /// Appends several positional values. Nothing is stored if any of them fails.
    pub fn add_positional_parameters<I, V>(&mut self, values: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = V>,
        V: Serialize,
    {
        let staged = values
            .into_iter()
            .map(|value| to_json_value("args", value))
            .collect::<Result<Vec<_>>>()?;
        self.positional_parameters.extend(staged);
        Ok(self)
    }

    pub fn format(&mut self, format: Format) -> &mut Self {
        self.format = Some(format);
        self
    }

    pub fn encoding(&mut self, encoding: Encoding) -> &mut Self {
        self.encoding = Some(encoding);
        self
    }

    pub fn compression(&mut self, compression: Compression) -> &mut Self {
        self.compression = Some(compression);
        self
    }

    pub fn signature(&mut self, include_signature: bool) -> &mut Self {
        self.include_signature = include_signature;
        self
    }

    pub fn scan_consistency(&mut self, scan_consistency: ScanConsistency) -> &mut Self {
        self.scan_consistency = Some(scan_consistency);
        self
    }

    pub fn scan_vector(&mut self, scan_vector: impl Into<ScanVector>) -> &mut Self {
        self.scan_vector = Some(scan_vector.into());
        self
    }

    pub fn scan_wait(&mut self, scan_wait: Duration) -> &mut Self {
        self.scan_wait = Some(scan_wait);
        self
    }

    pub fn pretty(&mut self, pretty: bool) -> &mut Self {
        self.pretty = pretty;
        self
    }

    /// Adds a `creds` entry.
    ///
    /// The username is scoped with `admin:` or `local:` unless it already
    /// carries that prefix. Adding the same scoped username twice fails.
    pub fn add_credentials(
        &mut self,
        username: &str,
        password: impl Into<String>,
        is_admin: bool,
    ) -> Result<&mut Self> {
        if username.trim().is_empty() {
            return Err(N1qlError::validation(
                "username",
                "cannot be null, empty or whitespace",
            ));
        }
        let prefix = if is_admin { ADMIN_PREFIX } else { LOCAL_PREFIX };
        let username = if username.starts_with(prefix) {
            username.to_owned()
        } else {
            format!("{prefix}{username}")
        };
        if self.credentials.contains_key(&username) {
            return Err(N1qlError::DuplicateKey {
                field: "username",
                key: username,
            });
        }
        self.credentials.insert(username, password.into());
        Ok(self)
    }

    pub fn client_context_id(&mut self, client_context_id: impl Into<String>) -> &mut Self {
        self.client_context_id = Some(client_context_id.into());
        self
    }

    /// Query service endpoint, e.g. `http://localhost:8093/query`.
    pub fn base_uri(&mut self, base_uri: Url) -> &mut Self {
        self.base_uri = Some(base_uri);
        self
    }

    /// Stored credentials keyed by scoped username, in insertion order.
    pub fn credentials(&self) -> &IndexMap<String, String> {
        &self.credentials
    }

    /// Validates the accumulated options and renders the request URI.
    pub fn produce(&self) -> Result<QueryDescriptor> {
        let statement = non_blank(self.statement.as_deref());
        let prepared = non_blank(self.prepared_statement.as_deref());
        let text = statement.or(prepared).ok_or_else(|| {
            N1qlError::validation(
                "statement",
                "a statement or prepared statement must be provided",
            )
        })?;
        let base_uri = self
            .base_uri
            .as_ref()
            .ok_or_else(|| N1qlError::validation("base_uri", "a base URI must be provided"))?;
        if base_uri.query().is_some() || base_uri.fragment().is_some() {
            return Err(N1qlError::validation(
                "base_uri",
                "the base URI must not carry a query string or fragment",
            ));
        }
        let method = self.method.unwrap_or_else(|| HttpMethod::resolve(text));

        let mut query = QueryString::default();
        if let Some(statement) = statement {
            query.push("statement", escape(statement));
        }
        if let Some(prepared) = prepared {
            query.push("prepared", escape(prepared));
        }
        if let Some(timeout) = self.timeout.filter(|timeout| !timeout.is_zero()) {
            query.push("timeout", format_duration(timeout));
        }
        if self.read_only {
            query.push("readonly", "true");
        }
        if self.include_metrics {
            query.push("metrics", "true");
        }
        for (key, value) in &self.named_parameters {
            query.push(key, encode(key, value)?);
        }
        if !self.positional_parameters.is_empty() {
            query.push("args", encode("args", &self.positional_parameters)?);
        }
        if let Some(format) = self.format {
            query.push("format", format.as_str());
        }
        if let Some(encoding) = self.encoding {
            query.push("encoding", escape(encoding.as_str()));
        }
        if let Some(compression) = self.compression {
            query.push("compression", compression.as_str());
        }
        if self.include_signature {
            query.push("signature", "true");
        }
        if let Some(scan_consistency) = self.scan_consistency {
            query.push("scan_consistency", scan_consistency.as_str());
        }
        match &self.scan_vector {
            Some(ScanVector::Text(text)) => query.push("scan_vector", escape(text)),
            Some(ScanVector::Object(value)) => {
                query.push("scan_vector", encode("scan_vector", value)?)
            }
            None => {}
        }
        if let Some(scan_wait) = self.scan_wait {
            query.push("scan_wait", format_duration(scan_wait));
        }
        if self.pretty {
            query.push("pretty", "true");
        }
        if !self.credentials.is_empty() {
            let creds: Vec<Credential<'_>> = self
                .credentials
                .iter()
                .map(|(user, pass)| Credential { user, pass })
                .collect();
            query.push("creds", encode("creds", &creds)?);
        }
        if let Some(id) = self.client_context_id.as_deref().filter(|id| !id.is_empty()) {
            query.push("client_context_id", escape(id));
        }

        Ok(QueryDescriptor {
            method,
            uri: format!("{base_uri}?{}", query.finish()),
        })
    }
}

impl fmt::Display for QueryRequest {
    /// Writes the produced URI, or nothing when the request is incomplete.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.produce() {
            Ok(descriptor) => f.write_str(descriptor.uri()),
            Err(_) => Ok(()),
        }
    }
}

impl fmt::Debug for QueryRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let credentials: Vec<(&str, &str)> = self
            .credentials
            .keys()
            .map(|user| (user.as_str(), "<redacted>"))
            .collect();
        f.debug_struct("QueryRequest")
            .field("method", &self.method)
            .field("statement", &self.statement)
            .field("prepared_statement", &self.prepared_statement)
            .field("timeout", &self.timeout)
            .field("read_only", &self.read_only)
            .field("include_metrics", &self.include_metrics)
            .field("named_parameters", &self.named_parameters)
            .field("positional_parameters", &self.positional_parameters)
            .field("format", &self.format)
            .field("encoding", &self.encoding)
            .field("compression", &self.compression)
            .field("include_signature", &self.include_signature)
            .field("scan_consistency", &self.scan_consistency)
            .field("scan_vector", &self.scan_vector)
            .field("scan_wait", &self.scan_wait)
            .field("pretty", &self.pretty)
            .field("credentials", &credentials)
            .field("client_context_id", &self.client_context_id)
            .field("base_uri", &self.base_uri.as_ref().map(Url::as_str))
            .finish()
    }
}

/// Fully encoded request: resolved verb plus the URI carrying every option.
#[derive(Clone, PartialEq, Eq)]
pub struct QueryDescriptor {
    method: HttpMethod,
    uri: String,
}

impl QueryDescriptor {
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn is_post(&self) -> bool {
        self.method == HttpMethod::Post
    }

    /// The URI without its query string, safe to log.
    pub(crate) fn endpoint(&self) -> &str {
        self.uri
            .split_once('?')
            .map_or(self.uri.as_str(), |(base, _)| base)
    }
}

impl fmt::Debug for QueryDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryDescriptor")
            .field("method", &self.method)
            .field("endpoint", &self.endpoint())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for QueryDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

/// `key=value&` accumulator; the trailing `&` is dropped by `finish`.
#[derive(Default)]
struct QueryString(String);

impl QueryString {
    fn push(&mut self, key: &str, value: impl AsRef<str>) {
        self.0.push_str(key);
        self.0.push('=');
        self.0.push_str(value.as_ref());
        self.0.push('&');
    }

    fn finish(self) -> String {
        self.0.trim_end_matches('&').to_owned()
    }
}

fn named_parameter_key(name: String) -> Result<String> {
    let bare = name.strip_prefix(PARAMETER_PREFIX).unwrap_or(name.as_str());
    if bare.is_empty() {
        return Err(N1qlError::validation(
            "name",
            "named parameter name cannot be empty",
        ));
    }
    if !bare
        .bytes()
        .all(|byte| byte.is_ascii_alphanumeric() || byte == b'_')
    {
        return Err(N1qlError::validation(
            "name",
            format!("named parameter '{bare}' may only contain ASCII letters, digits and '_'"),
        ));
    }
    if name.starts_with(PARAMETER_PREFIX) {
        Ok(name)
    } else {
        Ok(format!("{PARAMETER_PREFIX}{name}"))
    }
}

fn is_blank(value: Option<&str>) -> bool {
    non_blank(value).is_none()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}
