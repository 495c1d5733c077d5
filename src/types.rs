/// Status string the service reports for a fully successful query.
pub const STATUS_SUCCESS: &str = "success";

/// Status assigned locally when a response body could not be mapped.
pub const STATUS_MALFORMED_RESPONSE: &str = "malformed_response";

/// Error or warning reported by the query service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryError {
    pub code: i64,
    pub message: String,
}

/// Outcome of one query execution.
///
/// Built once by the response mapper and read-only afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryResult<T> {
    pub(crate) status: String,
    pub(crate) rows: Vec<T>,
    pub(crate) errors: Vec<QueryError>,
    pub(crate) warnings: Vec<QueryError>,
    pub(crate) metrics: Option<serde_json::Value>,
    pub(crate) signature: Option<serde_json::Value>,
    pub(crate) request_id: Option<String>,
    pub(crate) client_context_id: Option<String>,
}

impl<T> QueryResult<T> {
    pub(crate) fn malformed(message: String) -> Self {
        Self {
            status: STATUS_MALFORMED_RESPONSE.to_owned(),
            rows: Vec::new(),
            errors: vec![QueryError { code: 0, message }],
            warnings: Vec::new(),
            metrics: None,
            signature: None,
            request_id: None,
            client_context_id: None,
        }
    }

    /// `true` when the service reported `success` and no errors.
    pub fn success(&self) -> bool {
        self.status == STATUS_SUCCESS && self.errors.is_empty()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Rows in the order the service delivered them.
    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    /// Consumes the result and yields its rows once.
    pub fn into_rows(self) -> std::vec::IntoIter<T> {
        self.rows.into_iter()
    }

    pub fn errors(&self) -> &[QueryError] {
        &self.errors
    }

    pub fn warnings(&self) -> &[QueryError] {
        &self.warnings
    }

    /// Execution metrics exactly as the service sent them.
    pub fn metrics(&self) -> Option<&serde_json::Value> {
        self.metrics.as_ref()
    }

    /// Result signature, present when the request asked for it.
    pub fn signature(&self) -> Option<&serde_json::Value> {
        self.signature.as_ref()
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    pub fn client_context_id(&self) -> Option<&str> {
        self.client_context_id.as_deref()
    }
}
