/// Configures the HTTP transport used by [`QueryClient`](crate::QueryClient).
///
/// `timeout_ms` is a client-side deadline for the whole HTTP exchange. It is
/// unrelated to [`QueryRequest::timeout`](crate::QueryRequest::timeout),
/// which is forwarded to the service as its own execution budget.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self { timeout_ms: 75_000 }
    }
}
