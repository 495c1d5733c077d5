/// Error type returned by this crate.
///
/// Only builder misuse and transport failures are errors. Rejected queries
/// and unreadable response bodies come back as an unsuccessful
/// [`QueryResult`](crate::QueryResult) instead.
#[derive(Debug, thiserror::Error)]
pub enum N1qlError {
    /// The builder was used in a way that violates its contract.
    #[error("invalid {field}: {message}")]
    Validation {
        /// Name of the offending input.
        field: &'static str,
        /// Human readable reason.
        message: String,
    },
    /// A key that must be unique was inserted twice.
    #[error("duplicate {field} '{key}'")]
    DuplicateKey {
        /// Which mapping rejected the key.
        field: &'static str,
        /// The key as it would have been stored.
        key: String,
    },
    /// A parameter value could not be serialized to JSON.
    #[error("failed to encode parameter '{name}': {source}")]
    Encoding {
        /// Parameter name, or `args`/`creds`/`scan_vector` for the composite entries.
        name: String,
        #[source]
        source: serde_json::Error,
    },
    /// Network or request execution error from `reqwest`.
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),
}

impl N1qlError {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}
