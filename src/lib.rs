//! `n1ql-http` is an async client for the N1QL query service REST API.
//!
//! A [`QueryRequest`] collects a statement (or prepared statement name),
//! its parameters, credentials and execution options, and produces an
//! immutable [`QueryDescriptor`] whose URI carries all of them in a fixed
//! order. [`QueryClient::execute`] sends the descriptor and maps the JSON
//! reply onto a [`QueryResult`]:
//! - [`QueryClient::execute`]
//! - [`QueryClient::send`]
//! - [`QueryClient::query`]

mod client;
mod decode;
mod encode;
mod error;
mod method;
mod options;
mod params;
mod request;
mod types;
mod wire;

pub use client::{host_to_query_url, QueryClient, QUERY_PORT};
pub use decode::parse;
pub use encode::{encode, escape};
pub use error::N1qlError;
pub use method::HttpMethod;
pub use options::ClientOptions;
pub use params::{Compression, Encoding, Format, ScanConsistency, ScanVector};
pub use request::{QueryDescriptor, QueryRequest};
pub use types::{QueryError, QueryResult, STATUS_MALFORMED_RESPONSE, STATUS_SUCCESS};
pub use url::Url;

pub type Result<T> = std::result::Result<T, N1qlError>;
