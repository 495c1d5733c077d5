use serde::{Deserialize, Serialize};

/// One element of the `creds` array.
#[derive(Debug, Serialize)]
pub struct Credential<'a> {
    pub user: &'a str,
    pub pass: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct QueryResponse<T> {
    #[serde(rename = "requestID", default)]
    pub request_id: Option<String>,
    #[serde(rename = "clientContextID", default)]
    pub client_context_id: Option<String>,
    #[serde(default)]
    pub signature: Option<serde_json::Value>,
    #[serde(alias = "resultset", default)]
    pub results: Option<Vec<T>>,
    pub status: String,
    #[serde(default)]
    pub errors: Option<Vec<ErrorEntry>>,
    #[serde(default)]
    pub warnings: Option<Vec<ErrorEntry>>,
    #[serde(default)]
    pub metrics: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorEntry {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub msg: String,
}
