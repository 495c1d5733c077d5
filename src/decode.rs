use serde::de::DeserializeOwned;

use crate::{
    wire::{self, ErrorEntry},
    QueryError, QueryResult,
};

/// Maps a query service response body onto a [`QueryResult`].
///
/// Never fails: a body that is not JSON, or whose shape or rows do not fit
/// `T`, yields an unsuccessful result with no rows.
pub fn parse<T: DeserializeOwned>(body: &str) -> QueryResult<T> {
    match serde_json::from_str::<wire::QueryResponse<T>>(body) {
        Ok(response) => decode_query_result(response),
        Err(err) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %err, "could not map query response body");

            QueryResult::malformed(format!("invalid query response JSON: {err}"))
        }
    }
}

pub(crate) fn decode_query_result<T>(response: wire::QueryResponse<T>) -> QueryResult<T> {
    QueryResult {
        status: response.status,
        rows: response.results.unwrap_or_default(),
        errors: decode_errors(response.errors.unwrap_or_default()),
        warnings: decode_errors(response.warnings.unwrap_or_default()),
        metrics: response.metrics,
        signature: response.signature,
        request_id: response.request_id,
        client_context_id: response.client_context_id,
    }
}

fn decode_errors(entries: Vec<ErrorEntry>) -> Vec<QueryError> {
    entries
        .into_iter()
        .map(|entry| QueryError {
            code: entry.code,
            message: entry.msg,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::{json, Value};

    use crate::{decode::parse, QueryError};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Greeting {
        #[serde(rename = "Greeting")]
        greeting: String,
    }

    #[test]
    fn success_with_rows() {
        let result = parse::<Greeting>(
            r#"{"status":"success","results":[{"Greeting":"Hello World"}],"errors":[]}"#,
        );
        assert!(result.success());
        assert_eq!(
            result.rows(),
            [Greeting {
                greeting: "Hello World".to_owned()
            }]
        );
    }

    #[test]
    fn server_errors_are_data() {
        let result = parse::<Value>(
            r#"{"status":"fatal","results":[],"errors":[{"code":3000,"msg":"syntax error"}]}"#,
        );
        assert!(!result.success());
        assert!(result.rows().is_empty());
        assert_eq!(
            result.errors(),
            [QueryError {
                code: 3000,
                message: "syntax error".to_owned()
            }]
        );
    }

    #[test]
    fn success_status_with_errors_is_not_success() {
        let result =
            parse::<Value>(r#"{"status":"success","results":[],"errors":[{"code":1,"msg":"x"}]}"#);
        assert!(!result.success());
    }

    #[test]
    fn resultset_alias_and_optional_fields() {
        let body = json!({
            "requestID": "r-1",
            "clientContextID": "ctx",
            "signature": {"*": "*"},
            "resultset": [1, 2, 3],
            "status": "success",
            "warnings": [{"code": 5, "msg": "careful"}],
            "metrics": {"resultCount": 3}
        });
        let result = parse::<i64>(&body.to_string());
        assert!(result.success());
        assert_eq!(result.rows(), [1, 2, 3]);
        assert_eq!(result.request_id(), Some("r-1"));
        assert_eq!(result.client_context_id(), Some("ctx"));
        assert_eq!(result.signature(), Some(&json!({"*": "*"})));
        assert_eq!(result.warnings().len(), 1);
        assert_eq!(result.metrics(), Some(&json!({"resultCount": 3})));
    }

    #[test]
    fn non_json_body_is_recovered() {
        let result = parse::<Value>("<html>502 Bad Gateway</html>");
        assert!(!result.success());
        assert!(result.rows().is_empty());
        assert_eq!(result.status(), "malformed_response");
        assert_eq!(result.errors().len(), 1);
    }

    #[test]
    fn missing_status_is_recovered() {
        let result = parse::<Value>(r#"{"results":[1]}"#);
        assert!(!result.success());
        assert!(result.rows().is_empty());
    }

    #[test]
    fn row_type_mismatch_is_recovered() {
        let result = parse::<Greeting>(r#"{"status":"success","results":[{"other":1}]}"#);
        assert!(!result.success());
        assert!(result.rows().is_empty());
    }

    #[test]
    fn null_arrays_are_treated_as_empty() {
        let result = parse::<i64>(
            r#"{"status":"success","results":[7],"errors":null,"warnings":null}"#,
        );
        assert!(result.success());
        assert_eq!(result.rows(), [7]);
        assert!(result.errors().is_empty());
        assert!(result.warnings().is_empty());

        let result = parse::<i64>(r#"{"status":"success","results":null}"#);
        assert!(result.success());
        assert!(result.rows().is_empty());
    }

    #[test]
    fn into_rows_preserves_order() {
        let result = parse::<String>(r#"{"status":"success","results":["a","b","c"]}"#);
        assert_eq!(result.into_rows().collect::<Vec<_>>(), ["a", "b", "c"]);
    }
}
