use n1ql_http::QueryClient;
use serde_json::Value;

fn live_client() -> Option<QueryClient> {
    match QueryClient::from_env() {
        Ok(client) => Some(client),
        Err(reason) => {
            eprintln!("skipping live test: {reason}");
            None
        }
    }
}

#[tokio::test]
async fn live_hello_world_and_syntax_error() {
    let Some(client) = live_client() else {
        return;
    };
    let base_uri = client
        .base_uri()
        .cloned()
        .expect("from_env must set a base uri");

    let hello = client
        .query::<Value>(&base_uri, "SELECT 'Hello World' AS Greeting")
        .await
        .expect("hello world must reach the service");
    assert!(hello.success(), "errors: {:?}", hello.errors());
    assert_eq!(hello.rows()[0]["Greeting"], "Hello World");

    let broken = client
        .query::<Value>(&base_uri, "SELECT 'Hello World' ASB Greeting")
        .await
        .expect("syntax error must still return a result");
    assert!(!broken.success());
    assert!(broken.rows().is_empty());
    assert!(!broken.errors().is_empty());
}
