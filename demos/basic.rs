use std::time::Duration;

use n1ql_http::{QueryClient, ScanConsistency};
use serde_json::Value;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let client = QueryClient::from_env().map_err(anyhow::Error::msg)?;

    let mut request = client.request();
    request
        .statement("SELECT * FROM `beer-sample` WHERE type = $1 LIMIT 10")?
        .add_positional_parameter("beer")?;
    request
        .scan_consistency(ScanConsistency::RequestPlus)
        .timeout(Duration::from_secs(5))
        .metrics(true);

    let result = client.send::<Value>(&request).await?;
    if !result.success() {
        for error in result.errors() {
            eprintln!("[{}] {}", error.code, error.message);
        }
        anyhow::bail!("query finished with status {}", result.status());
    }

    for row in result.rows() {
        println!("{row}");
    }

    Ok(())
}
