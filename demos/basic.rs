use notiboost_http::NotiBoostClient;
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let client = NotiBoostClient::from_env()?;

    client
        .users()
        .create(&json!({
            "id": "usr_demo",
            "email": "demo@example.com",
            "name": "Demo User"
        }))
        .await?;

    let receipt = client
        .events()
        .ingest(&json!({
            "event_name": "order_shipped",
            "user_id": "usr_demo",
            "properties": { "order_id": "A-1001" }
        }))
        .await?;

    println!("{receipt}");
    Ok(())
}
