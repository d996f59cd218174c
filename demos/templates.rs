use notiboost_http::{NotiBoostClient, NotiBoostError, RequestSpec};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let client = NotiBoostClient::from_env()?;

    let templates = client.templates().list([("channel", "email")]).await?;
    println!("templates: {templates}");

    // Raw access to any endpoint, with an extra header.
    let spec =
        RequestSpec::get("/api/v1/templates/tpl_missing").with_header("X-Request-Id", "demo-1");
    match client.execute(spec).await {
        Ok(body) => println!("template: {body}"),
        Err(NotiBoostError::Api {
            status, message, ..
        }) => eprintln!("api error {status}: {message}"),
        Err(err) => return Err(err.into()),
    }

    Ok(())
}
