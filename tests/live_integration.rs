use notiboost_http::{NotiBoostClient, NotiBoostError};

fn live_client() -> Option<NotiBoostClient> {
    let key = std::env::var("NOTIBOOST_API_KEY").ok()?;
    if key.trim().is_empty() {
        return None;
    }
    Some(NotiBoostClient::from_env().expect("NOTIBOOST_* env must form a valid client"))
}

#[tokio::test]
async fn live_template_listing_and_missing_user() {
    let client = match live_client() {
        Some(client) => client,
        None => {
            eprintln!("skipping live test: NOTIBOOST_API_KEY not set");
            return;
        }
    };

    let templates = client
        .templates()
        .list([("limit", "1")])
        .await
        .expect("template listing must succeed");
    assert!(templates.is_object() || templates.is_array());

    match client.users().get("notiboost-rust-live-missing-user").await {
        Err(NotiBoostError::Api { status, .. }) => assert_eq!(status, 404),
        Ok(body) => panic!("expected missing user, got {body}"),
        Err(other) => panic!("expected api error, got {other:?}"),
    }
}
