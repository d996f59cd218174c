//! Resource-oriented wrappers over [`NotiBoostClient::execute`].
//!
//! Each method only shapes a [`RequestSpec`]; retries and error
//! classification happen in the client.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{json, Value as JsonValue};

use crate::{NotiBoostClient, NotiBoostError, RequestSpec, Result};

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<JsonValue> {
    serde_json::to_value(value).map_err(|err| NotiBoostError::Encode(err.to_string()))
}

/// Percent-encodes an identifier so it stays a single path segment.
fn segment(value: &str) -> String {
    // byte_serialize encodes a literal '+' as %2B, so every '+' left is a space.
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Sets `occurred_at` to the current UTC time when it is missing, null or empty.
fn stamp_occurred_at(event: &mut JsonValue) -> Result<()> {
    let fields = event
        .as_object_mut()
        .ok_or_else(|| NotiBoostError::Encode("event must be a JSON object".to_owned()))?;

    let missing = match fields.get("occurred_at") {
        None | Some(JsonValue::Null) => true,
        Some(JsonValue::String(value)) => value.is_empty(),
        Some(_) => false,
    };
    if missing {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        fields.insert("occurred_at".to_owned(), JsonValue::String(now));
    }
    Ok(())
}

/// `/api/v1/events`
#[derive(Clone, Copy, Debug)]
pub struct Events<'a> {
    client: &'a NotiBoostClient,
}

impl<'a> Events<'a> {
    pub(crate) fn new(client: &'a NotiBoostClient) -> Self {
        Self { client }
    }

    /// Ingests one event, stamping `occurred_at` when the caller left it out.
    pub async fn ingest<T: Serialize + ?Sized>(&self, event: &T) -> Result<JsonValue> {
        let mut event = to_json(event)?;
        stamp_occurred_at(&mut event)?;
        self.client
            .execute(RequestSpec::post("/api/v1/events", event))
            .await
    }

    pub async fn ingest_batch<T: Serialize>(&self, events: &[T]) -> Result<JsonValue> {
        let events = to_json(events)?;
        self.client
            .execute(RequestSpec::post(
                "/api/v1/events/batch",
                json!({ "events": events }),
            ))
            .await
    }
}

/// `/api/v1/users`
#[derive(Clone, Copy, Debug)]
pub struct Users<'a> {
    client: &'a NotiBoostClient,
}

impl<'a> Users<'a> {
    pub(crate) fn new(client: &'a NotiBoostClient) -> Self {
        Self { client }
    }

    pub async fn create<T: Serialize + ?Sized>(&self, user: &T) -> Result<JsonValue> {
        self.client
            .execute(RequestSpec::post("/api/v1/users", to_json(user)?))
            .await
    }

    pub async fn get(&self, user_id: &str) -> Result<JsonValue> {
        self.client
            .execute(RequestSpec::get(user_path(user_id)))
            .await
    }

    pub async fn update<T: Serialize + ?Sized>(
        &self,
        user_id: &str,
        data: &T,
    ) -> Result<JsonValue> {
        self.client
            .execute(RequestSpec::put(user_path(user_id), to_json(data)?))
            .await
    }

    pub async fn delete(&self, user_id: &str) -> Result<JsonValue> {
        self.client
            .execute(RequestSpec::delete(user_path(user_id)))
            .await
    }

    /// Replaces per-channel delivery data (device tokens, addresses).
    pub async fn set_channel_data<T: Serialize + ?Sized>(
        &self,
        user_id: &str,
        channel_data: &T,
    ) -> Result<JsonValue> {
        let path = format!("{}/channel_data", user_path(user_id));
        self.client
            .execute(RequestSpec::put(path, to_json(channel_data)?))
            .await
    }

    pub async fn set_preferences<T: Serialize + ?Sized>(
        &self,
        user_id: &str,
        preferences: &T,
    ) -> Result<JsonValue> {
        let path = format!("{}/preferences", user_path(user_id));
        self.client
            .execute(RequestSpec::put(path, to_json(preferences)?))
            .await
    }

    pub async fn create_batch<T: Serialize>(&self, users: &[T]) -> Result<JsonValue> {
        let users = to_json(users)?;
        self.client
            .execute(RequestSpec::post(
                "/api/v1/users/batch",
                json!({ "users": users }),
            ))
            .await
    }
}

fn user_path(user_id: &str) -> String {
    format!("/api/v1/users/{}", segment(user_id))
}

/// `/api/v1/flows`
#[derive(Clone, Copy, Debug)]
pub struct Flows<'a> {
    client: &'a NotiBoostClient,
}

impl<'a> Flows<'a> {
    pub(crate) fn new(client: &'a NotiBoostClient) -> Self {
        Self { client }
    }

    pub async fn create<T: Serialize + ?Sized>(&self, flow: &T) -> Result<JsonValue> {
        self.client
            .execute(RequestSpec::post("/api/v1/flows", to_json(flow)?))
            .await
    }
}

/// `/api/v1/templates`
#[derive(Clone, Copy, Debug)]
pub struct Templates<'a> {
    client: &'a NotiBoostClient,
}

impl<'a> Templates<'a> {
    pub(crate) fn new(client: &'a NotiBoostClient) -> Self {
        Self { client }
    }

    pub async fn create<T: Serialize + ?Sized>(&self, template: &T) -> Result<JsonValue> {
        self.client
            .execute(RequestSpec::post("/api/v1/templates", to_json(template)?))
            .await
    }

    /// Lists templates. Filters are sent form-encoded in the query string.
    ///
    /// ```no_run
    /// # async fn demo(client: notiboost_http::NotiBoostClient) -> notiboost_http::Result<()> {
    /// let email = client
    ///     .templates()
    ///     .list([("channel", "email"), ("limit", "20")])
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list<I, K, V>(&self, filters: I) -> Result<JsonValue>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.client
            .execute(RequestSpec::get(templates_list_path(filters)))
            .await
    }

    pub async fn get(&self, template_id: &str) -> Result<JsonValue> {
        self.client
            .execute(RequestSpec::get(template_path(template_id)))
            .await
    }

    pub async fn update<T: Serialize + ?Sized>(
        &self,
        template_id: &str,
        data: &T,
    ) -> Result<JsonValue> {
        self.client
            .execute(RequestSpec::put(template_path(template_id), to_json(data)?))
            .await
    }
}

fn template_path(template_id: &str) -> String {
    format!("/api/v1/templates/{}", segment(template_id))
}

fn templates_list_path<I, K, V>(filters: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in filters {
        query.append_pair(key.as_ref(), value.as_ref());
    }
    let query = query.finish();

    if query.is_empty() {
        "/api/v1/templates".to_owned()
    } else {
        format!("/api/v1/templates?{query}")
    }
}

/// `/api/v1/webhooks`
#[derive(Clone, Copy, Debug)]
pub struct Webhooks<'a> {
    client: &'a NotiBoostClient,
}

impl<'a> Webhooks<'a> {
    pub(crate) fn new(client: &'a NotiBoostClient) -> Self {
        Self { client }
    }

    pub async fn create<T: Serialize + ?Sized>(&self, webhook: &T) -> Result<JsonValue> {
        self.client
            .execute(RequestSpec::post("/api/v1/webhooks", to_json(webhook)?))
            .await
    }
}
