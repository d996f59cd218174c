use std::fmt;
use std::time::Duration;

use reqwest::header::{self, HeaderName, HeaderValue};
use serde_json::Value as JsonValue;
use tokio::time::sleep;

use crate::{
    outcome::{backoff_delay, classify, Outcome},
    request::{join_url, Method},
    resources::{Events, Flows, Templates, Users, Webhooks},
    ClientOptions, NotiBoostError, RequestSpec, Result,
};

const USER_AGENT: &str = concat!("notiboost-rust/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
/// HTTP client for the NotiBoost API.
///
/// Every call goes through [`NotiBoostClient::execute`], which retries
/// transport failures with exponential backoff and 429 responses after the
/// server-provided wait. Other error statuses are returned immediately.
pub struct NotiBoostClient {
    http: reqwest::Client,
    authorization: HeaderValue,
    options: ClientOptions,
}

impl fmt::Debug for NotiBoostClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotiBoostClient")
            .field("api_key", &"<redacted>")
            .field("options", &self.options)
            .finish()
    }
}

impl NotiBoostClient {
    /// Creates a client for the production endpoint with default options.
    ///
    /// Fails with [`NotiBoostError::Config`] when `api_key` is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_options(api_key, ClientOptions::default())
    }

    /// Creates a client with explicit endpoint, timeout and retry options.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use notiboost_http::{ClientOptions, NotiBoostClient};
    ///
    /// let client = NotiBoostClient::with_options(
    ///     "nb_live_key",
    ///     ClientOptions::default().with_max_retries(5),
    /// )
    /// .expect("valid configuration");
    /// ```
    pub fn with_options(api_key: impl Into<String>, options: ClientOptions) -> Result<Self> {
        let api_key = api_key.into();
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(NotiBoostError::Config("API key is required".to_owned()));
        }
        validate_base_url(&options.base_url)?;

        let mut authorization = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| {
                NotiBoostError::Config("API key contains invalid header characters".to_owned())
            })?;
        authorization.set_sensitive(true);

        // rustls verifies peer certificates against the bundled roots; there is
        // no switch to turn that off.
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| {
                NotiBoostError::Config(format!("failed to build HTTP client: {err}"))
            })?;

        Ok(Self {
            http,
            authorization,
            options,
        })
    }

    /// Creates a client from environment variables.
    ///
    /// Reads:
    /// - `NOTIBOOST_API_KEY` — API key (required)
    /// - `NOTIBOOST_BASE_URL` — endpoint override
    /// - `NOTIBOOST_TIMEOUT_MS` — per-attempt timeout in milliseconds
    /// - `NOTIBOOST_MAX_RETRIES` — retries after the initial attempt
    ///
    /// Unset or empty optional variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let api_key = read("NOTIBOOST_API_KEY").ok_or_else(|| {
            NotiBoostError::Config("missing NOTIBOOST_API_KEY environment variable".to_owned())
        })?;

        let mut options = ClientOptions::default();
        if let Some(base_url) = read("NOTIBOOST_BASE_URL") {
            options.base_url = base_url.trim().to_owned();
        }
        if let Some(value) = read("NOTIBOOST_TIMEOUT_MS") {
            options.timeout_ms = parse_env_number("NOTIBOOST_TIMEOUT_MS", &value)?;
        }
        if let Some(value) = read("NOTIBOOST_MAX_RETRIES") {
            options.max_retries = parse_env_number("NOTIBOOST_MAX_RETRIES", &value)?;
        }

        Self::with_options(api_key, options)
    }

    /// Returns the options this client was built with.
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn events(&self) -> Events<'_> {
        Events::new(self)
    }

    pub fn users(&self) -> Users<'_> {
        Users::new(self)
    }

    pub fn flows(&self) -> Flows<'_> {
        Flows::new(self)
    }

    pub fn templates(&self) -> Templates<'_> {
        Templates::new(self)
    }

    pub fn webhooks(&self) -> Webhooks<'_> {
        Webhooks::new(self)
    }

    /// Sends a request and returns the parsed response body.
    ///
    /// At most `max_retries + 1` attempts are made:
    /// - transport failures wait `retry_backoff_ms * 2^attempt` and retry,
    ///   the last one is returned unchanged as [`NotiBoostError::Transport`];
    /// - 429 responses wait `retry_after` seconds (default 1) and retry,
    ///   the last one is returned as [`NotiBoostError::Api`];
    /// - any other non-2xx status is returned as [`NotiBoostError::Api`]
    ///   without retrying.
    ///
    /// The body is only sent for POST and PUT. The timeout applies to each
    /// attempt, not to the whole call.
    pub async fn execute(&self, spec: RequestSpec) -> Result<JsonValue> {
        let url = join_url(&self.options.base_url, &spec.path);
        let extra_headers = encode_headers(&spec.headers)?;
        let body = spec.wire_body();

        let mut attempt = 0usize;
        loop {
            #[cfg(feature = "tracing")]
            tracing::debug!(method = spec.method.as_str(), %url, attempt, "sending request");

            let outcome = self.send_once(spec.method, &url, &extra_headers, body).await;
            let retries_left = attempt < self.options.max_retries;

            match outcome {
                Outcome::RateLimited { retry_after, .. } if retries_left => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(
                        %url,
                        attempt,
                        "rate limited, retrying after {} ms",
                        retry_after.as_millis()
                    );
                    sleep(retry_after).await;
                }
                Outcome::Transport(ref err) if retries_left && should_retry_transport(err) => {
                    let delay = backoff_delay(self.options.retry_backoff_ms, attempt);
                    #[cfg(feature = "tracing")]
                    tracing::debug!(
                        %url,
                        attempt,
                        error = %err,
                        "transport failure, retrying after {} ms",
                        delay.as_millis()
                    );
                    sleep(delay).await;
                }
                outcome => {
                    #[cfg(feature = "tracing")]
                    {
                        if let Outcome::Transport(ref err) = outcome {
                            tracing::warn!(%url, attempt, error = %err, "request failed");
                        }
                    }
                    return outcome.into_result();
                }
            }

            attempt += 1;
        }
    }

    async fn send_once(
        &self,
        method: Method,
        url: &str,
        extra_headers: &[(HeaderName, HeaderValue)],
        body: Option<&JsonValue>,
    ) -> Outcome {
        let mut request = self
            .http
            .request(method.into(), url)
            .header(header::AUTHORIZATION, self.authorization.clone())
            .header(header::CONTENT_TYPE, "application/json")
            .timeout(Duration::from_millis(self.options.timeout_ms));

        for (name, value) in extra_headers {
            request = request.header(name.clone(), value.clone());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => return Outcome::Transport(err),
        };

        let status = response.status();
        let retry_after = response.headers().get(header::RETRY_AFTER).cloned();
        match response.text().await {
            Ok(text) => classify(status, retry_after.as_ref(), &text),
            Err(err) => Outcome::Transport(err),
        }
    }
}

fn should_retry_transport(err: &reqwest::Error) -> bool {
    // A request that cannot be built will not build on the next attempt either.
    !err.is_builder()
}

fn validate_base_url(base_url: &str) -> Result<()> {
    let parsed = url::Url::parse(base_url)
        .map_err(|err| NotiBoostError::Config(format!("invalid base URL '{base_url}': {err}")))?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.cannot_be_a_base() {
        return Err(NotiBoostError::Config(format!(
            "base URL must be an absolute http(s) URL, got '{base_url}'"
        )));
    }
    Ok(())
}

fn encode_headers(headers: &[(String, String)]) -> Result<Vec<(HeaderName, HeaderValue)>> {
    headers
        .iter()
        .map(|(name, value)| {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
                NotiBoostError::InvalidHeader(format!("invalid header name '{name}'"))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|_| {
                NotiBoostError::InvalidHeader(format!("invalid value for header '{name}'"))
            })?;
            Ok((header_name, header_value))
        })
        .collect()
}

fn parse_env_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| NotiBoostError::Config(format!("{name} must be a non-negative integer")))
}
