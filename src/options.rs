/// Production endpoint of the NotiBoost API.
pub const DEFAULT_BASE_URL: &str = "https://api.notiboost.com";

/// Configures endpoint, HTTP timeout and retry behavior.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Base address every request path is appended to.
    pub base_url: String,
    /// Per-attempt timeout in milliseconds. Does not bound the whole retry sequence.
    pub timeout_ms: u64,
    /// Maximum number of retries after the initial attempt.
    pub max_retries: usize,
    /// Unit of the exponential transport backoff: `retry_backoff_ms * 2^attempt`.
    pub retry_backoff_ms: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout_ms: 30_000,
            max_retries: 3,
            retry_backoff_ms: 1_000,
        }
    }
}

impl ClientOptions {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_backoff(mut self, retry_backoff_ms: u64) -> Self {
        self.retry_backoff_ms = retry_backoff_ms;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{ClientOptions, DEFAULT_BASE_URL};

    #[test]
    fn defaults_match_platform_contract() {
        let opts = ClientOptions::default();
        assert_eq!(opts.base_url, DEFAULT_BASE_URL);
        assert_eq!(opts.timeout_ms, 30_000);
        assert_eq!(opts.max_retries, 3);
        assert_eq!(opts.retry_backoff_ms, 1_000);
    }

    #[test]
    fn setters_override_fields() {
        let opts = ClientOptions::default()
            .with_base_url("http://localhost:8080")
            .with_timeout(500)
            .with_max_retries(0)
            .with_retry_backoff(5);
        assert_eq!(opts.base_url, "http://localhost:8080");
        assert_eq!(opts.timeout_ms, 500);
        assert_eq!(opts.max_retries, 0);
        assert_eq!(opts.retry_backoff_ms, 5);
    }
}
