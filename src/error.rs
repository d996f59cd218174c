use serde_json::Value as JsonValue;

/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum NotiBoostError {
    /// Invalid client configuration, detected before any request is sent.
    #[error("configuration error: {0}")]
    Config(String),
    /// Network or request execution error from `reqwest`, passed through as-is.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// Non-success HTTP status returned by the NotiBoost API.
    #[error("api error {status}: {message}")]
    Api {
        /// HTTP status code of the final response.
        status: u16,
        /// `message` field of the response body, or `HTTP <status>`.
        message: String,
        /// Full parsed response body (empty object when unparsable).
        body: JsonValue,
    },
    /// Caller-supplied header that is not valid HTTP.
    #[error("invalid header: {0}")]
    InvalidHeader(String),
    /// Payload could not be encoded as a JSON request body.
    #[error("encode error: {0}")]
    Encode(String),
}

impl NotiBoostError {
    /// HTTP status of an [`NotiBoostError::Api`] error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }

    /// Response body of an [`NotiBoostError::Api`] error.
    pub fn body(&self) -> Option<&JsonValue> {
        match self {
            Self::Api { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Whether the API kept answering 429 until retries ran out.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::Api { status: 429, .. })
    }
}
