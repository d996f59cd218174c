use std::time::Duration;

use reqwest::{header::HeaderValue, StatusCode};
use serde_json::{Map, Value as JsonValue};

use crate::NotiBoostError;

/// Wait applied to a 429 response that carries no hint.
pub(crate) const DEFAULT_RATE_LIMIT_WAIT: Duration = Duration::from_secs(1);

/// Result of one send attempt, inspected by the retry loop.
#[derive(Debug)]
pub(crate) enum Outcome {
    /// 2xx with the parsed body.
    Success(JsonValue),
    /// 429 with the wait the server asked for.
    RateLimited {
        status: u16,
        body: JsonValue,
        retry_after: Duration,
    },
    /// Any other status. Never retried.
    Failed {
        status: u16,
        message: String,
        body: JsonValue,
    },
    /// No usable response was received.
    Transport(reqwest::Error),
}

impl Outcome {
    /// Converts the outcome into what the caller observes once retrying stops.
    pub(crate) fn into_result(self) -> Result<JsonValue, NotiBoostError> {
        match self {
            Outcome::Success(body) => Ok(body),
            Outcome::RateLimited { status, body, .. } => Err(NotiBoostError::Api {
                status,
                message: message_from(&body, status),
                body,
            }),
            Outcome::Failed {
                status,
                message,
                body,
            } => Err(NotiBoostError::Api {
                status,
                message,
                body,
            }),
            Outcome::Transport(err) => Err(NotiBoostError::Transport(err)),
        }
    }
}

/// Classifies a received response by status code.
pub(crate) fn classify(
    status: StatusCode,
    retry_after_header: Option<&HeaderValue>,
    text: &str,
) -> Outcome {
    let body = parse_body(text);
    let code = status.as_u16();

    if status.is_success() {
        return Outcome::Success(body);
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = retry_after_from(&body, retry_after_header);
        return Outcome::RateLimited {
            status: code,
            body,
            retry_after,
        };
    }

    Outcome::Failed {
        status: code,
        message: message_from(&body, code),
        body,
    }
}

/// Parses a response body; empty, `null` or malformed JSON becomes an empty object.
pub(crate) fn parse_body(text: &str) -> JsonValue {
    match serde_json::from_str::<JsonValue>(text) {
        Ok(JsonValue::Null) | Err(_) => JsonValue::Object(Map::new()),
        Ok(value) => value,
    }
}

fn message_from(body: &JsonValue, status: u16) -> String {
    match body.get("message") {
        Some(JsonValue::String(message)) => message.clone(),
        Some(JsonValue::Null) | None => format!("HTTP {status}"),
        Some(other) => other.to_string(),
    }
}

/// Body `retry_after` first, then the `Retry-After` header, then one second.
pub(crate) fn retry_after_from(body: &JsonValue, header: Option<&HeaderValue>) -> Duration {
    let from_body = match body.get("retry_after") {
        Some(JsonValue::Number(number)) => number.as_f64().and_then(seconds),
        Some(JsonValue::String(text)) => text.trim().parse::<f64>().ok().and_then(seconds),
        _ => None,
    };

    from_body
        .or_else(|| {
            header
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<u64>().ok())
                .map(Duration::from_secs)
        })
        .unwrap_or(DEFAULT_RATE_LIMIT_WAIT)
}

fn seconds(value: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(value).ok()
}

/// Exponential transport backoff, `unit_ms * 2^attempt`. Uncapped; saturates.
pub(crate) fn backoff_delay(unit_ms: u64, attempt: usize) -> Duration {
    let multiplier = u32::try_from(attempt)
        .ok()
        .and_then(|exp| 1u64.checked_shl(exp))
        .unwrap_or(u64::MAX);
    Duration::from_millis(unit_ms.saturating_mul(multiplier))
}
