//! Internal error helpers for mapping HTTP/reqwest errors to [`ServiceError`].

use std::time::Duration;

use murmur_types::ServiceError;

/// Timeout reported when the client has no explicit deadline configured.
const UNCONFIGURED_TIMEOUT: Duration = Duration::from_secs(30);

/// Map an HTTP status code from the chat endpoint to a [`ServiceError`].
pub(crate) fn map_http_status(status: reqwest::StatusCode, body: &str) -> ServiceError {
    match status.as_u16() {
        400 => ServiceError::InvalidRequest(body.to_string()),
        401 | 403 => ServiceError::Authentication(body.to_string()),
        404 => ServiceError::NotFound(body.to_string()),
        // DeepSeek answers 402 when the account balance is exhausted
        402 => ServiceError::InvalidRequest(format!("insufficient balance: {body}")),
        429 => ServiceError::RateLimit {
            retry_after: parse_retry_after(body),
        },
        500..=599 => ServiceError::ServiceUnavailable(body.to_string()),
        _ => ServiceError::InvalidRequest(format!("HTTP {status}: {body}")),
    }
}

/// Best-effort parse of "retry after N seconds" from an error body.
fn parse_retry_after(body: &str) -> Option<Duration> {
    let lower = body.to_lowercase();
    let idx = lower.find("retry after ")?;
    let after = &lower[idx + "retry after ".len()..];
    let num_str: String = after.chars().take_while(|c| c.is_ascii_digit()).collect();
    num_str.parse::<u64>().ok().map(Duration::from_secs)
}

/// Map a [`reqwest::Error`] raised while sending the request.
pub(crate) fn map_reqwest_error(err: reqwest::Error, timeout: Option<Duration>) -> ServiceError {
    if err.is_timeout() {
        ServiceError::Timeout(timeout.unwrap_or(UNCONFIGURED_TIMEOUT))
    } else {
        ServiceError::Network(Box::new(err))
    }
}

/// Map a [`reqwest::Error`] raised while reading the streamed body.
pub(crate) fn map_stream_error(err: reqwest::Error, timeout: Option<Duration>) -> ServiceError {
    if err.is_timeout() {
        ServiceError::Timeout(timeout.unwrap_or(UNCONFIGURED_TIMEOUT))
    } else {
        ServiceError::Stream(format!("stream read error: {err}"))
    }
}
