//! Internal error helpers for the speech API.

use std::time::Duration;

use murmur_types::ServiceError;

/// Timeout reported when the client has no explicit deadline configured.
const UNCONFIGURED_TIMEOUT: Duration = Duration::from_secs(30);

/// Map a non-2xx HTTP status to a [`ServiceError`].
pub(crate) fn map_http_status(status: reqwest::StatusCode, body: &str) -> ServiceError {
    match status.as_u16() {
        401 | 403 => ServiceError::Authentication(body.to_string()),
        404 => ServiceError::NotFound(body.to_string()),
        429 => ServiceError::RateLimit { retry_after: None },
        500..=599 => ServiceError::ServiceUnavailable(body.to_string()),
        _ => ServiceError::InvalidRequest(format!("HTTP {status}: {body}")),
    }
}

/// Map a service status code other than success.
///
/// 3003 is the concurrency limit; 3005 and 3030–3032 are server-side
/// overload or timeout conditions. Everything else rejects the input.
pub(crate) fn map_api_code(code: i64, message: &str) -> ServiceError {
    match code {
        3003 => ServiceError::RateLimit { retry_after: None },
        3005 | 3030..=3032 => ServiceError::ServiceUnavailable(format!("code {code}: {message}")),
        _ => ServiceError::InvalidRequest(format!("code {code}: {message}")),
    }
}

/// Map a [`reqwest::Error`] to a [`ServiceError`].
pub(crate) fn map_reqwest_error(err: reqwest::Error, timeout: Option<Duration>) -> ServiceError {
    if err.is_timeout() {
        ServiceError::Timeout(timeout.unwrap_or(UNCONFIGURED_TIMEOUT))
    } else {
        ServiceError::Network(Box::new(err))
    }
}
