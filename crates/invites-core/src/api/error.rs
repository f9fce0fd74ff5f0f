use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Gmail rejected the access token: {0}")]
    Unauthorized(String),

    #[error("Gmail refused the request: {0}")]
    Forbidden(String),

    #[error("Draft not found: {0}")]
    DraftNotFound(String),

    #[error("Gmail quota exceeded: {0}")]
    RateLimited(String),

    #[error("Invalid request ({status}): {message}")]
    InvalidRequest { status: String, message: String },

    #[error("Gmail unavailable: {0}")]
    Unavailable(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Reasons Gmail attaches to a 403 when the caller is over quota.
const QUOTA_REASONS: [&str; 3] = ["rateLimitExceeded", "userRateLimitExceeded", "dailyLimitExceeded"];

/// Google's JSON error envelope: `{"error": {"code", "message", "status", "errors"}}`.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    reason: String,
}

impl ErrorBody {
    fn has_reason(&self, reasons: &[&str]) -> bool {
        self.errors.iter().any(|e| reasons.contains(&e.reason.as_str()))
    }
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let cut = (0..=MAX_ERROR_BODY_LENGTH)
                .rev()
                .find(|&i| body.is_char_boundary(i))
                .unwrap_or(0);
            format!("{}... (truncated, {} total bytes)", &body[..cut], body.len())
        }
    }

    /// Map a failed Gmail response to an error, preferring the message from
    /// Google's error envelope over the raw body.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let parsed = serde_json::from_str::<ErrorEnvelope>(body)
            .map(|envelope| envelope.error)
            .unwrap_or_default();
        let message = if parsed.message.is_empty() {
            Self::truncate_body(body)
        } else {
            Self::truncate_body(&parsed.message)
        };

        match status.as_u16() {
            401 => ApiError::Unauthorized(message),
            403 if parsed.has_reason(&QUOTA_REASONS) => ApiError::RateLimited(message),
            403 => ApiError::Forbidden(message),
            404 => ApiError::DraftNotFound(message),
            429 => ApiError::RateLimited(message),
            500..=599 => ApiError::Unavailable(message),
            _ => ApiError::InvalidRequest {
                status: if parsed.status.is_empty() {
                    status.to_string()
                } else {
                    parsed.status
                },
                message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn google_error(code: u16, status: &str, reason: &str, message: &str) -> String {
        serde_json::json!({
            "error": {
                "code": code,
                "message": message,
                "status": status,
                "errors": [{ "domain": "usageLimits", "reason": reason, "message": message }],
            }
        })
        .to_string()
    }

    #[test]
    fn test_envelope_message_is_used() {
        let body = google_error(400, "INVALID_ARGUMENT", "invalidArgument", "Invalid To header");
        match ApiError::from_status(StatusCode::BAD_REQUEST, &body) {
            ApiError::InvalidRequest { status, message } => {
                assert_eq!(status, "INVALID_ARGUMENT");
                assert_eq!(message, "Invalid To header");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_quota_reason_on_forbidden_is_rate_limit() {
        let body = google_error(403, "PERMISSION_DENIED", "userRateLimitExceeded", "User rate limit exceeded");
        assert!(matches!(
            ApiError::from_status(StatusCode::FORBIDDEN, &body),
            ApiError::RateLimited(m) if m == "User rate limit exceeded"
        ));

        let body = google_error(403, "PERMISSION_DENIED", "insufficientPermissions", "Insufficient Permission");
        assert!(matches!(
            ApiError::from_status(StatusCode::FORBIDDEN, &body),
            ApiError::Forbidden(_)
        ));
    }

    #[test]
    fn test_from_status_without_envelope() {
        assert!(matches!(ApiError::from_status(StatusCode::UNAUTHORIZED, ""), ApiError::Unauthorized(_)));
        assert!(matches!(ApiError::from_status(StatusCode::NOT_FOUND, "gone"), ApiError::DraftNotFound(b) if b == "gone"));
        assert!(matches!(ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, ""), ApiError::RateLimited(_)));
        assert!(matches!(ApiError::from_status(StatusCode::BAD_GATEWAY, "<html>"), ApiError::Unavailable(b) if b == "<html>"));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_REQUEST, "bad"),
            ApiError::InvalidRequest { status, message } if status == "400 Bad Request" && message == "bad"
        ));
    }

    #[test]
    fn test_long_bodies_are_truncated() {
        let body = "é".repeat(400);
        let truncated = ApiError::truncate_body(&body);
        assert!(truncated.contains("(truncated, 800 total bytes)"));
        assert!(truncated.len() < body.len());
    }
}
