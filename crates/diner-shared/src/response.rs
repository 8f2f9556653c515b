//! Standardized API response envelopes (RFC 7807 for errors).

use serde::{Deserialize, Serialize};

/// Successful API response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
        }
    }
}

/// Body returned when input validation fails: every problem at once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationFailure<E> {
    pub success: bool,
    pub errors: Vec<E>,
}

impl<E> ValidationFailure<E> {
    pub fn new(errors: Vec<E>) -> Self {
        Self {
            success: false,
            errors,
        }
    }
}

/// RFC 7807 Problem Details for HTTP APIs.
///
/// See: https://datatracker.ietf.org/doc/html/rfc7807
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// A URI reference that identifies the problem type.
    #[serde(rename = "type")]
    pub error_type: String,

    /// A short, human-readable summary of the problem type.
    pub title: String,

    /// The HTTP status code.
    pub status: u16,

    /// A human-readable explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorResponse {
    pub fn new(status: u16, title: impl Into<String>) -> Self {
        Self {
            error_type: "about:blank".to_string(),
            title: title.into(),
            status,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(400, "Bad Request").with_detail(detail)
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(404, "Not Found").with_detail(detail)
    }

    pub fn conflict(detail: impl Into<String>) -> Self {
        Self::new(409, "Conflict").with_detail(detail)
    }

    pub fn too_many_requests(detail: impl Into<String>) -> Self {
        Self::new(429, "Too Many Requests").with_detail(detail)
    }

    pub fn internal_error() -> Self {
        Self::new(500, "Internal Server Error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_failure_is_unsuccessful() {
        let body = serde_json::to_value(ValidationFailure::new(vec!["bad"])).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["errors"][0], "bad");
    }

    #[test]
    fn internal_error_carries_no_detail() {
        let body = serde_json::to_value(ErrorResponse::internal_error()).unwrap();
        assert_eq!(body["status"], 500);
        assert!(body.get("detail").is_none());
    }
}
