//! Data Transfer Objects - request/response bodies that are not domain entities.

use serde::{Deserialize, Serialize};

/// Body of `PUT /api/orders/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

/// Plain confirmation, e.g. after a delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result of a dependency liveness check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub version: String,
    pub timestamp: String,
}
