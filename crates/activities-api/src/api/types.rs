//! API request and response types.

use serde::{Deserialize, Serialize};

/// `?email=` query for signup and unregister.
#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

/// Confirmation of a membership change.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub activity_count: usize,
}
