//! Registration store errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Activity not found: {0}")]
    NotFound(String),

    #[error("{email} is already signed up for {activity}")]
    AlreadySignedUp { activity: String, email: String },

    #[error("{email} is not registered for {activity}")]
    NotRegistered { activity: String, email: String },

    #[error("Email must not be empty")]
    InvalidEmail,

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid activity record: {0}")]
    InvalidRecord(String),
}

impl StoreError {
    /// Whether the error rejects an illegal membership transition.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            StoreError::AlreadySignedUp { .. } | StoreError::NotRegistered { .. }
        )
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            // The row was read but does not decode into an activity.
            sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnIndexOutOfBounds { .. }
            | sqlx::Error::Decode(_) => StoreError::InvalidRecord(e.to_string()),
            _ => StoreError::Unavailable(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::InvalidRecord(format!("JSON error: {}", e))
    }
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
