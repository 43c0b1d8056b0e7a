use thiserror::Error;

/// Message shown to a patient whose selected slot was taken between
/// generation and submission.
pub const SLOT_TAKEN_MESSAGE: &str = "slot no longer available, please pick another";

#[derive(Error, Debug)]
pub enum MediError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl MediError {
    /// A conflicting booking for an already-taken slot.
    pub fn slot_taken() -> Self {
        MediError::Conflict(SLOT_TAKEN_MESSAGE.to_string())
    }

    /// Whether the client should regenerate candidates and try again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, MediError::Conflict(_))
    }
}

pub type MediResult<T> = Result<T, MediError>;
