use super::DomainError;
use thiserror::Error;

/// Application-level errors (includes infrastructure, not just business rules).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status code for this error, per the engine's error-to-status mapping.
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::Domain(e) => match e {
                DomainError::Conflict => 409,
                DomainError::UnknownField(_) => 422,
                DomainError::InvalidRange
                | DomainError::InvalidEquipment(_)
                | DomainError::ServiceNotFound(_)
                | DomainError::InvalidSlotLength
                | DomainError::SlotUnavailable => 400,
            },
            AppError::Validation(_) => 400,
            AppError::Internal(_) => 500,
        }
    }

    /// Machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Domain(e) => match e {
                DomainError::InvalidRange => "INVALID_RANGE",
                DomainError::InvalidEquipment(_) => "INVALID_EQUIPMENT",
                DomainError::ServiceNotFound(_) => "SERVICE_NOT_FOUND",
                DomainError::InvalidSlotLength => "INVALID_SLOT_LENGTH",
                DomainError::SlotUnavailable => "SLOT_UNAVAILABLE",
                DomainError::Conflict => "CONFLICT",
                DomainError::UnknownField(_) => "UNKNOWN_FIELD",
            },
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Result type alias for application operations.
pub type AppResult<T> = Result<T, AppError>;
