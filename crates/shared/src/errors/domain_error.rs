use thiserror::Error;

/// Domain-level errors representing business logic violations.
///
/// These are exactly the error kinds enumerated in the booking engine's error
/// taxonomy; the HTTP layer maps each to a status code via [`crate::AppError`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("end must be after start")]
    InvalidRange,

    #[error("equipment {0} is not compatible with the requested service")]
    InvalidEquipment(String),

    #[error("service not found: {0}")]
    ServiceNotFound(String),

    #[error("reservation span does not match the service's total slot length")]
    InvalidSlotLength,

    #[error("no matching slot is available for the requested parameters")]
    SlotUnavailable,

    #[error("the slot conflicts with an existing reservation")]
    Conflict,

    #[error("unknown field in request body: {0}")]
    UnknownField(String),
}
