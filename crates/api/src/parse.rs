use std::str::FromStr;

use shared::AppError;

use crate::error::ApiError;

/// Parses a string-typed id field, turning a malformed UUID into a `400`
/// validation error rather than panicking or bubbling up as a `500`.
pub fn parse_id<T: FromStr>(field: &str, raw: &str) -> Result<T, ApiError> {
    raw.parse::<T>()
        .map_err(|_| ApiError::from(AppError::Validation(format!("{field} is not a valid id: {raw}"))))
}
