use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use shared::{AppError, DomainError};

use crate::error::ApiError;

/// A `Json<T>` extractor that rejects unknown fields as `422` (`DomainError::UnknownField`)
/// rather than axum's default `400` on any deserialization failure, matching the error
/// taxonomy in §6.2/§7.
pub struct StrictJson<T>(pub T);

impl<S, T> FromRequest<S> for StrictJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|_| ApiError::from(AppError::Validation("could not read request body".to_string())))?;

        match serde_json::from_slice::<T>(&bytes) {
            Ok(value) => Ok(StrictJson(value)),
            Err(err) => {
                let message = err.to_string();
                if message.contains("unknown field") {
                    Err(ApiError::from(AppError::Domain(DomainError::UnknownField(message))))
                } else {
                    Err(ApiError::from(AppError::Validation(message)))
                }
            }
        }
    }
}
