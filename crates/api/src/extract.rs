//! Request body extraction with field validation.

use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use stocker_core::messages::Message;
use validator::{Validate, ValidationError};

use crate::error::AppError;
use crate::state::AppState;

/// JSON body that has passed its `validator` rules.
///
/// Malformed JSON is rejected with 400 `BAD_REQUEST`; rule violations with
/// 400 `VALIDATION_ERROR` and a per-field message map.
pub struct ValidatedJson<T>(pub T);

impl<T> FromRequest<AppState> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        value.validate().map_err(|errors| AppError::InvalidInput {
            message: state.text(Message::InvalidInput),
            errors,
        })?;

        Ok(Self(value))
    }
}

/// Reject strings that are empty after trimming.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Trim an optional text field, mapping blank input to `None`.
pub fn trimmed(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
