//! Request body extractor that runs `validator` checks before the handler sees the payload.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use common::AppError;

/// A JSON body that parsed and passed validation.
///
/// Every rejection is a `VALIDATION_ERROR`; the message is the first failing field's message,
/// fields taken in name order.
pub struct CheckedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for CheckedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        let value: T = serde_json::from_slice(&bytes)
            .map_err(|e| AppError::validation(format!("Malformed request body: {}", e)))?;
        value.validate().map_err(first_message)?;

        Ok(CheckedJson(value))
    }
}

fn first_message(errors: ValidationErrors) -> AppError {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let message = fields
        .iter()
        .filter_map(|(_, errs)| errs.first())
        .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Validation failed".to_string());
    AppError::validation(message)
}
