//! JSON body extractor.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use common::{AppError, ErrorReply};

/// JSON extractor whose rejection renders the standard error envelope.
///
/// Only decoding happens here. Field rules are checked by the service so
/// that every caller gets the same validation.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ErrorReply;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            tracing::debug!(rejection = %e.body_text(), "Undecodable request body");
            ErrorReply::with_message(AppError::invalid_argument(e.body_text()), "invalid request")
        })?;

        Ok(JsonBody(value))
    }
}
