//! JSON body extractor whose rejections use the crate's error body.

use crate::errors::Error;
use axum::extract::{FromRequest, rejection::JsonRejection};

/// Like [`axum::Json`], but a missing, malformed, or mistyped body is reported
/// as [`Error::Validation`] with the usual `{ "error": .. }` response.
#[derive(Debug, Clone, Copy, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation {
            message: rejection.body_text(),
        }
    }
}
