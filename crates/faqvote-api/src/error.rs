//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Validation failures carry a message for the user. Store failures are
//! logged here and rendered as a bare `{"success":false}`.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use faqvote_core::store::{ClassifyFailure, FailureKind};
use thiserror::Error;

use crate::envelope::Failure;

type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// The request was rejected before reaching the store.
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("faq not found")]
  NotFound(#[source] BoxedError),

  /// Lost a race on the one-vote-per-identity constraint; safe to retry.
  #[error("conflicting vote")]
  Conflict(#[source] BoxedError),

  #[error("store error: {0}")]
  Store(#[source] BoxedError),

  /// The list endpoint failed; rendered with an empty `data` array.
  #[error("listing failed: {0}")]
  Listing(#[source] BoxedError),
}

impl ApiError {
  /// Map a store failure to the matching variant.
  pub fn from_store<E>(e: E) -> Self
  where
    E: std::error::Error + ClassifyFailure + Send + Sync + 'static,
  {
    match e.failure_kind() {
      FailureKind::FaqNotFound => ApiError::NotFound(Box::new(e)),
      FailureKind::Conflict => ApiError::Conflict(Box::new(e)),
      FailureKind::Unavailable => ApiError::Store(Box::new(e)),
    }
  }
}

impl From<faqvote_core::Error> for ApiError {
  fn from(e: faqvote_core::Error) -> Self { ApiError::BadRequest(e.to_string()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, body) = match &self {
      ApiError::BadRequest(m) => {
        tracing::debug!(reason = %m, "request rejected");
        (StatusCode::BAD_REQUEST, Failure::with_error(m.clone()))
      }
      ApiError::NotFound(e) => {
        tracing::debug!(error = %e, "vote on unknown faq");
        (StatusCode::NOT_FOUND, Failure::bare())
      }
      ApiError::Conflict(e) => {
        tracing::warn!(error = %e, "concurrent vote conflict");
        (StatusCode::CONFLICT, Failure::bare())
      }
      ApiError::Store(e) => {
        tracing::error!(error = %e, "vote failed");
        (StatusCode::INTERNAL_SERVER_ERROR, Failure::bare())
      }
      ApiError::Listing(e) => {
        tracing::error!(error = %e, "listing faqs failed");
        (StatusCode::INTERNAL_SERVER_ERROR, Failure::with_empty_data())
      }
    };
    (status, Json(body)).into_response()
  }
}
