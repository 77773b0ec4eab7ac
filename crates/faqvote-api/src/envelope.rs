//! The `{success, data}` wire envelope shared by every endpoint.

use axum::{
  Json,
  response::{IntoResponse, Response},
};
use serde::Serialize;

/// A successful response body.
///
/// Serialises as `{"success":true,"data":...}`, or `{"success":true}` when
/// the endpoint has nothing to return.
#[derive(Debug, Serialize)]
pub struct Success<T: Serialize> {
  success: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  data:    Option<T>,
}

impl<T: Serialize> Success<T> {
  pub fn with_data(data: T) -> Self { Self { success: true, data: Some(data) } }
}

impl Success<()> {
  pub fn empty() -> Self { Self { success: true, data: None } }
}

impl<T: Serialize> IntoResponse for Success<T> {
  fn into_response(self) -> Response { Json(self).into_response() }
}

/// A failed response body: `{"success":false}`, optionally with a
/// human-readable `error` and an empty `data` list.
#[derive(Debug, Serialize)]
pub struct Failure {
  success: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  error:   Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  data:    Option<[(); 0]>,
}

impl Failure {
  pub fn bare() -> Self { Self { success: false, error: None, data: None } }

  pub fn with_error(message: impl Into<String>) -> Self {
    Self { success: false, error: Some(message.into()), data: None }
  }

  pub fn with_empty_data() -> Self { Self { success: false, error: None, data: Some([]) } }
}
