//! Handlers for `/faqs` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/faqs` | Every FAQ with totals and the caller's own vote |
//! | `POST` | `/faqs/{id}/like` | Like, or retract an existing like |
//! | `POST` | `/faqs/{id}/dislike` | Body `{"comment":"..."}`; dislike, or retract a dislike |

use std::sync::Arc;

use axum::{
  Json,
  extract::{
    Path, State,
    rejection::{JsonRejection, PathRejection},
  },
};
use faqvote_core::{
  Error as CoreError,
  faq::{FaqId, FaqSummary},
  store::VoteStore,
  vote::DislikeComment,
};
use serde::Deserialize;

use crate::{envelope::Success, error::ApiError, identity::ClientIdentity};

/// Resolve the `{id}` path segment. A segment axum cannot decode (e.g. percent
/// escapes that are not UTF-8) is reported like any other malformed id.
fn parse_faq_id(path: Result<Path<String>, PathRejection>) -> Result<FaqId, ApiError> {
  match path {
    Ok(Path(raw_id)) => Ok(FaqId::parse_path_segment(&raw_id)?),
    Err(rejection) => Err(CoreError::InvalidFaqId(rejection.body_text()).into()),
  }
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /faqs`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  ClientIdentity(identity): ClientIdentity,
) -> Result<Success<Vec<FaqSummary>>, ApiError>
where
  S: VoteStore,
{
  let faqs = store
    .list_with_state(&identity)
    .await
    .map_err(|e| ApiError::Listing(Box::new(e)))?;
  Ok(Success::with_data(faqs))
}

// ─── Like ─────────────────────────────────────────────────────────────────────

/// `POST /faqs/{id}/like`
pub async fn like<S>(
  State(store): State<Arc<S>>,
  ClientIdentity(identity): ClientIdentity,
  path: Result<Path<String>, PathRejection>,
) -> Result<Success<()>, ApiError>
where
  S: VoteStore,
{
  let faq_id = parse_faq_id(path)?;

  store
    .apply_like(faq_id, &identity)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Success::empty())
}

// ─── Dislike ──────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /faqs/{id}/dislike`.
#[derive(Debug, Deserialize)]
pub struct DislikeBody {
  pub comment: String,
}

/// `POST /faqs/{id}/dislike` — body: `{"comment":"..."}` (1 to 500 chars).
///
/// The id is validated before the body. When the caller already dislikes the
/// FAQ the vote is retracted and the submitted comment is dropped.
pub async fn dislike<S>(
  State(store): State<Arc<S>>,
  ClientIdentity(identity): ClientIdentity,
  path: Result<Path<String>, PathRejection>,
  body: Result<Json<DislikeBody>, JsonRejection>,
) -> Result<Success<()>, ApiError>
where
  S: VoteStore,
{
  let faq_id = parse_faq_id(path)?;
  let Json(body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
  let comment = DislikeComment::new(body.comment)?;

  store
    .apply_dislike(faq_id, &identity, comment)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Success::empty())
}
