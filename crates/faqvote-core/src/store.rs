//! The `VoteStore` trait and failure classification.
//!
//! The trait is implemented by storage backends (e.g. `faqvote-store-sqlite`).
//! The HTTP layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  faq::{Faq, FaqId, FaqSummary},
  vote::{DislikeComment, Identity, UserState, VoteRecord},
};

// ─── Failure classification ──────────────────────────────────────────────────

/// Coarse category of a store failure, enough for a caller to pick a response
/// without inspecting backend-specific error types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
  /// The target FAQ does not exist.
  FaqNotFound,
  /// A concurrent write won the race on the one-vote-per-identity constraint.
  /// Retrying will observe the current state.
  Conflict,
  /// Anything else: I/O, corruption, unexpected row shape.
  Unavailable,
}

/// Implemented by store error types.
pub trait ClassifyFailure {
  fn failure_kind(&self) -> FailureKind;
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a faqvote store backend.
///
/// `apply_like` and `apply_dislike` are each atomic: the current vote is read
/// and every resulting write performed within one transaction, so a failure
/// leaves the pair exactly as it was.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait VoteStore: Send + Sync {
  type Error: std::error::Error + ClassifyFailure + Send + Sync + 'static;

  // ── FAQs ──────────────────────────────────────────────────────────────

  /// Persist a new FAQ. Used by seeding and administration only.
  fn add_faq(
    &self,
    question: String,
    answer: String,
  ) -> impl Future<Output = Result<Faq, Self::Error>> + Send + '_;

  /// Number of stored FAQs.
  fn count_faqs(&self) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  // ── Votes ─────────────────────────────────────────────────────────────

  /// Like `faq_id` as `identity`, or retract an existing like.
  ///
  /// Returns the identity's state after the transition.
  fn apply_like<'a>(
    &'a self,
    faq_id: FaqId,
    identity: &'a Identity,
  ) -> impl Future<Output = Result<UserState, Self::Error>> + Send + 'a;

  /// Dislike `faq_id` as `identity` with `comment`, or retract an existing
  /// dislike (in which case `comment` is discarded).
  ///
  /// Returns the identity's state after the transition.
  fn apply_dislike<'a>(
    &'a self,
    faq_id: FaqId,
    identity: &'a Identity,
    comment: DislikeComment,
  ) -> impl Future<Output = Result<UserState, Self::Error>> + Send + 'a;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Every FAQ ordered by id, with totals and `identity`'s own state, all read
  /// from a single snapshot.
  fn list_with_state<'a>(
    &'a self,
    identity: &'a Identity,
  ) -> impl Future<Output = Result<Vec<FaqSummary>, Self::Error>> + Send + 'a;

  /// The stored review (and comment, if any) for one pair.
  fn vote_record<'a>(
    &'a self,
    faq_id: FaqId,
    identity: &'a Identity,
  ) -> impl Future<Output = Result<Option<VoteRecord>, Self::Error>> + Send + 'a;
}
