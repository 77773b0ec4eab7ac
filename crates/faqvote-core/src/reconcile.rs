//! The vote transition table.
//!
//! Every `(faq, identity)` pair is in exactly one of three states: no review,
//! a liking review, or a disliking review with its comment. A voting intent
//! moves the pair to its next state; repeating the current vote retracts it.
//!
//! | current  | intent  | transition                       | next     |
//! |----------|---------|----------------------------------|----------|
//! | none     | like    | insert review (like)             | liked    |
//! | liked    | like    | delete review                    | none     |
//! | disliked | like    | flip to like, delete comment     | liked    |
//! | none     | dislike | insert review (dislike), comment | disliked |
//! | liked    | dislike | flip to dislike, insert comment  | disliked |
//! | disliked | dislike | delete comment, delete review    | none     |
//!
//! [`reconcile`] only decides. Stores read [`CurrentVote`] inside a
//! transaction, call it, and apply the returned [`Transition`] before
//! committing.

use crate::vote::{DislikeComment, UserState};

/// What the voter asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteIntent {
  Like,
  Dislike(DislikeComment),
}

/// The stored review for a pair, if one exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentVote {
  pub review_id: i64,
  pub is_like:   bool,
}

/// The writes a store must perform, one variant per row of the table above.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
  /// Insert a review with `is_like = 1`.
  InsertLike,
  /// Delete the liking review.
  RetractLike { review_id: i64 },
  /// Set `is_like = 1` and delete the review's comment.
  DislikeToLike { review_id: i64 },
  /// Insert a review with `is_like = 0` and its comment.
  InsertDislike { comment: DislikeComment },
  /// Set `is_like = 0` and insert the comment.
  LikeToDislike { review_id: i64, comment: DislikeComment },
  /// Delete the review's comment, then the review.
  ///
  /// The comment sent with the retracting request is discarded, not stored.
  RetractDislike { review_id: i64 },
}

impl Transition {
  /// The pair's state once the transition has been applied.
  pub fn resulting_state(&self) -> UserState {
    match self {
      Self::InsertLike | Self::DislikeToLike { .. } => UserState::Liked,
      Self::InsertDislike { .. } | Self::LikeToDislike { .. } => UserState::Disliked,
      Self::RetractLike { .. } | Self::RetractDislike { .. } => UserState::None,
    }
  }

  /// Short name used in logs.
  pub fn name(&self) -> &'static str {
    match self {
      Self::InsertLike => "insert_like",
      Self::RetractLike { .. } => "retract_like",
      Self::DislikeToLike { .. } => "dislike_to_like",
      Self::InsertDislike { .. } => "insert_dislike",
      Self::LikeToDislike { .. } => "like_to_dislike",
      Self::RetractDislike { .. } => "retract_dislike",
    }
  }
}

/// Decide the transition for `intent` given the pair's stored vote.
pub fn reconcile(current: Option<CurrentVote>, intent: VoteIntent) -> Transition {
  match (current, intent) {
    (None, VoteIntent::Like) => Transition::InsertLike,
    (Some(CurrentVote { review_id, is_like: true }), VoteIntent::Like) => {
      Transition::RetractLike { review_id }
    }
    (Some(CurrentVote { review_id, is_like: false }), VoteIntent::Like) => {
      Transition::DislikeToLike { review_id }
    }
    (None, VoteIntent::Dislike(comment)) => Transition::InsertDislike { comment },
    (Some(CurrentVote { review_id, is_like: true }), VoteIntent::Dislike(comment)) => {
      Transition::LikeToDislike { review_id, comment }
    }
    (Some(CurrentVote { review_id, is_like: false }), VoteIntent::Dislike(_)) => {
      Transition::RetractDislike { review_id }
    }
  }
}
