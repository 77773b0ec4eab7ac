//! Votes: who cast them, what they say, and how they are persisted.
//!
//! A voter is identified only by the address the request came from. Each
//! `(faq, identity)` pair holds at most one [`Review`]; a dislike carries
//! exactly one [`Comment`], a like carries none.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, faq::FaqId};

// ─── Identity ────────────────────────────────────────────────────────────────

/// The voter-distinguishing key: the client's IP address as reported by the
/// transport layer. No authentication is implied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
  pub const LOOPBACK: &'static str = "127.0.0.1";

  pub fn new(address: impl Into<String>) -> Self { Self(address.into()) }

  /// Identity used when the transport supplies no address at all.
  pub fn loopback() -> Self { Self(Self::LOOPBACK.to_owned()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for Identity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

// ─── Comment text ────────────────────────────────────────────────────────────

/// Free-text reason attached to a dislike, validated to 1..=500 characters.
///
/// Length is counted in `char`s, matching SQLite's `length()` on TEXT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DislikeComment(String);

impl DislikeComment {
  pub const MAX_CHARS: usize = 500;

  pub fn new(text: impl Into<String>) -> Result<Self> {
    let text = text.into();
    let chars = text.chars().count();
    if chars == 0 {
      return Err(Error::EmptyComment);
    }
    if chars > Self::MAX_CHARS {
      return Err(Error::CommentTooLong { chars });
    }
    Ok(Self(text))
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

// ─── Derived state ───────────────────────────────────────────────────────────

/// The requesting identity's vote on one FAQ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserState {
  #[default]
  None,
  Liked,
  Disliked,
}

impl UserState {
  /// Map a stored `is_like` column (absent when there is no review).
  pub fn from_is_like(is_like: Option<bool>) -> Self {
    match is_like {
      None => Self::None,
      Some(true) => Self::Liked,
      Some(false) => Self::Disliked,
    }
  }
}

impl fmt::Display for UserState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::None => "none",
      Self::Liked => "liked",
      Self::Disliked => "disliked",
    })
  }
}

// ─── Persisted records ───────────────────────────────────────────────────────

/// One identity's vote on one FAQ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
  pub id:         i64,
  pub faq_id:     FaqId,
  pub ip_address: Identity,
  pub is_like:    bool,
  pub created_at: DateTime<Utc>,
}

/// The reason text attached to a disliking [`Review`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
  pub id:         i64,
  pub review_id:  i64,
  pub comment:    String,
  pub created_at: DateTime<Utc>,
}

/// A review together with its comment, as currently stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
  pub review:  Review,
  pub comment: Option<Comment>,
}

impl VoteRecord {
  pub fn state(&self) -> UserState { UserState::from_is_like(Some(self.review.is_like)) }

  /// `true` when the comment is present exactly for a dislike.
  pub fn is_consistent(&self) -> bool { self.review.is_like == self.comment.is_none() }
}
