//! FAQ entries and the per-identity read model built over them.
//!
//! FAQs are created by an admin or seed process and never changed by voting.
//! Counts and the caller's own vote are derived on read, never stored.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, vote::UserState};

// ─── Identifier ──────────────────────────────────────────────────────────────

/// Primary key of an [`Faq`]. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FaqId(i64);

impl FaqId {
  /// Wrap a raw key. Returns `None` for zero or negative values.
  pub fn new(raw: i64) -> Option<Self> { (raw > 0).then_some(Self(raw)) }

  /// Parse an id from a URL path segment.
  ///
  /// Only ASCII digits are accepted: no sign, no whitespace, no exponent.
  /// Zero and values that overflow `i64` are rejected as well.
  pub fn parse_path_segment(segment: &str) -> Result<Self> {
    let invalid = || Error::InvalidFaqId(segment.to_owned());

    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
      return Err(invalid());
    }

    segment
      .parse::<i64>()
      .ok()
      .and_then(Self::new)
      .ok_or_else(invalid)
  }

  pub fn get(self) -> i64 { self.0 }
}

impl fmt::Display for FaqId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// A question/answer pair shown in the public list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faq {
  pub id:         FaqId,
  pub question:   String,
  pub answer:     String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// One row of the list endpoint: an FAQ with its vote totals and the
/// requesting identity's own vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqSummary {
  pub id:         FaqId,
  pub question:   String,
  pub answer:     String,
  pub likes:      u64,
  pub dislikes:   u64,
  pub user_state: UserState,
}
