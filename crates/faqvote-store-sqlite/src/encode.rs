//! Encoding and decoding helpers between Rust domain types and the plain
//! column values stored in SQLite.
//!
//! Timestamps are stored as RFC 3339 strings, `is_like` as 0/1 integers and
//! identities as the raw address text.

use chrono::{DateTime, Utc};
use faqvote_core::{
  faq::{Faq, FaqId, FaqSummary},
  vote::{Comment, Identity, Review, UserState},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_is_like(is_like: bool) -> i64 { i64::from(is_like) }

pub fn decode_is_like(v: i64) -> Result<bool> {
  match v {
    1 => Ok(true),
    0 => Ok(false),
    other => Err(Error::UnexpectedRow(format!("is_like = {other}"))),
  }
}

pub fn decode_faq_id(v: i64) -> Result<FaqId> {
  FaqId::new(v).ok_or_else(|| Error::UnexpectedRow(format!("faq id = {v}")))
}

fn decode_count(v: i64) -> Result<u64> {
  u64::try_from(v).map_err(|_| Error::UnexpectedRow(format!("count = {v}")))
}

// ─── Raw rows ────────────────────────────────────────────────────────────────

/// A `faqs` row as read from SQLite, before decoding.
pub struct RawFaq {
  pub id:         i64,
  pub question:   String,
  pub answer:     String,
  pub created_at: String,
  pub updated_at: String,
}

impl RawFaq {
  pub fn into_faq(self) -> Result<Faq> {
    Ok(Faq {
      id:         decode_faq_id(self.id)?,
      question:   self.question,
      answer:     self.answer,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// One row of the aggregated list query.
pub struct RawSummary {
  pub id:           i64,
  pub question:     String,
  pub answer:       String,
  pub likes:        i64,
  pub dislikes:     i64,
  /// `is_like` of the caller's own review, NULL when there is none.
  pub user_is_like: Option<i64>,
}

impl RawSummary {
  pub fn into_summary(self) -> Result<FaqSummary> {
    let is_like = self.user_is_like.map(decode_is_like).transpose()?;
    Ok(FaqSummary {
      id:         decode_faq_id(self.id)?,
      question:   self.question,
      answer:     self.answer,
      likes:      decode_count(self.likes)?,
      dislikes:   decode_count(self.dislikes)?,
      user_state: UserState::from_is_like(is_like),
    })
  }
}

/// A `reviews` row joined with its optional `comments` row.
pub struct RawVoteRecord {
  pub review_id:          i64,
  pub faq_id:             i64,
  pub ip_address:         String,
  pub is_like:            i64,
  pub review_created_at:  String,
  pub comment_id:         Option<i64>,
  pub comment:            Option<String>,
  pub comment_created_at: Option<String>,
}

impl RawVoteRecord {
  pub fn into_parts(self) -> Result<(Review, Option<Comment>)> {
    let review = Review {
      id:         self.review_id,
      faq_id:     decode_faq_id(self.faq_id)?,
      ip_address: Identity::new(self.ip_address),
      is_like:    decode_is_like(self.is_like)?,
      created_at: decode_dt(&self.review_created_at)?,
    };

    let comment = match (self.comment_id, self.comment, self.comment_created_at) {
      (Some(id), Some(comment), Some(at)) => Some(Comment {
        id,
        review_id: review.id,
        comment,
        created_at: decode_dt(&at)?,
      }),
      (None, None, None) => None,
      _ => {
        return Err(Error::UnexpectedRow(format!(
          "partial comment row for review {}",
          review.id
        )));
      }
    };

    Ok((review, comment))
  }
}
