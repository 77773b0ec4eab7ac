//! Error types for `faqvote-core`.
//!
//! Everything here is a validation failure: input rejected before any store
//! is touched.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  #[error("Invalid faq id")]
  InvalidFaqId(String),

  #[error("Comment empty")]
  EmptyComment,

  #[error("Comment too long")]
  CommentTooLong { chars: usize },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
