//! Error type for `faqvote-store-sqlite`.

use faqvote_core::{
  faq::FaqId,
  store::{ClassifyFailure, FailureKind},
};
use rusqlite::ffi;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored row does not have the shape the schema promises.
  #[error("unexpected row: {0}")]
  UnexpectedRow(String),

  #[error("faq not found: {0}")]
  FaqNotFound(FaqId),
}

impl Error {
  /// `true` when SQLite rejected a write on a UNIQUE constraint.
  pub fn is_unique_violation(&self) -> bool {
    matches!(
      self,
      Error::Database(tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, _)))
        if e.code == rusqlite::ErrorCode::ConstraintViolation
          && e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
    )
  }
}

impl ClassifyFailure for Error {
  fn failure_kind(&self) -> FailureKind {
    match self {
      Error::FaqNotFound(_) => FailureKind::FaqNotFound,
      e if e.is_unique_violation() => FailureKind::Conflict,
      _ => FailureKind::Unavailable,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
