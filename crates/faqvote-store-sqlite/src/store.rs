//! [`SqliteStore`] — the SQLite implementation of [`VoteStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::{OptionalExtension as _, TransactionBehavior};

use faqvote_core::{
  faq::{Faq, FaqId, FaqSummary},
  reconcile::{CurrentVote, Transition, VoteIntent, reconcile},
  store::VoteStore,
  vote::{DislikeComment, Identity, UserState, VoteRecord},
};

use crate::{
  Error, Result,
  encode::{RawFaq, RawSummary, RawVoteRecord, decode_is_like, encode_dt, encode_is_like},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A faqvote store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  #[cfg(test)]
  pub(crate) fn conn_for_tests(&self) -> &tokio_rusqlite::Connection { &self.conn }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run one voting intent as a single `BEGIN IMMEDIATE` transaction.
  ///
  /// The write lock is taken before the current vote is read, so no other
  /// connection can slip a review in between the read and the writes. Any
  /// error drops the transaction, which rolls it back.
  async fn apply_intent(
    &self,
    faq_id:   FaqId,
    identity: &Identity,
    intent:   VoteIntent,
  ) -> Result<UserState> {
    let faq_key = faq_id.get();
    let ip      = identity.as_str().to_owned();
    let now     = encode_dt(Utc::now());

    // The closure reports domain failures (missing FAQ, malformed row) in the
    // inner `Result`; returning early drops `tx`, rolling it back.
    let applied: Result<Transition> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let faq_exists = tx
          .query_row("SELECT 1 FROM faqs WHERE id = ?1", rusqlite::params![faq_key], |_| Ok(()))
          .optional()?
          .is_some();
        if !faq_exists {
          return Ok(Err(Error::FaqNotFound(faq_id)));
        }

        let stored: Option<(i64, i64)> = tx
          .query_row(
            "SELECT id, is_like FROM reviews WHERE faq_id = ?1 AND ip_address = ?2",
            rusqlite::params![faq_key, ip],
            |row| Ok((row.get(0)?, row.get(1)?)),
          )
          .optional()?;

        let current = match stored
          .map(|(review_id, is_like)| {
            decode_is_like(is_like).map(|is_like| CurrentVote { review_id, is_like })
          })
          .transpose()
        {
          Ok(current) => current,
          Err(e) => return Ok(Err(e)),
        };

        let transition = reconcile(current, intent);
        write_transition(&tx, faq_key, &ip, &now, &transition)?;
        tx.commit()?;

        Ok(Ok(transition))
      })
      .await?;

    let transition = applied?;
    tracing::debug!(
      faq_id = %faq_id,
      identity = %identity,
      transition = transition.name(),
      "vote reconciled"
    );
    Ok(transition.resulting_state())
  }
}

/// Perform the writes for `transition` inside `tx`.
fn write_transition(
  tx:         &rusqlite::Transaction<'_>,
  faq_key:    i64,
  ip:         &str,
  now:        &str,
  transition: &Transition,
) -> rusqlite::Result<()> {
  match transition {
    Transition::InsertLike => {
      insert_review(tx, faq_key, ip, true, now)?;
    }
    Transition::RetractLike { review_id } => {
      tx.execute("DELETE FROM reviews WHERE id = ?1", rusqlite::params![review_id])?;
    }
    Transition::DislikeToLike { review_id } => {
      set_is_like(tx, *review_id, true)?;
      tx.execute("DELETE FROM comments WHERE review_id = ?1", rusqlite::params![review_id])?;
    }
    Transition::InsertDislike { comment } => {
      let review_id = insert_review(tx, faq_key, ip, false, now)?;
      insert_comment(tx, review_id, comment, now)?;
    }
    Transition::LikeToDislike { review_id, comment } => {
      set_is_like(tx, *review_id, false)?;
      insert_comment(tx, *review_id, comment, now)?;
    }
    Transition::RetractDislike { review_id } => {
      tx.execute("DELETE FROM comments WHERE review_id = ?1", rusqlite::params![review_id])?;
      tx.execute("DELETE FROM reviews WHERE id = ?1", rusqlite::params![review_id])?;
    }
  }
  Ok(())
}

fn insert_review(
  tx:      &rusqlite::Transaction<'_>,
  faq_key: i64,
  ip:      &str,
  is_like: bool,
  now:     &str,
) -> rusqlite::Result<i64> {
  tx.execute(
    "INSERT INTO reviews (faq_id, ip_address, is_like, created_at) VALUES (?1, ?2, ?3, ?4)",
    rusqlite::params![faq_key, ip, encode_is_like(is_like), now],
  )?;
  Ok(tx.last_insert_rowid())
}

fn set_is_like(
  tx:        &rusqlite::Transaction<'_>,
  review_id: i64,
  is_like:   bool,
) -> rusqlite::Result<()> {
  tx.execute(
    "UPDATE reviews SET is_like = ?1 WHERE id = ?2",
    rusqlite::params![encode_is_like(is_like), review_id],
  )?;
  Ok(())
}

fn insert_comment(
  tx:        &rusqlite::Transaction<'_>,
  review_id: i64,
  comment:   &DislikeComment,
  now:       &str,
) -> rusqlite::Result<()> {
  tx.execute(
    "INSERT INTO comments (review_id, comment, created_at) VALUES (?1, ?2, ?3)",
    rusqlite::params![review_id, comment.as_str(), now],
  )?;
  Ok(())
}

// ─── VoteStore impl ──────────────────────────────────────────────────────────

impl VoteStore for SqliteStore {
  type Error = Error;

  // ── FAQs ──────────────────────────────────────────────────────────────────

  async fn add_faq(&self, question: String, answer: String) -> Result<Faq> {
    let at_str = encode_dt(Utc::now());

    let raw: RawFaq = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO faqs (question, answer, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)",
          rusqlite::params![question, answer, at_str],
        )?;
        Ok(RawFaq {
          id: conn.last_insert_rowid(),
          question,
          answer,
          created_at: at_str.clone(),
          updated_at: at_str,
        })
      })
      .await?;

    raw.into_faq()
  }

  async fn count_faqs(&self) -> Result<u64> {
    let count: i64 = self
      .conn
      .call(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM faqs", [], |r| r.get(0))?))
      .await?;

    u64::try_from(count).map_err(|_| Error::UnexpectedRow(format!("faq count = {count}")))
  }

  // ── Votes ─────────────────────────────────────────────────────────────────

  async fn apply_like(&self, faq_id: FaqId, identity: &Identity) -> Result<UserState> {
    self.apply_intent(faq_id, identity, VoteIntent::Like).await
  }

  async fn apply_dislike(
    &self,
    faq_id:   FaqId,
    identity: &Identity,
    comment:  DislikeComment,
  ) -> Result<UserState> {
    self.apply_intent(faq_id, identity, VoteIntent::Dislike(comment)).await
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn list_with_state(&self, identity: &Identity) -> Result<Vec<FaqSummary>> {
    let ip = identity.as_str().to_owned();

    // Totals and the caller's own vote come from one statement, hence one
    // snapshot.
    let raws: Vec<RawSummary> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT
             f.id, f.question, f.answer,
             COUNT(CASE WHEN r.is_like = 1 THEN 1 END)           AS likes,
             COUNT(CASE WHEN r.is_like = 0 THEN 1 END)           AS dislikes,
             MAX(CASE WHEN r.ip_address = ?1 THEN r.is_like END) AS user_is_like
           FROM faqs f
           LEFT JOIN reviews r ON r.faq_id = f.id
           GROUP BY f.id
           ORDER BY f.id ASC",
        )?;

        let rows = stmt
          .query_map(rusqlite::params![ip], |row| {
            Ok(RawSummary {
              id:           row.get(0)?,
              question:     row.get(1)?,
              answer:       row.get(2)?,
              likes:        row.get(3)?,
              dislikes:     row.get(4)?,
              user_is_like: row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSummary::into_summary).collect()
  }

  async fn vote_record(&self, faq_id: FaqId, identity: &Identity) -> Result<Option<VoteRecord>> {
    let faq_key = faq_id.get();
    let ip      = identity.as_str().to_owned();

    let raw: Option<RawVoteRecord> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT r.id, r.faq_id, r.ip_address, r.is_like, r.created_at,
                    c.id, c.comment, c.created_at
             FROM reviews r
             LEFT JOIN comments c ON c.review_id = r.id
             WHERE r.faq_id = ?1 AND r.ip_address = ?2",
            rusqlite::params![faq_key, ip],
            |row| {
              Ok(RawVoteRecord {
                review_id:          row.get(0)?,
                faq_id:             row.get(1)?,
                ip_address:         row.get(2)?,
                is_like:            row.get(3)?,
                review_created_at:  row.get(4)?,
                comment_id:         row.get(5)?,
                comment:            row.get(6)?,
                comment_created_at: row.get(7)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw
      .map(|r| r.into_parts().map(|(review, comment)| VoteRecord { review, comment }))
      .transpose()
  }
}
