//! Integration tests for `SqliteStore` against an in-memory database.

use faqvote_core::{
  faq::{FaqId, FaqSummary},
  store::{ClassifyFailure as _, FailureKind, VoteStore},
  vote::{DislikeComment, Identity, UserState},
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn store_with_faq() -> (SqliteStore, FaqId) {
  let s = store().await;
  let faq = s
    .add_faq("How do I reset my password?".into(), "Use the link on the login page.".into())
    .await
    .unwrap();
  (s, faq.id)
}

fn ip(addr: &str) -> Identity { Identity::new(addr) }

fn comment(text: &str) -> DislikeComment { DislikeComment::new(text).unwrap() }

async fn summary(s: &SqliteStore, faq_id: FaqId, who: &Identity) -> FaqSummary {
  s.list_with_state(who)
    .await
    .unwrap()
    .into_iter()
    .find(|f| f.id == faq_id)
    .expect("faq listed")
}

/// Review/comment invariant for one pair, checked against the stored rows.
async fn assert_consistent(s: &SqliteStore, faq_id: FaqId, who: &Identity, expected: UserState) {
  let record = s.vote_record(faq_id, who).await.unwrap();
  match expected {
    UserState::None => assert!(record.is_none(), "expected no review, got {record:?}"),
    state => {
      let record = record.expect("review present");
      assert_eq!(record.state(), state);
      assert!(record.is_consistent(), "comment out of sync: {record:?}");
    }
  }
}

// ─── FAQs ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_count_faqs() {
  let s = store().await;
  assert_eq!(s.count_faqs().await.unwrap(), 0);

  let first = s.add_faq("Q1".into(), "A1".into()).await.unwrap();
  let second = s.add_faq("Q2".into(), "A2".into()).await.unwrap();

  assert!(first.id < second.id);
  assert_eq!(first.question, "Q1");
  assert_eq!(first.created_at, first.updated_at);
  assert_eq!(s.count_faqs().await.unwrap(), 2);
}

#[tokio::test]
async fn list_is_ordered_and_fresh_identity_sees_none() {
  let s = store().await;
  for i in 1..=3 {
    s.add_faq(format!("Question {i}"), format!("Answer {i}")).await.unwrap();
  }

  let list = s.list_with_state(&ip("9.9.9.9")).await.unwrap();
  assert_eq!(list.len(), 3);
  assert!(list.windows(2).all(|w| w[0].id < w[1].id));
  assert!(list.iter().all(|f| f.user_state == UserState::None));
  assert!(list.iter().all(|f| f.likes == 0 && f.dislikes == 0));
  assert_eq!(list[0].question, "Question 1");
}

#[tokio::test]
async fn list_empty_store() {
  let s = store().await;
  assert!(s.list_with_state(&Identity::loopback()).await.unwrap().is_empty());
}

// ─── Likes ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn like_from_none_then_dislike() {
  let (s, faq) = store_with_faq().await;
  let who = ip("1.1.1.1");

  assert_eq!(s.apply_like(faq, &who).await.unwrap(), UserState::Liked);
  let after_like = summary(&s, faq, &who).await;
  assert_eq!((after_like.likes, after_like.dislikes), (1, 0));
  assert_eq!(after_like.user_state, UserState::Liked);
  assert_consistent(&s, faq, &who, UserState::Liked).await;

  assert_eq!(
    s.apply_dislike(faq, &who, comment("too vague")).await.unwrap(),
    UserState::Disliked
  );
  let after_dislike = summary(&s, faq, &who).await;
  assert_eq!((after_dislike.likes, after_dislike.dislikes), (0, 1));
  assert_eq!(after_dislike.user_state, UserState::Disliked);

  let record = s.vote_record(faq, &who).await.unwrap().unwrap();
  let stored = record.comment.expect("comment stored");
  assert_eq!(stored.comment, "too vague");
  assert_eq!(stored.review_id, record.review.id);
}

#[tokio::test]
async fn like_twice_leaves_no_rows() {
  let (s, faq) = store_with_faq().await;
  let who = ip("1.1.1.1");

  assert_eq!(s.apply_like(faq, &who).await.unwrap(), UserState::Liked);
  assert_eq!(s.apply_like(faq, &who).await.unwrap(), UserState::None);

  assert_consistent(&s, faq, &who, UserState::None).await;
  let after = summary(&s, faq, &who).await;
  assert_eq!((after.likes, after.dislikes), (0, 0));
}

#[tokio::test]
async fn like_parity() {
  let (s, faq) = store_with_faq().await;
  let who = ip("1.1.1.1");

  for n in 1..=6 {
    let state = s.apply_like(faq, &who).await.unwrap();
    let expected = if n % 2 == 1 { UserState::Liked } else { UserState::None };
    assert_eq!(state, expected, "after {n} likes");
    assert_consistent(&s, faq, &who, expected).await;
  }
}

#[tokio::test]
async fn like_after_dislike_flips_and_removes_comment() {
  let (s, faq) = store_with_faq().await;
  let who = ip("1.1.1.1");

  s.apply_dislike(faq, &who, comment("unclear")).await.unwrap();
  let review_id = s.vote_record(faq, &who).await.unwrap().unwrap().review.id;

  assert_eq!(s.apply_like(faq, &who).await.unwrap(), UserState::Liked);

  let record = s.vote_record(faq, &who).await.unwrap().unwrap();
  assert_eq!(record.review.id, review_id, "review is updated in place");
  assert!(record.review.is_like);
  assert!(record.comment.is_none());
}

// ─── Dislikes ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn dislike_twice_retracts_and_discards_second_comment() {
  let (s, faq) = store_with_faq().await;
  let who = ip("1.1.1.1");

  assert_eq!(s.apply_dislike(faq, &who, comment("bad")).await.unwrap(), UserState::Disliked);
  assert_consistent(&s, faq, &who, UserState::Disliked).await;

  assert_eq!(s.apply_dislike(faq, &who, comment("ignored")).await.unwrap(), UserState::None);
  assert_consistent(&s, faq, &who, UserState::None).await;

  let after = summary(&s, faq, &who).await;
  assert_eq!((after.likes, after.dislikes), (0, 0));
}

#[tokio::test]
async fn dislike_after_like_keeps_review_and_adds_comment() {
  let (s, faq) = store_with_faq().await;
  let who = ip("1.1.1.1");

  s.apply_like(faq, &who).await.unwrap();
  let review_id = s.vote_record(faq, &who).await.unwrap().unwrap().review.id;

  s.apply_dislike(faq, &who, comment("changed my mind")).await.unwrap();
  let record = s.vote_record(faq, &who).await.unwrap().unwrap();
  assert_eq!(record.review.id, review_id);
  assert!(!record.review.is_like);
  assert_eq!(record.comment.unwrap().comment, "changed my mind");
}

#[tokio::test]
async fn full_cycle_keeps_invariant() {
  let (s, faq) = store_with_faq().await;
  let who = ip("1.1.1.1");

  let steps: [(bool, UserState); 6] = [
    (false, UserState::Disliked),
    (true, UserState::Liked),
    (false, UserState::Disliked),
    (false, UserState::None),
    (true, UserState::Liked),
    (true, UserState::None),
  ];

  for (i, (like, expected)) in steps.into_iter().enumerate() {
    let state = if like {
      s.apply_like(faq, &who).await.unwrap()
    } else {
      s.apply_dislike(faq, &who, comment(&format!("step {i}"))).await.unwrap()
    };
    assert_eq!(state, expected, "step {i}");
    assert_consistent(&s, faq, &who, expected).await;
  }
}

#[tokio::test]
async fn max_length_comment_is_stored() {
  let (s, faq) = store_with_faq().await;
  let who = ip("1.1.1.1");
  let text = "x".repeat(DislikeComment::MAX_CHARS);

  s.apply_dislike(faq, &who, comment(&text)).await.unwrap();
  let record = s.vote_record(faq, &who).await.unwrap().unwrap();
  assert_eq!(record.comment.unwrap().comment, text);
}

// ─── Identities ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn identities_are_independent() {
  let (s, faq) = store_with_faq().await;
  let alice = ip("1.1.1.1");
  let bob = ip("2.2.2.2");

  s.apply_like(faq, &alice).await.unwrap();
  s.apply_dislike(faq, &bob, comment("nope")).await.unwrap();

  let seen_by_alice = summary(&s, faq, &alice).await;
  let seen_by_bob = summary(&s, faq, &bob).await;
  let seen_by_other = summary(&s, faq, &ip("3.3.3.3")).await;

  assert_eq!((seen_by_alice.likes, seen_by_alice.dislikes), (1, 1));
  assert_eq!(seen_by_alice.user_state, UserState::Liked);
  assert_eq!(seen_by_bob.user_state, UserState::Disliked);
  assert_eq!(seen_by_other.user_state, UserState::None);
}

#[tokio::test]
async fn votes_are_scoped_per_faq() {
  let s = store().await;
  let first = s.add_faq("Q1".into(), "A1".into()).await.unwrap().id;
  let second = s.add_faq("Q2".into(), "A2".into()).await.unwrap().id;
  let who = ip("1.1.1.1");

  s.apply_like(first, &who).await.unwrap();
  s.apply_dislike(second, &who, comment("meh")).await.unwrap();

  let list = s.list_with_state(&who).await.unwrap();
  assert_eq!(list[0].user_state, UserState::Liked);
  assert_eq!(list[1].user_state, UserState::Disliked);
  assert_eq!((list[0].likes, list[0].dislikes), (1, 0));
  assert_eq!((list[1].likes, list[1].dislikes), (0, 1));
}

// ─── Failures ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn unknown_faq_is_not_found_and_writes_nothing() {
  let (s, _) = store_with_faq().await;
  let missing = FaqId::new(999).unwrap();
  let who = ip("1.1.1.1");

  let err = s.apply_like(missing, &who).await.unwrap_err();
  assert!(matches!(err, Error::FaqNotFound(id) if id == missing));
  assert_eq!(err.failure_kind(), FailureKind::FaqNotFound);

  let err = s.apply_dislike(missing, &who, comment("x")).await.unwrap_err();
  assert_eq!(err.failure_kind(), FailureKind::FaqNotFound);

  assert!(s.vote_record(missing, &who).await.unwrap().is_none());
}

#[tokio::test]
async fn concurrent_likes_serialise_to_parity() {
  let (s, faq) = store_with_faq().await;
  let who = ip("1.1.1.1");

  let handles: Vec<_> = (0..10)
    .map(|_| {
      let s = s.clone();
      let who = who.clone();
      tokio::spawn(async move { s.apply_like(faq, &who).await })
    })
    .collect();

  for h in handles {
    h.await.unwrap().unwrap();
  }

  // Ten toggles from none land back on none, with no duplicate reviews.
  assert_consistent(&s, faq, &who, UserState::None).await;
  let after = summary(&s, faq, &who).await;
  assert_eq!((after.likes, after.dislikes), (0, 0));
}

#[tokio::test]
async fn concurrent_likes_across_connections_never_duplicate() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("votes.sqlite3");

  let a = SqliteStore::open(&path).await.unwrap();
  let b = SqliteStore::open(&path).await.unwrap();
  let faq = a.add_faq("Q".into(), "A".into()).await.unwrap().id;
  let who = ip("1.1.1.1");

  let (ra, rb) = tokio::join!(a.apply_like(faq, &who), b.apply_like(faq, &who));

  // Each attempt either applied cleanly or failed without side effects.
  let applied = [ra, rb]
    .into_iter()
    .filter(|r| match r {
      Ok(_) => true,
      Err(e) => {
        assert_ne!(e.failure_kind(), FailureKind::FaqNotFound, "unexpected error: {e}");
        false
      }
    })
    .count();

  let record = a.vote_record(faq, &who).await.unwrap();
  let likes = summary(&a, faq, &who).await.likes;
  assert!(likes <= 1);
  match applied {
    1 => assert_eq!(likes, 1),
    2 => assert!(record.is_none() && likes == 0),
    _ => assert!(record.is_none()),
  }
}

#[tokio::test]
async fn unique_violation_is_classified_as_conflict() {
  let (s, faq) = store_with_faq().await;
  let key = faq.get();

  let err: Error = s
    .conn_for_tests()
    .call(move |conn| {
      let insert = "INSERT INTO reviews (faq_id, ip_address, is_like, created_at)
                    VALUES (?1, '1.1.1.1', 1, '2024-01-01T00:00:00+00:00')";
      conn.execute(insert, rusqlite::params![key])?;
      conn.execute(insert, rusqlite::params![key])?;
      Ok(())
    })
    .await
    .map_err(Error::from)
    .unwrap_err();

  assert!(err.is_unique_violation());
  assert_eq!(err.failure_kind(), FailureKind::Conflict);
}

#[tokio::test]
async fn failed_comment_insert_rolls_back_the_whole_transition() {
  let (s, faq) = store_with_faq().await;
  let who = ip("1.1.1.1");

  s.apply_like(faq, &who).await.unwrap();
  s.conn_for_tests()
    .call(|conn| {
      conn.execute_batch(
        "CREATE TRIGGER reject_comments BEFORE INSERT ON comments
         BEGIN SELECT RAISE(ABORT, 'comment rejected'); END;",
      )?;
      Ok(())
    })
    .await
    .unwrap();

  // LIKED -> DISLIKED: the is_like flip must not survive the failed insert.
  let err = s.apply_dislike(faq, &who, comment("nope")).await.unwrap_err();
  assert_eq!(err.failure_kind(), FailureKind::Unavailable);
  assert_consistent(&s, faq, &who, UserState::Liked).await;
  let after = summary(&s, faq, &who).await;
  assert_eq!((after.likes, after.dislikes), (1, 0));

  // NONE -> DISLIKED: the review insert must not survive either.
  let other = ip("2.2.2.2");
  assert!(s.apply_dislike(faq, &other, comment("nope")).await.is_err());
  assert_consistent(&s, faq, &other, UserState::None).await;
  assert_eq!(summary(&s, faq, &other).await.dislikes, 0);
}

#[tokio::test]
async fn malformed_is_like_is_reported_and_left_untouched() {
  let (s, faq) = store_with_faq().await;
  let key = faq.get();

  s.conn_for_tests()
    .call(move |conn| {
      conn.execute_batch("PRAGMA ignore_check_constraints = ON;")?;
      conn.execute(
        "INSERT INTO reviews (faq_id, ip_address, is_like, created_at)
         VALUES (?1, '1.1.1.1', 2, '2024-01-01T00:00:00+00:00')",
        rusqlite::params![key],
      )?;
      Ok(())
    })
    .await
    .unwrap();

  let err = s.apply_like(faq, &ip("1.1.1.1")).await.unwrap_err();
  assert!(matches!(err, Error::UnexpectedRow(_)), "got {err:?}");

  let stored: i64 = s
    .conn_for_tests()
    .call(move |conn| {
      Ok(conn.query_row(
        "SELECT is_like FROM reviews WHERE faq_id = ?1 AND ip_address = '1.1.1.1'",
        rusqlite::params![key],
        |row| row.get(0),
      )?)
    })
    .await
    .unwrap();
  assert_eq!(stored, 2);
}
