//! SQL schema for the faqvote SQLite store.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! schema revision so later migrations can be gated on it.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS faqs (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    question    TEXT NOT NULL,
    answer      TEXT NOT NULL,
    created_at  TEXT NOT NULL,   -- RFC 3339 UTC
    updated_at  TEXT NOT NULL
);

-- One vote per (identity, faq). is_like: 1 = like, 0 = dislike.
CREATE TABLE IF NOT EXISTS reviews (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    faq_id      INTEGER NOT NULL REFERENCES faqs(id),
    ip_address  TEXT NOT NULL,
    is_like     INTEGER NOT NULL CHECK (is_like IN (0, 1)),
    created_at  TEXT NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS review_faq_idx ON reviews(ip_address, faq_id);
CREATE INDEX IF NOT EXISTS reviews_faq_idx ON reviews(faq_id);

-- Present exactly for disliking reviews.
CREATE TABLE IF NOT EXISTS comments (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    review_id   INTEGER NOT NULL REFERENCES reviews(id),
    comment     TEXT NOT NULL CHECK (length(comment) BETWEEN 1 AND 500),
    created_at  TEXT NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS comments_review_idx ON comments(review_id);

PRAGMA user_version = 1;
";
