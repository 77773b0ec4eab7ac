//! JSON API for the faqvote widget.
//!
//! Exposes an axum [`Router`] backed by any [`faqvote_core::store::VoteStore`].
//! Every response uses the `{"success":bool, "data":...}` envelope. TLS,
//! request tracing and the listening socket are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = faqvote_api::api_router(Arc::new(store));
//! ```

pub mod envelope;
pub mod error;
pub mod faqs;
pub mod identity;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use faqvote_core::store::VoteStore;

pub use error::ApiError;
pub use identity::ClientIdentity;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: VoteStore + 'static,
{
  Router::new()
    .route("/faqs", get(faqs::list::<S>))
    .route("/faqs/{id}/like", post(faqs::like::<S>))
    .route("/faqs/{id}/dislike", post(faqs::dislike::<S>))
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────
