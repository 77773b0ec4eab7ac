//! Core types and trait definitions for the faqvote widget.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! vote transition table lives in [`reconcile`] as a pure function; storage
//! backends implement [`store::VoteStore`] and execute what it decides.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod faq;
pub mod reconcile;
pub mod store;
pub mod vote;

pub use error::{Error, Result};
