//! Voter identity extractor.
//!
//! The identity is taken from `X-Forwarded-For`, then `Remote-Addr`, then
//! falls back to `127.0.0.1`. Both headers are client-controlled unless a
//! trusted proxy overwrites them, so this is only sound behind such a proxy.
//! It is a convenience for telling voters apart, not a security control.

use std::convert::Infallible;

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, request::Parts},
};
use faqvote_core::vote::Identity;

const FORWARDED_FOR: &str = "x-forwarded-for";
const REMOTE_ADDR: &str = "remote-addr";

/// The requesting client's identity, resolved from headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity(pub Identity);

/// Resolve an identity from request headers.
///
/// A forwarded list (`client, proxy1, proxy2`) yields its first entry. Empty
/// or non-UTF-8 values are skipped.
pub fn resolve_identity(headers: &HeaderMap) -> Identity {
  [FORWARDED_FOR, REMOTE_ADDR]
    .into_iter()
    .filter_map(|name| headers.get(name))
    .filter_map(|v| v.to_str().ok())
    .filter_map(|v| v.split(',').next())
    .map(str::trim)
    .find(|v| !v.is_empty())
    .map(Identity::new)
    .unwrap_or_else(Identity::loopback)
}

impl<S> FromRequestParts<S> for ClientIdentity
where
  S: Send + Sync,
{
  type Rejection = Infallible;

  async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
    Ok(ClientIdentity(resolve_identity(&parts.headers)))
  }
}
