//! Server wiring for the faqvote widget: configuration, demo seeding and the
//! top-level router with request tracing.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use faqvote_core::store::VoteStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `FAQVOTE_*` environment variables. Every field has a default.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:           String,
  #[serde(default = "default_port")]
  pub port:           u16,
  #[serde(default = "default_store_path")]
  pub store_path:     PathBuf,
  /// Number of placeholder FAQs inserted into an empty store; `0` disables.
  #[serde(default = "default_seed_demo_faqs")]
  pub seed_demo_faqs: usize,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 3000 }

fn default_store_path() -> PathBuf { PathBuf::from("faqvote.sqlite3") }

fn default_seed_demo_faqs() -> usize { 10 }

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:           default_host(),
      port:           default_port(),
      store_path:     default_store_path(),
      seed_demo_faqs: default_seed_demo_faqs(),
    }
  }
}

impl ServerConfig {
  /// Layer the optional TOML file at `path` under `FAQVOTE_*` variables.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("FAQVOTE"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Seeding ──────────────────────────────────────────────────────────────────

/// Insert `count` placeholder FAQs ("Question N" / "Answer N") if the store
/// holds none. Returns how many were inserted.
pub async fn seed_demo_faqs<S: VoteStore>(store: &S, count: usize) -> Result<usize, S::Error> {
  if count == 0 || store.count_faqs().await? > 0 {
    return Ok(0);
  }

  tracing::info!(count, "seeding demo faqs");
  for i in 1..=count {
    store
      .add_faq(format!("Question {i}"), format!("Answer {i}"))
      .await?;
  }
  Ok(count)
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The full application: the JSON API with per-request tracing.
pub fn app<S>(store: Arc<S>) -> Router
where
  S: VoteStore + 'static,
{
  faqvote_api::api_router(store).layer(TraceLayer::new_for_http())
}
