//! Error types for `enkaku-engine`.
//!
//! Only loading can fail. Every traversal query is total over its domain:
//! unknown ids and vacuous lookups yield empty results, never errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("data not loaded; call load() first")]
  NotLoaded,

  /// A previous load attempt failed; the failure is sticky until `reset()`.
  #[error("load failed: {0}")]
  LoadFailed(String),

  #[error("record source error: {0}")]
  Source(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
