//! Error types for `enkaku-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown event type: {0:?}")]
  UnknownEventType(String),

  #[error("invalid date: {0:?} (expected YYYY-MM-DD)")]
  InvalidDate(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
