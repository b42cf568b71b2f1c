//! Error types for `enkaku-ingest`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("reading {path}: {source}")]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("parsing {file}: {source}")]
  Csv {
    file:   &'static str,
    #[source]
    source: csv::Error,
  },

  /// A row that parsed as CSV but failed business-level validation
  /// (bad date, unknown event type).
  #[error("{file} line {line}: {source}")]
  Row {
    file:   &'static str,
    line:   usize,
    #[source]
    source: enkaku_core::Error,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
