//! The `RecordSource` trait and the record bundle it produces.
//!
//! A record source is the ingestion collaborator: it hands the engine
//! validated, well-typed rows (e.g. `enkaku-ingest` reading CSV files).
//! The engine never re-validates types; it treats only business-level
//! anomalies (blank names, duplicate codes) as data-quality exclusions.

use std::future::Future;

use crate::{
  event::ChangeEvent,
  model::{County, MunicipalityVersion, Prefecture, Subprefecture},
};

/// Every input collection, fully fetched. Immutable once handed to the
/// engine.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
  pub prefectures:    Vec<Prefecture>,
  pub subprefectures: Vec<Subprefecture>,
  pub counties:       Vec<County>,
  pub versions:       Vec<MunicipalityVersion>,
  pub events:         Vec<ChangeEvent>,
}

/// Abstraction over an input-collection provider.
///
/// The engine fetches all five collections concurrently during `load()`;
/// each method is independent and may be called at most once per load.
/// Any fetch failure aborts the whole load.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait RecordSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn fetch_prefectures(
    &self,
  ) -> impl Future<Output = Result<Vec<Prefecture>, Self::Error>> + Send + '_;

  /// Subprefectures are an optional tier; sources without one return an
  /// empty collection.
  fn fetch_subprefectures(
    &self,
  ) -> impl Future<Output = Result<Vec<Subprefecture>, Self::Error>> + Send + '_;

  fn fetch_counties(
    &self,
  ) -> impl Future<Output = Result<Vec<County>, Self::Error>> + Send + '_;

  fn fetch_versions(
    &self,
  ) -> impl Future<Output = Result<Vec<MunicipalityVersion>, Self::Error>> + Send + '_;

  fn fetch_events(
    &self,
  ) -> impl Future<Output = Result<Vec<ChangeEvent>, Self::Error>> + Send + '_;
}
