//! Handler for `GET /search`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use enkaku_core::{model::Municipality, source::RecordSource};
use enkaku_engine::DataStore;
use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
  /// Case-insensitive substring, matched across municipality, prefecture,
  /// county and subprefecture fields. Blank returns everything.
  #[serde(default)]
  pub q: String,
}

/// `GET /search[?q=...]`
pub async fn handler<S>(
  State(store): State<Arc<DataStore<S>>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Municipality>>, ApiError>
where
  S: RecordSource + 'static,
{
  let snapshot = store.snapshot()?;
  Ok(Json(snapshot.search(&params.q)))
}
