//! Handler for `GET /municipalities/{id}/ancestors`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use enkaku_core::{event::ChangeEvent, source::RecordSource};
use enkaku_engine::DataStore;
use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Deserialize, Default)]
pub struct AncestorParams {
  /// Also splice in the surviving host's pre-merger history.
  #[serde(default)]
  pub mergers: bool,
}

/// `GET /municipalities/{id}/ancestors[?mergers=true]`
pub async fn ancestors<S>(
  State(store): State<Arc<DataStore<S>>>,
  Path(id): Path<String>,
  Query(params): Query<AncestorParams>,
) -> Result<Json<Vec<ChangeEvent>>, ApiError>
where
  S: RecordSource + 'static,
{
  let snapshot = store.snapshot()?;
  if snapshot.municipality(&id).is_none() {
    return Err(ApiError::NotFound(format!("municipality {id}")));
  }
  let events = if params.mergers {
    snapshot.ancestors_with_mergers(&id)
  } else {
    snapshot.ancestors(&id)
  };
  Ok(Json(events))
}
