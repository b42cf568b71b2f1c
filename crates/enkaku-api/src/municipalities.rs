//! Handlers for `/municipalities` routes.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use enkaku_core::{event::AdjacentEvents, model::Municipality, source::RecordSource};
use enkaku_engine::DataStore;
use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  /// Restrict to municipalities that still exist.
  #[serde(default)]
  pub current: bool,
}

/// `GET /municipalities[?current=true]`
pub async fn list<S>(
  State(store): State<Arc<DataStore<S>>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Municipality>>, ApiError>
where
  S: RecordSource + 'static,
{
  let snapshot = store.snapshot()?;
  let municipalities = if params.current {
    snapshot.current_municipalities()
  } else {
    snapshot.municipalities().to_vec()
  };
  Ok(Json(municipalities))
}

/// `GET /municipalities/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<DataStore<S>>>,
  Path(id): Path<String>,
) -> Result<Json<Municipality>, ApiError>
where
  S: RecordSource + 'static,
{
  let snapshot = store.snapshot()?;
  snapshot
    .municipality(&id)
    .cloned()
    .map(Json)
    .ok_or_else(|| ApiError::NotFound(format!("municipality {id}")))
}

/// `GET /municipalities/{id}/versions/{index}/adjacent`
///
/// `index` addresses the municipality's chronologically-sorted versions.
pub async fn adjacent<S>(
  State(store): State<Arc<DataStore<S>>>,
  Path((id, index)): Path<(String, usize)>,
) -> Result<Json<AdjacentEvents>, ApiError>
where
  S: RecordSource + 'static,
{
  let snapshot = store.snapshot()?;
  let municipality = snapshot
    .municipality(&id)
    .ok_or_else(|| ApiError::NotFound(format!("municipality {id}")))?;
  let version = municipality.versions.get(index).ok_or_else(|| {
    ApiError::NotFound(format!("version {index} of municipality {id}"))
  })?;
  Ok(Json(snapshot.adjacent_events(&id, version)))
}
