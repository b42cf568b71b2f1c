//! JSON REST API for the enkaku municipal-lineage engine.
//!
//! Exposes an axum [`Router`] over a [`DataStore`] backed by any
//! [`RecordSource`](enkaku_core::source::RecordSource). Transport concerns
//! (TLS, auth) are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", enkaku_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod lineage;
pub mod municipalities;
pub mod search;

use std::sync::Arc;

use axum::{Router, routing::get};
use enkaku_core::source::RecordSource;
use enkaku_engine::DataStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<DataStore<S>>) -> Router<()>
where
  S: RecordSource + 'static,
{
  Router::new()
    // Municipalities
    .route("/municipalities", get(municipalities::list::<S>))
    .route("/municipalities/{id}", get(municipalities::get_one::<S>))
    .route(
      "/municipalities/{id}/versions/{index}/adjacent",
      get(municipalities::adjacent::<S>),
    )
    // Lineage
    .route(
      "/municipalities/{id}/ancestors",
      get(lineage::ancestors::<S>),
    )
    // Search
    .route("/search", get(search::handler::<S>))
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::{io, sync::Arc};

  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use chrono::NaiveDate;
  use enkaku_core::{
    event::{ChangeEvent, EventType},
    model::{County, MunicipalityVersion, Prefecture, Subprefecture},
    source::{RecordSet, RecordSource},
  };
  use enkaku_engine::DataStore;
  use tower::ServiceExt as _;

  use super::*;

  #[derive(Clone)]
  struct StaticSource {
    records: RecordSet,
  }

  impl RecordSource for StaticSource {
    type Error = io::Error;

    async fn fetch_prefectures(&self) -> Result<Vec<Prefecture>, io::Error> {
      Ok(self.records.prefectures.clone())
    }

    async fn fetch_subprefectures(
      &self,
    ) -> Result<Vec<Subprefecture>, io::Error> {
      Ok(self.records.subprefectures.clone())
    }

    async fn fetch_counties(&self) -> Result<Vec<County>, io::Error> {
      Ok(self.records.counties.clone())
    }

    async fn fetch_versions(
      &self,
    ) -> Result<Vec<MunicipalityVersion>, io::Error> {
      Ok(self.records.versions.clone())
    }

    async fn fetch_events(&self) -> Result<Vec<ChangeEvent>, io::Error> {
      Ok(self.records.events.clone())
    }
  }

  fn version(
    code: &str,
    name: &str,
    reading: &str,
    county: &str,
    from: Option<&str>,
    to: Option<&str>,
  ) -> MunicipalityVersion {
    MunicipalityVersion {
      municipality_id:    None,
      code:               code.into(),
      name:               name.into(),
      reading:            reading.into(),
      prefecture_code:    "01".into(),
      subprefecture_code: String::new(),
      county_code:        county.into(),
      valid_from:         from.map(|s| s.parse::<NaiveDate>().unwrap()),
      valid_to:           to.map(|s| s.parse::<NaiveDate>().unwrap()),
    }
  }

  fn fixture_store() -> Arc<DataStore<StaticSource>> {
    let records = RecordSet {
      prefectures: vec![Prefecture {
        code:    "01".into(),
        name:    "北海道".into(),
        reading: "ほっかいどう".into(),
      }],
      subprefectures: Vec::new(),
      counties: vec![County {
        code:            "01069".into(),
        name:            "有珠郡".into(),
        reading:         "うすぐん".into(),
        prefecture_code: "01".into(),
      }],
      versions: vec![
        version("01234", "伊達市", "だてし", "", Some("1972-04-01"), None),
        version("01233", "伊達町", "だてちょう", "01069", None, Some("1972-04-01")),
      ],
      events: vec![ChangeEvent {
        code:        "E1".into(),
        date:        "1972-04-01".parse().unwrap(),
        event_type:  EventType::CityStatus,
        before_code: "01233".into(),
        after_code:  "01234".into(),
      }],
    };
    Arc::new(DataStore::new(StaticSource { records }))
  }

  async fn get_json(
    store: Arc<DataStore<StaticSource>>,
    uri: &str,
  ) -> (StatusCode, serde_json::Value) {
    let response = api_router(store)
      .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
      .await
      .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
      .await
      .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap();
    (status, value)
  }

  async fn city_id(store: &Arc<DataStore<StaticSource>>) -> String {
    let snapshot = store.load().await.unwrap();
    snapshot
      .municipalities()
      .iter()
      .find(|m| m.name == "伊達市")
      .unwrap()
      .id
      .clone()
  }

  #[tokio::test]
  async fn unloaded_store_returns_503() {
    let store = fixture_store();
    let (status, body) = get_json(store, "/municipalities").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].as_str().unwrap().contains("not loaded"));
  }

  #[tokio::test]
  async fn list_and_current_filter() {
    let store = fixture_store();
    store.load().await.unwrap();

    let (status, body) = get_json(store.clone(), "/municipalities").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, body) =
      get_json(store, "/municipalities?current=true").await;
    assert_eq!(status, StatusCode::OK);
    let current = body.as_array().unwrap();
    assert_eq!(current.len(), 1);
    assert_eq!(current[0]["name"], "伊達市");
  }

  #[tokio::test]
  async fn get_one_and_not_found() {
    let store = fixture_store();
    let id = city_id(&store).await;

    let (status, body) =
      get_json(store.clone(), &format!("/municipalities/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "伊達市");

    let (status, _) = get_json(store, "/municipalities/no-such-id").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn search_by_query() {
    let store = fixture_store();
    store.load().await.unwrap();

    let (status, body) =
      get_json(store, "/search?q=%E6%9C%89%E7%8F%A0%E9%83%A1").await; // 有珠郡
    assert_eq!(status, StatusCode::OK);
    let hits = body.as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["name"], "伊達町");
  }

  #[tokio::test]
  async fn adjacent_events_for_a_version() {
    let store = fixture_store();
    let id = city_id(&store).await;

    let (status, body) = get_json(
      store,
      &format!("/municipalities/{id}/versions/0/adjacent"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["before"].as_array().unwrap().len(), 1);
    assert_eq!(body["before"][0]["event_type"], "city-status");
    assert!(body["after"].as_array().unwrap().is_empty());
  }

  #[tokio::test]
  async fn ancestors_endpoint() {
    let store = fixture_store();
    let id = city_id(&store).await;

    let (status, body) =
      get_json(store.clone(), &format!("/municipalities/{id}/ancestors")).await;
    assert_eq!(status, StatusCode::OK);
    let events = body.as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["code"], "E1");

    let (status, body) = get_json(
      store,
      &format!("/municipalities/{id}/ancestors?mergers=true"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
  }
}
