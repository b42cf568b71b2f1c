//! The immutable, fully-indexed view of one loaded dataset.
//!
//! Built once per load, replaced wholesale on reset-then-reload, never
//! mutated. All query surfaces live here as `&self` methods.

use chrono::NaiveDate;
use std::collections::HashMap;

use enkaku_core::{
  event::ChangeEvent,
  model::{County, Municipality, MunicipalityVersion, Prefecture, Subprefecture},
  source::RecordSet,
};

use crate::{aggregate::aggregate, index::Indexes};

// ─── Options ─────────────────────────────────────────────────────────────────

/// Tunables for the lineage resolvers.
#[derive(Debug, Clone)]
pub struct ResolverOptions {
  /// Date assigned to synthesized status-enactment events when the source
  /// log carries no explicit, date-bearing event for the transition. A
  /// known approximation inherited from the source data; override it when
  /// a better estimate exists for a dataset.
  pub status_event_date: NaiveDate,
}

impl Default for ResolverOptions {
  fn default() -> Self {
    Self {
      status_event_date: NaiveDate::from_ymd_opt(2000, 1, 1)
        .expect("literal date"),
    }
  }
}

// ─── Snapshot ────────────────────────────────────────────────────────────────

/// One loaded dataset: the raw collections, their indexes, and the
/// aggregated municipalities.
#[derive(Debug)]
pub struct Snapshot {
  pub prefectures:    Vec<Prefecture>,
  pub subprefectures: Vec<Subprefecture>,
  pub counties:       Vec<County>,
  pub versions:       Vec<MunicipalityVersion>,
  pub events:         Vec<ChangeEvent>,

  pub(crate) index:   Indexes,
  pub(crate) options: ResolverOptions,

  municipalities:   Vec<Municipality>,
  municipality_ids: HashMap<String, usize>,
}

impl Snapshot {
  pub fn build(records: RecordSet, options: ResolverOptions) -> Self {
    let RecordSet {
      prefectures,
      subprefectures,
      counties,
      versions,
      events,
    } = records;

    let index =
      Indexes::build(&prefectures, &subprefectures, &counties, &versions, &events);
    let municipalities = aggregate(&versions, &events, &index);
    let municipality_ids = municipalities
      .iter()
      .enumerate()
      .map(|(i, m)| (m.id.clone(), i))
      .collect();

    Self {
      prefectures,
      subprefectures,
      counties,
      versions,
      events,
      index,
      options,
      municipalities,
      municipality_ids,
    }
  }

  // ── Lookups ───────────────────────────────────────────────────────────

  pub fn municipalities(&self) -> &[Municipality] {
    &self.municipalities
  }

  pub fn municipality(&self, id: &str) -> Option<&Municipality> {
    self
      .municipality_ids
      .get(id)
      .map(|&i| &self.municipalities[i])
  }

  pub fn prefecture(&self, code: &str) -> Option<&Prefecture> {
    self
      .index
      .prefecture_by_code
      .get(code)
      .map(|&i| &self.prefectures[i])
  }

  pub fn subprefecture(&self, code: &str) -> Option<&Subprefecture> {
    self
      .index
      .subprefecture_by_code
      .get(code)
      .map(|&i| &self.subprefectures[i])
  }

  pub fn county(&self, code: &str) -> Option<&County> {
    self
      .index
      .county_by_code
      .get(code)
      .map(|&i| &self.counties[i])
  }

  /// The (newest) version record registered under a unit code.
  pub fn version_record(&self, code: &str) -> Option<&MunicipalityVersion> {
    self
      .index
      .version_by_code
      .get(code)
      .map(|&i| &self.versions[i])
  }

  /// Municipalities with at least one open-ended version.
  pub fn current_municipalities(&self) -> Vec<Municipality> {
    self
      .municipalities
      .iter()
      .filter(|m| m.is_current())
      .cloned()
      .collect()
  }

  // ── Event access helpers ──────────────────────────────────────────────

  /// Events under `code` in `map`, restricted to `date`, in insertion
  /// order.
  pub(crate) fn events_at(
    &self,
    map: &HashMap<String, Vec<usize>>,
    code: &str,
    date: NaiveDate,
  ) -> Vec<ChangeEvent> {
    map
      .get(code)
      .map(|ids| {
        ids
          .iter()
          .map(|&i| &self.events[i])
          .filter(|ev| ev.date == date)
          .cloned()
          .collect()
      })
      .unwrap_or_default()
  }
}
