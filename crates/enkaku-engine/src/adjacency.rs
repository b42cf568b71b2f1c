//! Adjacent-event resolution: the events immediately before and after one
//! version record.
//!
//! Explicit events come straight from the indexes. A county move that left
//! no explicit event behind — consecutive versions of one municipality
//! disagreeing only on county membership — is surfaced as a synthesized
//! county-change event, computed on demand and never persisted.

use chrono::NaiveDate;
use enkaku_core::{
  event::{AdjacentEvents, ChangeEvent, EventType},
  model::{Municipality, MunicipalityVersion},
};

use crate::snapshot::Snapshot;

impl Snapshot {
  /// Events dated at the version's boundaries. Unknown municipality ids
  /// yield an empty result.
  pub fn adjacent_events(
    &self,
    municipality_id: &str,
    version: &MunicipalityVersion,
  ) -> AdjacentEvents {
    let mut adjacent = AdjacentEvents::default();
    let Some(municipality) = self.municipality(municipality_id) else {
      return adjacent;
    };

    if let Some(from) = version.valid_from {
      adjacent.before = self.events_at(&self.index.events_by_after, &version.code, from);
    }
    if let Some(to) = version.valid_to {
      adjacent.after = self.events_at(&self.index.events_by_before, &version.code, to);
    }

    // Implicit county change into this version.
    if let Some(prev) = previous_version(municipality, version) {
      if prev.county_code != version.county_code
        && !covers_county_transition(&adjacent.before, version.county_code.is_empty())
      {
        if let Some(date) = version.valid_from {
          adjacent
            .before
            .push(implicit_county_change(municipality, date));
        }
      }
    }

    // Mirror: the same transition seen from the version it ended.
    if let Some(next) = next_version(municipality, version) {
      if version.county_code != next.county_code
        && !covers_county_transition(
          &self.successor_onset_events(next),
          next.county_code.is_empty(),
        )
        && !covers_county_transition(&adjacent.after, next.county_code.is_empty())
      {
        if let Some(date) = version.valid_to {
          adjacent
            .after
            .push(implicit_county_change(municipality, date));
        }
      }
    }

    adjacent
  }

  /// Explicit events that opened `next` — used to decide whether a county
  /// transition into it is already accounted for.
  fn successor_onset_events(&self, next: &MunicipalityVersion) -> Vec<ChangeEvent> {
    match next.valid_from {
      Some(from) => self.events_at(&self.index.events_by_after, &next.code, from),
      None => Vec::new(),
    }
  }
}

/// The version whose interval ends exactly where `version` begins.
fn previous_version<'a>(
  municipality: &'a Municipality,
  version: &MunicipalityVersion,
) -> Option<&'a MunicipalityVersion> {
  let from = version.valid_from?;
  municipality
    .versions
    .iter()
    .find(|p| p.valid_to == Some(from))
}

/// The version whose interval begins exactly where `version` ends.
fn next_version<'a>(
  municipality: &'a Municipality,
  version: &MunicipalityVersion,
) -> Option<&'a MunicipalityVersion> {
  let to = version.valid_to?;
  municipality
    .versions
    .iter()
    .find(|n| n.valid_from == Some(to))
}

/// An explicit event already accounts for a county transition when a
/// county/boundary event covers it, or when the county is dropped as a
/// definitional side effect of a simultaneous city-status enactment.
fn covers_county_transition(
  events: &[ChangeEvent],
  new_county_is_empty: bool,
) -> bool {
  events.iter().any(|ev| {
    matches!(
      ev.event_type,
      EventType::CountyChange | EventType::BoundaryChange
    )
  }) || (new_county_is_empty
    && events
      .iter()
      .any(|ev| ev.event_type == EventType::CityStatus))
}

/// Self-referential by construction: before and after are the same
/// municipality, adjacent versions.
fn implicit_county_change(
  municipality: &Municipality,
  date: NaiveDate,
) -> ChangeEvent {
  ChangeEvent {
    code:        format!("county-change:{}:{date}", municipality.id),
    date,
    event_type:  EventType::CountyChange,
    before_code: municipality.id.clone(),
    after_code:  municipality.id.clone(),
  }
}
