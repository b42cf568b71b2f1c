//! Change events — the directed, dated edges of the lineage graph.
//!
//! An event records one pairwise "before unit → after unit" transition.
//! Multi-party events (a merger of five villages) appear in the source log
//! as one row per party, sharing a date and an after-code.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::{Error, Result};

/// The kind of transition an event records.
///
/// The kebab-case form is both the wire representation and the CSV
/// `event_type` column value.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum EventType {
  /// A unit established where none existed before.
  Creation,
  /// Several units dissolve into one newly-created unit (新設合併).
  NewFormation,
  /// One or more units cease to exist into a surviving unit (編入).
  Absorption,
  /// Part of a unit separates into a new unit (分立).
  SplitOff,
  /// Town reclassified as a city (市制施行).
  CityStatus,
  /// Village reclassified as a town (町制施行).
  TownStatus,
  /// Name change without any merger (改称).
  Rename,
  /// The unit moved to a different county (郡変更); identity is unchanged.
  CountyChange,
  /// Boundary adjustment between units (境界変更); identity is unchanged.
  BoundaryChange,
}

impl EventType {
  /// Parse the kebab-case form, mapping failures to a domain error.
  pub fn parse(s: &str) -> Result<Self> {
    s.trim()
      .parse()
      .map_err(|_| Error::UnknownEventType(s.to_owned()))
  }
}

/// A directed edge in the event graph.
///
/// `before_code` and `after_code` reference unit codes. They never denote
/// the same version record for one event — but they may carry the same
/// code when a surviving unit's own continuation is recorded (the pre- and
/// post-merger versions of an absorption host), and synthesized
/// county-change events are self-referential by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
  /// Unique within the source log. Synthesized events use a `status:` or
  /// `county-change:` prefix so they can never collide with source codes.
  pub code:        String,
  pub date:        NaiveDate,
  pub event_type:  EventType,
  pub before_code: String,
  pub after_code:  String,
}

/// The events immediately around one version record, as computed by the
/// adjacency resolver. Never stored; synthesized members are computed on
/// demand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjacentEvents {
  /// Events dated at the version's `valid_from` that produced it.
  pub before: Vec<ChangeEvent>,
  /// Events dated at the version's `valid_to` that ended it.
  pub after:  Vec<ChangeEvent>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn event_type_roundtrip() {
    for (text, ty) in [
      ("creation", EventType::Creation),
      ("new-formation", EventType::NewFormation),
      ("absorption", EventType::Absorption),
      ("split-off", EventType::SplitOff),
      ("city-status", EventType::CityStatus),
      ("town-status", EventType::TownStatus),
      ("rename", EventType::Rename),
      ("county-change", EventType::CountyChange),
      ("boundary-change", EventType::BoundaryChange),
    ] {
      assert_eq!(EventType::parse(text).unwrap(), ty);
      assert_eq!(ty.to_string(), text);
    }
  }

  #[test]
  fn event_type_unknown_is_an_error() {
    let err = EventType::parse("merger").unwrap_err();
    assert!(matches!(err, Error::UnknownEventType(s) if s == "merger"));
  }
}
