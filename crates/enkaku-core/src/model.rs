//! Record types — the raw inputs and the aggregated municipality.
//!
//! Version records are the atomic unit of truth: one administrative unit as
//! it existed during one contiguous interval. A [`Municipality`] is the
//! persistent identity a person would call "this municipality", assembled
//! from version records by the aggregation step in `enkaku-engine`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ─── Reference tiers ─────────────────────────────────────────────────────────

/// A prefecture (都道府県). Immutable reference data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prefecture {
  pub code:    String,
  pub name:    String,
  /// Kana reading; empty when the source has none.
  #[serde(default)]
  pub reading: String,
}

/// A subprefecture (振興局/支庁) — an optional intermediate tier that only
/// some prefectures use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subprefecture {
  pub code:            String,
  pub name:            String,
  #[serde(default)]
  pub reading:         String,
  pub prefecture_code: String,
}

/// A county (郡) — an administrative grouping with no independent
/// governance of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct County {
  pub code:            String,
  pub name:            String,
  #[serde(default)]
  pub reading:         String,
  pub prefecture_code: String,
}

// ─── Version records ─────────────────────────────────────────────────────────

/// One administrative unit as it existed during one contiguous interval.
///
/// For a fixed `code`, intervals are non-overlapping and chronologically
/// contiguous when sorted by `valid_from`; the final record of a still-valid
/// chain has `valid_to = None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MunicipalityVersion {
  /// Set by aggregation; `None` on raw input rows.
  #[serde(default)]
  pub municipality_id:    Option<String>,
  /// Unit code assigned at creation. Shared across renames; replaced on
  /// county or boundary changes (which aggregation folds back together).
  pub code:               String,
  pub name:               String,
  #[serde(default)]
  pub reading:            String,
  pub prefecture_code:    String,
  /// Empty when the prefecture has no subprefecture tier.
  #[serde(default)]
  pub subprefecture_code: String,
  /// Empty for cities, which sit directly under the prefecture.
  #[serde(default)]
  pub county_code:        String,
  /// Inclusive start; `None` = "since records began".
  #[serde(default)]
  pub valid_from:         Option<NaiveDate>,
  /// Exclusive end; `None` = "still valid".
  #[serde(default)]
  pub valid_to:           Option<NaiveDate>,
}

impl MunicipalityVersion {
  pub fn is_current(&self) -> bool { self.valid_to.is_none() }
}

// ─── Aggregated municipality ─────────────────────────────────────────────────

/// The persistent municipality identity, spanning renames and county moves
/// but not true creation or dissolution.
///
/// `versions` is sorted ascending by `valid_from`; every version's `code`
/// maps, through zero or more county-only aliasing steps, to the canonical
/// code the `id` was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Municipality {
  /// Deterministic identity derived from the canonical code and name;
  /// stable and reproducible across reloads.
  pub id:              String,
  /// Display name — the chronologically last version's name.
  pub name:            String,
  pub reading:         String,
  pub prefecture_code: String,
  /// All unit codes folded into this identity, sorted.
  pub codes:           Vec<String>,
  pub versions:        Vec<MunicipalityVersion>,
}

impl Municipality {
  /// A municipality still exists iff at least one version is open-ended.
  pub fn is_current(&self) -> bool {
    self.versions.iter().any(MunicipalityVersion::is_current)
  }

  pub fn latest_version(&self) -> Option<&MunicipalityVersion> {
    self.versions.last()
  }
}

// ─── Administrative class ────────────────────────────────────────────────────

/// Administrative class, derived from the name suffix. Ordered so that
/// `Village < Town < City`.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum MunicipalClass {
  Village,
  Town,
  City,
}

impl MunicipalClass {
  /// Classify a unit by its name suffix (市/町/村). Wards and other
  /// designations are out of the status-enactment taxonomy and yield `None`.
  pub fn from_name(name: &str) -> Option<Self> {
    match name.chars().last()? {
      '市' => Some(Self::City),
      '町' => Some(Self::Town),
      '村' => Some(Self::Village),
      _ => None,
    }
  }
}

// ─── Date parsing ────────────────────────────────────────────────────────────

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
  s.parse().map_err(|_| Error::InvalidDate(s.to_owned()))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn class_from_name_suffix() {
    assert_eq!(MunicipalClass::from_name("伊達市"), Some(MunicipalClass::City));
    assert_eq!(MunicipalClass::from_name("伊達町"), Some(MunicipalClass::Town));
    assert_eq!(MunicipalClass::from_name("泊村"), Some(MunicipalClass::Village));
    assert_eq!(MunicipalClass::from_name("千代田区"), None);
    assert_eq!(MunicipalClass::from_name(""), None);
  }

  #[test]
  fn class_ordering() {
    assert!(MunicipalClass::Village < MunicipalClass::Town);
    assert!(MunicipalClass::Town < MunicipalClass::City);
  }

  #[test]
  fn parse_dates() {
    assert_eq!(
      parse_date("1972-04-01").unwrap(),
      NaiveDate::from_ymd_opt(1972, 4, 1).unwrap()
    );
    assert!(parse_date("1972/04/01").is_err());
    assert!(parse_date("").is_err());
  }

  #[test]
  fn municipality_currency() {
    let open = MunicipalityVersion {
      municipality_id:    None,
      code:               "01100".into(),
      name:               "札幌市".into(),
      reading:            "さっぽろし".into(),
      prefecture_code:    "01".into(),
      subprefecture_code: String::new(),
      county_code:        String::new(),
      valid_from:         None,
      valid_to:           None,
    };
    let mut closed = open.clone();
    closed.valid_to = NaiveDate::from_ymd_opt(1972, 4, 1);

    let m = Municipality {
      id:              "x".into(),
      name:            "札幌市".into(),
      reading:         "さっぽろし".into(),
      prefecture_code: "01".into(),
      codes:           vec!["01100".into()],
      versions:        vec![closed.clone(), open],
    };
    assert!(m.is_current());

    let defunct = Municipality { versions: vec![closed], ..m };
    assert!(!defunct.is_current());
  }
}
