//! Lookup structures over the raw collections.
//!
//! Built in a single pass at load time. Values are indices into the
//! snapshot's record vectors, so the indexes never clone a record. Event
//! lists preserve insertion order per key — later resolution steps rely on
//! first-occurrence heuristics. Malformed references are kept as dangling
//! keys; traversal treats them as "no further ancestry".

use std::collections::HashMap;

use enkaku_core::{
  event::ChangeEvent,
  model::{County, MunicipalityVersion, Prefecture, Subprefecture},
};

#[derive(Debug, Default)]
pub(crate) struct Indexes {
  /// Last-write-wins: a unit code with several version records resolves to
  /// the record appearing last in the input (its chronologically newest
  /// interval, given contiguous input ordering).
  pub version_by_code:       HashMap<String, usize>,
  pub prefecture_by_code:    HashMap<String, usize>,
  pub subprefecture_by_code: HashMap<String, usize>,
  pub county_by_code:        HashMap<String, usize>,
  pub events_by_after:       HashMap<String, Vec<usize>>,
  pub events_by_before:      HashMap<String, Vec<usize>>,
}

impl Indexes {
  pub fn build(
    prefectures: &[Prefecture],
    subprefectures: &[Subprefecture],
    counties: &[County],
    versions: &[MunicipalityVersion],
    events: &[ChangeEvent],
  ) -> Self {
    let mut ix = Self::default();

    for (i, p) in prefectures.iter().enumerate() {
      ix.prefecture_by_code.insert(p.code.clone(), i);
    }
    for (i, s) in subprefectures.iter().enumerate() {
      ix.subprefecture_by_code.insert(s.code.clone(), i);
    }
    for (i, c) in counties.iter().enumerate() {
      ix.county_by_code.insert(c.code.clone(), i);
    }

    for (i, v) in versions.iter().enumerate() {
      if ix.version_by_code.insert(v.code.clone(), i).is_some() {
        tracing::debug!(code = %v.code, "unit code has multiple version records; keeping the later one");
      }
    }

    for (i, ev) in events.iter().enumerate() {
      ix.events_by_after
        .entry(ev.after_code.clone())
        .or_default()
        .push(i);
      ix.events_by_before
        .entry(ev.before_code.clone())
        .or_default()
        .push(i);
    }

    tracing::debug!(
      versions = versions.len(),
      after_keys = ix.events_by_after.len(),
      before_keys = ix.events_by_before.len(),
      "indexes built"
    );

    ix
  }
}
