//! Aggregation of version records into persistent municipalities.
//!
//! A county or boundary change assigns a unit a new code without changing
//! what the unit *is*. Those transitions are detected from the event log
//! (county-change/boundary-change events whose before and after records
//! carry the same name) and folded together with a disjoint-set, so one
//! municipality keeps one identity across them. Grouping additionally keys
//! on the name: a code reused for an unrelated same-coded unit must not
//! conflate two municipalities, and two same-named units never linked by
//! any event stay distinct.

use std::{cmp::Ordering, collections::HashMap};

use chrono::NaiveDate;
use enkaku_core::{
  event::{ChangeEvent, EventType},
  model::{Municipality, MunicipalityVersion},
};
use sha2::{Digest, Sha256};

use crate::{alias::AliasSet, index::Indexes};

/// Deterministic municipality identity from the canonical code and name.
///
/// Stable across reloads: same inputs, same id.
pub(crate) fn municipality_id(canonical_code: &str, name: &str) -> String {
  let mut hasher = Sha256::new();
  hasher.update(canonical_code.as_bytes());
  hasher.update([0x1f]);
  hasher.update(name.as_bytes());
  let digest = hasher.finalize();
  hex::encode(&digest[..8])
}

pub(crate) fn aggregate(
  versions: &[MunicipalityVersion],
  events: &[ChangeEvent],
  index: &Indexes,
) -> Vec<Municipality> {
  // 1. Alias map over county/boundary events that preserve the name.
  let mut aliases = AliasSet::new();
  for ev in events {
    if !matches!(
      ev.event_type,
      EventType::CountyChange | EventType::BoundaryChange
    ) {
      continue;
    }
    let (Some(&b), Some(&a)) = (
      index.version_by_code.get(&ev.before_code),
      index.version_by_code.get(&ev.after_code),
    ) else {
      // Dangling reference: nothing to alias.
      continue;
    };
    if versions[b].name == versions[a].name {
      aliases.union(&ev.before_code, &ev.after_code);
    }
  }

  // 2–3. Group rows by (representative code, name); blank names are a
  // data-quality exclusion.
  let mut groups: HashMap<(String, String), Vec<usize>> = HashMap::new();
  for (i, v) in versions.iter().enumerate() {
    if v.name.trim().is_empty() {
      tracing::warn!(code = %v.code, "dropping version record with blank name");
      continue;
    }
    let canonical = aliases.resolve(&v.code);
    groups
      .entry((canonical, v.name.clone()))
      .or_default()
      .push(i);
  }

  // 4–6. One municipality per group.
  let mut municipalities = Vec::with_capacity(groups.len());
  for ((canonical, name), rows) in groups {
    let id = municipality_id(&canonical, &name);

    let mut group_versions: Vec<MunicipalityVersion> =
      rows.iter().map(|&i| versions[i].clone()).collect();
    sort_versions(&mut group_versions);
    for v in &mut group_versions {
      v.municipality_id = Some(id.clone());
    }

    let mut codes: Vec<String> =
      group_versions.iter().map(|v| v.code.clone()).collect();
    codes.sort();
    codes.dedup();

    // Display fields come from the chronologically last version.
    let (reading, prefecture_code) = match group_versions.last() {
      Some(last) => (last.reading.clone(), last.prefecture_code.clone()),
      None => continue,
    };

    municipalities.push(Municipality {
      id,
      name,
      reading,
      prefecture_code,
      codes,
      versions: group_versions,
    });
  }

  // HashMap iteration order is arbitrary; fix a reproducible output order.
  municipalities.sort_by(|a, b| {
    (&a.prefecture_code, &a.codes, &a.name).cmp(&(
      &b.prefecture_code,
      &b.codes,
      &b.name,
    ))
  });

  tracing::info!(
    municipalities = municipalities.len(),
    versions = versions.len(),
    "aggregated version records"
  );

  municipalities
}

/// Ascending by `valid_from` (open start sorts first), tie-broken by
/// `valid_to` ascending (open end sorts last) — shorter intervals first on
/// a shared start date.
fn sort_versions(versions: &mut [MunicipalityVersion]) {
  versions.sort_by(|a, b| {
    cmp_open_start(a.valid_from, b.valid_from)
      .then_with(|| cmp_open_end(a.valid_to, b.valid_to))
  });
}

fn cmp_open_start(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
  match (a, b) {
    (None, None) => Ordering::Equal,
    (None, Some(_)) => Ordering::Less,
    (Some(_), None) => Ordering::Greater,
    (Some(x), Some(y)) => x.cmp(&y),
  }
}

fn cmp_open_end(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
  match (a, b) {
    (None, None) => Ordering::Equal,
    (None, Some(_)) => Ordering::Greater,
    (Some(_), None) => Ordering::Less,
    (Some(x), Some(y)) => x.cmp(&y),
  }
}
