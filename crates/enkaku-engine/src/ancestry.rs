//! Ancestry resolution: the recursive walk that produces a full lineage.
//!
//! The walk runs backwards over `events_by_after` with an explicit work
//! stack and an owned visited set — the event log is a DAG in principle,
//! but malformed data could introduce cycles, and the visited set makes
//! the traversal total regardless. A reference with no qualifying
//! predecessor events is the base case: original formation, or a gap in
//! the historical record. Both terminate the branch silently.
//!
//! Status enactments (town→city, village→town) frequently have no explicit
//! event in the source log. They are recognised heuristically from
//! same-prefecture records sharing a name or reading, and synthesized at
//! the configurable placeholder date in
//! [`ResolverOptions`](crate::ResolverOptions).

use std::collections::HashSet;

use chrono::NaiveDate;
use enkaku_core::{
  event::{ChangeEvent, EventType},
  model::{MunicipalClass, MunicipalityVersion},
};

use crate::snapshot::Snapshot;

impl Snapshot {
  /// Full ancestor lineage of a municipality, most recent first.
  ///
  /// Each step takes only the most recent date group of a reference's
  /// predecessor events; older transitions are reached by recursing into
  /// that group's own predecessors. Unknown ids yield an empty sequence.
  pub fn ancestors(&self, municipality_id: &str) -> Vec<ChangeEvent> {
    let Some(municipality) = self.municipality(municipality_id) else {
      return Vec::new();
    };

    let mut walk = Walk::new(self);
    for code in &municipality.codes {
      walk.visited.insert(code.clone());
    }
    for code in municipality.codes.iter().rev() {
      walk.stack.push(code.clone());
    }
    walk.run();

    let mut events = walk.events;
    events.sort_by(|a, b| b.date.cmp(&a.date));
    events
  }

  /// [`ancestors`](Self::ancestors), extended with the surviving host's
  /// pre-merger history: when the queried municipality survived an
  /// absorption, its own earlier absorptions (and their parties'
  /// ancestries) are spliced in at that point. Deduplicated by event code,
  /// sorted descending by date.
  pub fn ancestors_with_mergers(&self, municipality_id: &str) -> Vec<ChangeEvent> {
    let Some(municipality) = self.municipality(municipality_id) else {
      return Vec::new();
    };
    let own_codes: HashSet<&str> =
      municipality.codes.iter().map(String::as_str).collect();

    let mut events = self.ancestors(municipality_id);
    let mut seen: HashSet<String> =
      events.iter().map(|ev| ev.code.clone()).collect();

    let mut hosts_done: HashSet<String> = HashSet::new();
    for ev in events.clone() {
      if ev.event_type != EventType::Absorption
        || !own_codes.contains(ev.after_code.as_str())
        || !hosts_done.insert(ev.after_code.clone())
      {
        continue;
      }
      for older in self.surviving_ancestors(&ev.after_code, ev.date) {
        if seen.insert(older.code.clone()) {
          events.push(older);
        }
      }
    }

    events.sort_by(|a, b| b.date.cmp(&a.date));
    events
  }

  /// Absorptions in which `code` was the surviving party strictly before
  /// `before`, with each such merger's parties and their own ancestries.
  ///
  /// The source log records a surviving unit's continuation as a
  /// before/after pair on its own code, so earlier hostings surface under
  /// `events_by_before`.
  pub fn surviving_ancestors(
    &self,
    code: &str,
    before: NaiveDate,
  ) -> Vec<ChangeEvent> {
    let Some(ids) = self.index.events_by_before.get(code) else {
      return Vec::new();
    };

    let mut walk = Walk::new(self);
    walk.visited.insert(code.to_owned());

    for &i in ids {
      let ev = &self.events[i];
      if ev.event_type != EventType::Absorption || ev.date >= before {
        continue;
      }
      walk.emit(ev.clone());
      if ev.before_code != code {
        walk.follow(&ev.before_code);
      }
      // The co-parties of that earlier merger folded into the same
      // surviving code on the same date.
      if let Some(after_ids) = self.index.events_by_after.get(code) {
        for &j in after_ids {
          let party = &self.events[j];
          if party.date != ev.date || party.event_type != EventType::Absorption
          {
            continue;
          }
          walk.emit(party.clone());
          if party.before_code != code {
            walk.follow(&party.before_code);
          }
        }
      }
    }
    walk.run();

    let mut events = walk.events;
    events.sort_by(|a, b| b.date.cmp(&a.date));
    events
  }

  /// Heuristic status-enactment predecessors for one version record:
  /// same-prefecture records with an equal name or reading, one class
  /// below (town for a city, village for a town). Dated at the
  /// configured placeholder.
  pub(crate) fn status_change_events(
    &self,
    record: &MunicipalityVersion,
  ) -> Vec<ChangeEvent> {
    let Some(class) = MunicipalClass::from_name(&record.name) else {
      return Vec::new();
    };

    let mut events = Vec::new();
    for candidate in &self.versions {
      if candidate.code == record.code
        || candidate.prefecture_code != record.prefecture_code
      {
        continue;
      }
      let same_name = candidate.name == record.name;
      let same_reading = !candidate.reading.is_empty()
        && !record.reading.is_empty()
        && candidate.reading == record.reading;
      if !(same_name || same_reading) {
        continue;
      }
      let Some(candidate_class) = MunicipalClass::from_name(&candidate.name)
      else {
        continue;
      };
      let event_type = match (class, candidate_class) {
        (MunicipalClass::City, MunicipalClass::Town) => EventType::CityStatus,
        (MunicipalClass::Town, MunicipalClass::Village) => {
          EventType::TownStatus
        }
        _ => continue,
      };
      events.push(ChangeEvent {
        code:        format!("status:{}:{}", record.code, candidate.code),
        date:        self.options.status_event_date,
        event_type,
        before_code: candidate.code.clone(),
        after_code:  record.code.clone(),
      });
    }
    events
  }
}

// ─── Walker ──────────────────────────────────────────────────────────────────

/// Explicit-stack traversal state shared by the ancestry entry points.
struct Walk<'a> {
  snapshot: &'a Snapshot,
  stack:    Vec<String>,
  visited:  HashSet<String>,
  seen:     HashSet<String>,
  events:   Vec<ChangeEvent>,
}

impl<'a> Walk<'a> {
  fn new(snapshot: &'a Snapshot) -> Self {
    Self {
      snapshot,
      stack: Vec::new(),
      visited: HashSet::new(),
      seen: HashSet::new(),
      events: Vec::new(),
    }
  }

  fn run(&mut self) {
    while let Some(code) = self.stack.pop() {
      self.step(&code);
    }
  }

  fn step(&mut self, code: &str) {
    let snapshot = self.snapshot;

    // Implicit status enactments first: they reach further back than any
    // explicit event for the reclassified unit.
    if let Some(record) = snapshot.version_record(code) {
      for ev in snapshot.status_change_events(record) {
        let predecessor = ev.before_code.clone();
        self.emit(ev);
        self.follow(&predecessor);
      }
    }

    // Explicit predecessors: the most recent date group only.
    let Some(ids) = snapshot.index.events_by_after.get(code) else {
      return;
    };
    let Some(latest) = ids.iter().map(|&i| snapshot.events[i].date).max()
    else {
      return;
    };
    let group: Vec<&ChangeEvent> = ids
      .iter()
      .map(|&i| &snapshot.events[i])
      .filter(|ev| ev.date == latest)
      .collect();

    for ev in &group {
      self.emit((*ev).clone());
    }
    for ev in &group {
      let predecessor = ev.before_code.clone();
      self.follow(&predecessor);
    }
  }

  fn emit(&mut self, event: ChangeEvent) {
    if self.seen.insert(event.code.clone()) {
      self.events.push(event);
    }
  }

  fn follow(&mut self, code: &str) {
    if self.visited.insert(code.to_owned()) {
      self.stack.push(code.to_owned());
    }
  }
}
