//! Substring search across municipalities and their administrative context.

use enkaku_core::model::Municipality;

use crate::snapshot::Snapshot;

impl Snapshot {
  /// Case-insensitive substring match over municipality name and reading,
  /// prefecture name, and any version's county or subprefecture name and
  /// reading — OR-combined. A blank query returns every municipality,
  /// current and defunct alike.
  pub fn search(&self, query: &str) -> Vec<Municipality> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
      return self.municipalities().to_vec();
    }
    self
      .municipalities()
      .iter()
      .filter(|m| self.matches(m, &needle))
      .cloned()
      .collect()
  }

  fn matches(&self, municipality: &Municipality, needle: &str) -> bool {
    if contains(&municipality.name, needle)
      || contains(&municipality.reading, needle)
    {
      return true;
    }
    if self
      .prefecture(&municipality.prefecture_code)
      .is_some_and(|p| contains(&p.name, needle))
    {
      return true;
    }
    municipality.versions.iter().any(|v| {
      (!v.county_code.is_empty()
        && self
          .county(&v.county_code)
          .is_some_and(|c| contains(&c.name, needle) || contains(&c.reading, needle)))
        || (!v.subprefecture_code.is_empty()
          && self.subprefecture(&v.subprefecture_code).is_some_and(|s| {
            contains(&s.name, needle) || contains(&s.reading, needle)
          }))
    })
  }
}

fn contains(haystack: &str, lowercase_needle: &str) -> bool {
  haystack.to_lowercase().contains(lowercase_needle)
}
