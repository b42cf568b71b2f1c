//! CSV ingestion for the enkaku engine.
//!
//! Reads the tabular input collections from a data directory and hands the
//! engine validated, well-typed rows via
//! [`RecordSource`](enkaku_core::source::RecordSource). Schema validation
//! happens here: a bad date or an unknown event type aborts the load with a
//! row-addressed error. Everything downstream assumes well-formed rows.
//!
//! Expected files:
//!
//! | file                 | columns                                                              |
//! |----------------------|----------------------------------------------------------------------|
//! | `prefectures.csv`    | `code,name,reading`                                                  |
//! | `subprefectures.csv` | `code,name,reading,prefecture_code` (optional file)                  |
//! | `counties.csv`       | `code,name,reading,prefecture_code`                                  |
//! | `municipalities.csv` | `code,name,reading,prefecture_code,subprefecture_code,county_code,valid_from,valid_to` |
//! | `change_events.csv`  | `code,date,event_type,code_before,code_after`                        |
//!
//! Dates are `YYYY-MM-DD`; an empty `valid_from`/`valid_to` means "since
//! records began" / "still valid".

pub mod error;

pub use error::{Error, Result};

use std::path::PathBuf;

use enkaku_core::{
  event::{ChangeEvent, EventType},
  model::{County, MunicipalityVersion, Prefecture, Subprefecture, parse_date},
  source::RecordSource,
};
use serde::{Deserialize, de::DeserializeOwned};

const PREFECTURES_FILE: &str = "prefectures.csv";
const SUBPREFECTURES_FILE: &str = "subprefectures.csv";
const COUNTIES_FILE: &str = "counties.csv";
const MUNICIPALITIES_FILE: &str = "municipalities.csv";
const EVENTS_FILE: &str = "change_events.csv";

// ─── Source ──────────────────────────────────────────────────────────────────

/// A [`RecordSource`] backed by a directory of CSV files.
#[derive(Debug, Clone)]
pub struct CsvRecordSource {
  data_dir: PathBuf,
}

impl CsvRecordSource {
  pub fn new(data_dir: impl Into<PathBuf>) -> Self {
    Self { data_dir: data_dir.into() }
  }

  async fn read(&self, file: &'static str) -> Result<String> {
    let path = self.data_dir.join(file);
    tokio::fs::read_to_string(&path)
      .await
      .map_err(|source| Error::Io { path, source })
  }
}

impl RecordSource for CsvRecordSource {
  type Error = Error;

  async fn fetch_prefectures(&self) -> Result<Vec<Prefecture>> {
    let rows = parse_prefectures(&self.read(PREFECTURES_FILE).await?)?;
    tracing::debug!(rows = rows.len(), file = PREFECTURES_FILE, "parsed");
    Ok(rows)
  }

  async fn fetch_subprefectures(&self) -> Result<Vec<Subprefecture>> {
    // The subprefecture tier is optional; a missing file is not an error.
    let path = self.data_dir.join(SUBPREFECTURES_FILE);
    let text = match tokio::fs::read_to_string(&path).await {
      Ok(text) => text,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
        tracing::debug!(file = SUBPREFECTURES_FILE, "absent; skipping tier");
        return Ok(Vec::new());
      }
      Err(source) => return Err(Error::Io { path, source }),
    };
    let rows = parse_subprefectures(&text)?;
    tracing::debug!(rows = rows.len(), file = SUBPREFECTURES_FILE, "parsed");
    Ok(rows)
  }

  async fn fetch_counties(&self) -> Result<Vec<County>> {
    let rows = parse_counties(&self.read(COUNTIES_FILE).await?)?;
    tracing::debug!(rows = rows.len(), file = COUNTIES_FILE, "parsed");
    Ok(rows)
  }

  async fn fetch_versions(&self) -> Result<Vec<MunicipalityVersion>> {
    let rows = parse_municipalities(&self.read(MUNICIPALITIES_FILE).await?)?;
    tracing::debug!(rows = rows.len(), file = MUNICIPALITIES_FILE, "parsed");
    Ok(rows)
  }

  async fn fetch_events(&self) -> Result<Vec<ChangeEvent>> {
    let rows = parse_events(&self.read(EVENTS_FILE).await?)?;
    tracing::debug!(rows = rows.len(), file = EVENTS_FILE, "parsed");
    Ok(rows)
  }
}

// ─── Parsers ─────────────────────────────────────────────────────────────────

pub fn parse_prefectures(text: &str) -> Result<Vec<Prefecture>> {
  parse_rows(text, PREFECTURES_FILE)
}

pub fn parse_subprefectures(text: &str) -> Result<Vec<Subprefecture>> {
  parse_rows(text, SUBPREFECTURES_FILE)
}

pub fn parse_counties(text: &str) -> Result<Vec<County>> {
  parse_rows(text, COUNTIES_FILE)
}

pub fn parse_municipalities(text: &str) -> Result<Vec<MunicipalityVersion>> {
  parse_rows(text, MUNICIPALITIES_FILE)
}

/// Event rows carry a mandatory date and a typed event kind, validated
/// field-by-field so errors name the offending line.
pub fn parse_events(text: &str) -> Result<Vec<ChangeEvent>> {
  #[derive(Debug, Deserialize)]
  struct RawEventRow {
    code:        String,
    date:        String,
    event_type:  String,
    code_before: String,
    code_after:  String,
  }

  let mut events = Vec::new();
  let mut reader = csv::Reader::from_reader(text.as_bytes());
  for (i, row) in reader.deserialize::<RawEventRow>().enumerate() {
    let line = i + 2; // the header occupies line 1
    let row = row.map_err(|source| Error::Csv { file: EVENTS_FILE, source })?;
    let date = parse_date(&row.date)
      .map_err(|source| Error::Row { file: EVENTS_FILE, line, source })?;
    let event_type = EventType::parse(&row.event_type)
      .map_err(|source| Error::Row { file: EVENTS_FILE, line, source })?;
    events.push(ChangeEvent {
      code: row.code,
      date,
      event_type,
      before_code: row.code_before,
      after_code: row.code_after,
    });
  }
  Ok(events)
}

fn parse_rows<T: DeserializeOwned>(
  text: &str,
  file: &'static str,
) -> Result<Vec<T>> {
  csv::Reader::from_reader(text.as_bytes())
    .deserialize()
    .collect::<std::result::Result<Vec<T>, csv::Error>>()
    .map_err(|source| Error::Csv { file, source })
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;
  use enkaku_core::event::EventType;

  use super::*;

  #[test]
  fn prefecture_rows_parse() {
    let text = "code,name,reading\n01,北海道,ほっかいどう\n02,青森県,あおもりけん\n";
    let rows = parse_prefectures(text).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].code, "01");
    assert_eq!(rows[1].name, "青森県");
  }

  #[test]
  fn municipality_rows_default_their_optional_columns() {
    let text = "\
code,name,reading,prefecture_code,subprefecture_code,county_code,valid_from,valid_to
01234,伊達市,だてし,01,01013,,1972-04-01,
01233,伊達町,だてちょう,01,,01069,,1972-04-01
";
    let rows = parse_municipalities(text).unwrap();
    assert_eq!(rows.len(), 2);

    let city = &rows[0];
    assert_eq!(city.subprefecture_code, "01013");
    assert!(city.county_code.is_empty());
    assert_eq!(city.valid_from, NaiveDate::from_ymd_opt(1972, 4, 1));
    assert_eq!(city.valid_to, None);
    assert_eq!(city.municipality_id, None);

    let town = &rows[1];
    assert_eq!(town.valid_from, None);
    assert_eq!(town.valid_to, NaiveDate::from_ymd_opt(1972, 4, 1));
  }

  #[test]
  fn municipality_rows_tolerate_a_reduced_header() {
    // Sources without the subprefecture tier omit the column entirely.
    let text = "code,name,reading,prefecture_code,county_code,valid_from,valid_to\n01403,泊村,とまりむら,01,01040,,\n";
    let rows = parse_municipalities(text).unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].subprefecture_code.is_empty());
  }

  #[test]
  fn event_rows_parse_their_type_and_date() {
    let text = "\
code,date,event_type,code_before,code_after
E1,1972-04-01,city-status,01233,01234
E2,2006-03-27,absorption,01601,01205
";
    let events = parse_events(text).unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].event_type, EventType::CityStatus);
    assert_eq!(events[1].event_type, EventType::Absorption);
    assert_eq!(events[1].date, NaiveDate::from_ymd_opt(2006, 3, 27).unwrap());
  }

  #[test]
  fn unknown_event_type_names_the_line() {
    let text = "\
code,date,event_type,code_before,code_after
E1,1972-04-01,city-status,01233,01234
E2,2006-03-27,merger,01601,01205
";
    let err = parse_events(text).unwrap_err();
    assert!(
      matches!(err, Error::Row { line: 3, .. }),
      "unexpected error: {err}"
    );
  }

  #[test]
  fn malformed_event_date_is_rejected() {
    let text = "\
code,date,event_type,code_before,code_after
E1,1972/04/01,city-status,01233,01234
";
    let err = parse_events(text).unwrap_err();
    assert!(matches!(err, Error::Row { line: 2, .. }));
  }
}
