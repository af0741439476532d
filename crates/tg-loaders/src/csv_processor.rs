//! CSV reader for merged snapshot files
//!
//! Cells are read leniently: blank or unparseable numbers fall back to
//! defaults, so files written by older tools or edited by hand still load.

use chrono::{DateTime, Utc};
use csv::{Reader, StringRecord};
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use tg_models::{parse_datetime, safe_float, safe_int, safe_string, MergedSubnetRow};
use tracing::debug;

use crate::LoaderResult;

#[derive(Debug, Clone, Copy, Default)]
pub struct CsvProcessor;

struct Columns(HashMap<String, usize>);

impl Columns {
  fn new(headers: &StringRecord) -> Self {
    Self(headers.iter().enumerate().map(|(i, h)| (h.trim().to_string(), i)).collect())
  }

  fn cell<'r>(&self, record: &'r StringRecord, name: &str) -> Option<&'r str> {
    self.0.get(name).and_then(|&i| record.get(i))
  }
}

fn optional_float(raw: Option<&str>) -> Option<f64> {
  let value = safe_float(raw, f64::NAN);
  (!value.is_nan()).then_some(value)
}

fn optional_string(raw: Option<&str>) -> Option<String> {
  Some(safe_string(raw, "")).filter(|s| !s.is_empty())
}

impl CsvProcessor {
  pub fn new() -> Self {
    Self
  }

  /// Read a merged snapshot CSV back into rows.
  pub fn read_merged_rows<P: AsRef<Path>>(&self, path: P) -> LoaderResult<Vec<MergedSubnetRow>> {
    self.read_merged_rows_at(path, Utc::now())
  }

  /// As [`read_merged_rows`](Self::read_merged_rows), with `now` standing in
  /// for unreadable timestamps.
  pub fn read_merged_rows_at<P: AsRef<Path>>(
    &self,
    path: P,
    now: DateTime<Utc>,
  ) -> LoaderResult<Vec<MergedSubnetRow>> {
    let file = File::open(path)?;
    let mut reader = Reader::from_reader(file);
    let columns = Columns::new(reader.headers()?);

    let mut rows = Vec::new();
    for result in reader.records() {
      let record = result?;
      let cell = |name: &str| columns.cell(&record, name);

      rows.push(MergedSubnetRow {
        timestamp: cell("Timestamp").and_then(|raw| parse_datetime(raw.trim())).unwrap_or(now),
        subnet_id: safe_int(cell("Subnet ID"), 0),
        subnet_name: safe_string(cell("Subnet Name"), "Unknown"),
        description: safe_string(cell("Description"), ""),
        emission: safe_float(cell("Emission"), 0.0),
        active: safe_string(cell("Active"), "").eq_ignore_ascii_case("true"),
        website: safe_string(cell("Website"), ""),
        github: safe_string(cell("Github"), ""),
        discord: safe_string(cell("Discord"), ""),
        registration_date: optional_string(cell("Registration Date")),
        days_since_registration: safe_int(cell("Days Since Registration"), 0),
        rank: safe_int(cell("Rank"), 0),
        market_cap: safe_float(cell("Market Cap"), 0.0),
        price: safe_float(cell("Price"), 0.0),
        price_change_1_day: optional_float(cell("Price Change 1 Day")),
        price_change_1_week: optional_float(cell("Price Change 1 Week")),
        price_change_1_month: optional_float(cell("Price Change 1 Month")),
        tao_volume_24hr: safe_float(cell("TAO Volume 24hr"), 0.0),
      });
    }

    debug!("Read {} merged rows", rows.len());
    Ok(rows)
  }
}
