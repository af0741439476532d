//! Snapshot files: the latest merged table plus dated daily copies.

use chrono::NaiveDate;
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tg_models::MergedSubnetRow;
use tracing::info;

use crate::LoaderResult;

pub const MERGED_BASENAME: &str = "merged_subnet_data";
pub const DAILY_DIR: &str = "daily";

/// Pretty-printed JSON, creating parent directories as needed.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> LoaderResult<()> {
  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    fs::create_dir_all(parent)?;
  }
  let writer = BufWriter::new(File::create(path)?);
  serde_json::to_writer_pretty(writer, value)?;
  Ok(())
}

/// Merged rows as CSV, header first.
pub fn write_csv(path: &Path, rows: &[MergedSubnetRow]) -> LoaderResult<()> {
  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    fs::create_dir_all(parent)?;
  }
  let mut writer = csv::Writer::from_path(path)?;
  for row in rows {
    writer.serialize(row)?;
  }
  writer.flush()?;
  Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotPaths {
  pub csv: PathBuf,
  pub json: PathBuf,
}

impl SnapshotPaths {
  fn with_stem(dir: &Path, stem: &str) -> Self {
    Self { csv: dir.join(format!("{stem}.csv")), json: dir.join(format!("{stem}.json")) }
  }
}

/// Writes snapshot files under one results directory.
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
  results_dir: PathBuf,
}

impl SnapshotWriter {
  pub fn new(results_dir: impl Into<PathBuf>) -> Self {
    Self { results_dir: results_dir.into() }
  }

  pub fn results_dir(&self) -> &Path {
    &self.results_dir
  }

  pub fn latest_paths(&self) -> SnapshotPaths {
    SnapshotPaths::with_stem(&self.results_dir, MERGED_BASENAME)
  }

  pub fn daily_paths(&self, date: NaiveDate) -> SnapshotPaths {
    SnapshotPaths::with_stem(&self.results_dir.join(DAILY_DIR), &format!("subnet_data_{}", date.format("%Y-%m-%d")))
  }

  /// `merged_subnet_data.{csv,json}`
  pub fn write_latest(&self, rows: &[MergedSubnetRow]) -> LoaderResult<SnapshotPaths> {
    let paths = self.latest_paths();
    write_csv(&paths.csv, rows)?;
    write_json(&paths.json, rows)?;
    info!("Merged subnet data saved to {} and {}", paths.csv.display(), paths.json.display());
    Ok(paths)
  }

  /// `daily/subnet_data_YYYY-MM-DD.{csv,json}`
  pub fn write_daily(&self, rows: &[MergedSubnetRow], date: NaiveDate) -> LoaderResult<SnapshotPaths> {
    let paths = self.daily_paths(date);
    write_csv(&paths.csv, rows)?;
    write_json(&paths.json, rows)?;
    info!("Daily data saved to {}", paths.csv.display());
    Ok(paths)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::{TimeZone, Utc};
  use tempfile::TempDir;

  fn row(id: i64) -> MergedSubnetRow {
    MergedSubnetRow {
      timestamp: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
      subnet_id: id,
      subnet_name: format!("SN {id}"),
      description: "a, b".to_string(),
      emission: 1.25,
      active: true,
      website: String::new(),
      github: String::new(),
      discord: String::new(),
      registration_date: None,
      days_since_registration: 3,
      rank: 1,
      market_cap: 10.0,
      price: 0.1,
      price_change_1_day: Some(-2.5),
      price_change_1_week: None,
      price_change_1_month: None,
      tao_volume_24hr: 0.0,
    }
  }

  #[test]
  fn test_daily_file_names() {
    let writer = SnapshotWriter::new("results");
    let paths = writer.daily_paths(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
    assert_eq!(paths.csv, PathBuf::from("results/daily/subnet_data_2025-06-01.csv"));
    assert_eq!(paths.json, PathBuf::from("results/daily/subnet_data_2025-06-01.json"));
  }

  #[test]
  fn test_write_latest_and_daily() {
    let dir = TempDir::new().unwrap();
    let writer = SnapshotWriter::new(dir.path().join("results"));
    let rows = vec![row(1), row(2)];

    let latest = writer.write_latest(&rows).unwrap();
    let daily = writer.write_daily(&rows, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()).unwrap();
    assert!(daily.csv.exists());
    assert!(daily.json.exists());

    let csv = fs::read_to_string(&latest.csv).unwrap();
    let header = csv.lines().next().unwrap();
    assert!(header.starts_with("Timestamp,Subnet ID,Subnet Name,Description,Emission,Active"));
    assert!(header.ends_with("TAO Volume 24hr"));
    assert_eq!(csv.lines().count(), 3);
    assert!(csv.contains("\"a, b\""));

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&latest.json).unwrap()).unwrap();
    assert_eq!(json[1]["Subnet ID"], 2);
    assert_eq!(json[0]["Price Change 1 Week"], serde_json::Value::Null);
  }
}
