//! Fetch all three Taostats feeds, merge them and write snapshots.

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use tg_models::MergedSubnetRow;
use tracing::info;

use crate::merge::{merge_subnet_data, merge_summary, MergeSummary};
use crate::snapshot::{SnapshotPaths, SnapshotWriter};
use crate::{
  DataLoader, IdentityLoader, IdentityLoaderInput, LoaderContext, LoaderResult, MarketLoader, StatsLoader,
  StatsLoaderInput,
};

#[derive(Debug, Clone)]
pub struct UpdateOutcome {
  pub rows: Vec<MergedSubnetRow>,
  pub summary: MergeSummary,
  pub latest: SnapshotPaths,
  pub daily: Option<SnapshotPaths>,
}

/// One refresh of the snapshot table.
///
/// The feeds are fetched concurrently; any failure aborts the update before
/// files are touched.
pub async fn update_subnet_data(
  context: &LoaderContext,
  results_dir: impl Into<PathBuf>,
  daily: bool,
) -> LoaderResult<UpdateOutcome> {
  update_subnet_data_at(context, results_dir, daily, Utc::now()).await
}

pub async fn update_subnet_data_at(
  context: &LoaderContext,
  results_dir: impl Into<PathBuf>,
  daily: bool,
  now: DateTime<Utc>,
) -> LoaderResult<UpdateOutcome> {
  info!("Starting subnet data update");
  let identity_loader = IdentityLoader::new();
  let stats_loader = StatsLoader::new();
  let market_loader = MarketLoader::new();
  let (identities, stats, pools) = tokio::try_join!(
    identity_loader.load(context, IdentityLoaderInput::default()),
    stats_loader.load(context, StatsLoaderInput { as_of: now }),
    market_loader.load(context, ()),
  )?;

  let rows = merge_subnet_data(&identities, &stats, &pools, now);
  let writer = SnapshotWriter::new(results_dir);
  let latest = writer.write_latest(&rows)?;
  let daily = if daily { Some(writer.write_daily(&rows, now.date_naive())?) } else { None };

  let summary = merge_summary(&rows);
  info!("Update complete: {} subnets, {} active", summary.total_subnets, summary.active_subnets);
  Ok(UpdateOutcome { rows, summary, latest, daily })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{LoaderConfig, LoaderError, ProcessState, ProcessTracker};
  use chrono::TimeZone;
  use serde_json::json;
  use std::sync::Arc;
  use tempfile::TempDir;
  use tg_client::TaostatsClient;
  use tg_core::Config;
  use wiremock::matchers::{method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  async fn mount(server: &MockServer, route: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
      .and(path(route))
      .respond_with(ResponseTemplate::new(200).set_body_json(body))
      .mount(server)
      .await;
  }

  fn context_for(server: &MockServer) -> LoaderContext {
    let mut config = Config::default_with_key("secret".to_string());
    config.base_url = server.uri();
    let client = Arc::new(TaostatsClient::new(&config).unwrap());
    LoaderContext::new(client, LoaderConfig::default()).with_process_tracker(ProcessTracker::new())
  }

  #[tokio::test]
  async fn test_update_writes_latest_and_daily() {
    let server = MockServer::start().await;
    mount(
      &server,
      "/subnet/identity/v1",
      json!({"data": [{"netuid": 1, "subnet_name": "Apex"}, {"netuid": 2, "subnet_name": "Omron"}]}),
    )
    .await;
    mount(
      &server,
      "/subnet/latest/v1",
      json!({"data": [{"netuid": 1, "emission": 1, "subtoken_enabled": true}, {"netuid": 2, "emission": 3}]}),
    )
    .await;
    mount(&server, "/dtao/pool/latest/v1", json!({"data": [{"netuid": 2, "market_cap": 5e9, "rank": 1}]})).await;

    let context = context_for(&server);
    let dir = TempDir::new().unwrap();
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    let outcome = update_subnet_data_at(&context, dir.path(), true, now).await.unwrap();

    assert_eq!(outcome.rows.len(), 2);
    assert_eq!(outcome.rows[1].emission, 75.0);
    assert_eq!(outcome.rows[1].market_cap, 5.0);
    assert_eq!(outcome.summary.active_subnets, 1);
    assert!(outcome.latest.csv.ends_with("merged_subnet_data.csv"));
    assert!(outcome.latest.json.exists());
    let daily = outcome.daily.unwrap();
    assert!(daily.csv.ends_with("daily/subnet_data_2025-06-01.csv"));
    assert!(daily.csv.exists());

    let processes = context.process_tracker.as_ref().unwrap().get_all().await;
    assert_eq!(processes.len(), 3);
    assert!(processes.iter().all(|p| p.state == ProcessState::Success));
  }

  #[tokio::test]
  async fn test_feed_failure_writes_nothing() {
    let server = MockServer::start().await;
    mount(&server, "/subnet/identity/v1", json!({"data": []})).await;
    mount(&server, "/subnet/latest/v1", json!({"data": []})).await;
    Mock::given(method("GET"))
      .and(path("/dtao/pool/latest/v1"))
      .respond_with(ResponseTemplate::new(503))
      .mount(&server)
      .await;

    let context = context_for(&server);
    let dir = TempDir::new().unwrap();
    let err = update_subnet_data(&context, dir.path(), false).await.unwrap_err();
    assert!(matches!(err, LoaderError::ApiError(_)));
    assert!(!dir.path().join("merged_subnet_data.csv").exists());
  }
}
