//! Latest emission and activity stats per subnet.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tg_models::SubnetStats;
use tracing::info;

use crate::loader::run_tracked;
use crate::{DataLoader, LoaderContext, LoaderError, LoaderResult};

#[derive(Debug, Clone)]
pub struct StatsLoaderInput {
  /// Reference time for rows without a timestamp and for registration age
  pub as_of: DateTime<Utc>,
}

impl Default for StatsLoaderInput {
  fn default() -> Self {
    Self { as_of: Utc::now() }
  }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StatsLoader;

impl StatsLoader {
  pub fn new() -> Self {
    Self
  }
}

#[async_trait]
impl DataLoader for StatsLoader {
  type Input = StatsLoaderInput;
  type Output = Vec<SubnetStats>;

  async fn load(&self, context: &LoaderContext, input: Self::Input) -> LoaderResult<Self::Output> {
    info!("Loading latest subnet stats");
    run_tracked(context, self.name(), async {
      let stats = context.client.subnets().latest(input.as_of).await?;
      let active = stats.iter().filter(|s| s.active).count();
      info!("Loaded stats for {} subnets ({} active)", stats.len(), active);
      Ok::<_, LoaderError>(stats)
    })
    .await
  }

  fn name(&self) -> &'static str {
    "stats_loader"
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::LoaderConfig;
  use chrono::TimeZone;
  use serde_json::json;
  use std::sync::Arc;
  use tg_client::TaostatsClient;
  use tg_core::Config;
  use wiremock::matchers::{method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  #[tokio::test]
  async fn test_loads_stats_from_bare_array() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/subnet/latest/v1"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!([
        {"netuid": 1, "emission": "1500000", "subtoken_enabled": true, "registration_timestamp": "2025-01-01T00:00:00Z"},
        {"netuid": 2, "emission": 500000}
      ])))
      .mount(&server)
      .await;

    let mut config = Config::default_with_key("k".to_string());
    config.base_url = server.uri();
    let context = LoaderContext::new(Arc::new(TaostatsClient::new(&config).unwrap()), LoaderConfig::default());

    let as_of = Utc.with_ymd_and_hms(2025, 1, 31, 0, 0, 0).unwrap();
    let stats = StatsLoader::new().load(&context, StatsLoaderInput { as_of }).await.unwrap();

    assert_eq!(stats.len(), 2);
    assert_eq!(stats[0].emission, 1_500_000.0);
    assert!(stats[0].active);
    assert_eq!(stats[0].days_since_registration, 30);
    assert!(!stats[1].active);
    assert_eq!(stats[1].timestamp, as_of);
  }
}
