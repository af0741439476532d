//! dTAO pool pricing per subnet.

use async_trait::async_trait;
use tg_models::PoolMarketData;
use tracing::info;

use crate::loader::run_tracked;
use crate::{DataLoader, LoaderContext, LoaderError, LoaderResult};

#[derive(Debug, Clone, Copy, Default)]
pub struct MarketLoader;

impl MarketLoader {
  pub fn new() -> Self {
    Self
  }
}

#[async_trait]
impl DataLoader for MarketLoader {
  type Input = ();
  type Output = Vec<PoolMarketData>;

  async fn load(&self, context: &LoaderContext, _input: Self::Input) -> LoaderResult<Self::Output> {
    info!("Loading pool market data");
    run_tracked(context, self.name(), async {
      let pools = context.client.pools().latest().await?;
      let priced = pools.iter().filter(|p| p.market_cap > 0.0).count();
      info!("Loaded market data for {} subnets ({} with market cap)", pools.len(), priced);
      Ok::<_, LoaderError>(pools)
    })
    .await
  }

  fn name(&self) -> &'static str {
    "market_loader"
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::LoaderConfig;
  use serde_json::json;
  use std::sync::Arc;
  use tg_client::TaostatsClient;
  use tg_core::test_utils::assert_approx_eq;
  use tg_core::Config;
  use wiremock::matchers::{method, path, query_param};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  #[tokio::test]
  async fn test_loads_pools_in_tao() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/dtao/pool/latest/v1"))
      .and(query_param("page", "1"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
        "pagination": {"current_page": 1},
        "data": [
          {"netuid": 4, "rank": 1, "market_cap": "9000000000000", "price": "0.12", "tao_volume_24_hr": 2500000000u64},
          {"netuid": 5}
        ]
      })))
      .mount(&server)
      .await;

    let mut config = Config::default_with_key("k".to_string());
    config.base_url = server.uri();
    let context = LoaderContext::new(Arc::new(TaostatsClient::new(&config).unwrap()), LoaderConfig::default());

    let pools = MarketLoader::new().load(&context, ()).await.unwrap();
    assert_eq!(pools.len(), 2);
    assert_approx_eq(pools[0].market_cap, 9000.0, 1e-9);
    assert_approx_eq(pools[0].tao_volume_24_hr, 2.5, 1e-9);
    assert_eq!(pools[1].rank, 0);
    assert_eq!(pools[1].price_change_1_day, None);
  }
}
