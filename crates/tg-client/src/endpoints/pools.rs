//! dTAO liquidity pool endpoints

use super::{impl_endpoint_base, object_rows, EndpointBase};
use crate::transport::Transport;
use crate::DirectRateLimiter;
use std::sync::Arc;
use tg_core::{Result, TaostatsEndpoint};
use tg_models::PoolMarketData;
use tracing::instrument;

/// Pool pricing endpoints
pub struct PoolEndpoints {
  transport: Arc<Transport>,
  rate_limiter: Arc<DirectRateLimiter>,
}

impl PoolEndpoints {
  /// Create a new pool endpoints instance
  pub fn new(transport: Arc<Transport>, rate_limiter: Arc<DirectRateLimiter>) -> Self {
    Self { transport, rate_limiter }
  }

  /// Latest pool pricing for every subnet, first page.
  ///
  /// Market cap and 24h volume come back in rao and are converted to TAO.
  #[instrument(skip(self))]
  pub async fn latest(&self) -> Result<Vec<PoolMarketData>> {
    self.wait_for_rate_limit().await?;
    let rows = self.transport.get_rows(TaostatsEndpoint::PoolLatest, &[("page", "1")]).await?;
    Ok(
      object_rows(rows, "pool latest")
        .iter()
        .map(PoolMarketData::from_value)
        .collect(),
    )
  }
}

impl_endpoint_base!(PoolEndpoints);
