//! Subnet endpoints
//!
//! - identity: names, descriptions and project links per netuid
//! - latest: emission share, activity flag, registration time

use super::{impl_endpoint_base, object_rows, EndpointBase};
use crate::transport::Transport;
use crate::DirectRateLimiter;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tg_core::{Result, TaostatsEndpoint};
use tg_models::{SubnetIdentity, SubnetStats};
use tracing::instrument;

/// Subnet identity and stats endpoints
pub struct SubnetEndpoints {
  transport: Arc<Transport>,
  rate_limiter: Arc<DirectRateLimiter>,
}

impl SubnetEndpoints {
  /// Create a new subnet endpoints instance
  pub fn new(transport: Arc<Transport>, rate_limiter: Arc<DirectRateLimiter>) -> Self {
    Self { transport, rate_limiter }
  }

  /// Fetch identity records for every registered subnet.
  #[instrument(skip(self))]
  pub async fn identity(&self) -> Result<Vec<SubnetIdentity>> {
    self.wait_for_rate_limit().await?;
    let rows = self.transport.get_rows(TaostatsEndpoint::SubnetIdentity, &[]).await?;
    Ok(
      object_rows(rows, "subnet identity")
        .iter()
        .map(SubnetIdentity::from_value)
        .collect(),
    )
  }

  /// Fetch the latest stats; `now` stamps rows without a timestamp and
  /// anchors `days_since_registration`.
  #[instrument(skip(self))]
  pub async fn latest(&self, now: DateTime<Utc>) -> Result<Vec<SubnetStats>> {
    self.wait_for_rate_limit().await?;
    let rows = self.transport.get_rows(TaostatsEndpoint::SubnetLatest, &[]).await?;
    Ok(
      object_rows(rows, "subnet latest")
        .iter()
        .map(|row| SubnetStats::from_value(row, now))
        .collect(),
    )
  }
}

impl_endpoint_base!(SubnetEndpoints);

#[cfg(test)]
mod tests {
  use super::*;
  use governor::{Quota, RateLimiter};
  use std::num::NonZeroU32;

  fn create_test_endpoints() -> SubnetEndpoints {
    let transport = Arc::new(Transport::new_mock());
    let quota = Quota::per_minute(NonZeroU32::new(60).unwrap());
    let rate_limiter = Arc::new(RateLimiter::direct(quota));

    SubnetEndpoints::new(transport, rate_limiter)
  }

  #[test]
  fn test_endpoints_creation() {
    let endpoints = create_test_endpoints();
    assert_eq!(endpoints.transport().base_url(), "https://mock.taostats.io/api");
  }

  #[tokio::test]
  async fn test_rate_limit_wait() {
    let endpoints = create_test_endpoints();
    assert!(endpoints.wait_for_rate_limit().await.is_ok());
  }
}
