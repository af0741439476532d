/*
 *
 *
 *
 *
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 *
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

use crate::endpoints::{pools::PoolEndpoints, subnets::SubnetEndpoints};
use crate::transport::Transport;
use crate::DirectRateLimiter;
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use tg_core::{Config, Result};

/// Build a direct token-bucket limiter allowing `per_minute` requests.
///
/// Zero falls back to the crate default.
pub fn direct_limiter(per_minute: u32) -> Arc<DirectRateLimiter> {
  let rate = NonZeroU32::new(per_minute)
    .or_else(|| NonZeroU32::new(tg_core::DEFAULT_RATE_LIMIT))
    .unwrap_or(NonZeroU32::MIN);
  Arc::new(RateLimiter::direct(Quota::per_minute(rate)))
}

/// Main Taostats API client
///
/// Provides access to the subnet and pool endpoints. Handles authentication,
/// rate limiting, and transport concerns automatically.
///
/// # Examples
///
/// ```ignore
/// use tg_client::TaostatsClient;
/// use tg_core::Config;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = Config::from_env()?;
///     let client = TaostatsClient::new(&config)?;
///
///     let identities = client.subnets().identity().await?;
///     println!("{} subnets registered", identities.len());
///
///     let pools = client.pools().latest().await?;
///     println!("{} pools priced", pools.len());
///     Ok(())
/// }
/// ```
pub struct TaostatsClient {
  rate_limiter: Arc<DirectRateLimiter>,
  transport: Arc<Transport>,
}

impl TaostatsClient {
  /// Create a new Taostats API client
  ///
  /// # Errors
  ///
  /// Returns an error if the HTTP client cannot be created.
  pub fn new(config: &Config) -> Result<Self> {
    let rate_limiter = direct_limiter(config.rate_limit);
    let transport = Arc::new(Transport::new(config)?);

    Ok(Self { transport, rate_limiter })
  }

  /// Create a new client sharing an existing rate limiter
  pub fn with_rate_limiter(config: &Config, rate_limiter: Arc<DirectRateLimiter>) -> Result<Self> {
    Ok(Self { transport: Arc::new(Transport::new(config)?), rate_limiter })
  }

  /// Subnet identity and stats endpoints
  pub fn subnets(&self) -> SubnetEndpoints {
    SubnetEndpoints::new(self.transport.clone(), self.rate_limiter.clone())
  }

  /// dTAO pool endpoints
  pub fn pools(&self) -> PoolEndpoints {
    PoolEndpoints::new(self.transport.clone(), self.rate_limiter.clone())
  }

  /// Wait for rate limit to allow next request
  ///
  /// Endpoints call this themselves; it is exposed for callers that batch
  /// their own requests against the same budget.
  pub async fn wait_for_rate_limit(&self) -> Result<()> {
    self.rate_limiter.until_ready().await;
    Ok(())
  }
}

impl std::fmt::Debug for TaostatsClient {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("TaostatsClient")
      .field("transport", &self.transport)
      .field("rate_limiter", &"RateLimiter")
      .finish()
  }
}
