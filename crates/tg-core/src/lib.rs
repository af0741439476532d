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

pub mod config;
pub mod error;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::Config;
pub use error::{Error, Result};

/// Taostats REST endpoints used by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaostatsEndpoint {
  /// Subnet identity: names, descriptions, project links
  SubnetIdentity,
  /// Latest per-subnet emission and activity stats
  SubnetLatest,
  /// Latest dTAO liquidity pool pricing
  PoolLatest,
}

impl TaostatsEndpoint {
  /// Path relative to the API base, without a leading slash.
  pub fn path(&self) -> &'static str {
    match self {
      TaostatsEndpoint::SubnetIdentity => "subnet/identity/v1",
      TaostatsEndpoint::SubnetLatest => "subnet/latest/v1",
      TaostatsEndpoint::PoolLatest => "dtao/pool/latest/v1",
    }
  }
}

impl std::fmt::Display for TaostatsEndpoint {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      TaostatsEndpoint::SubnetIdentity => write!(f, "SUBNET_IDENTITY"),
      TaostatsEndpoint::SubnetLatest => write!(f, "SUBNET_LATEST"),
      TaostatsEndpoint::PoolLatest => write!(f, "POOL_LATEST"),
    }
  }
}

/// Base URL for the Taostats API
pub const TAOSTATS_BASE_URL: &str = "https://api.taostats.io/api";

/// Base URL for OpenAI-compatible chat completions
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default research/scoring model
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";

/// Request budgets
pub const DEFAULT_RATE_LIMIT: u32 = 60; // requests per minute
pub const DEFAULT_LLM_RATE_LIMIT: u32 = 60;
pub const DEFAULT_SCRAPE_RATE_LIMIT: u32 = 60;

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
  let factor = 10f64.powi(places);
  (value * factor).round() / factor
}
