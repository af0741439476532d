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

//! # tg-client
//!
//! Async clients for the two remote services the subnet pipeline talks to:
//!
//! - the Taostats REST API (subnet identity, latest subnet stats, dTAO pools)
//! - an OpenAI-compatible chat completions API, with optional strict
//!   JSON-schema output
//!
//! ## Usage
//!
//! ```ignore
//! use tg_client::TaostatsClient;
//! use tg_core::Config;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let client = TaostatsClient::new(&config)?;
//!
//!     for subnet in client.subnets().identity().await? {
//!         println!("SN{} {}", subnet.netuid, subnet.subnet_name);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Rate Limiting
//!
//! Every outbound request waits on a `governor` token bucket sized from
//! `TG_RATE_LIMIT` (Taostats) or `TG_LLM_RATE_LIMIT` (chat completions).
//!
//! ## Error Handling
//!
//! All methods return `Result<T, tg_core::Error>`.

#![warn(clippy::all)]

pub mod client;
pub mod endpoints;
pub mod llm;
pub mod transport;

use governor::{
  clock::DefaultClock,
  middleware::NoOpMiddleware,
  state::{InMemoryState, NotKeyed},
  RateLimiter,
};

/// Unkeyed in-memory token bucket shared by a client's endpoints.
pub type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>;

pub use client::{direct_limiter, TaostatsClient};
pub use endpoints::{pools::PoolEndpoints, subnets::SubnetEndpoints};
pub use llm::{CompletionOptions, LlmClient, StructuredOutput};
pub use tg_core::{Config, Error, Result};
