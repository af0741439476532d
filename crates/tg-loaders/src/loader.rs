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

//! Base traits and types for data loaders

use crate::process_tracker::ProcessState;
use crate::{LoaderResult, ProcessTracker};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use tg_client::TaostatsClient;

/// Configuration for data loaders
#[derive(Debug, Clone)]
pub struct LoaderConfig {
  /// Enable process state tracking
  pub track_process: bool,
}

impl Default for LoaderConfig {
  fn default() -> Self {
    Self { track_process: true }
  }
}

/// Shared context for all loaders
pub struct LoaderContext {
  pub client: Arc<TaostatsClient>,
  pub config: LoaderConfig,
  pub process_tracker: Option<ProcessTracker>,
}

impl LoaderContext {
  pub fn new(client: Arc<TaostatsClient>, config: LoaderConfig) -> Self {
    Self { client, config, process_tracker: None }
  }

  pub fn with_process_tracker(mut self, tracker: ProcessTracker) -> Self {
    self.process_tracker = Some(tracker);
    self
  }

  /// Tracker to report to, if tracking is on.
  pub fn tracker(&self) -> Option<&ProcessTracker> {
    self.process_tracker.as_ref().filter(|_| self.config.track_process)
  }
}

/// Base trait for all data loaders
#[async_trait]
pub trait DataLoader: Send + Sync {
  /// The type of data this loader processes
  type Input: Send;

  /// The result type after loading
  type Output;

  /// Load data from the given input
  async fn load(&self, context: &LoaderContext, input: Self::Input) -> LoaderResult<Self::Output>;

  /// Validate input before loading
  async fn validate_input(&self, _input: &Self::Input) -> LoaderResult<()> {
    Ok(())
  }

  /// Get loader name for logging/tracking
  fn name(&self) -> &'static str;
}

/// Run `work` under the context's tracker, recording the row count or the
/// error message.
pub(crate) async fn run_tracked<T, F>(context: &LoaderContext, name: &str, work: F) -> LoaderResult<Vec<T>>
where
  F: Future<Output = LoaderResult<Vec<T>>>,
{
  let Some(tracker) = context.tracker() else {
    return work.await;
  };
  let id = tracker.start(name).await?;
  match work.await {
    Ok(rows) => {
      tracker.complete(id, ProcessState::Success, Some(rows.len())).await?;
      Ok(rows)
    }
    Err(e) => {
      tracker.fail(id, &e.to_string()).await?;
      Err(e)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn client() -> Arc<TaostatsClient> {
    let config = tg_core::Config::default_with_key("test_key".to_string());
    Arc::new(TaostatsClient::new(&config).expect("Failed to create client"))
  }

  #[test]
  fn test_loader_config_default() {
    let config = LoaderConfig::default();
    assert!(config.track_process);
  }

  #[test]
  fn test_loader_context_new() {
    let context = LoaderContext::new(client(), LoaderConfig::default());
    assert!(context.process_tracker.is_none());
    assert!(context.tracker().is_none());
  }

  #[test]
  fn test_tracker_respects_track_process() {
    let config = LoaderConfig { track_process: false, ..LoaderConfig::default() };
    let context = LoaderContext::new(client(), config).with_process_tracker(ProcessTracker::new());
    assert!(context.process_tracker.is_some());
    assert!(context.tracker().is_none());

    let context = LoaderContext::new(client(), LoaderConfig::default()).with_process_tracker(ProcessTracker::new());
    assert!(context.tracker().is_some());
  }
}
