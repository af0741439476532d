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

//! Bounded-concurrency processing of per-subnet work

use futures::future::BoxFuture;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use crate::{LoaderError, LoaderResult};

/// Configuration for batch processing
#[derive(Debug, Clone)]
pub struct BatchConfig {
  /// Maximum number of items to process in a single batch
  pub batch_size: usize,

  /// Maximum number of items in flight at once
  pub max_concurrent: usize,

  /// Whether to continue processing on errors
  pub continue_on_error: bool,

  /// Draw a progress bar on stderr
  pub show_progress: bool,
}

impl Default for BatchConfig {
  fn default() -> Self {
    Self { batch_size: 100, max_concurrent: 3, continue_on_error: true, show_progress: false }
  }
}

/// Result of batch processing
#[derive(Debug, Clone)]
pub struct BatchResult<T> {
  /// Successfully processed items, in input order
  pub success: Vec<T>,

  /// Failed items with their input index
  pub failures: Vec<(usize, LoaderError)>,

  /// Total items processed
  pub total_processed: usize,
}

impl<T> Default for BatchResult<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T> BatchResult<T> {
  pub fn new() -> Self {
    Self { success: Vec::new(), failures: Vec::new(), total_processed: 0 }
  }

  pub fn success_count(&self) -> usize {
    self.success.len()
  }

  pub fn failure_count(&self) -> usize {
    self.failures.len()
  }

  pub fn success_rate(&self) -> f64 {
    if self.total_processed == 0 {
      0.0
    } else {
      self.success_count() as f64 / self.total_processed as f64
    }
  }
}

/// Runs independent items concurrently and collects the results into a
/// fresh list once every item has finished.
#[derive(Debug, Clone)]
pub struct BatchProcessor {
  config: BatchConfig,
}

impl BatchProcessor {
  pub fn new(config: BatchConfig) -> Self {
    Self { config }
  }

  fn progress_bar(&self, len: usize) -> ProgressBar {
    if !self.config.show_progress {
      return ProgressBar::hidden();
    }
    let progress = ProgressBar::new(len as u64);
    let style = ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
      .map(|style| style.progress_chars("#>-"))
      .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress.set_style(style);
    progress
  }

  /// Process items in batches, preserving input order in the output.
  pub async fn process_batches<T, F, O>(&self, mut items: Vec<T>, processor: F) -> LoaderResult<BatchResult<O>>
  where
    T: Send + 'static,
    F: Fn(T) -> BoxFuture<'static, LoaderResult<O>> + Send + Sync + Clone + 'static,
    O: Send + 'static,
  {
    let mut result = BatchResult::new();
    let total_items = items.len();
    result.total_processed = total_items;

    let batch_size = self.config.batch_size.max(1);
    debug!("Processing {} items in batches of {}", total_items, batch_size);

    let progress = self.progress_bar(total_items);
    let mut batch_idx = 0;
    let total_batches = total_items.div_ceil(batch_size);

    while !items.is_empty() {
      let take = std::cmp::min(batch_size, items.len());
      let batch: Vec<T> = items.drain(..take).collect();

      debug!("Processing batch {} of {}", batch_idx + 1, total_batches);

      let batch_results = self.process_single_batch(batch, processor.clone(), &progress).await;

      for (idx, batch_result) in batch_results.into_iter().enumerate() {
        let global_idx = batch_idx * batch_size + idx;
        match batch_result {
          Ok(output) => result.success.push(output),
          Err(e) => {
            warn!("Failed to process item {}: {}", global_idx, e);
            result.failures.push((global_idx, e));

            if !self.config.continue_on_error {
              progress.abandon();
              return Err(LoaderError::BatchProcessingError(format!(
                "Batch processing failed at item {}",
                global_idx
              )));
            }
          }
        }
      }

      batch_idx += 1;
    }

    progress.finish_and_clear();
    debug!(
      "Batch processing complete: {} successes, {} failures",
      result.success_count(),
      result.failure_count()
    );

    Ok(result)
  }

  async fn process_single_batch<T, F, O>(
    &self,
    batch: Vec<T>,
    processor: F,
    progress: &ProgressBar,
  ) -> Vec<LoaderResult<O>>
  where
    T: Send + 'static,
    F: Fn(T) -> BoxFuture<'static, LoaderResult<O>> + Send + Sync + Clone,
    O: Send + 'static,
  {
    let progress = progress.clone();

    // `buffered` caps in-flight items and yields them in input order.
    stream::iter(batch)
      .map(move |item| {
        let processor = processor.clone();
        let progress = progress.clone();

        async move {
          let output = processor(item).await;
          progress.inc(1);
          output
        }
      })
      .buffered(self.config.max_concurrent.max(1))
      .collect::<Vec<_>>()
      .await
  }
}
