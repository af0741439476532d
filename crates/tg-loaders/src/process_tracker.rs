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

//! In-memory tracking of loader runs and pipeline phases

use crate::{LoaderError, LoaderResult};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
  Running,
  Success,
  Failed,
  CompletedWithErrors,
}

#[derive(Debug, Clone)]
pub struct ProcessInfo {
  pub process_name: String,
  pub start_time: DateTime<Utc>,
  pub end_time: Option<DateTime<Utc>>,
  pub state: ProcessState,
  pub error_message: Option<String>,
  pub records_processed: Option<usize>,
}

impl ProcessInfo {
  /// Elapsed time, `None` while still running.
  pub fn duration(&self) -> Option<Duration> {
    self.end_time.map(|end| end - self.start_time)
  }
}

/// Shared handle; clones record into the same list.
#[derive(Debug, Clone, Default)]
pub struct ProcessTracker {
  processes: Arc<Mutex<Vec<ProcessInfo>>>,
}

impl ProcessTracker {
  pub fn new() -> Self {
    Self::default()
  }

  /// Record a running process and return its id for `complete`/`fail`.
  pub async fn start(&self, process_name: &str) -> LoaderResult<usize> {
    let mut processes = self.processes.lock().await;
    processes.push(ProcessInfo {
      process_name: process_name.to_string(),
      start_time: Utc::now(),
      end_time: None,
      state: ProcessState::Running,
      error_message: None,
      records_processed: None,
    });
    Ok(processes.len() - 1)
  }

  pub async fn complete(&self, id: usize, state: ProcessState, records_processed: Option<usize>) -> LoaderResult<()> {
    self
      .finish(id, |process| {
        process.state = state;
        process.records_processed = records_processed;
      })
      .await
  }

  pub async fn fail(&self, id: usize, error: &str) -> LoaderResult<()> {
    self
      .finish(id, |process| {
        process.state = ProcessState::Failed;
        process.error_message = Some(error.to_string());
      })
      .await
  }

  async fn finish(&self, id: usize, update: impl FnOnce(&mut ProcessInfo)) -> LoaderResult<()> {
    let mut processes = self.processes.lock().await;
    let process = processes
      .get_mut(id)
      .ok_or_else(|| LoaderError::ProcessTrackingError(format!("unknown process id {id}")))?;
    update(process);
    process.end_time = Some(Utc::now());
    Ok(())
  }

  pub async fn get_all(&self) -> Vec<ProcessInfo> {
    self.processes.lock().await.clone()
  }
}
