use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::state::RunState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
  Success,
  Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSummary {
  pub total_subnets_processed: usize,
  pub research_ready_subnets: usize,
  pub subnets_with_github: usize,
  pub average_source_health: f64,
  pub pipeline_errors: usize,
  /// Wall-clock duration, e.g. `"12.34s"`
  pub execution_time: String,
}

/// What a pipeline run hands back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineReport {
  pub status: RunStatus,
  pub run_state: RunState,
  pub final_dataset_path: Option<PathBuf>,
  pub summary: Option<PipelineSummary>,
  pub error: Option<String>,
}

impl PipelineReport {
  pub fn success(run_state: RunState, final_dataset_path: PathBuf, summary: PipelineSummary) -> Self {
    Self {
      status: RunStatus::Success,
      run_state,
      final_dataset_path: Some(final_dataset_path),
      summary: Some(summary),
      error: None,
    }
  }

  pub fn failed(run_state: RunState, error: String) -> Self {
    Self { status: RunStatus::Failed, run_state, final_dataset_path: None, summary: None, error: Some(error) }
  }

  pub fn is_success(&self) -> bool {
    self.status == RunStatus::Success
  }
}
