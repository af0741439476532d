//! Run state of the analysis pipeline.
//!
//! [`RunState`] is a value: every phase hands back a [`PhaseOutput`] and the
//! orchestrator derives the next state with [`RunState::advance`], which
//! consumes the old one. Nothing mutates a shared run record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelinePhase {
  Initialized,
  Ingesting,
  Verifying,
  Normalizing,
  Researching,
  Finalizing,
  Completed,
  Failed,
}

impl PipelinePhase {
  /// Phase that follows a successful `self`. Terminal phases map to
  /// themselves.
  pub fn next(self) -> Self {
    match self {
      PipelinePhase::Initialized => PipelinePhase::Ingesting,
      PipelinePhase::Ingesting => PipelinePhase::Verifying,
      PipelinePhase::Verifying => PipelinePhase::Normalizing,
      PipelinePhase::Normalizing => PipelinePhase::Researching,
      PipelinePhase::Researching => PipelinePhase::Finalizing,
      PipelinePhase::Finalizing => PipelinePhase::Completed,
      PipelinePhase::Completed => PipelinePhase::Completed,
      PipelinePhase::Failed => PipelinePhase::Failed,
    }
  }

  pub fn is_terminal(self) -> bool {
    matches!(self, PipelinePhase::Completed | PipelinePhase::Failed)
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      PipelinePhase::Initialized => "initialized",
      PipelinePhase::Ingesting => "ingesting",
      PipelinePhase::Verifying => "verifying",
      PipelinePhase::Normalizing => "normalizing",
      PipelinePhase::Researching => "researching",
      PipelinePhase::Finalizing => "finalizing",
      PipelinePhase::Completed => "completed",
      PipelinePhase::Failed => "failed",
    }
  }
}

impl std::fmt::Display for PipelinePhase {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Records produced by one phase plus the per-subnet errors it recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseOutput<T> {
  pub records: Vec<T>,
  pub errors: Vec<String>,
}

impl<T> PhaseOutput<T> {
  pub fn new(records: Vec<T>, errors: Vec<String>) -> Self {
    Self { records, errors }
  }

  pub fn clean(records: Vec<T>) -> Self {
    Self { records, errors: Vec::new() }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunState {
  pub phase: PipelinePhase,
  pub started_at: Option<DateTime<Utc>>,
  pub completed_phases: Vec<PipelinePhase>,
  pub total_subnets: usize,
  pub errors: Vec<String>,
}

impl Default for RunState {
  fn default() -> Self {
    Self::new()
  }
}

impl RunState {
  pub fn new() -> Self {
    Self {
      phase: PipelinePhase::Initialized,
      started_at: None,
      completed_phases: Vec::new(),
      total_subnets: 0,
      errors: Vec::new(),
    }
  }

  pub fn start(self, at: DateTime<Utc>) -> Self {
    Self { phase: PipelinePhase::Ingesting, started_at: Some(at), ..self }
  }

  pub fn with_total(self, total_subnets: usize) -> Self {
    Self { total_subnets, ..self }
  }

  /// Close `completed`, keep its errors and move to the following phase.
  pub fn advance(self, completed: PipelinePhase, errors: Vec<String>) -> Self {
    let mut completed_phases = self.completed_phases;
    completed_phases.push(completed);
    let mut all_errors = self.errors;
    all_errors.extend(errors);
    Self { phase: completed.next(), completed_phases, errors: all_errors, ..self }
  }

  pub fn fail(self, error: impl Into<String>) -> Self {
    let mut errors = self.errors;
    errors.push(error.into());
    Self { phase: PipelinePhase::Failed, errors, ..self }
  }
}
