//! Research report produced by the LLM research agent.

use crate::sources::SourceChannel;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Confidence label attached to LLM output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Confidence {
  High,
  Medium,
  Low,
}

impl fmt::Display for Confidence {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let label = match self {
      Confidence::High => "High",
      Confidence::Medium => "Medium",
      Confidence::Low => "Low",
    };
    f.write_str(label)
  }
}

/// Research question groups, in the order they are asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResearchCategory {
  BasicInfo,
  Team,
  Product,
  Business,
  Development,
  Risks,
}

impl ResearchCategory {
  pub const ALL: [ResearchCategory; 6] = [
    ResearchCategory::BasicInfo,
    ResearchCategory::Team,
    ResearchCategory::Product,
    ResearchCategory::Business,
    ResearchCategory::Development,
    ResearchCategory::Risks,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      ResearchCategory::BasicInfo => "basic_info",
      ResearchCategory::Team => "team",
      ResearchCategory::Product => "product",
      ResearchCategory::Business => "business",
      ResearchCategory::Development => "development",
      ResearchCategory::Risks => "risks",
    }
  }
}

impl fmt::Display for ResearchCategory {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerStatus {
  Completed,
  Incomplete,
  Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchAnswer {
  pub question: String,
  pub answer: String,
  pub confidence: Confidence,
  pub sources_used: Vec<String>,
  pub research_status: AnswerStatus,
}

/// Question key → answer.
pub type CategoryAnswers = BTreeMap<String, ResearchAnswer>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourcesAnalyzed {
  pub total_sources: usize,
  pub verified_sources: usize,
  pub website_scraped: bool,
  pub source_types: Vec<SourceChannel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourcesQuality {
  Excellent,
  Good,
  Fair,
  Poor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchMetadata {
  pub sources_quality: SourcesQuality,
  /// Completed answers as a percentage of all questions
  pub data_completeness: f64,
  pub confidence_level: Confidence,
  pub total_questions: usize,
  pub answered_questions: usize,
  pub high_confidence_answers: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchReport {
  pub subnet_netuid: i64,
  pub subnet_name: String,
  pub research_timestamp: DateTime<Utc>,
  pub sources_analyzed: SourcesAnalyzed,
  pub answers: BTreeMap<ResearchCategory, CategoryAnswers>,
  pub analysis_metadata: ResearchMetadata,
}

impl ResearchReport {
  pub fn category(&self, category: ResearchCategory) -> Option<&CategoryAnswers> {
    self.answers.get(&category)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_confidence_wire_format() {
    assert_eq!(serde_json::to_string(&Confidence::High).unwrap(), "\"High\"");
    let parsed: Confidence = serde_json::from_str("\"Low\"").unwrap();
    assert_eq!(parsed, Confidence::Low);
  }

  #[test]
  fn test_category_order() {
    let mut shuffled = vec![ResearchCategory::Risks, ResearchCategory::BasicInfo, ResearchCategory::Product];
    shuffled.sort();
    assert_eq!(
      shuffled,
      vec![ResearchCategory::BasicInfo, ResearchCategory::Product, ResearchCategory::Risks]
    );
    assert_eq!(ResearchCategory::BasicInfo.to_string(), "basic_info");
  }
}
