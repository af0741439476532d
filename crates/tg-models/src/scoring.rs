//! Weighted score report produced by the scoring agent.

use crate::research::Confidence;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Scoring categories. Weights are fixed and sum to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreCategory {
  TeamStrength,
  ProductViability,
  MarketOpportunity,
  ExecutionProgress,
  RiskManagement,
}

impl ScoreCategory {
  pub const ALL: [ScoreCategory; 5] = [
    ScoreCategory::TeamStrength,
    ScoreCategory::ProductViability,
    ScoreCategory::MarketOpportunity,
    ScoreCategory::ExecutionProgress,
    ScoreCategory::RiskManagement,
  ];

  pub fn weight(&self) -> u32 {
    match self {
      ScoreCategory::TeamStrength => 25,
      ScoreCategory::ProductViability => 25,
      ScoreCategory::MarketOpportunity => 20,
      ScoreCategory::ExecutionProgress => 15,
      ScoreCategory::RiskManagement => 15,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      ScoreCategory::TeamStrength => "team_strength",
      ScoreCategory::ProductViability => "product_viability",
      ScoreCategory::MarketOpportunity => "market_opportunity",
      ScoreCategory::ExecutionProgress => "execution_progress",
      ScoreCategory::RiskManagement => "risk_management",
    }
  }
}

impl fmt::Display for ScoreCategory {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreStatus {
  Completed,
  Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
  pub category: ScoreCategory,
  /// 1 to 5
  pub score: u8,
  pub weight: u32,
  pub weighted_score: u32,
  pub reasoning: Vec<String>,
  pub strengths: Vec<String>,
  pub concerns: Vec<String>,
  pub confidence: Confidence,
  pub status: ScoreStatus,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub raw_response: Option<String>,
}

/// Investment recommendation derived from the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
  #[serde(rename = "Strong Buy")]
  StrongBuy,
  Buy,
  Hold,
  #[serde(rename = "Weak Hold")]
  WeakHold,
  Avoid,
}

impl Recommendation {
  /// Thresholds: 4.0, 3.5, 2.5, 2.0.
  pub fn from_score(overall: f64) -> Self {
    if overall >= 4.0 {
      Recommendation::StrongBuy
    } else if overall >= 3.5 {
      Recommendation::Buy
    } else if overall >= 2.5 {
      Recommendation::Hold
    } else if overall >= 2.0 {
      Recommendation::WeakHold
    } else {
      Recommendation::Avoid
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      Recommendation::StrongBuy => "Strong Buy",
      Recommendation::Buy => "Buy",
      Recommendation::Hold => "Hold",
      Recommendation::WeakHold => "Weak Hold",
      Recommendation::Avoid => "Avoid",
    }
  }

  pub fn rationale(&self) -> &'static str {
    match self {
      Recommendation::StrongBuy => "Excellent fundamentals across multiple areas",
      Recommendation::Buy => "Good investment potential with solid fundamentals",
      Recommendation::Hold => "Average performance, proceed with caution",
      Recommendation::WeakHold => "Below average, significant concerns",
      Recommendation::Avoid => "Major red flags or insufficient information",
    }
  }
}

impl fmt::Display for Recommendation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} - {}", self.label(), self.rationale())
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreMetadata {
  pub research_quality: Confidence,
  pub data_completeness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
  pub subnet_netuid: i64,
  pub subnet_name: String,
  pub scoring_timestamp: DateTime<Utc>,
  pub category_scores: BTreeMap<ScoreCategory, CategoryScore>,
  /// Weight-normalised average over completed categories, one decimal
  pub overall_score: f64,
  pub risk_flags: Vec<String>,
  pub strengths: Vec<String>,
  pub weaknesses: Vec<String>,
  pub investment_recommendation: Recommendation,
  pub recommendation_summary: String,
  pub confidence_level: Confidence,
  pub metadata: ScoreMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreDistribution {
  pub excellent: usize,
  pub good: usize,
  pub average: usize,
  pub poor: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSubnet {
  pub netuid: i64,
  pub name: String,
  pub overall_score: f64,
  pub risk_flags: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringSummary {
  pub total_subnets_scored: usize,
  pub average_score: f64,
  pub highest_score: f64,
  pub lowest_score: f64,
  pub score_distribution: ScoreDistribution,
  pub top_subnets: Vec<RankedSubnet>,
  pub high_risk_subnets: Vec<RankedSubnet>,
}
