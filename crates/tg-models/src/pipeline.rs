//! Per-subnet records as they move through the pipeline phases.

use crate::research::ResearchReport;
use crate::scoring::ScoreReport;
use crate::sources::{SourceChannel, TaostatsSources, VerificationSummary, VerifiedSources};
use crate::subnet::SubnetIdentity;
use crate::website::WebsiteData;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Ingested subnet, before any verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubnetRecord {
  pub netuid: i64,
  pub name: String,
  pub description: String,
  pub sources: TaostatsSources,
  pub additional_info: Option<Value>,
  pub raw_data: Value,
}

impl From<&SubnetIdentity> for SubnetRecord {
  fn from(identity: &SubnetIdentity) -> Self {
    Self {
      netuid: identity.netuid,
      name: identity.subnet_name.clone(),
      description: identity.description.clone(),
      sources: TaostatsSources::new(
        &identity.github_repo,
        &identity.subnet_url,
        &identity.discord,
        &identity.subnet_contact,
      ),
      additional_info: identity.raw.get("additional").filter(|v| !v.is_null()).cloned(),
      raw_data: identity.raw.clone(),
    }
  }
}

/// Subnet after the website pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifiedSubnet {
  #[serde(flatten)]
  pub subnet: SubnetRecord,
  pub website_data: WebsiteData,
  pub verified_sources: VerifiedSources,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub source_verification_summary: Option<VerificationSummary>,
}

pub const PIPELINE_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSubnet {
  pub netuid: i64,
  pub name: String,
  pub description: String,
  pub sources: VerifiedSources,
  pub taostats_raw: Value,
  pub website_raw: WebsiteData,
  pub source_verification: Option<VerificationSummary>,
  /// Only subnets with a successfully scraped website are researched
  pub research_ready: bool,
  pub processed_at: DateTime<Utc>,
  pub pipeline_version: String,
}

impl NormalizedSubnet {
  pub fn from_verified(verified: VerifiedSubnet, processed_at: DateTime<Utc>) -> Self {
    let research_ready = verified.website_data.is_success();
    Self {
      netuid: verified.subnet.netuid,
      name: verified.subnet.name,
      description: verified.subnet.description,
      sources: verified.verified_sources,
      taostats_raw: verified.subnet.raw_data,
      website_raw: verified.website_data,
      source_verification: verified.source_verification_summary,
      research_ready,
      processed_at,
      pipeline_version: PIPELINE_VERSION.to_string(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResearchOutcome {
  Completed(Box<ResearchReport>),
  Skipped { reason: String },
  Error { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScoreOutcome {
  Completed(Box<ScoreReport>),
  Skipped { reason: String },
  Error { error: String },
}

impl ResearchOutcome {
  pub fn status(&self) -> &'static str {
    match self {
      ResearchOutcome::Completed(_) => "completed",
      ResearchOutcome::Skipped { .. } => "skipped",
      ResearchOutcome::Error { .. } => "error",
    }
  }
}

impl ScoreOutcome {
  pub fn status(&self) -> &'static str {
    match self {
      ScoreOutcome::Completed(_) => "completed",
      ScoreOutcome::Skipped { .. } => "skipped",
      ScoreOutcome::Error { .. } => "error",
    }
  }

  pub fn report(&self) -> Option<&ScoreReport> {
    match self {
      ScoreOutcome::Completed(report) => Some(&**report),
      _ => None,
    }
  }
}

/// Subnet after research and scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedSubnet {
  #[serde(flatten)]
  pub subnet: NormalizedSubnet,
  pub research_results: ResearchOutcome,
  pub scores: ScoreOutcome,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub analysis_completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceHealth {
  pub total_sources: usize,
  pub verified_sources: usize,
  pub missing_sources: usize,
  pub new_sources: usize,
  pub health_score: f64,
}

/// Flattened view used by the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardRecord {
  pub netuid: i64,
  pub name: String,
  pub description: String,
  pub verified_sources_count: usize,
  pub website_available: bool,
  pub has_github: bool,
  pub has_documentation: bool,
  pub research_status: String,
  pub scoring_status: String,
  pub scores: ScoreOutcome,
  pub source_health: SourceHealth,
  pub primary_links: BTreeMap<SourceChannel, String>,
  pub last_updated: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_record_from_identity() {
    let identity = SubnetIdentity::from_value(&json!({
      "netuid": 4,
      "subnet_name": "Targon",
      "subnet_url": "https://targon.com",
      "github_repo": "",
      "additional": {"note": "x"}
    }));
    let record = SubnetRecord::from(&identity);
    assert_eq!(record.netuid, 4);
    assert_eq!(record.sources.website.as_deref(), Some("https://targon.com"));
    assert_eq!(record.sources.github, None);
    assert_eq!(record.additional_info, Some(json!({"note": "x"})));
  }

  #[test]
  fn test_outcome_tags() {
    let skipped = ResearchOutcome::Skipped { reason: "not_research_ready".to_string() };
    let json = serde_json::to_value(&skipped).unwrap();
    assert_eq!(json, json!({"status": "skipped", "reason": "not_research_ready"}));

    let error = ScoreOutcome::Error { error: "boom".to_string() };
    assert_eq!(serde_json::to_value(&error).unwrap()["status"], "error");
    assert_eq!(error.status(), "error");
    assert!(error.report().is_none());
  }

  #[test]
  fn test_normalized_research_ready_follows_website() {
    let identity = SubnetIdentity::from_value(&json!({"netuid": 1, "subnet_name": "A"}));
    let verified = VerifiedSubnet {
      subnet: SubnetRecord::from(&identity),
      website_data: WebsiteData::no_website(),
      verified_sources: VerifiedSources::new(),
      source_verification_summary: None,
    };
    let normalized = NormalizedSubnet::from_verified(verified, Utc::now());
    assert!(!normalized.research_ready);
    assert_eq!(normalized.pipeline_version, "1.0");
  }
}
