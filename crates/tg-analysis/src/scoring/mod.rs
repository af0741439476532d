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

//! LLM scoring agent.
//!
//! Each [`ScoreCategory`] is scored 1-5 from the research answers relevant
//! to it, then combined into a weighted overall score, risk flags and a
//! recommendation.

mod catalogue;
mod parse;

pub use catalogue::{category_spec, CategorySpec};
pub use parse::{decode_verdict, extract_score, failed_score, parse_category_score, parse_free_text, CategoryVerdict};

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tg_client::llm::ResponseFormat;
use tg_client::{CompletionOptions, StructuredOutput};
use tg_core::round_to;
use tg_models::{
  AnswerStatus, CategoryScore, Confidence, NormalizedSubnet, RankedSubnet, Recommendation, ResearchReport,
  ScoreCategory, ScoreDistribution, ScoreMetadata, ScoreReport, ScoreStatus, ScoringSummary,
};
use tracing::{error, info};

use crate::error::AnalysisResult;
use crate::traits::{CompletionProvider, Scorer};

pub const SCORING_OPTIONS: CompletionOptions = CompletionOptions { temperature: 0.1, max_tokens: 1500 };

const MAX_HIGHLIGHTS: usize = 5;
const TOP_SUBNETS: usize = 5;

pub struct ScoringAgent {
  provider: Arc<dyn CompletionProvider>,
}

impl ScoringAgent {
  pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
    Self { provider }
  }

  pub async fn generate_scores(&self, subnet: &NormalizedSubnet, research: &ResearchReport) -> ScoreReport {
    info!("Starting scoring for subnet {}: {}", subnet.netuid, subnet.name);

    let mut category_scores = BTreeMap::new();
    for category in ScoreCategory::ALL {
      info!("Scoring {} for subnet {}", category, subnet.netuid);
      let score = self.score_category(category, subnet, research).await;
      category_scores.insert(category, score);
    }

    let report = finalize_scores(subnet, research, category_scores);
    info!(
      "Scoring completed for subnet {} - Overall: {}",
      subnet.netuid, report.overall_score
    );
    report
  }

  async fn score_category(
    &self,
    category: ScoreCategory,
    subnet: &NormalizedSubnet,
    research: &ResearchReport,
  ) -> CategoryScore {
    let system = system_prompt(category, &subnet.name, &scoring_context(category, subnet, research));
    let user = format!(
      "Please score the {} category for {} based on the research data provided.",
      category, subnet.name
    );
    let format = ResponseFormat::json_schema(CategoryVerdict::format_name(), CategoryVerdict::strict_schema());

    match self.provider.complete(&system, &user, SCORING_OPTIONS, Some(format)).await {
      Ok(content) => parse_category_score(&content, category),
      Err(e) => {
        error!("AI scoring failed for category {}: {}", category, e);
        failed_score(category, &e.to_string())
      }
    }
  }
}

#[async_trait]
impl Scorer for ScoringAgent {
  async fn score(&self, subnet: &NormalizedSubnet, research: &ResearchReport) -> AnalysisResult<ScoreReport> {
    Ok(self.generate_scores(subnet, research).await)
  }
}

fn system_prompt(category: ScoreCategory, subnet_name: &str, context: &str) -> String {
  let spec = category_spec(category);
  let criteria: Vec<String> = spec.criteria.iter().map(|c| format!("- {}", c)).collect();
  format!(
    "You are an expert investment analyst specializing in blockchain and AI projects. \
You are scoring the \"{category}\" aspect of the Bittensor subnet \"{subnet_name}\".

SCORING CRITERIA FOR {upper}:
{description}

Key evaluation criteria:
{criteria}

SCORING SCALE:
5 = Excellent - Top tier performance, strong fundamentals
4 = Good - Solid performance with minor areas for improvement
3 = Average - Decent performance with some concerns
2 = Below Average - Significant concerns but some potential
1 = Poor - Major red flags or insufficient information

INSTRUCTIONS:
1. Analyze the provided research data carefully
2. Evaluate against the specific criteria for this category
3. Assign a score from 1-5 based on the evidence
4. Provide 3-5 specific reasons for the score
5. Identify any red flags or notable strengths
6. Be objective and evidence-based
7. Rate your confidence (High/Medium/Low)

RESEARCH DATA:
{context}",
    upper = category.as_str().to_uppercase(),
    description = spec.description,
    criteria = criteria.join("\n"),
  )
}

/// Research answers relevant to `category`, plus source quality figures.
pub fn scoring_context(category: ScoreCategory, subnet: &NormalizedSubnet, research: &ResearchReport) -> String {
  let description = if subnet.description.trim().is_empty() {
    "No description"
  } else {
    subnet.description.as_str()
  };
  let mut parts = vec![
    format!("SUBNET: {} (NetUID: {})", subnet.name, subnet.netuid),
    format!("DESCRIPTION: {}", description),
  ];

  for research_category in category_spec(category).research {
    let Some(answers) = research.category(*research_category) else {
      continue;
    };
    parts.push(format!("\n{} RESEARCH:", research_category.as_str().to_uppercase()));
    for answer in answers.values().filter(|a| a.research_status == AnswerStatus::Completed) {
      parts.push(format!("- {}", answer.question));
      parts.push(format!("  Answer: {}", answer.answer));
      parts.push(format!("  Confidence: {}", answer.confidence));
    }
  }

  let sources = &research.sources_analyzed;
  let metadata = &research.analysis_metadata;
  parts.push("\nSOURCE QUALITY:".to_string());
  parts.push(format!("- Total sources: {}", sources.total_sources));
  parts.push(format!("- Verified sources: {}", sources.verified_sources));
  parts.push(format!("- Website scraped: {}", sources.website_scraped));
  parts.push(format!("- Research confidence: {}", metadata.confidence_level));
  parts.push(format!("- Data completeness: {}%", metadata.data_completeness));

  parts.join("\n")
}

fn unique_first(items: impl Iterator<Item = String>, limit: usize) -> Vec<String> {
  let mut unique: Vec<String> = Vec::new();
  for item in items {
    if unique.len() == limit {
      break;
    }
    if !unique.contains(&item) {
      unique.push(item);
    }
  }
  unique
}

/// Weighted overall score over completed categories; 1.0 when none completed.
pub fn overall_score(category_scores: &BTreeMap<ScoreCategory, CategoryScore>) -> f64 {
  let (weighted, weight) = category_scores
    .values()
    .filter(|s| s.status == ScoreStatus::Completed)
    .fold((0u32, 0u32), |(weighted, weight), s| (weighted + s.weighted_score, weight + s.weight));
  if weight == 0 {
    1.0
  } else {
    round_to(f64::from(weighted) / f64::from(weight), 1)
  }
}

/// Report-level confidence from research confidence and completeness.
pub fn scoring_confidence(research_confidence: Confidence, data_completeness: f64) -> Confidence {
  match research_confidence {
    Confidence::High if data_completeness >= 70.0 => Confidence::High,
    Confidence::High | Confidence::Medium if data_completeness >= 50.0 => Confidence::Medium,
    _ => Confidence::Low,
  }
}

/// Combine per-category scores into the final report.
pub fn finalize_scores(
  subnet: &NormalizedSubnet,
  research: &ResearchReport,
  category_scores: BTreeMap<ScoreCategory, CategoryScore>,
) -> ScoreReport {
  let overall = overall_score(&category_scores);

  let risk_flags = category_scores
    .values()
    .filter(|s| s.score <= 2)
    .map(|s| format!("Low score in {}: {}/5", s.category, s.score))
    .collect();
  let strengths = unique_first(category_scores.values().flat_map(|s| s.strengths.iter().cloned()), MAX_HIGHLIGHTS);
  let weaknesses = unique_first(category_scores.values().flat_map(|s| s.concerns.iter().cloned()), MAX_HIGHLIGHTS);

  let recommendation = Recommendation::from_score(overall);
  let metadata = &research.analysis_metadata;

  ScoreReport {
    subnet_netuid: subnet.netuid,
    subnet_name: subnet.name.clone(),
    scoring_timestamp: Utc::now(),
    category_scores,
    overall_score: overall,
    risk_flags,
    strengths,
    weaknesses,
    investment_recommendation: recommendation,
    recommendation_summary: recommendation.to_string(),
    confidence_level: scoring_confidence(metadata.confidence_level, metadata.data_completeness),
    metadata: ScoreMetadata {
      research_quality: metadata.confidence_level,
      data_completeness: metadata.data_completeness,
    },
  }
}

fn ranked(report: &ScoreReport) -> RankedSubnet {
  RankedSubnet {
    netuid: report.subnet_netuid,
    name: report.subnet_name.clone(),
    overall_score: report.overall_score,
    risk_flags: report.risk_flags.len(),
  }
}

/// Distribution and rankings across scored subnets.
pub fn scoring_summary(reports: &[ScoreReport]) -> ScoringSummary {
  if reports.is_empty() {
    return ScoringSummary::default();
  }

  let scores: Vec<f64> = reports.iter().map(|r| r.overall_score).collect();
  let count = scores.len();
  let distribution = ScoreDistribution {
    excellent: scores.iter().filter(|s| **s >= 4.0).count(),
    good: scores.iter().filter(|s| (3.0..4.0).contains(*s)).count(),
    average: scores.iter().filter(|s| (2.0..3.0).contains(*s)).count(),
    poor: scores.iter().filter(|s| **s < 2.0).count(),
  };

  let mut by_score: Vec<&ScoreReport> = reports.iter().collect();
  by_score.sort_by(|a, b| b.overall_score.total_cmp(&a.overall_score));

  ScoringSummary {
    total_subnets_scored: count,
    average_score: round_to(scores.iter().sum::<f64>() / count as f64, 2),
    highest_score: scores.iter().copied().fold(f64::MIN, f64::max),
    lowest_score: scores.iter().copied().fold(f64::MAX, f64::min),
    score_distribution: distribution,
    top_subnets: by_score.iter().take(TOP_SUBNETS).map(|r| ranked(r)).collect(),
    high_risk_subnets: reports.iter().filter(|r| r.risk_flags.len() >= 2).map(ranked).collect(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tg_core::test_utils::assert_score_eq;
  use tg_models::{ResearchMetadata, SourcesAnalyzed, SourcesQuality, VerifiedSources, WebsiteData};

  struct FixedProvider(Option<&'static str>);

  #[async_trait]
  impl CompletionProvider for FixedProvider {
    async fn complete(
      &self,
      _system: &str,
      _user: &str,
      options: CompletionOptions,
      _format: Option<ResponseFormat>,
    ) -> AnalysisResult<String> {
      assert_eq!(options, SCORING_OPTIONS);
      self
        .0
        .map(str::to_string)
        .ok_or_else(|| crate::error::AnalysisError::Http("503".to_string()))
    }
  }

  fn subnet() -> NormalizedSubnet {
    NormalizedSubnet {
      netuid: 9,
      name: "Nine".to_string(),
      description: String::new(),
      sources: VerifiedSources::new(),
      taostats_raw: serde_json::Value::Null,
      website_raw: WebsiteData::no_website(),
      source_verification: None,
      research_ready: true,
      processed_at: Utc::now(),
      pipeline_version: "1.0".to_string(),
    }
  }

  fn research(confidence: Confidence, completeness: f64) -> ResearchReport {
    ResearchReport {
      subnet_netuid: 9,
      subnet_name: "Nine".to_string(),
      research_timestamp: Utc::now(),
      sources_analyzed: SourcesAnalyzed::default(),
      answers: BTreeMap::new(),
      analysis_metadata: ResearchMetadata {
        sources_quality: SourcesQuality::Fair,
        data_completeness: completeness,
        confidence_level: confidence,
        total_questions: 24,
        answered_questions: 0,
        high_confidence_answers: 0,
      },
    }
  }

  fn scored(category: ScoreCategory, score: u8) -> CategoryScore {
    let verdict = format!(
      r#"{{"score": {score}, "reasoning": ["r"], "strengths": ["s{score}"], "concerns": ["c"], "confidence": "Medium"}}"#
    );
    parse_category_score(&verdict, category)
  }

  fn report(netuid: i64, overall: f64, flags: usize) -> ScoreReport {
    let mut report = finalize_scores(&subnet(), &research(Confidence::Low, 0.0), BTreeMap::new());
    report.subnet_netuid = netuid;
    report.overall_score = overall;
    report.risk_flags = vec!["flag".to_string(); flags];
    report
  }

  #[test]
  fn test_overall_is_weight_normalised() {
    let mut scores = BTreeMap::new();
    scores.insert(ScoreCategory::TeamStrength, scored(ScoreCategory::TeamStrength, 4));
    scores.insert(ScoreCategory::ProductViability, scored(ScoreCategory::ProductViability, 3));
    scores.insert(ScoreCategory::MarketOpportunity, scored(ScoreCategory::MarketOpportunity, 5));
    scores.insert(ScoreCategory::ExecutionProgress, failed_score(ScoreCategory::ExecutionProgress, "x"));
    // (100 + 75 + 100) / 70
    assert_score_eq(overall_score(&scores), 3.9);
    assert_score_eq(overall_score(&BTreeMap::new()), 1.0);
  }

  #[test]
  fn test_finalize_flags_and_recommendation() {
    let mut scores = BTreeMap::new();
    for category in ScoreCategory::ALL {
      scores.insert(category, scored(category, 2));
    }
    let report = finalize_scores(&subnet(), &research(Confidence::High, 80.0), scores);

    assert_eq!(report.overall_score, 2.0);
    assert_eq!(report.risk_flags.len(), 5);
    assert_eq!(report.risk_flags[0], "Low score in team_strength: 2/5");
    assert_eq!(report.investment_recommendation, Recommendation::WeakHold);
    assert_eq!(report.recommendation_summary, "Weak Hold - Below average, significant concerns");
    assert_eq!(report.strengths, vec!["s2".to_string()]);
    assert_eq!(report.weaknesses, vec!["c".to_string()]);
    assert_eq!(report.confidence_level, Confidence::High);
  }

  #[test]
  fn test_scoring_confidence() {
    assert_eq!(scoring_confidence(Confidence::High, 70.0), Confidence::High);
    assert_eq!(scoring_confidence(Confidence::High, 60.0), Confidence::Medium);
    assert_eq!(scoring_confidence(Confidence::Medium, 90.0), Confidence::Medium);
    assert_eq!(scoring_confidence(Confidence::Medium, 40.0), Confidence::Low);
    assert_eq!(scoring_confidence(Confidence::Low, 100.0), Confidence::Low);
  }

  #[tokio::test]
  async fn test_agent_scores_every_category() {
    let agent = ScoringAgent::new(Arc::new(FixedProvider(Some(
      r#"{"score": 4, "reasoning": ["ok"], "strengths": [], "concerns": [], "confidence": "High"}"#,
    ))));
    let report = agent.generate_scores(&subnet(), &research(Confidence::Medium, 55.0)).await;
    assert_eq!(report.category_scores.len(), 5);
    assert_eq!(report.overall_score, 4.0);
    assert_eq!(report.investment_recommendation, Recommendation::StrongBuy);
    assert!(report.risk_flags.is_empty());
    assert_eq!(report.confidence_level, Confidence::Medium);
  }

  #[tokio::test]
  async fn test_provider_failure_scores_one() {
    let agent = ScoringAgent::new(Arc::new(FixedProvider(None)));
    let report = agent.generate_scores(&subnet(), &research(Confidence::Low, 0.0)).await;
    assert!(report.category_scores.values().all(|s| s.status == ScoreStatus::Error));
    assert_eq!(report.overall_score, 1.0);
    assert_eq!(report.investment_recommendation, Recommendation::Avoid);
    assert_eq!(report.risk_flags.len(), 5);
    assert_eq!(report.weaknesses, vec!["Unable to complete scoring due to technical error".to_string()]);
  }

  #[test]
  fn test_scoring_summary() {
    let reports = vec![report(1, 4.5, 0), report(2, 3.0, 2), report(3, 1.5, 3), report(4, 2.5, 1)];
    let summary = scoring_summary(&reports);

    assert_eq!(summary.total_subnets_scored, 4);
    assert_eq!(summary.average_score, 2.88);
    assert_eq!(summary.highest_score, 4.5);
    assert_eq!(summary.lowest_score, 1.5);
    assert_eq!(summary.score_distribution.excellent, 1);
    assert_eq!(summary.score_distribution.good, 1);
    assert_eq!(summary.score_distribution.average, 1);
    assert_eq!(summary.score_distribution.poor, 1);
    let order: Vec<i64> = summary.top_subnets.iter().map(|r| r.netuid).collect();
    assert_eq!(order, vec![1, 2, 4, 3]);
    let risky: Vec<i64> = summary.high_risk_subnets.iter().map(|r| r.netuid).collect();
    assert_eq!(risky, vec![2, 3]);

    assert_eq!(scoring_summary(&[]).total_subnets_scored, 0);
  }
}
