//! Model reply → [`CategoryScore`].

use regex::{Regex, RegexBuilder};
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::LazyLock;
use tg_client::llm::parse_structured;
use tg_models::{CategoryScore, Confidence, ScoreCategory, ScoreStatus};
use tracing::debug;

use crate::error::{AnalysisError, AnalysisResult};

const MAX_REASONS: usize = 5;
const MAX_POINTS: usize = 3;
const DEFAULT_SCORE: u8 = 3;

static SCORE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
  [r"Score:?\s*(\d)", r"score\s*is\s*(\d)", r"rating:?\s*(\d)", r"(\d)/5", r"(\d)\s*out\s*of\s*5"]
    .into_iter()
    .map(|p| RegexBuilder::new(p).case_insensitive(true).build().expect("valid regex"))
    .collect()
});

static NUMBERED_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.").expect("valid regex"));

/// Reply shape requested from the model for one category.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CategoryVerdict {
  /// Integer from 1 (poor) to 5 (excellent)
  pub score: u8,
  pub reasoning: Vec<String>,
  pub strengths: Vec<String>,
  pub concerns: Vec<String>,
  pub confidence: Confidence,
}

fn default_reasoning(category: ScoreCategory) -> Vec<String> {
  vec![format!("Limited information available for {} assessment", category)]
}

fn completed_score(
  category: ScoreCategory,
  score: u8,
  reasoning: Vec<String>,
  strengths: Vec<String>,
  concerns: Vec<String>,
  confidence: Confidence,
  raw: &str,
) -> CategoryScore {
  let weight = category.weight();
  let reasoning = if reasoning.is_empty() {
    default_reasoning(category)
  } else {
    reasoning.into_iter().take(MAX_REASONS).collect()
  };
  CategoryScore {
    category,
    score,
    weight,
    weighted_score: weight * u32::from(score),
    reasoning,
    strengths: strengths.into_iter().take(MAX_POINTS).collect(),
    concerns: concerns.into_iter().take(MAX_POINTS).collect(),
    confidence,
    status: ScoreStatus::Completed,
    raw_response: Some(raw.to_string()),
  }
}

/// Placeholder for a category whose scoring call failed.
pub fn failed_score(category: ScoreCategory, error: &str) -> CategoryScore {
  let weight = category.weight();
  CategoryScore {
    category,
    score: 1,
    weight,
    weighted_score: weight,
    reasoning: vec![format!("Scoring failed: {}", error)],
    strengths: Vec::new(),
    concerns: vec!["Unable to complete scoring due to technical error".to_string()],
    confidence: Confidence::Low,
    status: ScoreStatus::Error,
    raw_response: None,
  }
}

/// Decode a structured verdict, rejecting scores outside 1..=5.
pub fn decode_verdict(content: &str) -> AnalysisResult<CategoryVerdict> {
  let verdict =
    parse_structured::<CategoryVerdict>(content).map_err(|e| AnalysisError::Schema(e.to_string()))?;
  if !(1..=5).contains(&verdict.score) {
    return Err(AnalysisError::Schema(format!("score {} out of range", verdict.score)));
  }
  Ok(verdict)
}

/// Structured verdict if it validates, free-text heuristics otherwise.
pub fn parse_category_score(content: &str, category: ScoreCategory) -> CategoryScore {
  match decode_verdict(content) {
    Ok(verdict) => {
      let clean = |items: Vec<String>| -> Vec<String> {
        items.into_iter().map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect()
      };
      completed_score(
        category,
        verdict.score,
        clean(verdict.reasoning),
        clean(verdict.strengths),
        clean(verdict.concerns),
        verdict.confidence,
        content,
      )
    }
    Err(e) => {
      debug!("structured score reply rejected for {}: {}", category, e);
      parse_free_text(content, category)
    }
  }
}

/// First in-range score found by the ordered patterns; 3 when none.
pub fn extract_score(text: &str) -> u8 {
  SCORE_PATTERNS
    .iter()
    .filter_map(|re| re.captures(text))
    .filter_map(|caps| caps.get(1).and_then(|m| m.as_str().parse::<u8>().ok()))
    .find(|score| (1..=5).contains(score))
    .unwrap_or(DEFAULT_SCORE)
}

fn is_bullet(line: &str) -> bool {
  line.starts_with('-') || line.starts_with('•')
}

/// Heuristic parse of a prose reply.
pub fn parse_free_text(content: &str, category: ScoreCategory) -> CategoryScore {
  let score = extract_score(content);

  let reasoning: Vec<String> = content
    .lines()
    .map(str::trim)
    .filter(|line| is_bullet(line) || NUMBERED_LINE.is_match(line) || line.to_lowercase().contains("because"))
    .map(|line| {
      line
        .trim_start_matches(|c: char| c == '-' || c == '•' || c == '.' || c == ' ' || c.is_ascii_digit())
        .to_string()
    })
    .filter(|line| !line.is_empty())
    .collect();

  #[derive(PartialEq)]
  enum Section {
    Strengths,
    Concerns,
  }

  let mut strengths = Vec::new();
  let mut concerns = Vec::new();
  let mut section = None;
  for line in content.lines().map(str::trim) {
    let lower = line.to_lowercase();
    if ["strength", "positive", "advantage"].iter().any(|k| lower.contains(k)) {
      section = Some(Section::Strengths);
    } else if ["concern", "weakness", "risk", "negative"].iter().any(|k| lower.contains(k)) {
      section = Some(Section::Concerns);
    } else if is_bullet(line) {
      let point = line.trim_start_matches(['-', '•']).trim().to_string();
      match section {
        Some(Section::Strengths) => strengths.push(point),
        Some(Section::Concerns) => concerns.push(point),
        None => {}
      }
    }
  }

  let lower = content.to_lowercase();
  let confidence = if lower.contains("high confidence") {
    Confidence::High
  } else if lower.contains("low confidence") || lower.contains("uncertain") {
    Confidence::Low
  } else {
    Confidence::Medium
  };

  completed_score(category, score, reasoning, strengths, concerns, confidence, content)
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  const PROSE: &str = "Score: 4/5

Reasoning:
- Experienced founders with public profiles
- Shipped mainnet because the validators are live
1. Clear hiring plan

Key strengths:
- Transparent team
- Strong ML background

Concerns:
- Small team
- Key person dependency

High confidence overall.";

  #[test]
  fn test_structured_verdict() {
    let content = r#"{"score": 5, "reasoning": ["Live product", " "], "strengths": ["a","b","c","d"], "concerns": [], "confidence": "High"}"#;
    let score = parse_category_score(content, ScoreCategory::ProductViability);
    assert_eq!(score.score, 5);
    assert_eq!(score.weight, 25);
    assert_eq!(score.weighted_score, 125);
    assert_eq!(score.reasoning, vec!["Live product".to_string()]);
    assert_eq!(score.strengths.len(), 3);
    assert_eq!(score.confidence, Confidence::High);
    assert_eq!(score.status, ScoreStatus::Completed);
  }

  #[test]
  fn test_out_of_range_structured_score_falls_back() {
    let content = r#"{"score": 9, "reasoning": [], "strengths": [], "concerns": [], "confidence": "Low"}"#;
    let score = parse_category_score(content, ScoreCategory::TeamStrength);
    assert_eq!(score.score, 3);
    assert_eq!(
      score.reasoning,
      vec!["Limited information available for team_strength assessment".to_string()]
    );
  }

  #[test]
  fn test_decode_verdict_reports_schema_errors() {
    let out_of_range = r#"{"score": 0, "reasoning": [], "strengths": [], "concerns": [], "confidence": "Low"}"#;
    assert!(matches!(decode_verdict(out_of_range), Err(AnalysisError::Schema(msg)) if msg.contains("out of range")));
    assert!(matches!(decode_verdict("Score: 4/5"), Err(AnalysisError::Schema(_))));

    let valid = r#"{"score": 2, "reasoning": ["thin"], "strengths": [], "concerns": [], "confidence": "Medium"}"#;
    assert_eq!(decode_verdict(valid).unwrap().score, 2);
  }

  #[test]
  fn test_extract_score_patterns() {
    assert_eq!(extract_score("Score: 2"), 2);
    assert_eq!(extract_score("my SCORE IS 5 today"), 5);
    assert_eq!(extract_score("Rating 1"), 1);
    assert_eq!(extract_score("I'd give it 4 out of 5"), 4);
    assert_eq!(extract_score("Score: 9 but really 2/5"), 2);
    assert_eq!(extract_score("nothing numeric"), 3);
  }

  #[test]
  fn test_free_text_sections() {
    let score = parse_category_score(PROSE, ScoreCategory::TeamStrength);
    assert_eq!(score.score, 4);
    assert_eq!(score.weighted_score, 100);
    assert_eq!(score.strengths, vec!["Transparent team".to_string(), "Strong ML background".to_string()]);
    assert_eq!(score.concerns, vec!["Small team".to_string(), "Key person dependency".to_string()]);
    assert_eq!(score.confidence, Confidence::High);
    assert!(score.reasoning.contains(&"Experienced founders with public profiles".to_string()));
    assert!(score.reasoning.contains(&"Clear hiring plan".to_string()));
    assert!(score.reasoning.len() <= 5);
    assert_eq!(score.raw_response.as_deref(), Some(PROSE));
  }

  #[test]
  fn test_failed_score() {
    let score = failed_score(ScoreCategory::MarketOpportunity, "boom");
    assert_eq!(score.score, 1);
    assert_eq!(score.weighted_score, 20);
    assert_eq!(score.status, ScoreStatus::Error);
    assert_eq!(score.reasoning, vec!["Scoring failed: boom".to_string()]);
    assert_eq!(score.concerns, vec!["Unable to complete scoring due to technical error".to_string()]);
  }
}
