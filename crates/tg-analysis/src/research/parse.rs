//! Turning model output into [`CategoryAnswers`].

use regex::Regex;
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::LazyLock;
use tg_client::llm::parse_structured;
use tg_models::{AnswerStatus, CategoryAnswers, Confidence, ResearchAnswer};
use tracing::debug;

pub const NOT_AVAILABLE: &str = "Information not available in provided sources";
pub const SOURCES_USED: [&str; 2] = ["website_content", "verified_sources"];

static NUMBERED_SPLIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\d+\.").expect("valid regex"));
static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\d+\.\s*").expect("valid regex"));

/// Reply shape requested from the model for one category.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ResearchAnswers {
  pub answers: Vec<AnsweredQuestion>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AnsweredQuestion {
  /// Key of the question being answered
  pub question_key: String,
  pub answer: String,
  pub confidence: Confidence,
}

fn completed(question: &str, answer: String, confidence: Confidence) -> ResearchAnswer {
  ResearchAnswer {
    question: question.to_string(),
    answer,
    confidence,
    sources_used: SOURCES_USED.iter().map(|s| s.to_string()).collect(),
    research_status: AnswerStatus::Completed,
  }
}

fn unanswered(question: &str) -> ResearchAnswer {
  ResearchAnswer {
    question: question.to_string(),
    answer: NOT_AVAILABLE.to_string(),
    confidence: Confidence::Low,
    sources_used: Vec::new(),
    research_status: AnswerStatus::Incomplete,
  }
}

/// Every question marked failed with `error`.
pub fn failed_answers(questions: &[(&str, &str)], error: &str) -> CategoryAnswers {
  questions
    .iter()
    .map(|(key, question)| {
      let answer = ResearchAnswer {
        question: question.to_string(),
        answer: format!("Research failed: {}", error),
        confidence: Confidence::Low,
        sources_used: Vec::new(),
        research_status: AnswerStatus::Error,
      };
      (key.to_string(), answer)
    })
    .collect()
}

/// Parse a category reply: schema-shaped JSON first, numbered prose second.
pub fn parse_category_response(content: &str, questions: &[(&str, &str)]) -> CategoryAnswers {
  match parse_structured::<ResearchAnswers>(content) {
    Ok(structured) => validate_structured(structured, questions),
    Err(e) => {
      debug!("structured research reply rejected, using free-text parser: {}", e);
      parse_free_text(content, questions)
    }
  }
}

/// Keep answers for known keys (first one wins); fill gaps with placeholders.
pub fn validate_structured(reply: ResearchAnswers, questions: &[(&str, &str)]) -> CategoryAnswers {
  questions
    .iter()
    .map(|(key, question)| {
      let answer = reply
        .answers
        .iter()
        .find(|a| a.question_key.trim() == *key && !a.answer.trim().is_empty())
        .map(|a| completed(question, a.answer.trim().to_string(), a.confidence))
        .unwrap_or_else(|| unanswered(question));
      (key.to_string(), answer)
    })
    .collect()
}

/// Confidence implied by wording in a prose answer.
pub fn infer_confidence(text: &str) -> Confidence {
  let lower = text.to_lowercase();
  if lower.contains("high confidence") || lower.contains("confident") {
    Confidence::High
  } else if lower.contains("low confidence") || lower.contains("uncertain") || lower.contains("not available") {
    Confidence::Low
  } else {
    Confidence::Medium
  }
}

/// Split a numbered list reply and assign parts to questions by position.
pub fn parse_free_text(content: &str, questions: &[(&str, &str)]) -> CategoryAnswers {
  let mut parts: Vec<&str> = NUMBERED_SPLIT.split(content).collect();
  if parts.first().is_some_and(|first| first.trim().is_empty()) {
    parts.remove(0);
  }

  questions
    .iter()
    .enumerate()
    .map(|(i, (key, question))| {
      let answer = match parts.get(i) {
        Some(part) => {
          let text = LEADING_NUMBER.replace(part.trim(), "").trim().to_string();
          let confidence = infer_confidence(&text);
          completed(question, text, confidence)
        }
        None => unanswered(question),
      };
      (key.to_string(), answer)
    })
    .collect()
}
