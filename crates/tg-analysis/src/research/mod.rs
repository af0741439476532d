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

//! LLM research agent.
//!
//! Asks the fixed questionnaire one category at a time against a context
//! assembled from verified sources and scraped website content. A failed
//! category does not fail the report; its answers carry the error instead.

mod parse;
mod questions;

pub use parse::{
  failed_answers, infer_confidence, parse_category_response, parse_free_text, validate_structured, AnsweredQuestion,
  ResearchAnswers, NOT_AVAILABLE,
};
pub use questions::{questions, total_questions};

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tg_client::llm::ResponseFormat;
use tg_client::{CompletionOptions, StructuredOutput};
use tg_core::round_to;
use tg_models::{
  AnswerStatus, CategoryAnswers, Confidence, NormalizedSubnet, ResearchCategory, ResearchMetadata, ResearchReport,
  SourceStatus, SourcesAnalyzed, SourcesQuality,
};
use tracing::{error, info};

use crate::error::AnalysisResult;
use crate::traits::{CompletionProvider, Researcher};

const TEAM_CONTEXT_CHARS: usize = 500;
const CONTENT_SAMPLE_CHARS: usize = 3_000;

pub const RESEARCH_OPTIONS: CompletionOptions = CompletionOptions { temperature: 0.1, max_tokens: 2000 };

pub struct ResearchAgent {
  provider: Arc<dyn CompletionProvider>,
}

impl ResearchAgent {
  pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
    Self { provider }
  }

  /// Run every category and assemble the report.
  pub async fn conduct_research(&self, subnet: &NormalizedSubnet) -> ResearchReport {
    info!("Starting research for subnet {}: {}", subnet.netuid, subnet.name);
    let context = build_context(subnet);

    let mut answers = BTreeMap::new();
    for category in ResearchCategory::ALL {
      info!("Researching {} for subnet {}", category, subnet.netuid);
      let category_answers = self.research_category(category, &context, &subnet.name).await;
      answers.insert(category, category_answers);
    }

    let analysis_metadata = research_metadata(&answers, sources_quality(subnet));
    info!(
      completeness = analysis_metadata.data_completeness,
      confidence = %analysis_metadata.confidence_level,
      "Research completed for subnet {}",
      subnet.netuid
    );

    ResearchReport {
      subnet_netuid: subnet.netuid,
      subnet_name: subnet.name.clone(),
      research_timestamp: Utc::now(),
      sources_analyzed: sources_analyzed(subnet),
      answers,
      analysis_metadata,
    }
  }

  async fn research_category(&self, category: ResearchCategory, context: &str, subnet_name: &str) -> CategoryAnswers {
    let questions = questions(category);
    let system = system_prompt(category, context, subnet_name);
    let user = user_prompt(questions);
    let format = ResponseFormat::json_schema(ResearchAnswers::format_name(), ResearchAnswers::strict_schema());

    match self.provider.complete(&system, &user, RESEARCH_OPTIONS, Some(format)).await {
      Ok(content) => parse_category_response(&content, questions),
      Err(e) => {
        error!("AI research failed for category {}: {}", category, e);
        failed_answers(questions, &e.to_string())
      }
    }
  }
}

#[async_trait]
impl Researcher for ResearchAgent {
  async fn research(&self, subnet: &NormalizedSubnet) -> AnalysisResult<ResearchReport> {
    Ok(self.conduct_research(subnet).await)
  }
}

fn truncate_chars(text: &str, max: usize) -> String {
  text.chars().take(max).collect()
}

/// Prompt context: identity, verified sources, and website highlights.
pub fn build_context(subnet: &NormalizedSubnet) -> String {
  let mut parts = vec![format!("SUBNET: {} (NetUID: {})", subnet.name, subnet.netuid)];
  let description = if subnet.description.trim().is_empty() {
    "No description available"
  } else {
    subnet.description.as_str()
  };
  parts.push(format!("DESCRIPTION: {}", description));

  if !subnet.sources.is_empty() {
    parts.push("\nVERIFIED SOURCES:".to_string());
    for (channel, entry) in &subnet.sources {
      parts.push(format!(
        "- {}: {} (Status: {})",
        channel.as_str().to_uppercase(),
        entry.url,
        entry.status
      ));
    }
  }

  let website = &subnet.website_raw;
  if website.is_success() {
    if let Some(title) = website.title.as_deref().filter(|t| !t.is_empty()) {
      parts.push(format!("\nWEBSITE TITLE: {}", title));
    }
    if let Some(description) = website.description.as_deref().filter(|d| !d.is_empty()) {
      parts.push(format!("WEBSITE DESCRIPTION: {}", description));
    }
    if let Some(mission) = website.mission.as_deref().filter(|m| !m.is_empty()) {
      parts.push(format!("MISSION: {}", mission));
    }
    if !website.team_info.team_description.is_empty() {
      parts.push(format!(
        "TEAM INFO: {}",
        truncate_chars(&website.team_info.team_description, TEAM_CONTEXT_CHARS)
      ));
    }
    if !website.clean_text.is_empty() {
      parts.push(format!(
        "\nWEBSITE CONTENT SAMPLE:\n{}",
        truncate_chars(&website.clean_text, CONTENT_SAMPLE_CHARS)
      ));
    }
  }

  parts.join("\n")
}

fn system_prompt(category: ResearchCategory, context: &str, subnet_name: &str) -> String {
  format!(
    "You are a professional research analyst specializing in blockchain and AI projects. \
You are analyzing the Bittensor subnet \"{subnet_name}\" to answer specific research questions.

INSTRUCTIONS:
1. Analyze the provided context carefully
2. Answer each question based ONLY on the available information
3. If information is not available, clearly state \"Information not available\"
4. Provide specific, factual answers with evidence from the context
5. Rate your confidence in each answer (High/Medium/Low)
6. Keep answers concise but comprehensive (50-200 words per question)
7. Return one entry per question, using the key shown in brackets as question_key

CONTEXT:
{context}

Please answer the following {category} questions about this subnet:"
  )
}

fn user_prompt(questions: &[(&str, &str)]) -> String {
  let listed: Vec<String> = questions
    .iter()
    .enumerate()
    .map(|(i, (key, question))| format!("{}. [{}] {}", i + 1, key, question))
    .collect();
  format!(
    "{}\n\nPlease provide structured answers with confidence levels.",
    listed.join("\n")
  )
}

fn verified_count(subnet: &NormalizedSubnet) -> usize {
  subnet.sources.values().filter(|e| e.status == SourceStatus::Both).count()
}

pub fn sources_analyzed(subnet: &NormalizedSubnet) -> SourcesAnalyzed {
  SourcesAnalyzed {
    total_sources: subnet.sources.len(),
    verified_sources: verified_count(subnet),
    website_scraped: subnet.website_raw.is_success(),
    source_types: subnet.sources.keys().copied().collect(),
  }
}

pub fn sources_quality(subnet: &NormalizedSubnet) -> SourcesQuality {
  if subnet.sources.is_empty() {
    return SourcesQuality::Poor;
  }
  let verified = verified_count(subnet);
  let website = subnet.website_raw.is_success();
  match (verified, website) {
    (v, true) if v >= 3 => SourcesQuality::Excellent,
    (v, true) if v >= 2 => SourcesQuality::Good,
    (v, w) if v >= 1 || w => SourcesQuality::Fair,
    _ => SourcesQuality::Poor,
  }
}

/// Completeness and confidence over all answers.
pub fn research_metadata(
  answers: &BTreeMap<ResearchCategory, CategoryAnswers>,
  sources_quality: SourcesQuality,
) -> ResearchMetadata {
  let total_questions = total_questions();
  let completed = answers
    .values()
    .flat_map(|category| category.values())
    .filter(|a| a.research_status == AnswerStatus::Completed);

  let (answered_questions, high_confidence_answers) =
    completed.fold((0, 0), |(answered, high), a| (answered + 1, high + usize::from(a.confidence == Confidence::High)));

  let total = total_questions as f64;
  let data_completeness = if total_questions > 0 {
    round_to(answered_questions as f64 / total * 100.0, 1)
  } else {
    0.0
  };

  let high = high_confidence_answers as f64;
  let confidence_level = if high >= total * 0.7 {
    Confidence::High
  } else if high >= total * 0.3 {
    Confidence::Medium
  } else {
    Confidence::Low
  };

  ResearchMetadata {
    sources_quality,
    data_completeness,
    confidence_level,
    total_questions,
    answered_questions,
    high_confidence_answers,
  }
}
