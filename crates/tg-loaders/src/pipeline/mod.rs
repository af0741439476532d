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

//! Five-phase subnet analysis pipeline.
//!
//! ```text
//! ingest → verify sources → normalize → research + score → finalize
//! ```
//!
//! Each phase writes a JSON snapshot into the output directory. Per-subnet
//! failures are collected into the run's error list and the run goes on;
//! only a failed subnet fetch or an unwritable snapshot fails the run.

pub mod report;
pub mod source;
pub mod state;

use chrono::Utc;
use futures::FutureExt;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tg_analysis::{
  create_initial_sources, provider_from_config, verification_summary, verify_and_merge_sources, AnalysisError,
  HttpPageFetcher, ResearchAgent, Researcher, Scorer, ScoringAgent, SiteScraper, WebsiteScraper,
};
use tg_client::TaostatsClient;
use tg_core::{round_to, Config};
use tg_models::{
  AnalyzedSubnet, DashboardRecord, NormalizedSubnet, ResearchOutcome, ScoreOutcome, SourceChannel, SourceHealth,
  SubnetRecord, VerifiedSources, VerifiedSubnet, WebsiteData,
};
use tracing::{error, info, warn};

use crate::snapshot::write_json;
use crate::{
  BatchConfig, BatchProcessor, LoaderConfig, LoaderContext, LoaderError, LoaderResult, ProcessState, ProcessTracker,
};

pub use report::{PipelineReport, PipelineSummary, RunStatus};
pub use source::{SubnetSource, TaostatsSubnetSource};
pub use state::{PhaseOutput, PipelinePhase, RunState};

pub const PHASE_1_FILE: &str = "phase_1_taostats_data.json";
pub const PHASE_2_FILE: &str = "phase_2_verified_sources.json";
pub const PHASE_3_FILE: &str = "phase_3_normalized_data.json";
pub const PHASE_4_FILE: &str = "phase_4_research_scores.json";
pub const FINAL_FILE: &str = "final_subnet_analysis.json";
pub const COMPLETE_FILE: &str = "complete_subnet_data.json";

const PRIMARY_LINKS: [SourceChannel; 5] = [
  SourceChannel::Website,
  SourceChannel::Github,
  SourceChannel::Discord,
  SourceChannel::Twitter,
  SourceChannel::Documentation,
];

#[derive(Debug, Clone)]
pub struct PipelineConfig {
  pub output_dir: PathBuf,
  /// Subnets scraped or researched at once
  pub max_concurrent: usize,
  pub target_netuids: Option<Vec<i64>>,
  pub show_progress: bool,
}

impl Default for PipelineConfig {
  fn default() -> Self {
    Self { output_dir: PathBuf::from("pipeline_output"), max_concurrent: 3, target_netuids: None, show_progress: false }
  }
}

pub struct SubnetPipeline {
  source: Arc<dyn SubnetSource>,
  scraper: Arc<dyn SiteScraper>,
  researcher: Arc<dyn Researcher>,
  scorer: Arc<dyn Scorer>,
  config: PipelineConfig,
  tracker: ProcessTracker,
}

impl SubnetPipeline {
  pub fn new(
    source: Arc<dyn SubnetSource>,
    scraper: Arc<dyn SiteScraper>,
    researcher: Arc<dyn Researcher>,
    scorer: Arc<dyn Scorer>,
    config: PipelineConfig,
  ) -> Self {
    Self { source, scraper, researcher, scorer, config, tracker: ProcessTracker::new() }
  }

  /// Wire the live Taostats client, website scraper and LLM agents.
  pub fn from_config(config: &Config, pipeline: PipelineConfig) -> LoaderResult<Self> {
    let client = Arc::new(TaostatsClient::new(config)?);
    let source = TaostatsSubnetSource::new(LoaderContext::new(client, LoaderConfig::default()));
    let scraper = WebsiteScraper::new(HttpPageFetcher::new(config)?);
    let provider = provider_from_config(config);

    Ok(Self::new(
      Arc::new(source),
      Arc::new(scraper),
      Arc::new(ResearchAgent::new(Arc::clone(&provider))),
      Arc::new(ScoringAgent::new(provider)),
      pipeline,
    ))
  }

  /// Phase timings recorded so far.
  pub fn tracker(&self) -> &ProcessTracker {
    &self.tracker
  }

  pub async fn run(&self) -> PipelineReport {
    let clock = Instant::now();
    let state = RunState::new().start(Utc::now());
    info!("Starting subnet pipeline, output in {}", self.config.output_dir.display());

    let ingested = match self.tracked("phase_1_ingest", self.ingest()).await {
      Ok(output) => output,
      Err(e) => return Self::failed(state, e),
    };
    let state = state.with_total(ingested.records.len()).advance(PipelinePhase::Ingesting, ingested.errors);

    let verified = match self.tracked("phase_2_verify", self.verify(ingested.records)).await {
      Ok(output) => output,
      Err(e) => return Self::failed(state, e),
    };
    let state = state.advance(PipelinePhase::Verifying, verified.errors);

    let normalized = match self.tracked("phase_3_normalize", self.normalize(verified.records)).await {
      Ok(output) => output,
      Err(e) => return Self::failed(state, e),
    };
    let state = state.advance(PipelinePhase::Normalizing, normalized.errors);

    let analyzed = match self.tracked("phase_4_research", self.analyze(normalized.records)).await {
      Ok(output) => output,
      Err(e) => return Self::failed(state, e),
    };
    let state = state.advance(PipelinePhase::Researching, analyzed.errors);

    let finalized = match self.tracked("phase_5_finalize", self.finalize(analyzed.records)).await {
      Ok(output) => output,
      Err(e) => return Self::failed(state, e),
    };
    let state = state.advance(PipelinePhase::Finalizing, finalized.errors);

    let summary = pipeline_summary(&finalized.records, state.errors.len(), clock.elapsed().as_secs_f64());
    info!(
      "Pipeline completed: {} subnets, {} errors in {}",
      summary.total_subnets_processed, summary.pipeline_errors, summary.execution_time
    );
    PipelineReport::success(state, self.config.output_dir.join(FINAL_FILE), summary)
  }

  fn failed(state: RunState, e: LoaderError) -> PipelineReport {
    error!("Pipeline failed during {}: {}", state.phase, e);
    let message = e.to_string();
    PipelineReport::failed(state.fail(message.clone()), message)
  }

  async fn tracked<T, Fut>(&self, name: &str, work: Fut) -> LoaderResult<PhaseOutput<T>>
  where
    Fut: Future<Output = LoaderResult<PhaseOutput<T>>>,
  {
    let id = self.tracker.start(name).await?;
    match work.await {
      Ok(output) => {
        let state = if output.errors.is_empty() { ProcessState::Success } else { ProcessState::CompletedWithErrors };
        self.tracker.complete(id, state, Some(output.records.len())).await?;
        Ok(output)
      }
      Err(e) => {
        self.tracker.fail(id, &e.to_string()).await?;
        Err(e)
      }
    }
  }

  fn batch_processor(&self) -> BatchProcessor {
    BatchProcessor::new(BatchConfig {
      max_concurrent: self.config.max_concurrent,
      show_progress: self.config.show_progress,
      ..BatchConfig::default()
    })
  }

  fn snapshot<T: serde::Serialize>(&self, file: &str, records: &[T]) -> LoaderResult<()> {
    write_json(&self.config.output_dir.join(file), records)
  }

  async fn ingest(&self) -> LoaderResult<PhaseOutput<SubnetRecord>> {
    info!("Phase 1: fetching subnet data from Taostats");
    let identities = self.source.identities(self.config.target_netuids.clone()).await?;
    let records: Vec<SubnetRecord> = identities.iter().map(SubnetRecord::from).collect();

    self.snapshot(PHASE_1_FILE, &records)?;
    info!("Phase 1 complete: {} subnets ingested", records.len());
    Ok(PhaseOutput::clean(records))
  }

  async fn verify(&self, records: Vec<SubnetRecord>) -> LoaderResult<PhaseOutput<VerifiedSubnet>> {
    info!("Phase 2: verifying sources for {} subnets", records.len());
    let scraper = Arc::clone(&self.scraper);
    let result = self
      .batch_processor()
      .process_batches(records, move |record: SubnetRecord| {
        let scraper = Arc::clone(&scraper);
        async move { Ok::<_, LoaderError>(verify_subnet(scraper.as_ref(), record).await) }.boxed()
      })
      .await?;

    let output = collect_phase(result.success, result.failures);
    self.snapshot(PHASE_2_FILE, &output.records)?;
    info!("Phase 2 complete: {} subnets verified", output.records.len());
    Ok(output)
  }

  async fn normalize(&self, records: Vec<VerifiedSubnet>) -> LoaderResult<PhaseOutput<NormalizedSubnet>> {
    info!("Phase 3: normalizing {} subnets", records.len());
    let processed_at = Utc::now();
    let normalized: Vec<NormalizedSubnet> =
      records.into_iter().map(|verified| NormalizedSubnet::from_verified(verified, processed_at)).collect();

    self.snapshot(PHASE_3_FILE, &normalized)?;
    info!(
      "Phase 3 complete: {} of {} subnets ready for research",
      normalized.iter().filter(|s| s.research_ready).count(),
      normalized.len()
    );
    Ok(PhaseOutput::clean(normalized))
  }

  async fn analyze(&self, records: Vec<NormalizedSubnet>) -> LoaderResult<PhaseOutput<AnalyzedSubnet>> {
    info!("Phase 4: researching and scoring {} subnets", records.len());
    let researcher = Arc::clone(&self.researcher);
    let scorer = Arc::clone(&self.scorer);
    let result = self
      .batch_processor()
      .process_batches(records, move |subnet: NormalizedSubnet| {
        let researcher = Arc::clone(&researcher);
        let scorer = Arc::clone(&scorer);
        async move { Ok::<_, LoaderError>(analyze_subnet(researcher.as_ref(), scorer.as_ref(), subnet).await) }.boxed()
      })
      .await?;

    let output = collect_phase(result.success, result.failures);
    self.snapshot(PHASE_4_FILE, &output.records)?;
    info!("Phase 4 complete: {} subnets analyzed", output.records.len());
    Ok(output)
  }

  async fn finalize(&self, records: Vec<AnalyzedSubnet>) -> LoaderResult<PhaseOutput<DashboardRecord>> {
    info!("Phase 5: building dashboard dataset");
    let dashboard: Vec<DashboardRecord> = records.iter().map(dashboard_record).collect();

    self.snapshot(FINAL_FILE, &dashboard)?;
    self.snapshot(COMPLETE_FILE, &records)?;
    info!("Phase 5 complete: final dataset has {} subnets", dashboard.len());
    Ok(PhaseOutput::clean(dashboard))
  }
}

/// Merge per-item results into phase records and the error list.
fn collect_phase<T>(
  results: Vec<(T, Option<String>)>,
  failures: Vec<(usize, LoaderError)>,
) -> PhaseOutput<T> {
  let (records, errors): (Vec<T>, Vec<Option<String>>) = results.into_iter().unzip();
  let mut errors: Vec<String> = errors.into_iter().flatten().collect();
  errors.extend(failures.into_iter().map(|(idx, e)| format!("Item {idx}: {e}")));
  PhaseOutput::new(records, errors)
}

async fn verify_subnet(scraper: &dyn SiteScraper, record: SubnetRecord) -> (VerifiedSubnet, Option<String>) {
  let Some(website_url) = record.sources.website.clone().filter(|url| !url.is_empty()) else {
    warn!("No website URL for subnet {}", record.netuid);
    let verified_sources = create_initial_sources(&record.sources);
    return (
      VerifiedSubnet {
        subnet: record,
        website_data: WebsiteData::no_website(),
        verified_sources,
        source_verification_summary: None,
      },
      None,
    );
  };

  match scraper.scrape(&website_url, &record.name).await {
    Ok(website_data) => {
      let verified_sources = verify_and_merge_sources(&record.sources, &website_data);
      let summary = verification_summary(&verified_sources);
      (
        VerifiedSubnet {
          subnet: record,
          website_data,
          verified_sources,
          source_verification_summary: Some(summary),
        },
        None,
      )
    }
    Err(e) => {
      error!("Error processing subnet {}: {}", record.netuid, e);
      let message = format!("Subnet {}: {}", record.netuid, e);
      let verified_sources = create_initial_sources(&record.sources);
      let website_data = WebsiteData::failed(&website_url, &record.name, e.to_string());
      (
        VerifiedSubnet { subnet: record, website_data, verified_sources, source_verification_summary: None },
        Some(message),
      )
    }
  }
}

async fn analyze_subnet(
  researcher: &dyn Researcher,
  scorer: &dyn Scorer,
  subnet: NormalizedSubnet,
) -> (AnalyzedSubnet, Option<String>) {
  if !subnet.research_ready {
    warn!("Skipping research for subnet {}: not research ready", subnet.netuid);
    let analyzed = AnalyzedSubnet {
      subnet,
      research_results: ResearchOutcome::Skipped { reason: "not_research_ready".to_string() },
      scores: ScoreOutcome::Skipped { reason: "no_research_data".to_string() },
      analysis_completed_at: None,
    };
    return (analyzed, None);
  }

  let outcome = async {
    let research = researcher.research(&subnet).await?;
    let scores = scorer.score(&subnet, &research).await?;
    Ok::<_, AnalysisError>((research, scores))
  }
  .await;

  match outcome {
    Ok((research, scores)) => (
      AnalyzedSubnet {
        subnet,
        research_results: ResearchOutcome::Completed(Box::new(research)),
        scores: ScoreOutcome::Completed(Box::new(scores)),
        analysis_completed_at: Some(Utc::now()),
      },
      None,
    ),
    Err(e) => {
      error!("Error researching subnet {}: {}", subnet.netuid, e);
      let message = format!("Research error for subnet {}: {}", subnet.netuid, e);
      (
        AnalyzedSubnet {
          subnet,
          research_results: ResearchOutcome::Error { error: e.to_string() },
          scores: ScoreOutcome::Error { error: e.to_string() },
          analysis_completed_at: None,
        },
        Some(message),
      )
    }
  }
}

pub fn source_health(sources: &VerifiedSources) -> SourceHealth {
  let summary = verification_summary(sources);
  SourceHealth {
    total_sources: summary.total_sources,
    verified_sources: summary.both_sources,
    missing_sources: summary.taostats_only,
    new_sources: summary.website_only,
    health_score: summary.health_score,
  }
}

fn has_link(sources: &VerifiedSources, channel: SourceChannel) -> bool {
  sources.get(&channel).is_some_and(|entry| !entry.url.is_empty())
}

pub fn dashboard_record(analyzed: &AnalyzedSubnet) -> DashboardRecord {
  let subnet = &analyzed.subnet;
  let sources = &subnet.sources;
  let health = source_health(sources);
  DashboardRecord {
    netuid: subnet.netuid,
    name: subnet.name.clone(),
    description: subnet.description.clone(),
    verified_sources_count: health.verified_sources,
    website_available: subnet.research_ready,
    has_github: has_link(sources, SourceChannel::Github),
    has_documentation: has_link(sources, SourceChannel::Documentation),
    research_status: analyzed.research_results.status().to_string(),
    scoring_status: analyzed.scores.status().to_string(),
    scores: analyzed.scores.clone(),
    source_health: health,
    primary_links: PRIMARY_LINKS
      .iter()
      .filter_map(|channel| {
        sources.get(channel).filter(|entry| !entry.url.is_empty()).map(|entry| (*channel, entry.url.clone()))
      })
      .collect(),
    last_updated: analyzed.analysis_completed_at.unwrap_or(subnet.processed_at),
  }
}

pub fn pipeline_summary(records: &[DashboardRecord], pipeline_errors: usize, elapsed_secs: f64) -> PipelineSummary {
  let total = records.len();
  let average_source_health = if total == 0 {
    0.0
  } else {
    round_to(records.iter().map(|r| r.source_health.health_score).sum::<f64>() / total as f64, 1)
  };
  PipelineSummary {
    total_subnets_processed: total,
    research_ready_subnets: records.iter().filter(|r| r.website_available).count(),
    subnets_with_github: records.iter().filter(|r| r.has_github).count(),
    average_source_health,
    pipeline_errors,
    execution_time: format!("{elapsed_secs:.2}s"),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tg_models::{SourceEntry, SourceStatus};

  fn entry(url: &str, status: SourceStatus) -> SourceEntry {
    SourceEntry {
      url: url.to_string(),
      status,
      taostats_url: None,
      website_urls: Vec::new(),
      match_confidence: None,
      discrepancy: false,
    }
  }

  #[test]
  fn test_source_health() {
    let mut sources = VerifiedSources::new();
    sources.insert(SourceChannel::Github, entry("https://github.com/a/b", SourceStatus::Both));
    sources.insert(SourceChannel::Discord, entry("https://discord.gg/x", SourceStatus::TaostatsOnly));
    sources.insert(SourceChannel::Twitter, entry("https://x.com/a", SourceStatus::WebsiteOnly));

    let health = source_health(&sources);
    assert_eq!(health.total_sources, 3);
    assert_eq!(health.verified_sources, 1);
    assert_eq!(health.missing_sources, 1);
    assert_eq!(health.new_sources, 1);
    assert_eq!(health.health_score, 33.3);
    assert_eq!(health.health_score, verification_summary(&sources).health_score);

    assert_eq!(source_health(&VerifiedSources::new()).health_score, 0.0);
  }

  #[test]
  fn test_summary_formats_seconds() {
    let summary = pipeline_summary(&[], 2, 1.23456);
    assert_eq!(summary.execution_time, "1.23s");
    assert_eq!(summary.pipeline_errors, 2);
    assert_eq!(summary.average_source_health, 0.0);
  }
}
