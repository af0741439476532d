//! Full pipeline runs against in-process fakes.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tg_analysis::{
  AnalysisError, AnalysisResult, ResearchAgent, Researcher, ScoringAgent, SiteScraper, UnconfiguredProvider,
};
use tg_loaders::pipeline::{
  PipelineConfig, PipelinePhase, RunStatus, SubnetPipeline, SubnetSource, COMPLETE_FILE, FINAL_FILE, PHASE_1_FILE,
  PHASE_2_FILE, PHASE_3_FILE, PHASE_4_FILE,
};
use tg_loaders::{LoaderError, LoaderResult, ProcessState};
use tg_models::{NormalizedSubnet, ResearchReport, SubnetIdentity, WebsiteData, WebsiteStatus};

struct FakeSource {
  fail: bool,
}

#[async_trait]
impl SubnetSource for FakeSource {
  async fn identities(&self, targets: Option<Vec<i64>>) -> LoaderResult<Vec<SubnetIdentity>> {
    if self.fail {
      return Err(LoaderError::ApiError("HTTP error: 503".to_string()));
    }
    let all = vec![
      identity(1, "Good", "https://good.io", "https://github.com/good/repo"),
      identity(2, "Quiet", "", ""),
      identity(3, "Flaky", "https://flaky.io", ""),
      identity(4, "Broken", "https://broken.io", ""),
    ];
    Ok(match targets {
      Some(targets) => all.into_iter().filter(|i| targets.contains(&i.netuid)).collect(),
      None => all,
    })
  }
}

fn identity(netuid: i64, name: &str, url: &str, github: &str) -> SubnetIdentity {
  SubnetIdentity::from_value(&json!({
    "netuid": netuid,
    "subnet_name": name,
    "description": format!("{name} subnet"),
    "subnet_url": url,
    "github_repo": github,
  }))
}

struct FakeScraper;

#[async_trait]
impl SiteScraper for FakeScraper {
  async fn scrape(&self, url: &str, subnet_name: &str) -> AnalysisResult<WebsiteData> {
    if url.contains("broken") {
      return Err(AnalysisError::Scrape { url: url.to_string(), message: "connection refused".to_string() });
    }
    let github_links =
      if subnet_name == "Good" { vec!["https://github.com/good/repo".to_string()] } else { Vec::new() };
    Ok(WebsiteData {
      status: WebsiteStatus::Success,
      url: Some(url.to_string()),
      subnet_name: Some(subnet_name.to_string()),
      title: Some(subnet_name.to_string()),
      github_links,
      ..WebsiteData::default()
    })
  }
}

/// Delegates to the real agent, except for one subnet whose research blows up.
struct FlakyResearcher {
  inner: ResearchAgent,
}

#[async_trait]
impl Researcher for FlakyResearcher {
  async fn research(&self, subnet: &NormalizedSubnet) -> AnalysisResult<ResearchReport> {
    if subnet.netuid == 3 {
      return Err(AnalysisError::Parse("model offline".to_string()));
    }
    self.inner.research(subnet).await
  }
}

fn pipeline(dir: &Path, fail_source: bool, targets: Option<Vec<i64>>) -> SubnetPipeline {
  let provider = Arc::new(UnconfiguredProvider::new("OPENAI_API_KEY not set"));
  SubnetPipeline::new(
    Arc::new(FakeSource { fail: fail_source }),
    Arc::new(FakeScraper),
    Arc::new(FlakyResearcher { inner: ResearchAgent::new(provider.clone()) }),
    Arc::new(ScoringAgent::new(provider)),
    PipelineConfig { output_dir: dir.to_path_buf(), max_concurrent: 2, target_netuids: targets, show_progress: false },
  )
}

fn read_json(path: &Path) -> Value {
  serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_full_run_records_per_subnet_errors() {
  let dir = TempDir::new().unwrap();
  let pipeline = pipeline(dir.path(), false, None);
  let report = pipeline.run().await;

  assert_eq!(report.status, RunStatus::Success);
  assert_eq!(report.run_state.phase, PipelinePhase::Completed);
  assert_eq!(report.run_state.completed_phases.len(), 5);
  assert_eq!(report.run_state.total_subnets, 4);
  assert_eq!(
    report.run_state.errors,
    vec![
      "Subnet 4: Scrape of https://broken.io failed: connection refused".to_string(),
      "Research error for subnet 3: Parse error: model offline".to_string(),
    ]
  );
  assert_eq!(report.final_dataset_path, Some(dir.path().join(FINAL_FILE)));

  for file in [PHASE_1_FILE, PHASE_2_FILE, PHASE_3_FILE, PHASE_4_FILE, FINAL_FILE, COMPLETE_FILE] {
    assert!(dir.path().join(file).exists(), "{file} missing");
  }

  let summary = report.summary.unwrap();
  assert_eq!(summary.total_subnets_processed, 4);
  assert_eq!(summary.research_ready_subnets, 2);
  assert_eq!(summary.subnets_with_github, 1);
  assert_eq!(summary.pipeline_errors, 2);
  assert!(summary.execution_time.ends_with('s'));

  let verified = read_json(&dir.path().join(PHASE_2_FILE));
  assert_eq!(verified[1]["website_data"]["status"], "no_website");
  assert_eq!(verified[3]["website_data"]["status"], "error");
  assert_eq!(verified[0]["verified_sources"]["github"]["status"], "both");

  let final_dataset = read_json(&dir.path().join(FINAL_FILE));
  let by_netuid = |n: i64| final_dataset.as_array().unwrap().iter().find(|r| r["netuid"] == n).unwrap().clone();

  let good = by_netuid(1);
  assert_eq!(good["research_status"], "completed");
  assert_eq!(good["scoring_status"], "completed");
  assert_eq!(good["has_github"], true);
  assert_eq!(good["primary_links"]["github"], "https://github.com/good/repo");

  let quiet = by_netuid(2);
  assert_eq!(quiet["research_status"], "skipped");
  assert_eq!(quiet["scores"]["reason"], "no_research_data");
  assert_eq!(quiet["website_available"], false);

  let flaky = by_netuid(3);
  assert_eq!(flaky["research_status"], "error");
  assert_eq!(flaky["scores"]["error"], "Parse error: model offline");

  let broken = by_netuid(4);
  assert_eq!(broken["research_status"], "skipped");

  let complete = read_json(&dir.path().join(COMPLETE_FILE));
  assert_eq!(complete[2]["research_results"]["status"], "error");
  assert!(complete[0]["analysis_completed_at"].is_string());

  let phases = pipeline.tracker().get_all().await;
  assert_eq!(phases.len(), 5);
  assert_eq!(phases[1].state, ProcessState::CompletedWithErrors);
  assert_eq!(phases[2].state, ProcessState::Success);
}

#[tokio::test]
async fn test_fetch_failure_fails_run() {
  let dir = TempDir::new().unwrap();
  let pipeline = pipeline(dir.path(), true, None);
  let report = pipeline.run().await;

  assert_eq!(report.status, RunStatus::Failed);
  assert!(!report.is_success());
  assert_eq!(report.run_state.phase, PipelinePhase::Failed);
  assert!(report.run_state.completed_phases.is_empty());
  assert!(report.final_dataset_path.is_none());
  assert!(report.error.unwrap().contains("503"));
  assert!(!dir.path().join(PHASE_1_FILE).exists());

  let phases = pipeline.tracker().get_all().await;
  assert_eq!(phases[0].state, ProcessState::Failed);
}

#[tokio::test]
async fn test_target_filter_and_empty_run() {
  let dir = TempDir::new().unwrap();
  let report = pipeline(dir.path(), false, Some(vec![2])).run().await;
  assert!(report.is_success());
  assert_eq!(report.summary.as_ref().unwrap().total_subnets_processed, 1);
  assert!(report.run_state.errors.is_empty());

  let empty_dir = TempDir::new().unwrap();
  let report = pipeline(empty_dir.path(), false, Some(vec![99])).run().await;
  assert!(report.is_success());
  let summary = report.summary.unwrap();
  assert_eq!(summary.total_subnets_processed, 0);
  assert_eq!(summary.average_source_health, 0.0);
  assert_eq!(read_json(&empty_dir.path().join(FINAL_FILE)), json!([]));
}
