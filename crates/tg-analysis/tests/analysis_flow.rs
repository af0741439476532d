//! Scrape → verify → research → score against mock website and LLM servers.

use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tg_analysis::research::questions;
use tg_analysis::{
  provider_from_config, verification_summary, verify_and_merge_sources, HttpPageFetcher, ResearchAgent, ScoringAgent,
  WebsiteScraper,
};
use tg_core::Config;
use tg_models::{
  AnswerStatus, Confidence, NormalizedSubnet, Recommendation, ResearchCategory, SourceChannel, SourceStatus,
  TaostatsSources, VerifiedSubnet, WebsiteStatus,
};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE: &str = r#"
<html>
  <head><title>Acme</title><meta name="description" content="Open inference on Bittensor."></head>
  <body>
    <h2>Mission</h2><p>Serve open models cheaply.</p>
    <a href="https://github.com/acme/serve">GitHub</a>
    <a href="https://docs.acme.io/start">Docs</a>
  </body>
</html>
"#;

fn chat_reply(content: String) -> serde_json::Value {
  json!({"choices": [{"message": {"role": "assistant", "content": content}}]})
}

fn every_answer() -> String {
  let answers: Vec<serde_json::Value> = ResearchCategory::ALL
    .iter()
    .flat_map(|c| questions(*c).iter())
    .map(|(key, _)| json!({"question_key": key, "answer": "Documented on the website.", "confidence": "High"}))
    .collect();
  json!({ "answers": answers }).to_string()
}

async fn mock_llm() -> MockServer {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(path("/chat/completions"))
    .and(body_partial_json(json!({"response_format": {"json_schema": {"name": "ResearchAnswers"}}})))
    .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply(every_answer())))
    .expect(6)
    .mount(&server)
    .await;
  let verdict = json!({
    "score": 4,
    "reasoning": ["Live product with public code"],
    "strengths": ["Open source"],
    "concerns": ["Young project"],
    "confidence": "High"
  });
  Mock::given(method("POST"))
    .and(path("/chat/completions"))
    .and(body_partial_json(json!({"response_format": {"json_schema": {"name": "CategoryVerdict"}}})))
    .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply(verdict.to_string())))
    .expect(5)
    .mount(&server)
    .await;
  server
}

#[tokio::test]
async fn test_subnet_analysis_end_to_end() {
  let site = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/"))
    .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
    .mount(&site)
    .await;
  let llm = mock_llm().await;

  let mut config = Config::default_with_key("taostats".to_string());
  config.llm_api_key = Some("sk-test".to_string());
  config.llm_base_url = llm.uri();

  let website_url = format!("{}/", site.uri());
  let scraper = WebsiteScraper::new(HttpPageFetcher::new(&config).unwrap());
  let website = scraper.scrape_website(&website_url, "Acme").await;
  assert_eq!(website.status, WebsiteStatus::Success);
  assert_eq!(website.mission.as_deref(), Some("Serve open models cheaply."));

  let taostats = TaostatsSources::new("https://github.com/acme/serve", "", "", "");
  let sources = verify_and_merge_sources(&taostats, &website);
  assert_eq!(sources[&SourceChannel::Github].status, SourceStatus::Both);
  assert_eq!(sources[&SourceChannel::Documentation].status, SourceStatus::WebsiteOnly);
  let summary = verification_summary(&sources);

  let record = tg_models::SubnetRecord {
    netuid: 42,
    name: "Acme".to_string(),
    description: "Inference".to_string(),
    sources: taostats,
    additional_info: None,
    raw_data: json!({"netuid": 42}),
  };
  let verified = VerifiedSubnet {
    subnet: record,
    website_data: website,
    verified_sources: sources,
    source_verification_summary: Some(summary),
  };
  let subnet = NormalizedSubnet::from_verified(verified, Utc::now());
  assert!(subnet.research_ready);

  let provider = provider_from_config(&config);
  let research = ResearchAgent::new(Arc::clone(&provider)).conduct_research(&subnet).await;
  assert_eq!(research.analysis_metadata.answered_questions, 24);
  assert_eq!(research.analysis_metadata.confidence_level, Confidence::High);
  assert!(research
    .answers
    .values()
    .flat_map(|c| c.values())
    .all(|a| a.research_status == AnswerStatus::Completed));

  let scores = ScoringAgent::new(provider).generate_scores(&subnet, &research).await;
  assert_eq!(scores.overall_score, 4.0);
  assert_eq!(scores.investment_recommendation, Recommendation::StrongBuy);
  assert_eq!(scores.confidence_level, Confidence::High);
  assert_eq!(scores.strengths, vec!["Open source".to_string()]);
}

#[tokio::test]
async fn test_missing_llm_key_yields_error_placeholders() {
  let config = Config::default_with_key("taostats".to_string());
  let provider = provider_from_config(&config);

  let subnet = NormalizedSubnet::from_verified(
    VerifiedSubnet {
      subnet: tg_models::SubnetRecord {
        netuid: 1,
        name: "One".to_string(),
        description: String::new(),
        sources: TaostatsSources::default(),
        additional_info: None,
        raw_data: json!({}),
      },
      website_data: tg_models::WebsiteData::no_website(),
      verified_sources: Default::default(),
      source_verification_summary: None,
    },
    Utc::now(),
  );

  let research = ResearchAgent::new(provider).conduct_research(&subnet).await;
  assert_eq!(research.analysis_metadata.answered_questions, 0);
  assert!(research
    .answers
    .values()
    .flat_map(|c| c.values())
    .all(|a| a.research_status == AnswerStatus::Error));
}
