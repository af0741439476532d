use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tg_client::{direct_limiter, DirectRateLimiter};
use tg_core::Config;
use tracing::{debug, instrument};

use crate::error::{AnalysisError, AnalysisResult};
use crate::traits::PageFetcher;

/// Desktop browser agent; some subnet sites refuse obvious bots.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// reqwest-backed [`PageFetcher`] paced by its own token bucket.
pub struct HttpPageFetcher {
  client: Client,
  rate_limiter: Arc<DirectRateLimiter>,
}

impl HttpPageFetcher {
  pub fn new(config: &Config) -> AnalysisResult<Self> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static("text/html,application/xhtml+xml,*/*;q=0.8"));

    let client = Client::builder()
      .default_headers(headers)
      .timeout(Duration::from_secs(config.scrape_timeout_secs))
      .build()
      .map_err(|e| AnalysisError::Http(format!("Failed to create HTTP client: {}", e)))?;

    Ok(Self { client, rate_limiter: direct_limiter(config.scrape_rate_limit) })
  }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
  #[instrument(skip(self))]
  async fn fetch(&self, url: &str) -> AnalysisResult<String> {
    self.rate_limiter.until_ready().await;

    let scrape_error = |message: String| AnalysisError::Scrape { url: url.to_string(), message };

    let response = self.client.get(url).send().await.map_err(|e| scrape_error(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
      return Err(scrape_error(format!("HTTP status {}", status)));
    }

    let body = response.text().await.map_err(|e| scrape_error(e.to_string()))?;
    debug!(bytes = body.len(), "fetched page");
    Ok(body)
  }
}

impl std::fmt::Debug for HttpPageFetcher {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("HttpPageFetcher").finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use wiremock::matchers::{header, method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  #[tokio::test]
  async fn test_fetch_sends_browser_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/"))
      .and(header("user-agent", BROWSER_USER_AGENT))
      .respond_with(ResponseTemplate::new(200).set_body_string("<html><title>ok</title></html>"))
      .expect(1)
      .mount(&server)
      .await;

    let fetcher = HttpPageFetcher::new(&Config::default_with_key("k".to_string())).unwrap();
    let body = fetcher.fetch(&format!("{}/", server.uri())).await.unwrap();
    assert!(body.contains("<title>ok</title>"));
  }

  #[tokio::test]
  async fn test_error_status_is_scrape_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(503))
      .mount(&server)
      .await;

    let fetcher = HttpPageFetcher::new(&Config::default_with_key("k".to_string())).unwrap();
    let err = fetcher.fetch(&server.uri()).await.unwrap_err();
    match err {
      AnalysisError::Scrape { message, .. } => assert!(message.contains("503")),
      other => panic!("expected Scrape error, got {other:?}"),
    }
  }
}
