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

//! OpenAI-compatible chat completions client.
//!
//! Plain completions return the assistant text. Structured completions send
//! a strict `json_schema` response format derived from the target type; the
//! caller still validates the returned text, since not every compatible
//! provider enforces the schema.

pub mod schema;
pub mod types;

use crate::client::direct_limiter;
use crate::DirectRateLimiter;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tg_core::{Config, Error, Result};
use tracing::{debug, error, instrument};

pub use schema::{parse_structured, StructuredOutput};
pub use types::{ChatMessage, ChatRequest, ChatResponse, ResponseFormat, Role};

/// Sampling settings for one call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionOptions {
  pub temperature: f32,
  pub max_tokens: u32,
}

impl Default for CompletionOptions {
  fn default() -> Self {
    Self { temperature: 0.1, max_tokens: 2000 }
  }
}

pub struct LlmClient {
  http: Client,
  api_key: String,
  base_url: String,
  model: String,
  rate_limiter: Arc<DirectRateLimiter>,
}

impl LlmClient {
  /// Build from config. Fails when no LLM API key is configured.
  pub fn new(config: &Config) -> Result<Self> {
    let api_key = config
      .llm_api_key
      .clone()
      .ok_or_else(|| Error::ApiKey("OPENAI_API_KEY not set".to_string()))?;

    let http = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs.max(60)))
      .build()
      .map_err(|e| Error::Http(format!("Failed to create HTTP client: {}", e)))?;

    Ok(Self {
      http,
      api_key,
      base_url: config.llm_base_url.trim_end_matches('/').to_string(),
      model: config.llm_model.clone(),
      rate_limiter: direct_limiter(config.llm_rate_limit),
    })
  }

  /// Share a limiter with other clients hitting the same provider.
  pub fn with_rate_limiter(mut self, rate_limiter: Arc<DirectRateLimiter>) -> Self {
    self.rate_limiter = rate_limiter;
    self
  }

  pub fn model(&self) -> &str {
    &self.model
  }

  fn headers(&self) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    let bearer = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
      .map_err(|_| Error::ApiKey("LLM API key contains invalid header characters".to_string()))?;
    headers.insert(AUTHORIZATION, bearer);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
  }

  /// Send a chat request and return the first choice's content.
  #[instrument(skip(self, request), fields(model = %request.model, messages = request.messages.len()))]
  pub async fn chat(&self, request: &ChatRequest) -> Result<String> {
    self.rate_limiter.until_ready().await;

    let url = format!("{}/chat/completions", self.base_url);
    debug!("Chat request to {}", url);

    let response = self
      .http
      .post(&url)
      .headers(self.headers()?)
      .json(request)
      .send()
      .await
      .map_err(|e| Error::Http(format!("Chat request failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      error!("Chat completion failed with status {}", status);
      return Err(Error::Api(format!("chat completion error ({}): {}", status, body)));
    }

    let parsed: ChatResponse = response
      .json()
      .await
      .map_err(|e| Error::Parse(format!("Failed to decode chat response: {}", e)))?;

    parsed
      .choices
      .into_iter()
      .next()
      .and_then(|choice| choice.message.content)
      .filter(|content| !content.trim().is_empty())
      .ok_or_else(|| Error::InvalidResponse("chat response has no content".to_string()))
  }

  /// System + user prompt, free-text answer.
  pub async fn complete(&self, system: &str, user: &str, options: CompletionOptions) -> Result<String> {
    let request = self.base_request(system, user, options);
    self.chat(&request).await
  }

  /// System + user prompt with the answer constrained to `T`'s schema.
  ///
  /// Returns the raw content so callers can fall back to free-text parsing
  /// when validation fails.
  pub async fn complete_structured<T: StructuredOutput>(
    &self,
    system: &str,
    user: &str,
    options: CompletionOptions,
  ) -> Result<String> {
    let format = ResponseFormat::json_schema(T::format_name(), T::strict_schema());
    self.complete_with_format(system, user, options, Some(format)).await
  }

  /// Like [`complete`](Self::complete) with an optional pre-built response format.
  pub async fn complete_with_format(
    &self,
    system: &str,
    user: &str,
    options: CompletionOptions,
    format: Option<ResponseFormat>,
  ) -> Result<String> {
    let mut request = self.base_request(system, user, options);
    if let Some(format) = format {
      request = request.response_format(format);
    }
    self.chat(&request).await
  }

  fn base_request(&self, system: &str, user: &str, options: CompletionOptions) -> ChatRequest {
    ChatRequest::new(self.model.clone())
      .message(ChatMessage::system(system))
      .message(ChatMessage::user(user))
      .temperature(options.temperature)
      .max_tokens(options.max_tokens)
  }
}

impl std::fmt::Debug for LlmClient {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("LlmClient")
      .field("base_url", &self.base_url)
      .field("model", &self.model)
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use schemars::JsonSchema;
  use serde::Deserialize;
  use serde_json::json;
  use wiremock::matchers::{body_partial_json, header, method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  #[derive(Debug, Deserialize, JsonSchema)]
  struct Verdict {
    score: u8,
  }

  fn test_config(server: &MockServer) -> Config {
    let mut config = Config::default_with_key("taostats".to_string());
    config.llm_api_key = Some("sk-test".to_string());
    config.llm_base_url = server.uri();
    config
  }

  fn completion(content: &str) -> serde_json::Value {
    json!({"choices": [{"message": {"role": "assistant", "content": content}}]})
  }

  #[test]
  fn test_missing_key_is_rejected() {
    let config = Config::default_with_key("taostats".to_string());
    assert!(matches!(LlmClient::new(&config), Err(Error::ApiKey(_))));
  }

  #[tokio::test]
  async fn test_complete_sends_bearer_and_returns_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/chat/completions"))
      .and(header("authorization", "Bearer sk-test"))
      .and(body_partial_json(json!({"model": "gpt-4o-mini", "temperature": 0.1, "max_tokens": 2000})))
      .respond_with(ResponseTemplate::new(200).set_body_json(completion("1. Answer")))
      .expect(1)
      .mount(&server)
      .await;

    let client = LlmClient::new(&test_config(&server)).unwrap();
    let content = client.complete("system", "user", CompletionOptions::default()).await.unwrap();
    assert_eq!(content, "1. Answer");
  }

  #[tokio::test]
  async fn test_structured_request_carries_schema() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/chat/completions"))
      .and(body_partial_json(json!({
        "response_format": {"type": "json_schema", "json_schema": {"name": "Verdict", "strict": true}}
      })))
      .respond_with(ResponseTemplate::new(200).set_body_json(completion(r#"{"score": 4}"#)))
      .mount(&server)
      .await;

    let client = LlmClient::new(&test_config(&server)).unwrap();
    let options = CompletionOptions { temperature: 0.1, max_tokens: 1500 };
    let content = client.complete_structured::<Verdict>("s", "u", options).await.unwrap();
    let verdict: Verdict = parse_structured(&content).unwrap();
    assert_eq!(verdict.score, 4);
  }

  #[tokio::test]
  async fn test_error_status_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/chat/completions"))
      .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
      .mount(&server)
      .await;

    let client = LlmClient::new(&test_config(&server)).unwrap();
    let err = client.complete("s", "u", CompletionOptions::default()).await.unwrap_err();
    match err {
      Error::Api(msg) => {
        assert!(msg.contains("429"));
        assert!(msg.contains("slow down"));
      }
      other => panic!("expected Api error, got {other:?}"),
    }
  }

  #[tokio::test]
  async fn test_empty_choices_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/chat/completions"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
      .mount(&server)
      .await;

    let client = LlmClient::new(&test_config(&server)).unwrap();
    let err = client.complete("s", "u", CompletionOptions::default()).await.unwrap_err();
    assert!(matches!(err, Error::InvalidResponse(_)));
  }
}
