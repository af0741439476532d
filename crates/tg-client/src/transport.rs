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

//! HTTP transport layer for Taostats API requests

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;
use tg_core::{Config, Error, Result, TaostatsEndpoint};
use tracing::{debug, error, info, instrument};
use url::Url;

/// HTTP transport layer for making requests to the Taostats API
pub struct Transport {
  client: Client,
  base_url: String,
  api_key: String,
  timeout: Duration,
}

impl Transport {
  /// Create a new transport instance
  pub fn new(config: &Config) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .user_agent(concat!("tg-client/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| Error::Http(format!("Failed to create HTTP client: {}", e)))?;

    Ok(Self {
      client,
      base_url: config.base_url.trim_end_matches('/').to_string(),
      api_key: config.api_key.clone(),
      timeout: Duration::from_secs(config.timeout_secs),
    })
  }

  /// Create a mock transport for testing
  #[cfg(test)]
  pub fn new_mock() -> Self {
    Self {
      client: Client::new(),
      base_url: "https://mock.taostats.io/api".to_string(),
      api_key: "test_key".to_string(),
      timeout: Duration::from_secs(30),
    }
  }

  /// GET an endpoint and return its rows.
  ///
  /// Taostats wraps lists as `{"data": [...], "pagination": {...}}` on most
  /// endpoints and returns a bare array on a few; both are accepted.
  #[instrument(skip(self, params), fields(endpoint = %endpoint))]
  pub async fn get_rows(&self, endpoint: TaostatsEndpoint, params: &[(&str, &str)]) -> Result<Vec<Value>> {
    let url = self.build_url(endpoint, params)?;
    debug!("Making request to: {}", url);

    let response = self.make_request(&url).await?;
    let text = response
      .text()
      .await
      .map_err(|e| Error::Http(format!("Failed to read response body: {}", e)))?;

    debug!("Response body length: {} bytes", text.len());

    let body: Value = serde_json::from_str(&text).map_err(|e| {
      error!("Failed to parse JSON response: {}", e);
      Error::Parse(format!("Failed to parse response: {}. Response: {}", e, snippet(&text, 200)))
    })?;

    let rows = extract_rows(body)?;
    info!("Received {} rows from {}", rows.len(), endpoint);
    Ok(rows)
  }

  /// Build the full URL for an API request
  fn build_url(&self, endpoint: TaostatsEndpoint, params: &[(&str, &str)]) -> Result<Url> {
    let mut url = Url::parse(&format!("{}/{}", self.base_url, endpoint.path()))
      .map_err(|e| Error::Config(format!("Invalid base URL: {}", e)))?;

    if !params.is_empty() {
      let mut query_pairs = url.query_pairs_mut();
      for (key, value) in params {
        query_pairs.append_pair(key, value);
      }
    }

    Ok(url)
  }

  fn headers(&self) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    let key = HeaderValue::from_str(&self.api_key)
      .map_err(|_| Error::ApiKey("API key contains invalid header characters".to_string()))?;
    headers.insert(AUTHORIZATION, key);
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    Ok(headers)
  }

  /// Make the actual HTTP request
  async fn make_request(&self, url: &Url) -> Result<Response> {
    let response = self
      .client
      .get(url.as_str())
      .headers(self.headers()?)
      .send()
      .await
      .map_err(|e| Error::Http(format!("Request failed: {}", e)))?;

    let status = response.status();

    if status.is_success() {
      debug!("Request successful with status: {}", status);
      Ok(response)
    } else {
      error!("Request failed with status: {}", status);
      let body = response.text().await.unwrap_or_default();
      Err(Error::Http(format!("{}: {}", status, snippet(&body, 200))))
    }
  }

  /// Get the base URL being used
  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  /// Get request timeout duration
  pub fn timeout(&self) -> Duration {
    self.timeout
  }
}

impl std::fmt::Debug for Transport {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Transport")
      .field("base_url", &self.base_url)
      .field("timeout", &self.timeout)
      .finish()
  }
}

/// Unwrap a `{data: [...]}` envelope or a bare list.
pub(crate) fn extract_rows(body: Value) -> Result<Vec<Value>> {
  match body {
    Value::Array(rows) => Ok(rows),
    Value::Object(mut map) => match map.remove("data") {
      Some(Value::Array(rows)) => Ok(rows),
      Some(_) => Err(Error::InvalidResponse("`data` is not a list".to_string())),
      None => Err(Error::InvalidResponse("response has no `data` field".to_string())),
    },
    _ => Err(Error::InvalidResponse("expected a JSON object or list".to_string())),
  }
}

fn snippet(text: &str, max_chars: usize) -> &str {
  match text.char_indices().nth(max_chars) {
    Some((idx, _)) => &text[..idx],
    None => text,
  }
}
