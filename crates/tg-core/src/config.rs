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

//! Configuration management for the subnet pipeline

use crate::error::{Error, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Main configuration struct shared by the API, LLM and scraping clients
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
  /// Taostats API key, sent verbatim in the Authorization header
  pub api_key: String,

  /// Taostats base URL
  pub base_url: String,

  /// Taostats rate limit (requests per minute)
  pub rate_limit: u32,

  /// API request timeout in seconds
  pub timeout_secs: u64,

  /// OpenAI-compatible API key; research is degraded without it
  pub llm_api_key: Option<String>,

  /// Chat completions base URL
  pub llm_base_url: String,

  /// Model used for research and scoring
  pub llm_model: String,

  /// LLM rate limit (requests per minute)
  pub llm_rate_limit: u32,

  /// Website fetch rate limit (requests per minute)
  pub scrape_rate_limit: u32,

  /// Website fetch timeout in seconds
  pub scrape_timeout_secs: u64,
}

impl Config {
  /// Load configuration from environment variables
  pub fn from_env() -> Result<Self> {
    dotenv().ok();

    let api_key = env::var("TAOSTATS_API_KEY")
      .map_err(|_| Error::ApiKey("TAOSTATS_API_KEY not set".to_string()))?;

    let base_url = env::var("TAOSTATS_BASE_URL").unwrap_or_else(|_| crate::TAOSTATS_BASE_URL.to_string());

    let llm_api_key = env::var("OPENAI_API_KEY").ok().filter(|k| !k.trim().is_empty());

    let llm_base_url = env::var("OPENAI_BASE_URL").unwrap_or_else(|_| crate::OPENAI_BASE_URL.to_string());

    let llm_model = env::var("OPENAI_MODEL").unwrap_or_else(|_| crate::DEFAULT_LLM_MODEL.to_string());

    Ok(Config {
      api_key,
      base_url,
      rate_limit: parse_var("TG_RATE_LIMIT", crate::DEFAULT_RATE_LIMIT)?,
      timeout_secs: parse_var("TG_TIMEOUT_SECS", 30)?,
      llm_api_key,
      llm_base_url,
      llm_model,
      llm_rate_limit: parse_var("TG_LLM_RATE_LIMIT", crate::DEFAULT_LLM_RATE_LIMIT)?,
      scrape_rate_limit: parse_var("TG_SCRAPE_RATE_LIMIT", crate::DEFAULT_SCRAPE_RATE_LIMIT)?,
      scrape_timeout_secs: parse_var("TG_SCRAPE_TIMEOUT_SECS", 10)?,
    })
  }

  /// Create a config with default values (for testing)
  pub fn default_with_key(api_key: String) -> Self {
    Config {
      api_key,
      base_url: crate::TAOSTATS_BASE_URL.to_string(),
      rate_limit: crate::DEFAULT_RATE_LIMIT,
      timeout_secs: 30,
      llm_api_key: None,
      llm_base_url: crate::OPENAI_BASE_URL.to_string(),
      llm_model: crate::DEFAULT_LLM_MODEL.to_string(),
      llm_rate_limit: crate::DEFAULT_LLM_RATE_LIMIT,
      scrape_rate_limit: crate::DEFAULT_SCRAPE_RATE_LIMIT,
      scrape_timeout_secs: 10,
    }
  }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T> {
  match env::var(name) {
    Ok(raw) => raw.trim().parse().map_err(|_| Error::Config(format!("Invalid {}", name))),
    Err(_) => Ok(default),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  #[test]
  #[serial]
  fn test_config_from_env() {
    env::set_var("TAOSTATS_API_KEY", "test_key");
    env::remove_var("TG_RATE_LIMIT");
    env::remove_var("OPENAI_MODEL");
    let config = Config::from_env().unwrap();
    assert_eq!(config.api_key, "test_key");
    assert_eq!(config.rate_limit, 60);
    assert_eq!(config.llm_model, "gpt-4o-mini");
    assert_eq!(config.scrape_timeout_secs, 10);
  }

  #[test]
  #[serial]
  fn test_config_rejects_bad_number() {
    env::set_var("TAOSTATS_API_KEY", "test_key");
    env::set_var("TG_RATE_LIMIT", "lots");
    let result = Config::from_env();
    env::remove_var("TG_RATE_LIMIT");
    assert!(matches!(result, Err(Error::Config(_))));
  }

  #[test]
  fn test_default_with_key() {
    let config = Config::default_with_key("k".to_string());
    assert_eq!(config.base_url, "https://api.taostats.io/api");
    assert!(config.llm_api_key.is_none());
  }
}
