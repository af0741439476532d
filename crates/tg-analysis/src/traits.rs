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

//! Seams between the pipeline and its network-facing collaborators.
//!
//! The orchestrator only sees these traits, so tests swap in canned fakes.

use async_trait::async_trait;
use tg_client::llm::ResponseFormat;
use tg_client::CompletionOptions;
use tg_models::{NormalizedSubnet, ResearchReport, ScoreReport, WebsiteData};

use crate::error::AnalysisResult;

/// Chat completion backend.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
  /// Send a system + user prompt; `format` constrains the reply to a JSON schema.
  async fn complete(
    &self,
    system: &str,
    user: &str,
    options: CompletionOptions,
    format: Option<ResponseFormat>,
  ) -> AnalysisResult<String>;
}

/// Fetches raw HTML.
#[async_trait]
pub trait PageFetcher: Send + Sync {
  async fn fetch(&self, url: &str) -> AnalysisResult<String>;
}

/// Turns a subnet website into [`WebsiteData`].
///
/// Fetch failures are reported inside the returned data (`status: error`);
/// `Err` is reserved for failures outside the fetch itself.
#[async_trait]
pub trait SiteScraper: Send + Sync {
  async fn scrape(&self, url: &str, subnet_name: &str) -> AnalysisResult<WebsiteData>;
}

/// Answers the research questionnaire for one subnet.
#[async_trait]
pub trait Researcher: Send + Sync {
  async fn research(&self, subnet: &NormalizedSubnet) -> AnalysisResult<ResearchReport>;
}

/// Scores a researched subnet.
#[async_trait]
pub trait Scorer: Send + Sync {
  async fn score(&self, subnet: &NormalizedSubnet, research: &ResearchReport) -> AnalysisResult<ScoreReport>;
}
