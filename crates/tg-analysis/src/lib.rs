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

//! # tg-analysis
//!
//! Per-subnet analysis stages of the pipeline:
//!
//! - [`source_verifier`]: reconcile Taostats links with website links
//! - [`scraper`]: fetch a subnet website and extract structured content
//! - [`research`]: answer the research questionnaire with an LLM
//! - [`scoring`]: turn research into weighted category scores
//!
//! Network collaborators sit behind the traits in [`traits`] so the
//! pipeline can be driven by fakes in tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tg_analysis::{ResearchAgent, ScoringAgent, provider_from_config};
//!
//! let provider = provider_from_config(&config);
//! let research = ResearchAgent::new(provider.clone()).conduct_research(&subnet).await;
//! let scores = ScoringAgent::new(provider).generate_scores(&subnet, &research).await;
//! ```

pub mod error;
pub mod llm;
pub mod research;
pub mod scoring;
pub mod scraper;
pub mod source_verifier;
pub mod traits;

use std::sync::Arc;
use tg_client::LlmClient;
use tg_core::Config;

pub use error::{AnalysisError, AnalysisResult};
pub use llm::UnconfiguredProvider;
pub use research::ResearchAgent;
pub use scoring::{scoring_summary, ScoringAgent};
pub use scraper::{extract_website_data, HttpPageFetcher, WebsiteScraper};
pub use source_verifier::{
  classify_link, create_initial_sources, url_similarity, verification_summary, verify_and_merge_sources,
};
pub use traits::{CompletionProvider, PageFetcher, Researcher, Scorer, SiteScraper};

/// The configured LLM client, or a provider that fails every call when no
/// key is set.
pub fn provider_from_config(config: &Config) -> Arc<dyn CompletionProvider> {
  match LlmClient::new(config) {
    Ok(client) => Arc::new(client),
    Err(e) => Arc::new(UnconfiguredProvider::new(e.to_string())),
  }
}
