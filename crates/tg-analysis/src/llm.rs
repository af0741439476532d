//! [`CompletionProvider`] implementations.

use async_trait::async_trait;
use tg_client::llm::ResponseFormat;
use tg_client::{CompletionOptions, LlmClient};
use tracing::warn;

use crate::error::{AnalysisError, AnalysisResult};
use crate::traits::CompletionProvider;

#[async_trait]
impl CompletionProvider for LlmClient {
  async fn complete(
    &self,
    system: &str,
    user: &str,
    options: CompletionOptions,
    format: Option<ResponseFormat>,
  ) -> AnalysisResult<String> {
    Ok(self.complete_with_format(system, user, options, format).await?)
  }
}

/// Stand-in used when no LLM key is configured; every call fails with the
/// configuration problem so agents record error placeholders.
#[derive(Debug, Clone)]
pub struct UnconfiguredProvider {
  reason: String,
}

impl UnconfiguredProvider {
  pub fn new(reason: impl Into<String>) -> Self {
    let reason = reason.into();
    warn!("LLM provider unavailable: {}", reason);
    Self { reason }
  }
}

#[async_trait]
impl CompletionProvider for UnconfiguredProvider {
  async fn complete(
    &self,
    _system: &str,
    _user: &str,
    _options: CompletionOptions,
    _format: Option<ResponseFormat>,
  ) -> AnalysisResult<String> {
    Err(AnalysisError::Llm(tg_core::Error::ApiKey(self.reason.clone())))
  }
}
