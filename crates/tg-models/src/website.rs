//! Structured data extracted from a subnet's landing page.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome of a scrape attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebsiteStatus {
  Success,
  Error,
  #[default]
  NoWebsite,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamInfo {
  pub has_team_section: bool,
  pub team_members_found: usize,
  pub team_description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
  pub name: String,
  pub role: String,
  pub bio: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
  pub emails: Vec<String>,
}

/// Everything the scraper pulls off a page.
///
/// Failed scrapes keep `url` and `subnet_name` and carry the error text; all
/// other fields stay empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebsiteData {
  pub status: WebsiteStatus,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
  pub url: Option<String>,
  pub subnet_name: Option<String>,
  pub title: Option<String>,
  pub description: Option<String>,
  pub mission: Option<String>,
  pub team_info: TeamInfo,
  pub team_members: Vec<TeamMember>,
  pub problem_statement: Option<String>,
  pub solution: Option<String>,
  pub revenue_model: Option<String>,
  pub products: Vec<String>,
  /// Platform name → URL
  pub social_links: BTreeMap<String, String>,
  pub contact_info: ContactInfo,
  pub github_links: Vec<String>,
  pub documentation_links: Vec<String>,
  pub all_links: Vec<String>,
  pub clean_text: String,
  pub has_about_section: bool,
  pub has_team_section: bool,
  pub has_product_section: bool,
  pub scraped_at: Option<DateTime<Utc>>,
}

impl WebsiteData {
  /// Placeholder for a subnet that lists no website.
  pub fn no_website() -> Self {
    Self::default()
  }

  pub fn failed(url: &str, subnet_name: &str, error: impl Into<String>) -> Self {
    Self {
      status: WebsiteStatus::Error,
      error: Some(error.into()),
      url: Some(url.to_string()),
      subnet_name: Some(subnet_name.to_string()),
      scraped_at: Some(Utc::now()),
      ..Self::default()
    }
  }

  pub fn is_success(&self) -> bool {
    self.status == WebsiteStatus::Success
  }
}
