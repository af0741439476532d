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

use crate::common::is_false;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Source channel a project link belongs to.
///
/// Declaration order is the order verified sources are reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceChannel {
  Github,
  Discord,
  Twitter,
  Telegram,
  Linkedin,
  Medium,
  Documentation,
  Whitepaper,
  Website,
  Contact,
}

impl SourceChannel {
  pub const ALL: [SourceChannel; 10] = [
    SourceChannel::Github,
    SourceChannel::Discord,
    SourceChannel::Twitter,
    SourceChannel::Telegram,
    SourceChannel::Linkedin,
    SourceChannel::Medium,
    SourceChannel::Documentation,
    SourceChannel::Whitepaper,
    SourceChannel::Website,
    SourceChannel::Contact,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      SourceChannel::Github => "github",
      SourceChannel::Discord => "discord",
      SourceChannel::Twitter => "twitter",
      SourceChannel::Telegram => "telegram",
      SourceChannel::Linkedin => "linkedin",
      SourceChannel::Medium => "medium",
      SourceChannel::Documentation => "documentation",
      SourceChannel::Whitepaper => "whitepaper",
      SourceChannel::Website => "website",
      SourceChannel::Contact => "contact",
    }
  }

  pub fn parse(raw: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|c| c.as_str() == raw)
  }
}

impl fmt::Display for SourceChannel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// How a channel's URL was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceStatus {
  /// Only Taostats lists it
  TaostatsOnly,
  /// Only the website links it
  WebsiteOnly,
  /// Both sides supplied a URL; see `discrepancy` for whether they agree
  Both,
}

impl SourceStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      SourceStatus::TaostatsOnly => "taostats_only",
      SourceStatus::WebsiteOnly => "website_only",
      SourceStatus::Both => "both",
    }
  }
}

impl fmt::Display for SourceStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Verified record for one channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceEntry {
  pub url: String,
  pub status: SourceStatus,
  pub taostats_url: Option<String>,
  #[serde(default)]
  pub website_urls: Vec<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub match_confidence: Option<f64>,
  #[serde(default, skip_serializing_if = "is_false")]
  pub discrepancy: bool,
}

/// Channel → entry, iterated in [`SourceChannel`] order.
pub type VerifiedSources = BTreeMap<SourceChannel, SourceEntry>;

/// Project links as listed by Taostats.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaostatsSources {
  #[serde(default)]
  pub github: Option<String>,
  #[serde(default, alias = "subnet_url")]
  pub website: Option<String>,
  #[serde(default)]
  pub discord: Option<String>,
  #[serde(default)]
  pub contact: Option<String>,
}

impl TaostatsSources {
  /// Build from raw strings, treating blanks as absent.
  pub fn new(github: &str, website: &str, discord: &str, contact: &str) -> Self {
    let keep = |s: &str| Some(s.trim().to_string()).filter(|s| !s.is_empty());
    Self {
      github: keep(github),
      website: keep(website),
      discord: keep(discord),
      contact: keep(contact),
    }
  }

  /// Present links in lookup order: github, website, discord, contact.
  pub fn entries(&self) -> Vec<(SourceChannel, &str)> {
    [
      (SourceChannel::Github, &self.github),
      (SourceChannel::Website, &self.website),
      (SourceChannel::Discord, &self.discord),
      (SourceChannel::Contact, &self.contact),
    ]
    .into_iter()
    .filter_map(|(channel, url)| url.as_deref().filter(|u| !u.trim().is_empty()).map(|u| (channel, u)))
    .collect()
  }
}

/// Counts over a verification result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerificationSummary {
  pub total_sources: usize,
  pub both_sources: usize,
  pub taostats_only: usize,
  pub website_only: usize,
  pub discrepancies: usize,
  pub source_types: Vec<SourceChannel>,
  /// Percentage of channels confirmed by both sides, one decimal place
  pub health_score: f64,
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  fn entry(status: SourceStatus, discrepancy: bool) -> SourceEntry {
    SourceEntry {
      url: "https://x.io".to_string(),
      status,
      taostats_url: None,
      website_urls: vec![],
      match_confidence: None,
      discrepancy,
    }
  }

  #[test]
  fn test_channel_serde_names() {
    assert_eq!(serde_json::to_string(&SourceChannel::Linkedin).unwrap(), "\"linkedin\"");
    assert_eq!(SourceChannel::parse("documentation"), Some(SourceChannel::Documentation));
    assert_eq!(SourceChannel::parse("myspace"), None);
  }

  #[test]
  fn test_taostats_entries_skip_blanks() {
    let sources = TaostatsSources::new("https://github.com/a/b", "  ", "https://discord.gg/x", "");
    let entries = sources.entries();
    assert_eq!(
      entries,
      vec![
        (SourceChannel::Github, "https://github.com/a/b"),
        (SourceChannel::Discord, "https://discord.gg/x"),
      ]
    );
  }

  #[test]
  fn test_taostats_sources_accept_subnet_url() {
    let sources: TaostatsSources = serde_json::from_str(r#"{"subnet_url": "https://a.io"}"#).unwrap();
    assert_eq!(sources.website.as_deref(), Some("https://a.io"));
  }

  #[test]
  fn test_entry_omits_default_flags() {
    let json = serde_json::to_value(entry(SourceStatus::TaostatsOnly, false)).unwrap();
    assert!(json.get("discrepancy").is_none());
    assert!(json.get("match_confidence").is_none());
    assert_eq!(json["status"], "taostats_only");
  }
}
