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

//! Reconciles project links listed on Taostats with links found on the
//! subnet's own website.
//!
//! Every function here is pure: no I/O, no panics on malformed URLs, and the
//! same inputs always give the same output.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tg_core::round_to;
use tg_models::{
  SourceChannel, SourceEntry, SourceStatus, TaostatsSources, VerificationSummary, VerifiedSources, WebsiteData,
};
use tracing::{debug, info};
use url::Url;

/// Minimum similarity for a Taostats URL and a website URL to count as the
/// same source. Strictly greater than.
pub const MATCH_THRESHOLD: f64 = 0.8;

/// Ordered pattern table; first match wins.
static CHANNEL_PATTERNS: LazyLock<Vec<(SourceChannel, Regex)>> = LazyLock::new(|| {
  let table: [(SourceChannel, &[&str]); 9] = [
    (SourceChannel::Github, &[r"github\.com", r"github\.io"]),
    (SourceChannel::Discord, &[r"discord\.gg", r"discord\.com/invite", r"discordapp\.com/invite"]),
    (SourceChannel::Twitter, &[r"twitter\.com", r"x\.com"]),
    (SourceChannel::Telegram, &[r"t\.me", r"telegram\.org"]),
    (SourceChannel::Linkedin, &[r"linkedin\.com"]),
    (SourceChannel::Medium, &[r"medium\.com"]),
    (
      SourceChannel::Documentation,
      &[r"docs\.", r"documentation", r"gitbook\.io", r"notion\.site", r"readme\.io", r"/docs", r"/documentation"],
    ),
    (SourceChannel::Whitepaper, &[r"\.pdf", r"whitepaper", r"paper\.pdf", r"wp\.pdf"]),
    (SourceChannel::Website, &[r"https?://"]),
  ];
  table
    .iter()
    .flat_map(|(channel, patterns)| {
      patterns
        .iter()
        .map(move |p| (*channel, Regex::new(p).expect("valid regex")))
    })
    .collect()
});

/// Assign a URL to a source channel.
pub fn classify_link(url: &str) -> Option<SourceChannel> {
  let lower = url.to_lowercase();
  CHANNEL_PATTERNS
    .iter()
    .find(|(_, re)| re.is_match(&lower))
    .map(|(channel, _)| *channel)
}

/// Group a successful scrape's links by channel.
///
/// Pulls from `github_links`, `social_links`, `documentation_links` and
/// `all_links`, keeps only `http` URLs, and dedupes per channel in
/// first-seen order. Non-successful scrapes yield nothing.
pub fn extract_website_links(website: &WebsiteData) -> BTreeMap<SourceChannel, Vec<String>> {
  let mut grouped: BTreeMap<SourceChannel, Vec<String>> = BTreeMap::new();
  if !website.is_success() {
    return grouped;
  }

  let candidates = website
    .github_links
    .iter()
    .chain(website.social_links.values())
    .chain(website.documentation_links.iter())
    .chain(website.all_links.iter());

  for raw in candidates {
    let link = raw.trim();
    if !link.starts_with("http") {
      continue;
    }
    if let Some(channel) = classify_link(link) {
      let bucket = grouped.entry(channel).or_default();
      if !bucket.iter().any(|seen| seen == link) {
        bucket.push(link.to_string());
      }
    }
  }

  grouped
}

/// Map Taostats fields onto channels.
///
/// The contact field is re-classified by URL pattern; if that lands on a
/// channel already filled by a dedicated field, it stays under `contact`.
pub fn normalize_taostats_sources(sources: &TaostatsSources) -> BTreeMap<SourceChannel, String> {
  let mut normalized = BTreeMap::new();
  for (channel, url) in sources.entries() {
    let url = url.trim();
    let channel = match channel {
      SourceChannel::Contact => match classify_link(url) {
        Some(found) if !normalized.contains_key(&found) => found,
        _ => SourceChannel::Contact,
      },
      other => other,
    };
    normalized.insert(channel, url.to_string());
  }
  normalized
}

fn host_of(url: &str) -> Option<String> {
  let url = url.trim();
  // Taostats often lists bare domains; the scraper fetches them over https.
  let parsed = match Url::parse(url) {
    Ok(parsed) => parsed,
    Err(_) if !url.contains("://") => Url::parse(&format!("https://{url}")).ok()?,
    Err(_) => return None,
  };
  let host = parsed.host_str()?.to_lowercase();
  Some(host.strip_prefix("www.").map(str::to_string).unwrap_or(host))
}

/// Domain similarity in `0.0..=1.0`.
///
/// Same host is 1.0; one host containing the other (subdomains) is 0.9;
/// otherwise a normalised edit-distance ratio. URLs without a parseable
/// host fall back to comparing the whole lower-cased strings.
pub fn url_similarity(a: &str, b: &str) -> f64 {
  match (host_of(a), host_of(b)) {
    (Some(left), Some(right)) => {
      if left == right {
        1.0
      } else if left.contains(&right) || right.contains(&left) {
        0.9
      } else {
        strsim::normalized_levenshtein(&left, &right)
      }
    }
    _ => strsim::normalized_levenshtein(&a.to_lowercase(), &b.to_lowercase()),
  }
}

fn verify_channel(taostats_url: Option<&str>, website_urls: &[String]) -> Option<SourceEntry> {
  let taostats_url = taostats_url.map(str::trim).filter(|u| !u.is_empty());
  let mut cleaned: Vec<String> = Vec::new();
  for url in website_urls.iter().map(|u| u.trim()).filter(|u| !u.is_empty()) {
    if !cleaned.iter().any(|seen| seen == url) {
      cleaned.push(url.to_string());
    }
  }

  match (taostats_url, cleaned.first()) {
    (None, None) => None,
    (Some(listed), None) => Some(SourceEntry {
      url: listed.to_string(),
      status: SourceStatus::TaostatsOnly,
      taostats_url: Some(listed.to_string()),
      website_urls: Vec::new(),
      match_confidence: None,
      discrepancy: false,
    }),
    (None, Some(first)) => Some(SourceEntry {
      url: first.clone(),
      status: SourceStatus::WebsiteOnly,
      taostats_url: None,
      website_urls: cleaned.clone(),
      match_confidence: None,
      discrepancy: false,
    }),
    (Some(listed), Some(_)) => {
      let best = cleaned
        .iter()
        .map(|candidate| url_similarity(listed, candidate))
        .filter(|score| *score > MATCH_THRESHOLD)
        .fold(None, |best: Option<f64>, score| Some(best.map_or(score, |b| b.max(score))));
      Some(SourceEntry {
        url: listed.to_string(),
        status: SourceStatus::Both,
        taostats_url: Some(listed.to_string()),
        website_urls: cleaned,
        match_confidence: Some(best.unwrap_or(0.0)),
        discrepancy: best.is_none(),
      })
    }
  }
}

/// Merge Taostats links with scraped website links into one entry per
/// channel. The Taostats URL is canonical whenever it exists; channels
/// present on neither side are omitted.
pub fn verify_and_merge_sources(taostats: &TaostatsSources, website: &WebsiteData) -> VerifiedSources {
  let website_links = extract_website_links(website);
  let taostats_links = normalize_taostats_sources(taostats);

  let mut channels: Vec<SourceChannel> = taostats_links.keys().chain(website_links.keys()).copied().collect();
  channels.sort();
  channels.dedup();

  let verified: VerifiedSources = channels
    .into_iter()
    .filter_map(|channel| {
      let listed = taostats_links.get(&channel).map(String::as_str);
      let scraped = website_links.get(&channel).map(Vec::as_slice).unwrap_or(&[]);
      verify_channel(listed, scraped).map(|entry| (channel, entry))
    })
    .collect();

  debug!(
    taostats = taostats_links.len(),
    website = website_links.len(),
    "verified {} source channels",
    verified.len()
  );
  verified
}

/// Sources for a subnet whose website was not scraped: every listed link
/// becomes `taostats_only`.
pub fn create_initial_sources(taostats: &TaostatsSources) -> VerifiedSources {
  normalize_taostats_sources(taostats)
    .into_iter()
    .filter_map(|(channel, url)| verify_channel(Some(&url), &[]).map(|entry| (channel, entry)))
    .collect()
}

/// Count channels by status and derive the health score (share of
/// channels confirmed by both sides).
pub fn verification_summary(sources: &VerifiedSources) -> VerificationSummary {
  let mut summary = VerificationSummary {
    total_sources: sources.len(),
    source_types: sources.keys().copied().collect(),
    ..VerificationSummary::default()
  };

  for entry in sources.values() {
    match entry.status {
      SourceStatus::Both => {
        summary.both_sources += 1;
        if entry.discrepancy {
          summary.discrepancies += 1;
        }
      }
      SourceStatus::TaostatsOnly => summary.taostats_only += 1,
      SourceStatus::WebsiteOnly => summary.website_only += 1,
    }
  }

  if summary.total_sources > 0 {
    summary.health_score = round_to(summary.both_sources as f64 / summary.total_sources as f64 * 100.0, 1);
  }

  info!(
    total = summary.total_sources,
    both = summary.both_sources,
    health = summary.health_score,
    "source verification summary"
  );
  summary
}
