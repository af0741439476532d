//! HTML → [`WebsiteData`] extraction.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;
use tg_models::{ContactInfo, TeamInfo, TeamMember, WebsiteData, WebsiteStatus};
use url::Url;

const MAX_CLEAN_TEXT: usize = 10_000;
const MAX_MISSION: usize = 500;
const MAX_TEAM_DESCRIPTION: usize = 1_000;
const MAX_PRODUCT: usize = 300;

const MISSION_KEYWORDS: [&str; 5] = ["mission", "vision", "purpose", "goal", "objective"];
const TEAM_KEYWORDS: [&str; 5] = ["team", "founders", "leadership", "about us", "who we are"];
const PROBLEM_KEYWORDS: [&str; 5] = ["problem", "challenge", "issue", "pain point", "why"];
const SOLUTION_KEYWORDS: [&str; 4] = ["solution", "how it works", "approach", "methodology"];
const REVENUE_KEYWORDS: [&str; 4] = ["revenue", "monetization", "business model", "pricing"];
const PRODUCT_KEYWORDS: [&str; 4] = ["product", "service", "offering", "feature"];
const DOC_KEYWORDS: [&str; 5] = ["docs", "documentation", "guide", "tutorial", "api"];

const TEAM_MEMBER_SELECTORS: [&str; 5] =
  [".team-member", ".founder", ".leadership-member", "[class*=\"team\"]", "[class*=\"founder\"]"];

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("valid regex")
});

static SOCIAL_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
  [
    ("twitter", r"twitter\.com|x\.com"),
    ("discord", r"discord\.gg|discord\.com"),
    ("telegram", r"t\.me|telegram\.org"),
    ("linkedin", r"linkedin\.com"),
    ("medium", r"medium\.com"),
  ]
  .into_iter()
  .map(|(platform, pattern)| (platform, Regex::new(pattern).expect("valid regex")))
  .collect()
});

/// Parse a page and pull out everything the research agent reads.
///
/// Never fails: missing pieces are left empty. `scraped_at` is left unset
/// for the caller to stamp.
pub fn extract_website_data(html: &str, url: &str, subnet_name: &str) -> WebsiteData {
  let document = Html::parse_document(html);
  let text = page_text(&document);
  let lower_text = text.to_lowercase();

  let team_members = team_members(&document);
  let mut team_info = team_info(&document);
  team_info.team_members_found = team_members.len();

  WebsiteData {
    status: WebsiteStatus::Success,
    error: None,
    url: Some(url.to_string()),
    subnet_name: Some(subnet_name.to_string()),
    title: title(&document),
    description: description(&document),
    mission: mission(&document),
    team_info,
    team_members,
    problem_statement: heading_section(&document, &PROBLEM_KEYWORDS, &["h1", "h2", "h3"]),
    solution: heading_section(&document, &SOLUTION_KEYWORDS, &["h1", "h2", "h3"]),
    revenue_model: heading_section(&document, &REVENUE_KEYWORDS, &["h1", "h2", "h3"]),
    products: products(&document),
    social_links: social_links(&document),
    contact_info: ContactInfo { emails: emails(&text) },
    github_links: github_links(&document),
    documentation_links: documentation_links(&document),
    all_links: all_links(&document, url),
    clean_text: truncate_chars(&text, MAX_CLEAN_TEXT),
    has_about_section: ["about", "mission", "vision"].iter().any(|k| lower_text.contains(k)),
    has_team_section: ["team", "founders", "leadership"].iter().any(|k| lower_text.contains(k)),
    has_product_section: ["product", "solution", "features"].iter().any(|k| lower_text.contains(k)),
    scraped_at: None,
  }
}

fn select<'a>(document: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
  let Ok(selector) = Selector::parse(css) else {
    return Vec::new();
  };
  let found = document.select(&selector).collect();
  found
}

fn select_first_in<'a>(element: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
  let selector = Selector::parse(css).ok()?;
  let found = element.select(&selector).next();
  found
}

/// Element text with whitespace runs collapsed.
fn element_text(element: ElementRef<'_>) -> String {
  element.text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" ")
}

fn truncate_chars(text: &str, max: usize) -> String {
  text.chars().take(max).collect()
}

fn non_empty(text: String) -> Option<String> {
  if text.is_empty() {
    None
  } else {
    Some(text)
  }
}

/// Visible text: everything outside `script`/`style`/`noscript`.
fn page_text(document: &Html) -> String {
  let mut words: Vec<&str> = Vec::new();
  for node in document.root_element().descendants() {
    let Some(text) = node.value().as_text() else {
      continue;
    };
    let hidden = node.ancestors().any(|ancestor| {
      ancestor
        .value()
        .as_element()
        .is_some_and(|el| matches!(el.name(), "script" | "style" | "noscript"))
    });
    if !hidden {
      words.extend(text.split_whitespace());
    }
  }
  words.join(" ")
}

fn class_contains(element: ElementRef<'_>, keyword: &str) -> bool {
  element
    .value()
    .attr("class")
    .is_some_and(|class| class.to_lowercase().contains(keyword))
}

fn title(document: &Html) -> Option<String> {
  select(document, "title")
    .into_iter()
    .next()
    .map(element_text)
    .and_then(non_empty)
    .or_else(|| select(document, "h1").into_iter().next().map(element_text).and_then(non_empty))
}

fn meta_content(document: &Html, css: &str) -> Option<String> {
  select(document, css)
    .into_iter()
    .next()
    .and_then(|el| el.value().attr("content"))
    .map(|content| content.trim().to_string())
    .and_then(non_empty)
}

fn description(document: &Html) -> Option<String> {
  meta_content(document, r#"meta[name="description"]"#)
    .or_else(|| meta_content(document, r#"meta[property="og:description"]"#))
    .or_else(|| {
      select(document, "p")
        .into_iter()
        .map(element_text)
        .find(|text| text.chars().count() > 50)
    })
}

/// Text of the first `p`/`div` sibling following a heading that mentions
/// one of `keywords`. Keywords are tried in order, then heading levels.
fn heading_section(document: &Html, keywords: &[&str], levels: &[&str]) -> Option<String> {
  for keyword in keywords {
    for level in levels {
      for heading in select(document, level) {
        if !element_text(heading).to_lowercase().contains(keyword) {
          continue;
        }
        let sibling = heading
          .next_siblings()
          .filter_map(ElementRef::wrap)
          .find(|el| matches!(el.value().name(), "p" | "div"));
        if let Some(text) = sibling.map(element_text).and_then(non_empty) {
          return Some(text);
        }
      }
    }
  }
  None
}

fn mission(document: &Html) -> Option<String> {
  let blocks = select(document, "div, section");
  for keyword in MISSION_KEYWORDS {
    if let Some(text) = heading_section(document, &[keyword], &["h1", "h2", "h3", "h4"]) {
      return Some(truncate_chars(&text, MAX_MISSION));
    }
    let by_class = blocks
      .iter()
      .filter(|el| class_contains(**el, keyword))
      .map(|el| element_text(*el))
      .find(|text| text.chars().count() > 20);
    if let Some(text) = by_class {
      return Some(truncate_chars(&text, MAX_MISSION));
    }
  }
  None
}

fn team_info(document: &Html) -> TeamInfo {
  let compact = |value: &str| value.to_lowercase().replace(['-', '_', ' '], "");
  let blocks = select(document, "div, section");
  for keyword in TEAM_KEYWORDS {
    let keyword = compact(keyword);
    let section = blocks.iter().find(|el| {
      let attrs = [el.value().attr("class"), el.value().id()];
      attrs.into_iter().flatten().any(|value| compact(value).contains(&keyword))
    });
    if let Some(section) = section {
      return TeamInfo {
        has_team_section: true,
        team_members_found: 0,
        team_description: truncate_chars(&element_text(*section), MAX_TEAM_DESCRIPTION),
      };
    }
  }
  TeamInfo::default()
}

fn team_members(document: &Html) -> Vec<TeamMember> {
  let mut seen_nodes = Vec::new();
  let mut members: Vec<TeamMember> = Vec::new();

  for css in TEAM_MEMBER_SELECTORS {
    for element in select(document, css) {
      if seen_nodes.contains(&element.id()) {
        continue;
      }
      seen_nodes.push(element.id());

      let name = select_first_in(element, "h3, h4, strong, .name").map(element_text).unwrap_or_default();
      if name.is_empty() {
        continue;
      }
      let role = select_first_in(element, ".role, .title, .position").map(element_text).unwrap_or_default();
      let bio = select_first_in(element, "p").map(element_text).unwrap_or_default();

      if !members.iter().any(|m| m.name == name && m.role == role) {
        members.push(TeamMember { name, role, bio });
      }
    }
  }
  members
}

fn products(document: &Html) -> Vec<String> {
  let blocks = select(document, "div, section");
  let mut products: Vec<String> = Vec::new();
  for keyword in PRODUCT_KEYWORDS {
    for block in blocks.iter().filter(|el| class_contains(**el, keyword)) {
      let text = element_text(*block);
      if text.chars().count() <= 20 {
        continue;
      }
      let text = truncate_chars(&text, MAX_PRODUCT);
      if !products.contains(&text) {
        products.push(text);
      }
    }
  }
  products
}

fn anchors(document: &Html) -> Vec<(String, ElementRef<'_>)> {
  select(document, "a[href]")
    .into_iter()
    .filter_map(|el| el.value().attr("href").map(|href| (href.trim().to_string(), el)))
    .filter(|(href, _)| !href.is_empty())
    .collect()
}

fn push_unique(list: &mut Vec<String>, value: String) {
  if !list.contains(&value) {
    list.push(value);
  }
}

fn social_links(document: &Html) -> BTreeMap<String, String> {
  let mut links = BTreeMap::new();
  for (href, _) in anchors(document) {
    let lower = href.to_lowercase();
    if let Some((platform, _)) = SOCIAL_PATTERNS.iter().find(|(_, re)| re.is_match(&lower)) {
      links.insert(platform.to_string(), href);
    }
  }
  links
}

fn emails(text: &str) -> Vec<String> {
  EMAIL_RE
    .find_iter(text)
    .map(|m| m.as_str().to_string())
    .collect::<BTreeSet<_>>()
    .into_iter()
    .collect()
}

fn github_links(document: &Html) -> Vec<String> {
  let mut links = Vec::new();
  for (href, _) in anchors(document) {
    if href.to_lowercase().contains("github.com") {
      push_unique(&mut links, href);
    }
  }
  links
}

fn documentation_links(document: &Html) -> Vec<String> {
  let mut links = Vec::new();
  for (href, anchor) in anchors(document) {
    let lower_href = href.to_lowercase();
    let lower_text = element_text(anchor).to_lowercase();
    if DOC_KEYWORDS.iter().any(|k| lower_href.contains(k) || lower_text.contains(k)) {
      push_unique(&mut links, href);
    }
  }
  links
}

/// Every anchor target; root-relative paths are resolved against the page.
fn all_links(document: &Html, page_url: &str) -> Vec<String> {
  let base = Url::parse(page_url).ok();
  let mut links = Vec::new();
  for (href, _) in anchors(document) {
    let resolved = match (&base, href.starts_with('/')) {
      (Some(base), true) => base.join(&href).map(|u| u.to_string()).unwrap_or(href),
      _ => href,
    };
    push_unique(&mut links, resolved);
  }
  links
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  const PAGE: &str = r#"
    <html>
      <head>
        <title> Acme Subnet </title>
        <meta name="description" content="Decentralised inference for everyone.">
        <style>.hidden { display: none; }</style>
        <script>var tracking = "ignore me";</script>
      </head>
      <body>
        <h1>Acme</h1>
        <h2>Our Mission</h2>
        <p>Make open models cheap to serve across the Bittensor network.</p>
        <h2>The Problem</h2>
        <p>Inference is expensive and centralised.</p>
        <h3>How it works</h3>
        <div>Miners serve models and validators grade latency.</div>
        <h3>Pricing</h3>
        <p>Pay per token in TAO.</p>
        <section class="team-section" id="team">
          <div class="team-member"><h3>Ada Lovelace</h3><span class="role">CEO</span><p>Built engines.</p></div>
          <div class="team-member"><h4>Alan Turing</h4><span class="title">CTO</span></div>
        </section>
        <div class="product-card">Acme Serve: hosted endpoints for open weights.</div>
        <p>Contact us at team@acme.io or press@acme.io.</p>
        <a href="https://github.com/acme/serve">Code</a>
        <a href="https://github.com/acme/serve">Code again</a>
        <a href="https://x.com/acme">X</a>
        <a href="https://discord.gg/acme">Chat</a>
        <a href="/docs/intro">Read the guide</a>
        <a href="https://acme.io/api">API</a>
      </body>
    </html>
  "#;

  fn extracted() -> WebsiteData {
    extract_website_data(PAGE, "https://acme.io", "Acme")
  }

  #[test]
  fn test_basic_fields() {
    let data = extracted();
    assert_eq!(data.status, WebsiteStatus::Success);
    assert_eq!(data.title.as_deref(), Some("Acme Subnet"));
    assert_eq!(data.description.as_deref(), Some("Decentralised inference for everyone."));
    assert_eq!(
      data.mission.as_deref(),
      Some("Make open models cheap to serve across the Bittensor network.")
    );
    assert_eq!(data.url.as_deref(), Some("https://acme.io"));
    assert_eq!(data.subnet_name.as_deref(), Some("Acme"));
    assert!(data.scraped_at.is_none());
  }

  #[test]
  fn test_heading_sections() {
    let data = extracted();
    assert_eq!(data.problem_statement.as_deref(), Some("Inference is expensive and centralised."));
    assert_eq!(data.solution.as_deref(), Some("Miners serve models and validators grade latency."));
    assert_eq!(data.revenue_model.as_deref(), Some("Pay per token in TAO."));
  }

  #[test]
  fn test_team_extraction() {
    let data = extracted();
    assert!(data.team_info.has_team_section);
    assert!(data.team_info.team_description.contains("Ada Lovelace"));
    let names: Vec<&str> = data.team_members.iter().map(|m| m.name.as_str()).collect();
    assert!(names.contains(&"Ada Lovelace"));
    assert!(names.contains(&"Alan Turing"));
    let ada = data.team_members.iter().find(|m| m.name == "Ada Lovelace").unwrap();
    assert_eq!(ada.role, "CEO");
    assert_eq!(ada.bio, "Built engines.");
    assert_eq!(data.team_info.team_members_found, data.team_members.len());
  }

  #[test]
  fn test_links_and_contacts() {
    let data = extracted();
    assert_eq!(data.github_links, vec!["https://github.com/acme/serve".to_string()]);
    assert_eq!(data.social_links.get("twitter").map(String::as_str), Some("https://x.com/acme"));
    assert_eq!(data.social_links.get("discord").map(String::as_str), Some("https://discord.gg/acme"));
    assert_eq!(data.contact_info.emails, vec!["press@acme.io".to_string(), "team@acme.io".to_string()]);
    assert!(data.documentation_links.contains(&"/docs/intro".to_string()));
    assert!(data.documentation_links.contains(&"https://acme.io/api".to_string()));
    assert!(data.all_links.contains(&"https://acme.io/docs/intro".to_string()));
    assert_eq!(data.all_links.iter().filter(|l| l.contains("github.com")).count(), 1);
  }

  #[test]
  fn test_clean_text_and_flags() {
    let data = extracted();
    assert!(!data.clean_text.contains("ignore me"));
    assert!(!data.clean_text.contains("display: none"));
    assert!(!data.clean_text.contains("  "));
    assert!(data.has_about_section);
    assert!(data.has_team_section);
    assert!(data.has_product_section);
    assert_eq!(data.products, vec!["Acme Serve: hosted endpoints for open weights.".to_string()]);
  }

  #[test]
  fn test_empty_page() {
    let data = extract_website_data("", "https://empty.io", "Empty");
    assert_eq!(data.status, WebsiteStatus::Success);
    assert_eq!(data.title, None);
    assert_eq!(data.description, None);
    assert!(data.all_links.is_empty());
    assert!(!data.team_info.has_team_section);
  }

  #[test]
  fn test_description_falls_back_to_long_paragraph() {
    let html = "<p>short</p><p>This paragraph is comfortably longer than fifty characters in total.</p>";
    let data = extract_website_data(html, "https://a.io", "A");
    assert_eq!(
      data.description.as_deref(),
      Some("This paragraph is comfortably longer than fifty characters in total.")
    );
  }

  #[test]
  fn test_clean_text_is_capped() {
    let html = format!("<p>{}</p>", "word ".repeat(5_000));
    let data = extract_website_data(&html, "https://a.io", "A");
    assert_eq!(data.clean_text.chars().count(), MAX_CLEAN_TEXT);
  }
}
