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

//! Subnet website scraping.
//!
//! [`extract_website_data`] is a pure HTML → [`WebsiteData`] projection;
//! [`WebsiteScraper`] pairs it with a [`PageFetcher`] and folds fetch
//! failures into `status: error` records.

mod extract;
mod fetcher;

pub use extract::extract_website_data;
pub use fetcher::{HttpPageFetcher, BROWSER_USER_AGENT};

use async_trait::async_trait;
use chrono::Utc;
use tg_models::WebsiteData;
use tracing::{error, info};

use crate::error::AnalysisResult;
use crate::traits::{PageFetcher, SiteScraper};

pub struct WebsiteScraper<F: PageFetcher> {
  fetcher: F,
}

impl<F: PageFetcher> WebsiteScraper<F> {
  pub fn new(fetcher: F) -> Self {
    Self { fetcher }
  }

  /// Fetch and extract. Fetch errors come back as error-status data.
  pub async fn scrape_website(&self, url: &str, subnet_name: &str) -> WebsiteData {
    let target = with_scheme(url);
    info!("Scraping website: {}", target);

    match self.fetcher.fetch(&target).await {
      Ok(html) => {
        let mut data = extract_website_data(&html, &target, subnet_name);
        data.scraped_at = Some(Utc::now());
        data
      }
      Err(e) => {
        error!("Error scraping {}: {}", target, e);
        WebsiteData::failed(&target, subnet_name, e.to_string())
      }
    }
  }
}

#[async_trait]
impl<F: PageFetcher> SiteScraper for WebsiteScraper<F> {
  async fn scrape(&self, url: &str, subnet_name: &str) -> AnalysisResult<WebsiteData> {
    Ok(self.scrape_website(url, subnet_name).await)
  }
}

/// Taostats sometimes lists bare domains.
fn with_scheme(url: &str) -> String {
  let url = url.trim();
  if url.starts_with("http://") || url.starts_with("https://") {
    url.to_string()
  } else {
    format!("https://{}", url)
  }
}
