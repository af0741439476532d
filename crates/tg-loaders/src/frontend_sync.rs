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

//! Regroup the merged snapshot into the frontend's category payload.

use chrono::{Local, NaiveDateTime, SecondsFormat};
use std::path::PathBuf;
use tg_models::{FrontendCategory, FrontendSubnet, MergedSubnetRow};
use tracing::info;

use crate::csv_processor::CsvProcessor;
use crate::snapshot::write_json;
use crate::LoaderResult;

pub struct Category {
  pub id: &'static str,
  pub name: &'static str,
  pub netuids: &'static [i64],
}

const UNCATEGORIZED: usize = 6;

pub const TAXONOMY: [Category; 7] = [
  Category {
    id: "ai-&-machine-learning",
    name: "AI & Machine Learning",
    netuids: &[
      1, 2, 3, 4, 5, 9, 11, 15, 16, 17, 19, 20, 21, 22, 23, 29, 35, 36, 37, 38, 39, 41, 45, 46, 47, 54, 56, 58, 59, 60,
      61, 62, 70, 80, 84, 85, 87, 88, 93, 94,
    ],
  },
  Category {
    id: "core-infrastructure",
    name: "Core Infrastructure",
    netuids: &[7, 12, 26, 27, 49, 51, 63, 64, 65, 75, 81, 91],
  },
  Category {
    id: "data-services",
    name: "Data Services",
    netuids: &[6, 13, 18, 24, 30, 33, 40, 42, 44, 48, 50, 52, 55, 57],
  },
  Category { id: "defi-&-trading", name: "DeFi & Trading", netuids: &[8, 10, 53] },
  Category { id: "scientific-computing", name: "Scientific Computing", netuids: &[25, 43, 68, 76] },
  Category { id: "security-&-trust", name: "Security & Trust", netuids: &[32, 34, 66] },
  Category {
    id: "uncategorized",
    name: "Uncategorized",
    netuids: &[
      14, 28, 31, 67, 69, 71, 72, 73, 74, 77, 78, 79, 82, 83, 86, 89, 90, 92, 95, 96, 97, 98, 99, 100, 101, 102, 103,
      104, 105, 106, 107, 108, 109, 110, 111, 112, 113, 114, 115, 116, 117, 118, 119, 120,
    ],
  },
];

/// Index into [`TAXONOMY`]; unlisted netuids land in Uncategorized.
pub fn category_index(netuid: i64) -> usize {
  TAXONOMY.iter().position(|c| c.netuids.contains(&netuid)).unwrap_or(UNCATEGORIZED)
}

pub fn frontend_subnet(row: &MergedSubnetRow) -> FrontendSubnet {
  FrontendSubnet {
    id: format!("SN{}", row.subnet_id),
    name: row.subnet_name.clone(),
    description: row.description.clone(),
    status: if row.active { "active" } else { "inactive" }.to_string(),
    market_cap: row.market_cap,
    emissions: row.emission,
    weekly_change: row.price_change_1_week.unwrap_or(0.0),
    validators: 0,
    age: row.days_since_registration,
    metrics: Vec::new(),
    website: row.website.clone(),
    github: row.github.clone(),
    discord: row.discord.clone(),
    registration_date: row.registration_date.clone().unwrap_or_default(),
    days_since_registration: row.days_since_registration,
    rank: row.rank,
    price: row.price,
    price_change_1_day: row.price_change_1_day.unwrap_or(0.0),
    price_change_1_month: row.price_change_1_month.unwrap_or(0.0),
    tao_volume_24hr: row.tao_volume_24hr,
    timestamp: row.timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true),
  }
}

/// Group rows by category. SN0 is the root network and is left out.
///
/// Empty categories are dropped. Subnets sort by emissions and categories
/// by total market cap, both descending.
pub fn build_categories(rows: &[MergedSubnetRow]) -> Vec<FrontendCategory> {
  let mut buckets: Vec<Vec<FrontendSubnet>> = vec![Vec::new(); TAXONOMY.len()];
  for row in rows.iter().filter(|r| r.subnet_id != 0) {
    buckets[category_index(row.subnet_id)].push(frontend_subnet(row));
  }

  let mut categories: Vec<FrontendCategory> = TAXONOMY
    .iter()
    .zip(buckets)
    .filter(|(_, subnets)| !subnets.is_empty())
    .map(|(category, mut subnets)| {
      subnets.sort_by(|a, b| b.emissions.total_cmp(&a.emissions));
      FrontendCategory {
        id: category.id.to_string(),
        name: category.name.to_string(),
        description: String::new(),
        market_cap_total: subnets.iter().map(|s| s.market_cap).sum(),
        subnets,
      }
    })
    .collect();
  categories.sort_by(|a, b| b.market_cap_total.total_cmp(&a.market_cap_total));

  info!(
    "Transformed {} subnets into {} categories",
    categories.iter().map(|c| c.subnets.len()).sum::<usize>(),
    categories.len()
  );
  categories
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyncSummary {
  pub total_subnets: usize,
  pub active_subnets: usize,
  pub categories: usize,
  pub total_market_cap: f64,
  pub output: PathBuf,
  pub backup: PathBuf,
}

impl SyncSummary {
  fn from_categories(categories: &[FrontendCategory], output: PathBuf, backup: PathBuf) -> Self {
    let subnets = || categories.iter().flat_map(|c| c.subnets.iter());
    Self {
      total_subnets: subnets().count(),
      active_subnets: subnets().filter(|s| s.status == "active").count(),
      categories: categories.len(),
      total_market_cap: categories.iter().map(|c| c.market_cap_total).sum(),
      output,
      backup,
    }
  }
}

pub struct FrontendSync {
  input: PathBuf,
  output: PathBuf,
  results_dir: PathBuf,
}

impl FrontendSync {
  pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>, results_dir: impl Into<PathBuf>) -> Self {
    Self { input: input.into(), output: output.into(), results_dir: results_dir.into() }
  }

  pub fn backup_path(&self, stamp: NaiveDateTime) -> PathBuf {
    self.results_dir.join(format!("frontend_data_backup_{}.json", stamp.format("%Y%m%d_%H%M%S")))
  }

  pub fn run(&self) -> LoaderResult<SyncSummary> {
    self.run_at(Local::now().naive_local())
  }

  /// Sync with an explicit backup timestamp.
  pub fn run_at(&self, stamp: NaiveDateTime) -> LoaderResult<SyncSummary> {
    info!("Reading data from {}", self.input.display());
    let rows = CsvProcessor::new().read_merged_rows(&self.input)?;
    let categories = build_categories(&rows);

    info!("Writing transformed data to {}", self.output.display());
    write_json(&self.output, &categories)?;
    let backup = self.backup_path(stamp);
    write_json(&backup, &categories)?;

    info!("Frontend sync completed");
    Ok(SyncSummary::from_categories(&categories, self.output.clone(), backup))
  }
}
