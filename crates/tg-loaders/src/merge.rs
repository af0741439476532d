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

//! Outer join of identity, stats and market rows into the snapshot table.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use tg_core::round_to;
use tg_models::{MergedSubnetRow, PoolMarketData, SubnetIdentity, SubnetStats};
use tracing::{info, warn};

const UNKNOWN_NAME: &str = "Unknown";
const TOP_N: usize = 10;

/// Replace absolute emissions with their share of the total, in percent.
///
/// A zero total leaves the values untouched.
pub fn emission_percentages(stats: &[SubnetStats]) -> Vec<SubnetStats> {
  let total: f64 = stats.iter().map(|s| s.emission).sum();
  if total <= 0.0 {
    warn!("Total emission is 0, keeping absolute values");
    return stats.to_vec();
  }
  info!("Converted emissions to percentages (total was: {})", total);
  stats
    .iter()
    .map(|s| SubnetStats { emission: round_to(s.emission / total * 100.0, 4), ..s.clone() })
    .collect()
}

fn first_by_netuid<T>(rows: &[T], netuid: impl Fn(&T) -> i64) -> HashMap<i64, &T> {
  let mut map = HashMap::new();
  for row in rows {
    map.entry(netuid(row)).or_insert(row);
  }
  map
}

/// Join the three feeds on netuid, filling defaults for missing sides.
///
/// Rows come out sorted by subnet id. A netuid repeated within one feed
/// keeps its first row.
pub fn merge_subnet_data(
  identities: &[SubnetIdentity],
  stats: &[SubnetStats],
  pools: &[PoolMarketData],
  now: DateTime<Utc>,
) -> Vec<MergedSubnetRow> {
  let stats = emission_percentages(stats);

  let identity_by_id = first_by_netuid(identities, |i| i.netuid);
  let stats_by_id = first_by_netuid(&stats, |s| s.netuid);
  let pool_by_id = first_by_netuid(pools, |p| p.netuid);

  let netuids: BTreeSet<i64> =
    identity_by_id.keys().chain(stats_by_id.keys()).chain(pool_by_id.keys()).copied().collect();

  let rows: Vec<MergedSubnetRow> = netuids
    .into_iter()
    .map(|netuid| {
      let identity = identity_by_id.get(&netuid);
      let stat = stats_by_id.get(&netuid);
      let pool = pool_by_id.get(&netuid);
      let text = |f: fn(&SubnetIdentity) -> &String| identity.map(|i| f(i).clone()).unwrap_or_default();

      MergedSubnetRow {
        timestamp: stat.map(|s| s.timestamp).unwrap_or(now),
        subnet_id: netuid,
        subnet_name: identity
          .map(|i| i.subnet_name.trim())
          .filter(|name| !name.is_empty())
          .unwrap_or(UNKNOWN_NAME)
          .to_string(),
        description: text(|i| &i.description),
        emission: stat.map(|s| s.emission).unwrap_or(0.0),
        active: stat.map(|s| s.active).unwrap_or(false),
        website: text(|i| &i.subnet_url),
        github: text(|i| &i.github_repo),
        discord: text(|i| &i.discord),
        registration_date: stat
          .and_then(|s| s.registration_timestamp)
          .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Secs, true)),
        days_since_registration: stat.map(|s| s.days_since_registration).unwrap_or(0),
        rank: pool.map(|p| p.rank).unwrap_or(0),
        market_cap: pool.map(|p| p.market_cap).unwrap_or(0.0),
        price: pool.map(|p| p.price).unwrap_or(0.0),
        price_change_1_day: pool.and_then(|p| p.price_change_1_day),
        price_change_1_week: pool.and_then(|p| p.price_change_1_week),
        price_change_1_month: pool.and_then(|p| p.price_change_1_month),
        tao_volume_24hr: pool.map(|p| p.tao_volume_24_hr).unwrap_or(0.0),
      }
    })
    .collect();

  info!(
    "Merged {} identities, {} stats and {} pools into {} rows",
    identities.len(),
    stats.len(),
    pools.len(),
    rows.len()
  );
  rows
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRow {
  pub subnet_id: i64,
  pub subnet_name: String,
  pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistrationStats {
  pub oldest_days: i64,
  pub newest_days: i64,
  pub average_days: f64,
  pub subnets_with_registration: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Completeness {
  pub with_website: usize,
  pub with_github: usize,
  pub with_discord: usize,
  pub with_market_data: usize,
  pub with_registration: usize,
}

/// Headline numbers over a merged snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergeSummary {
  pub total_subnets: usize,
  pub active_subnets: usize,
  pub inactive_subnets: usize,
  pub total_emission: f64,
  pub average_emission: f64,
  pub max_emission: f64,
  pub total_market_cap: f64,
  pub average_price: f64,
  pub total_volume_24hr: f64,
  pub registration: Option<RegistrationStats>,
  pub completeness: Completeness,
  pub top_by_emission: Vec<RankedRow>,
  pub top_by_market_cap: Vec<RankedRow>,
}

fn top_by(rows: &[MergedSubnetRow], value: fn(&MergedSubnetRow) -> f64) -> Vec<RankedRow> {
  let mut ranked: Vec<RankedRow> = rows
    .iter()
    .map(|row| RankedRow { subnet_id: row.subnet_id, subnet_name: row.subnet_name.clone(), value: value(row) })
    .collect();
  ranked.sort_by(|a, b| b.value.total_cmp(&a.value));
  ranked.truncate(TOP_N);
  ranked
}

pub fn merge_summary(rows: &[MergedSubnetRow]) -> MergeSummary {
  let total = rows.len();
  let mean = |sum: f64| if total == 0 { 0.0 } else { sum / total as f64 };

  let active = rows.iter().filter(|r| r.active).count();
  let total_emission: f64 = rows.iter().map(|r| r.emission).sum();

  let ages: Vec<i64> = rows.iter().map(|r| r.days_since_registration).filter(|d| *d > 0).collect();
  let registration = match (ages.iter().max(), ages.iter().min()) {
    (Some(&oldest), Some(&newest)) => Some(RegistrationStats {
      oldest_days: oldest,
      newest_days: newest,
      average_days: round_to(ages.iter().sum::<i64>() as f64 / ages.len() as f64, 1),
      subnets_with_registration: ages.len(),
    }),
    _ => None,
  };

  MergeSummary {
    total_subnets: total,
    active_subnets: active,
    inactive_subnets: total - active,
    total_emission,
    average_emission: mean(total_emission),
    max_emission: rows.iter().map(|r| r.emission).fold(0.0, f64::max),
    total_market_cap: rows.iter().map(|r| r.market_cap).sum(),
    average_price: mean(rows.iter().map(|r| r.price).sum()),
    total_volume_24hr: rows.iter().map(|r| r.tao_volume_24hr).sum(),
    registration,
    completeness: Completeness {
      with_website: rows.iter().filter(|r| !r.website.is_empty()).count(),
      with_github: rows.iter().filter(|r| !r.github.is_empty()).count(),
      with_discord: rows.iter().filter(|r| !r.discord.is_empty()).count(),
      with_market_data: rows.iter().filter(|r| r.market_cap > 0.0).count(),
      with_registration: rows.iter().filter(|r| r.days_since_registration > 0).count(),
    },
    top_by_emission: top_by(rows, |r| r.emission),
    top_by_market_cap: top_by(rows, |r| r.market_cap),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;
  use pretty_assertions::assert_eq;
  use serde_json::json;
  use tg_core::test_utils::assert_approx_eq;

  fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
  }

  fn identity(netuid: i64, name: &str) -> SubnetIdentity {
    SubnetIdentity::from_value(&json!({
      "netuid": netuid,
      "subnet_name": name,
      "subnet_url": format!("https://sn{netuid}.io"),
      "github_repo": "",
    }))
  }

  fn stats(netuid: i64, emission: f64) -> SubnetStats {
    SubnetStats::from_value(
      &json!({"netuid": netuid, "emission": emission, "subtoken_enabled": true, "registration_timestamp": "2025-05-01T12:00:00Z"}),
      now(),
    )
  }

  fn pool(netuid: i64, market_cap_tao: f64) -> PoolMarketData {
    PoolMarketData::from_value(&json!({"netuid": netuid, "rank": 1, "market_cap": market_cap_tao * 1e9, "price": 0.5}))
  }

  #[test]
  fn test_emission_percentages() {
    let converted = emission_percentages(&[stats(1, 1.0), stats(2, 2.0)]);
    assert_eq!(converted[0].emission, 33.3333);
    assert_eq!(converted[1].emission, 66.6667);
  }

  #[test]
  fn test_zero_total_keeps_absolute() {
    let converted = emission_percentages(&[stats(1, 0.0), stats(2, 0.0)]);
    assert_eq!(converted[0].emission, 0.0);
  }

  #[test]
  fn test_outer_join_fills_defaults() {
    let rows = merge_subnet_data(
      &[identity(3, "Gamma"), identity(1, " ")],
      &[stats(1, 3.0), stats(2, 1.0)],
      &[pool(4, 1200.0)],
      now(),
    );

    let ids: Vec<i64> = rows.iter().map(|r| r.subnet_id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);

    assert_eq!(rows[0].subnet_name, "Unknown");
    assert_eq!(rows[0].emission, 75.0);
    assert_eq!(rows[0].website, "https://sn1.io");
    assert_eq!(rows[0].registration_date.as_deref(), Some("2025-05-01T12:00:00Z"));
    assert_eq!(rows[0].days_since_registration, 31);

    assert_eq!(rows[1].subnet_name, "Unknown");
    assert_eq!(rows[1].website, "");

    assert_eq!(rows[2].subnet_name, "Gamma");
    assert!(!rows[2].active);
    assert_eq!(rows[2].timestamp, now());
    assert_eq!(rows[2].registration_date, None);

    assert_approx_eq(rows[3].market_cap, 1200.0, 1e-9);
    assert_eq!(rows[3].price_change_1_day, None);
    assert_eq!(rows[3].emission, 0.0);
  }

  #[test]
  fn test_summary() {
    let rows = merge_subnet_data(
      &[identity(1, "Apex"), identity(2, "Omron")],
      &[stats(1, 1.0), stats(2, 3.0)],
      &[pool(1, 100.0), pool(2, 300.0)],
      now(),
    );
    let summary = merge_summary(&rows);

    assert_eq!(summary.total_subnets, 2);
    assert_eq!(summary.active_subnets, 2);
    assert_eq!(summary.inactive_subnets, 0);
    assert_approx_eq(summary.total_emission, 100.0, 1e-9);
    assert_approx_eq(summary.total_market_cap, 400.0, 1e-6);
    assert_eq!(summary.top_by_market_cap[0].subnet_name, "Omron");
    assert_eq!(summary.top_by_emission[0].subnet_id, 2);
    assert_eq!(summary.completeness.with_website, 2);
    assert_eq!(summary.completeness.with_github, 0);
    let registration = summary.registration.unwrap();
    assert_eq!(registration.oldest_days, 31);
    assert_eq!(registration.subnets_with_registration, 2);
  }

  #[test]
  fn test_summary_of_nothing() {
    let summary = merge_summary(&[]);
    assert_eq!(summary.total_subnets, 0);
    assert_eq!(summary.average_price, 0.0);
    assert!(summary.registration.is_none());
    assert!(summary.top_by_emission.is_empty());
  }
}
