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

//! Taostats subnet models: identity, latest stats, dTAO pool pricing and
//! the merged per-subnet row written to the snapshot files.

use crate::common::{value_as_bool, value_as_datetime, value_as_f64, value_as_i64, value_as_string};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const RAO_PER_TAO: f64 = 1e9;

/// One entry of the subnet identity endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubnetIdentity {
  pub netuid: i64,
  pub subnet_name: String,
  pub description: String,
  pub subnet_url: String,
  pub github_repo: String,
  pub discord: String,
  pub subnet_contact: String,
  /// Upstream object as received.
  #[serde(default)]
  pub raw: Value,
}

impl SubnetIdentity {
  /// Project an upstream entry; an unreadable netuid becomes 0.
  pub fn from_value(value: &Value) -> Self {
    let text = |key: &str| value_as_string(value.get(key)).unwrap_or_default();
    Self {
      netuid: value_as_i64(value.get("netuid")).unwrap_or(0),
      subnet_name: text("subnet_name"),
      description: text("description"),
      subnet_url: text("subnet_url"),
      github_repo: text("github_repo"),
      discord: text("discord"),
      subnet_contact: text("subnet_contact"),
      raw: value.clone(),
    }
  }
}

/// Latest emission/activity stats for a subnet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubnetStats {
  pub netuid: i64,
  pub emission: f64,
  pub active: bool,
  pub timestamp: DateTime<Utc>,
  pub registration_timestamp: Option<DateTime<Utc>>,
  pub days_since_registration: i64,
}

impl SubnetStats {
  /// Project an upstream entry, stamping it with `now` when the API omits a
  /// timestamp.
  pub fn from_value(value: &Value, now: DateTime<Utc>) -> Self {
    let registration_timestamp = value_as_datetime(value.get("registration_timestamp"))
      .or_else(|| value_as_datetime(value.get("registered_at")));
    let days_since_registration = registration_timestamp
      .map(|reg| (now - reg).num_days().max(0))
      .unwrap_or(0);

    Self {
      netuid: value_as_i64(value.get("netuid")).unwrap_or(0),
      emission: value_as_f64(value.get("emission")).unwrap_or(0.0),
      active: value_as_bool(value.get("subtoken_enabled"))
        .or_else(|| value_as_bool(value.get("active")))
        .unwrap_or(false),
      timestamp: value_as_datetime(value.get("timestamp")).unwrap_or(now),
      registration_timestamp,
      days_since_registration,
    }
  }
}

/// dTAO pool pricing, with rao amounts converted to TAO.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolMarketData {
  pub netuid: i64,
  pub rank: i64,
  pub market_cap: f64,
  pub price: f64,
  pub price_change_1_day: Option<f64>,
  pub price_change_1_week: Option<f64>,
  pub price_change_1_month: Option<f64>,
  pub tao_volume_24_hr: f64,
}

impl PoolMarketData {
  pub fn from_value(value: &Value) -> Self {
    Self {
      netuid: value_as_i64(value.get("netuid")).unwrap_or(0),
      rank: value_as_i64(value.get("rank")).unwrap_or(0),
      market_cap: value_as_f64(value.get("market_cap")).unwrap_or(0.0) / RAO_PER_TAO,
      price: value_as_f64(value.get("price")).unwrap_or(0.0),
      price_change_1_day: value_as_f64(value.get("price_change_1_day")),
      price_change_1_week: value_as_f64(value.get("price_change_1_week")),
      price_change_1_month: value_as_f64(value.get("price_change_1_month")),
      tao_volume_24_hr: value_as_f64(value.get("tao_volume_24_hr")).unwrap_or(0.0) / RAO_PER_TAO,
    }
  }
}

/// One row of the merged snapshot. Field names match the CSV header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedSubnetRow {
  #[serde(rename = "Timestamp")]
  pub timestamp: DateTime<Utc>,
  #[serde(rename = "Subnet ID")]
  pub subnet_id: i64,
  #[serde(rename = "Subnet Name")]
  pub subnet_name: String,
  #[serde(rename = "Description")]
  pub description: String,
  #[serde(rename = "Emission")]
  pub emission: f64,
  #[serde(rename = "Active")]
  pub active: bool,
  #[serde(rename = "Website")]
  pub website: String,
  #[serde(rename = "Github")]
  pub github: String,
  #[serde(rename = "Discord")]
  pub discord: String,
  #[serde(rename = "Registration Date")]
  pub registration_date: Option<String>,
  #[serde(rename = "Days Since Registration")]
  pub days_since_registration: i64,
  #[serde(rename = "Rank")]
  pub rank: i64,
  #[serde(rename = "Market Cap")]
  pub market_cap: f64,
  #[serde(rename = "Price")]
  pub price: f64,
  #[serde(rename = "Price Change 1 Day")]
  pub price_change_1_day: Option<f64>,
  #[serde(rename = "Price Change 1 Week")]
  pub price_change_1_week: Option<f64>,
  #[serde(rename = "Price Change 1 Month")]
  pub price_change_1_month: Option<f64>,
  #[serde(rename = "TAO Volume 24hr")]
  pub tao_volume_24hr: f64,
}

/// CSV header order for [`MergedSubnetRow`].
pub const MERGED_COLUMNS: [&str; 18] = [
  "Timestamp",
  "Subnet ID",
  "Subnet Name",
  "Description",
  "Emission",
  "Active",
  "Website",
  "Github",
  "Discord",
  "Registration Date",
  "Days Since Registration",
  "Rank",
  "Market Cap",
  "Price",
  "Price Change 1 Day",
  "Price Change 1 Week",
  "Price Change 1 Month",
  "TAO Volume 24hr",
];

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;
  use serde_json::json;
  use tg_core::test_utils::assert_approx_eq;

  #[test]
  fn test_identity_from_value() {
    let raw = json!({
      "netuid": 5,
      "subnet_name": " Open Kaito ",
      "description": "Search",
      "subnet_url": "https://openkaito.ai",
      "github_repo": null,
      "discord": "https://discord.gg/kaito",
      "subnet_contact": "team@kaito.ai"
    });
    let identity = SubnetIdentity::from_value(&raw);
    assert_eq!(identity.netuid, 5);
    assert_eq!(identity.subnet_name, "Open Kaito");
    assert_eq!(identity.github_repo, "");
    assert_eq!(identity.subnet_contact, "team@kaito.ai");
    assert_eq!(identity.raw, raw);
  }

  #[test]
  fn test_identity_bad_netuid_defaults_to_zero() {
    let identity = SubnetIdentity::from_value(&json!({"netuid": "abc", "subnet_name": "x"}));
    assert_eq!(identity.netuid, 0);
    assert_eq!(identity.subnet_name, "x");
  }

  #[test]
  fn test_stats_days_since_registration() {
    let now = Utc.with_ymd_and_hms(2025, 3, 11, 0, 0, 0).unwrap();
    let raw = json!({
      "netuid": "3",
      "emission": "0.25",
      "subtoken_enabled": true,
      "registration_timestamp": "2025-03-01T00:00:00Z"
    });
    let stats = SubnetStats::from_value(&raw, now);
    assert_eq!(stats.netuid, 3);
    assert_approx_eq(stats.emission, 0.25, 1e-12);
    assert!(stats.active);
    assert_eq!(stats.timestamp, now);
    assert_eq!(stats.days_since_registration, 10);
  }

  #[test]
  fn test_stats_without_registration() {
    let now = Utc::now();
    let stats = SubnetStats::from_value(&json!({"netuid": 1}), now);
    assert_eq!(stats.days_since_registration, 0);
    assert!(stats.registration_timestamp.is_none());
    assert!(!stats.active);
  }

  #[test]
  fn test_pool_converts_rao() {
    let raw = json!({
      "netuid": 8,
      "rank": 2,
      "market_cap": "2500000000000",
      "price": 0.031,
      "price_change_1_day": "-1.5",
      "price_change_1_week": null,
      "tao_volume_24_hr": 4_000_000_000u64
    });
    let pool = PoolMarketData::from_value(&raw);
    assert_approx_eq(pool.market_cap, 2500.0, 1e-9);
    assert_approx_eq(pool.tao_volume_24_hr, 4.0, 1e-9);
    assert_eq!(pool.price_change_1_day, Some(-1.5));
    assert_eq!(pool.price_change_1_week, None);
    assert_eq!(pool.price_change_1_month, None);
  }

  #[test]
  fn test_merged_row_uses_csv_header_names() {
    let row = MergedSubnetRow {
      timestamp: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
      subnet_id: 1,
      subnet_name: "Apex".to_string(),
      description: String::new(),
      emission: 0.0,
      active: true,
      website: String::new(),
      github: String::new(),
      discord: String::new(),
      registration_date: None,
      days_since_registration: 0,
      rank: 0,
      market_cap: 0.0,
      price: 0.0,
      price_change_1_day: None,
      price_change_1_week: None,
      price_change_1_month: None,
      tao_volume_24hr: 0.0,
    };
    let value = serde_json::to_value(&row).unwrap();
    let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
    for column in MERGED_COLUMNS {
      assert!(keys.contains(&column), "missing {column}");
    }
  }
}
