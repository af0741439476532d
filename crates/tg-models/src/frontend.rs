//! Frontend payload: subnets grouped into a fixed category taxonomy.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrontendSubnet {
  pub id: String,
  pub name: String,
  pub description: String,
  pub status: String,
  pub market_cap: f64,
  pub emissions: f64,
  pub weekly_change: f64,
  pub validators: u32,
  pub age: i64,
  pub metrics: Vec<Value>,
  pub website: String,
  pub github: String,
  pub discord: String,
  pub registration_date: String,
  pub days_since_registration: i64,
  pub rank: i64,
  pub price: f64,
  #[serde(rename = "priceChange1Day")]
  pub price_change_1_day: f64,
  #[serde(rename = "priceChange1Month")]
  pub price_change_1_month: f64,
  #[serde(rename = "taoVolume24hr")]
  pub tao_volume_24hr: f64,
  pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrontendCategory {
  pub id: String,
  pub name: String,
  pub description: String,
  pub market_cap_total: f64,
  pub subnets: Vec<FrontendSubnet>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_camel_case_keys() {
    let subnet = FrontendSubnet {
      id: "SN1".to_string(),
      name: "Apex".to_string(),
      description: String::new(),
      status: "active".to_string(),
      market_cap: 1.0,
      emissions: 2.0,
      weekly_change: 0.0,
      validators: 0,
      age: 10,
      metrics: vec![],
      website: String::new(),
      github: String::new(),
      discord: String::new(),
      registration_date: String::new(),
      days_since_registration: 10,
      rank: 1,
      price: 0.5,
      price_change_1_day: 0.0,
      price_change_1_month: 0.0,
      tao_volume_24hr: 0.0,
      timestamp: String::new(),
    };
    let json = serde_json::to_value(&subnet).unwrap();
    for key in ["marketCap", "weeklyChange", "daysSinceRegistration", "priceChange1Day", "taoVolume24hr"] {
      assert!(json.get(key).is_some(), "missing {key}");
    }
  }
}
