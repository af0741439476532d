//! Lenient value coercion shared by the API models and the CSV readers.
//!
//! Taostats fields arrive as numbers, numeric strings, or `null` depending
//! on the endpoint and the age of the subnet. Every accessor here is total:
//! anything that cannot be interpreted yields `None` and the caller applies
//! its own default.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

/// Read a field as a trimmed string. Numbers are rendered, `null` is `None`.
pub fn value_as_string(value: Option<&Value>) -> Option<String> {
  match value? {
    Value::String(s) => Some(s.trim().to_string()),
    Value::Number(n) => Some(n.to_string()),
    Value::Bool(b) => Some(b.to_string()),
    _ => None,
  }
}

/// Read a field as `f64`, accepting numeric strings.
pub fn value_as_f64(value: Option<&Value>) -> Option<f64> {
  match value? {
    Value::Number(n) => n.as_f64(),
    Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
    _ => None,
  }
}

/// Read a field as `i64`, truncating fractional values.
pub fn value_as_i64(value: Option<&Value>) -> Option<i64> {
  match value? {
    Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
    Value::String(s) => {
      let s = s.trim();
      s.parse::<i64>().ok().or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))
    }
    _ => None,
  }
}

/// Read a field as `bool`; numbers are truthy when non-zero.
pub fn value_as_bool(value: Option<&Value>) -> Option<bool> {
  match value? {
    Value::Bool(b) => Some(*b),
    Value::Number(n) => n.as_f64().map(|f| f != 0.0),
    Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
      "true" | "1" | "yes" => Some(true),
      "false" | "0" | "no" | "" => Some(false),
      _ => None,
    },
    _ => None,
  }
}

/// Read a timestamp: RFC 3339, naive ISO with or without `T`, a bare date,
/// or unix seconds.
pub fn value_as_datetime(value: Option<&Value>) -> Option<DateTime<Utc>> {
  match value? {
    Value::String(s) => parse_datetime(s),
    Value::Number(n) => n.as_i64().and_then(|secs| Utc.timestamp_opt(secs, 0).single()),
    _ => None,
  }
}

pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
  let raw = raw.trim();
  if raw.is_empty() {
    return None;
  }
  if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
    return Some(dt.with_timezone(&Utc));
  }
  for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
      return Some(Utc.from_utc_datetime(&naive));
    }
  }
  NaiveDate::parse_from_str(raw, "%Y-%m-%d")
    .ok()
    .and_then(|d| d.and_hms_opt(0, 0, 0))
    .map(|naive| Utc.from_utc_datetime(&naive))
}

/// CSV cell to `f64`, `default` on blank or garbage.
pub fn safe_float(raw: Option<&str>, default: f64) -> f64 {
  raw
    .map(str::trim)
    .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("nan"))
    .and_then(|s| s.parse::<f64>().ok())
    .filter(|v| v.is_finite())
    .unwrap_or(default)
}

/// CSV cell to `i64` via float, so `"12.0"` reads as 12.
pub fn safe_int(raw: Option<&str>, default: i64) -> i64 {
  let value = safe_float(raw, f64::NAN);
  if value.is_nan() {
    default
  } else {
    value as i64
  }
}

/// CSV cell to trimmed string.
pub fn safe_string(raw: Option<&str>, default: &str) -> String {
  match raw {
    Some(s) if !s.trim().eq_ignore_ascii_case("nan") => s.trim().to_string(),
    _ => default.to_string(),
  }
}

pub(crate) fn is_false(b: &bool) -> bool {
  !*b
}
