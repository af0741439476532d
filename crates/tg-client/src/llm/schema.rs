//! Strict JSON schemas for structured chat output.

use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tg_core::{Error, Result};

/// Types the model can be asked to return directly.
///
/// Strict mode wants every object closed (`additionalProperties: false`),
/// every property listed as required, and no `$ref` indirection.
pub trait StructuredOutput: JsonSchema + DeserializeOwned {
  fn strict_schema() -> Value {
    let mut root = serde_json::to_value(schema_for!(Self)).unwrap_or(Value::Null);
    let definitions = root
      .as_object_mut()
      .and_then(|map| {
        map.remove("$schema");
        map.remove("definitions")
      })
      .unwrap_or(Value::Null);
    tighten(&mut root, &definitions);
    root
  }

  fn format_name() -> String {
    <Self as JsonSchema>::schema_name()
  }
}

impl<T: JsonSchema + DeserializeOwned> StructuredOutput for T {}

fn tighten(node: &mut Value, definitions: &Value) {
  match node {
    Value::Object(map) => {
      if let Some(target) = resolve_ref(map, definitions) {
        *node = target;
        tighten(node, definitions);
        return;
      }
      let single = match map.get("allOf") {
        Some(Value::Array(parts)) if parts.len() == 1 => parts.first().cloned(),
        _ => None,
      };
      if let Some(only) = single {
        *node = only;
        tighten(node, definitions);
        return;
      }
      if map.get("type").and_then(Value::as_str) == Some("object") {
        close_object(map);
      }
      for child in map.values_mut() {
        tighten(child, definitions);
      }
    }
    Value::Array(items) => items.iter_mut().for_each(|item| tighten(item, definitions)),
    _ => {}
  }
}

fn resolve_ref(map: &Map<String, Value>, definitions: &Value) -> Option<Value> {
  let name = map.get("$ref")?.as_str()?.strip_prefix("#/definitions/")?;
  definitions.get(name).cloned()
}

fn close_object(map: &mut Map<String, Value>) {
  map.insert("additionalProperties".to_string(), Value::Bool(false));
  let required: Vec<Value> = map
    .get("properties")
    .and_then(Value::as_object)
    .map(|props| props.keys().cloned().map(Value::String).collect())
    .unwrap_or_default();
  map.insert("required".to_string(), Value::Array(required));
}

/// Deserialize model content, tolerating a surrounding markdown code fence.
pub fn parse_structured<T: DeserializeOwned>(content: &str) -> Result<T> {
  let trimmed = content.trim();
  let body = trimmed
    .strip_prefix("```json")
    .or_else(|| trimmed.strip_prefix("```"))
    .and_then(|rest| rest.trim_end().strip_suffix("```"))
    .unwrap_or(trimmed);
  serde_json::from_str(body.trim()).map_err(|e| Error::Parse(format!("structured output did not match schema: {}", e)))
}
