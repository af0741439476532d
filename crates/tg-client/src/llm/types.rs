//! Chat completions wire types.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  System,
  User,
  Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
  pub role: Role,
  pub content: String,
}

impl ChatMessage {
  pub fn system(content: impl Into<String>) -> Self {
    Self { role: Role::System, content: content.into() }
  }

  pub fn user(content: impl Into<String>) -> Self {
    Self { role: Role::User, content: content.into() }
  }
}

/// `response_format` payload requesting schema-constrained JSON.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseFormat {
  #[serde(rename = "type")]
  pub format_type: String,
  pub json_schema: JsonSchemaFormat,
}

#[derive(Debug, Clone, Serialize)]
pub struct JsonSchemaFormat {
  pub name: String,
  pub strict: bool,
  pub schema: serde_json::Value,
}

impl ResponseFormat {
  pub fn json_schema(name: impl Into<String>, schema: serde_json::Value) -> Self {
    Self {
      format_type: "json_schema".to_string(),
      json_schema: JsonSchemaFormat { name: name.into(), strict: true, schema },
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
  pub model: String,
  pub messages: Vec<ChatMessage>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub temperature: Option<f32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub max_tokens: Option<u32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub response_format: Option<ResponseFormat>,
}

impl ChatRequest {
  pub fn new(model: impl Into<String>) -> Self {
    Self {
      model: model.into(),
      messages: Vec::new(),
      temperature: None,
      max_tokens: None,
      response_format: None,
    }
  }

  pub fn message(mut self, message: ChatMessage) -> Self {
    self.messages.push(message);
    self
  }

  pub fn temperature(mut self, temperature: f32) -> Self {
    self.temperature = Some(temperature);
    self
  }

  pub fn max_tokens(mut self, max_tokens: u32) -> Self {
    self.max_tokens = Some(max_tokens);
    self
  }

  pub fn response_format(mut self, format: ResponseFormat) -> Self {
    self.response_format = Some(format);
    self
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
  #[serde(default)]
  pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
  pub message: ResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
  #[serde(default)]
  pub content: Option<String>,
}
