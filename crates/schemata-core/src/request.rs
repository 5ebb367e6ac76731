//! Request defaults and payload assembly
//!
//! Request templates are layered: a base set of defaults is overridden by
//! more specific layers, each contributing only the fields it sets. The
//! assembled [`ChatRequest`] renders a chat-completions style payload with
//! the resolved response format; sending it is left to the transport.

use crate::error::{Error, Result};
use crate::format::ResponseFormat;
use crate::response::MessageRole;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Optional request settings that can be layered
#[derive(Debug, Clone, Default, Serialize)]
pub struct RequestDefaults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

impl RequestDefaults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
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

    /// Combine two layers, preferring the override's present fields
    pub fn merge(base: &Self, overrides: &Self) -> Self {
        Self {
            model: overrides.model.clone().or_else(|| base.model.clone()),
            system_prompt: overrides
                .system_prompt
                .clone()
                .or_else(|| base.system_prompt.clone()),
            temperature: overrides.temperature.or(base.temperature),
            max_tokens: overrides.max_tokens.or(base.max_tokens),
            response_format: overrides
                .response_format
                .clone()
                .or_else(|| base.response_format.clone()),
        }
    }

    /// Fold layers from most general to most specific
    pub fn layered<'a>(layers: impl IntoIterator<Item = &'a RequestDefaults>) -> Self {
        layers
            .into_iter()
            .fold(Self::default(), |acc, layer| Self::merge(&acc, layer))
    }
}

/// One outgoing message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestMessage {
    pub role: MessageRole,
    pub content: String,
}

/// Chat request assembled from layered defaults
#[derive(Debug, Clone)]
pub struct ChatRequest {
    settings: RequestDefaults,
    messages: Vec<RequestMessage>,
    schema_in_prompt: bool,
}

impl ChatRequest {
    pub fn new(settings: RequestDefaults) -> Self {
        Self {
            settings,
            messages: Vec::new(),
            schema_in_prompt: false,
        }
    }

    pub fn message(mut self, role: MessageRole, content: impl Into<String>) -> Self {
        self.messages.push(RequestMessage {
            role,
            content: content.into(),
        });
        self
    }

    /// Pass the schema through a system instruction instead of the
    /// `response_format` field
    pub fn schema_in_prompt(mut self, enabled: bool) -> Self {
        self.schema_in_prompt = enabled;
        self
    }

    pub fn settings(&self) -> &RequestDefaults {
        &self.settings
    }

    /// Format the response is expected in; attach it to the response
    pub fn response_format(&self) -> Option<&ResponseFormat> {
        self.settings.response_format.as_ref()
    }

    /// Render the provider payload
    #[tracing::instrument(level = "debug", skip(self), fields(model = ?self.settings.model))]
    pub fn to_wire_json(&self) -> Result<Value> {
        let model = self
            .settings
            .model
            .as_deref()
            .ok_or_else(|| Error::configuration("request has no model"))?;

        let mut messages = Vec::with_capacity(self.messages.len() + 2);
        if let Some(prompt) = &self.settings.system_prompt {
            messages.push(json!({"role": "system", "content": prompt}));
        }

        let mut payload = Map::new();
        payload.insert("model".to_string(), json!(model));

        if let Some(format) = &self.settings.response_format {
            if self.schema_in_prompt {
                if let Some(instruction) = format.schema_instruction()? {
                    messages.push(json!({"role": "system", "content": instruction}));
                }
            } else {
                payload.insert("response_format".to_string(), format.to_wire_json()?);
            }
        }

        for message in &self.messages {
            messages.push(serde_json::to_value(message)?);
        }
        payload.insert("messages".to_string(), Value::Array(messages));

        if let Some(temperature) = self.settings.temperature {
            payload.insert("temperature".to_string(), json!(temperature));
        }
        if let Some(max_tokens) = self.settings.max_tokens {
            payload.insert("max_tokens".to_string(), json!(max_tokens));
        }

        Ok(Value::Object(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TypeRegistry;
    use std::sync::Arc;

    fn plan_format() -> ResponseFormat {
        ResponseFormat::structured(json!({"type": "Plan"}), Arc::new(TypeRegistry::builtin()))
            .unwrap()
            .with_schema_name("plan")
    }

    #[test]
    fn test_merge_prefers_override() {
        let base = RequestDefaults::new().model("base-model").temperature(0.2).max_tokens(100);
        let overrides = RequestDefaults::new().temperature(0.9);

        let merged = RequestDefaults::merge(&base, &overrides);
        assert_eq!(merged.model.as_deref(), Some("base-model"));
        assert_eq!(merged.temperature, Some(0.9));
        assert_eq!(merged.max_tokens, Some(100));
    }

    #[test]
    fn test_layered_defaults() {
        let provider = RequestDefaults::new().model("m1").system_prompt("be brief");
        let task = RequestDefaults::new().response_format(plan_format());
        let call = RequestDefaults::new().model("m2");

        let settings = RequestDefaults::layered([&provider, &task, &call]);
        assert_eq!(settings.model.as_deref(), Some("m2"));
        assert_eq!(settings.system_prompt.as_deref(), Some("be brief"));
        assert!(settings.response_format.is_some());
    }

    #[test]
    fn test_wire_payload_carries_resolved_format() {
        let request = ChatRequest::new(
            RequestDefaults::new().model("m").max_tokens(64).response_format(plan_format()),
        )
        .message(MessageRole::User, "plan a release");

        let wire = request.to_wire_json().unwrap();
        assert_eq!(wire["model"], "m");
        assert_eq!(wire["max_tokens"], 64);
        assert_eq!(wire["response_format"]["json_schema"]["name"], "plan");
        assert_eq!(
            wire["response_format"]["json_schema"]["schema"]["properties"]["steps"]["items"]["type"],
            "object"
        );
        assert_eq!(wire["messages"][0], json!({"role": "user", "content": "plan a release"}));
    }

    #[test]
    fn test_schema_in_prompt() {
        let request = ChatRequest::new(
            RequestDefaults::new()
                .model("m")
                .system_prompt("you plan things")
                .response_format(plan_format()),
        )
        .message(MessageRole::User, "go")
        .schema_in_prompt(true);

        let wire = request.to_wire_json().unwrap();
        assert!(wire.get("response_format").is_none());

        let messages = wire["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0]["content"], "you plan things");
        assert!(messages[1]["content"].as_str().unwrap().contains("JSON Schema"));
    }

    #[test]
    fn test_missing_model() {
        let err = ChatRequest::new(RequestDefaults::new()).to_wire_json().unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }
}
