// SPDX-License-Identifier: MIT

//! Model module - chat adapter trait and implementations
//!
//! This module provides the [`ChatModel`] trait handed to hosts and the
//! configuration it is frozen with. Implementations are in submodules:
//! - [rest] - hand-built REST body, optional proxy and debug logging
//! - [sdk] - typed client mirroring the vendor SDK's request model

pub mod rest;
pub mod sdk;

use super::message::Message;
use super::safety::SafetySetting;
use super::NodeError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sampling parameters for generation; unset fields are left out of requests.
///
/// Values are kept exactly as the host stored them and forwarded to the API
/// uninterpreted, so `topK: 32.5` or `temperature: "0.4"` reach the request
/// body as given.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<Value>,
}

impl GenerationConfig {
    pub fn new(max_output_tokens: u32, temperature: f64, top_k: i32, top_p: f64) -> Self {
        Self {
            max_output_tokens: Some(max_output_tokens.into()),
            temperature: Some(temperature.into()),
            top_k: Some(top_k.into()),
            top_p: Some(top_p.into()),
        }
    }
}

/// Everything a chat adapter is frozen with at creation time
#[derive(Debug, Clone, PartialEq)]
pub struct ChatModelConfig {
    /// Model id as selected in the host, e.g. `models/gemini-1.5-pro`
    pub model: String,
    pub generation: GenerationConfig,
    pub safety_settings: Option<Vec<SafetySetting>>,
    pub enable_search: bool,
}

/// Callable adapter the host's chain/agent machinery invokes per turn
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Generate text for one conversation turn
    async fn call(&self, input: &Message) -> Result<String, NodeError>;
}

/// Model resource name with the `models/` prefix the REST path expects
pub fn model_resource(model: &str) -> String {
    if model.starts_with("models/") || model.starts_with("tunedModels/") {
        model.to_string()
    } else {
        format!("models/{}", model)
    }
}

/// Bare model id without the `models/` prefix, as the SDK takes it
pub fn model_id(model: &str) -> &str {
    model.strip_prefix("models/").unwrap_or(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_generation_config_serializes_camel_case() {
        let config = GenerationConfig::new(2048, 0.4, 32, 1.0);
        assert_eq!(
            serde_json::to_value(&config).unwrap(),
            json!({
                "maxOutputTokens": 2048,
                "temperature": 0.4,
                "topK": 32,
                "topP": 1.0
            })
        );
    }

    #[test]
    fn test_partial_generation_config_omits_unset() {
        let config: GenerationConfig =
            serde_json::from_value(json!({ "temperature": 0.9 })).unwrap();
        assert_eq!(serde_json::to_value(&config).unwrap(), json!({ "temperature": 0.9 }));
    }

    #[test]
    fn test_generation_values_pass_through_uninterpreted() {
        let stored = json!({
            "maxOutputTokens": 1024.5,
            "temperature": "0.4",
            "topK": 32.5,
            "topP": 1
        });
        let config: GenerationConfig = serde_json::from_value(stored.clone()).unwrap();
        assert_eq!(config.top_k, Some(json!(32.5)));
        assert_eq!(serde_json::to_value(&config).unwrap(), stored);
    }

    #[test]
    fn test_model_resource_and_id() {
        assert_eq!(model_resource("gemini-1.5-pro"), "models/gemini-1.5-pro");
        assert_eq!(model_resource("models/gemini-1.5-pro"), "models/gemini-1.5-pro");
        assert_eq!(model_id("models/gemini-2.0-flash"), "gemini-2.0-flash");
        assert_eq!(model_id("gemini-2.0-flash"), "gemini-2.0-flash");
    }
}
