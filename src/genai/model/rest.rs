// SPDX-License-Identifier: MIT

//! REST chat model - hand-built generateContent calls
//!
//! The request body is assembled with `serde_json::json!` and posted to
//! `/v1beta/{model}:generateContent` with the API key as a query parameter.

use super::{model_resource, ChatModel, ChatModelConfig};
use crate::genai::logger::NodeLogger;
use crate::genai::message::Message;
use crate::genai::search::{select_search_tool, SearchTool};
use crate::genai::{NodeError, API_VERSION};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use url::Url;

/// Gemini chat adapter speaking the raw REST dialect
pub struct RestChatModel {
    client: Client,
    api_key: String,
    base_url: String,
    config: ChatModelConfig,
    logger: NodeLogger,
}

impl RestChatModel {
    pub fn new(
        client: Client,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        config: ChatModelConfig,
        logger: NodeLogger,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into(),
            config,
            logger,
        }
    }

    /// Full generateContent URL including the `key` query parameter
    pub fn endpoint(&self) -> Result<Url, NodeError> {
        let mut url = Url::parse(&format!(
            "{}/{}/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            API_VERSION,
            model_resource(&self.config.model)
        ))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }

    async fn send(&self, body: &Value) -> Result<String, NodeError> {
        let url = self.endpoint()?;
        let resp = self.client.post(url).json(body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await?;
            return Err(NodeError::api(status.as_u16(), text));
        }

        let resp_json: Value = resp.json().await?;
        self.logger.debug(&["Gemini response:".into(), resp_json.clone()]);

        extract_text(&resp_json)
    }
}

#[async_trait]
impl ChatModel for RestChatModel {
    async fn call(&self, input: &Message) -> Result<String, NodeError> {
        let prompt = input.normalize();
        let body = build_request_body(&self.config, &prompt);
        if select_search_tool(&self.config.model, self.config.enable_search)
            == Some(SearchTool::Unrecognized)
        {
            self.logger.debug(&[
                "Unknown search tool dialect, sending an empty tool object for".into(),
                self.config.model.clone().into(),
            ]);
        }
        self.logger.debug(&["Gemini request body:".into(), body.clone()]);

        let result = self.send(&body).await;
        if let Err(e) = &result {
            self.logger.error(&["Gemini request failed:".into(), e.to_string().into()]);
        }
        result
    }
}

/// Build the generateContent body for one prompt
pub fn build_request_body(config: &ChatModelConfig, prompt: &str) -> Value {
    let mut body = json!({
        "contents": [{ "parts": [{ "text": prompt }] }],
        "generationConfig": config.generation,
    });

    if let Some(settings) = &config.safety_settings {
        body["safetySettings"] = json!(settings);
    }

    if let Some(tool) = select_search_tool(&config.model, config.enable_search) {
        body["tools"] = json!([tool.to_rest_json()]);
    }

    body
}

/// Pull `candidates[0].content.parts[0].text` out of a response
pub fn extract_text(resp: &Value) -> Result<String, NodeError> {
    if let Some(text) = resp
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
    {
        return Ok(text.to_string());
    }

    let finish_reason = resp
        .pointer("/candidates/0/finishReason")
        .and_then(Value::as_str);
    match finish_reason {
        Some(reason) => Err(NodeError::invalid_response(format!(
            "no text in first candidate (finish reason: {})",
            reason
        ))),
        None => Err(NodeError::invalid_response(format!(
            "no text in first candidate: {}",
            resp
        ))),
    }
}
