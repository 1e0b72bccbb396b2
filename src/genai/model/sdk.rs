// SPDX-License-Identifier: MIT

//! SDK-style chat model
//!
//! [`GenAiClient`] mirrors the vendor SDK's `models.generateContent` surface:
//! callers pass a model id, plain-text contents and a typed config, and get a
//! typed response whose [`GenerateContentResponse::text`] joins the first
//! candidate's text parts.

use super::{model_id, ChatModel, ChatModelConfig, GenerationConfig};
use crate::genai::message::Message;
use crate::genai::safety::SafetySetting;
use crate::genai::{NodeError, API_VERSION, DEFAULT_API_BASE_URL};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Header carrying the API key on SDK-style calls
pub const API_KEY_HEADER: &str = "x-goog-api-key";

/// Tool entry in the typed request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_search: Option<GoogleSearch>,
}

impl Tool {
    pub fn google_search() -> Self {
        Self {
            google_search: Some(GoogleSearch {}),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoogleSearch {}

/// Per-call configuration accepted by [`GenAiClient::generate_content`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateContentConfig {
    pub generation: GenerationConfig,
    pub safety_settings: Option<Vec<SafetySetting>>,
    pub tools: Option<Vec<Tool>>,
}

/// Arguments of a generateContent call
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateContentParameters {
    /// Bare model id, e.g. `gemini-2.0-flash`
    pub model: String,
    /// Each entry becomes one user turn
    pub contents: Vec<String>,
    pub config: GenerateContentConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<TextPart>,
}

/// Wire body produced from [`GenerateContentParameters`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety_settings: Option<Vec<SafetySetting>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
}

impl From<&GenerateContentParameters> for GenerateContentRequest {
    fn from(params: &GenerateContentParameters) -> Self {
        let contents = params
            .contents
            .iter()
            .map(|text| Content {
                role: Some("user".to_string()),
                parts: vec![TextPart {
                    text: Some(text.clone()),
                }],
            })
            .collect();

        Self {
            contents,
            generation_config: params.config.generation.clone(),
            safety_settings: params.config.safety_settings.clone(),
            tools: params.config.tools.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate, if it has any
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let texts: Vec<&str> = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if texts.is_empty() {
            None
        } else {
            Some(texts.concat())
        }
    }
}

/// Minimal typed client for the generative-language API
#[derive(Clone)]
pub struct GenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GenAiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_http_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub async fn generate_content(
        &self,
        params: &GenerateContentParameters,
    ) -> Result<GenerateContentResponse, NodeError> {
        let url = format!(
            "{}/{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            API_VERSION,
            params.model
        );
        let body = GenerateContentRequest::from(params);

        let resp = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await?;
            return Err(NodeError::api(status.as_u16(), text));
        }

        Ok(resp.json().await?)
    }
}

/// Chat adapter backed by [`GenAiClient`]
pub struct SdkChatModel {
    client: GenAiClient,
    config: ChatModelConfig,
}

impl SdkChatModel {
    pub fn new(client: GenAiClient, config: ChatModelConfig) -> Self {
        Self { client, config }
    }

    /// Call parameters for one prompt. Search always uses the `googleSearch` tool here.
    pub fn parameters(&self, prompt: String) -> GenerateContentParameters {
        GenerateContentParameters {
            model: model_id(&self.config.model).to_string(),
            contents: vec![prompt],
            config: GenerateContentConfig {
                generation: self.config.generation.clone(),
                safety_settings: self.config.safety_settings.clone(),
                tools: self
                    .config
                    .enable_search
                    .then(|| vec![Tool::google_search()]),
            },
        }
    }
}

#[async_trait]
impl ChatModel for SdkChatModel {
    async fn call(&self, input: &Message) -> Result<String, NodeError> {
        let params = self.parameters(input.normalize());
        let response = self.client.generate_content(&params).await?;
        Ok(response.text().unwrap_or_default())
    }
}
