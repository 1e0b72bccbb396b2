// SPDX-License-Identifier: MIT

//! REST Gemini nodes
//!
//! Both nodes hand-build the generateContent body and pick the search tool
//! dialect from the model version. The proxy node additionally routes calls
//! through `HTTPS_PROXY`/`HTTP_PROXY` and exposes a `debug` toggle that turns
//! on the node logger.

use super::description::{gemini_chat_description, ConnectionType, NodeTypeDescription};
use super::options::{
    additional_options, debug_property, enable_search_property, model_name_property, parameter,
    resolve_chat_config,
};
use super::shared_fields::connection_hint_notice;
use super::{google_palm_credentials, NodeType, SupplyData, SupplyDataFunctions};
use crate::genai::logger::{LogFacadeSink, LogSink, NodeLogger};
use crate::genai::model::rest::RestChatModel;
use crate::genai::model::GenerationConfig;
use crate::genai::proxy::{build_http_client, proxy_url_from_env, redact_proxy_url};
use crate::genai::NodeError;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

pub const REST_NODE_NAME: &str = "lmChatGoogleGeminiRest";
pub const PROXY_NODE_NAME: &str = "lmChatGoogleGeminiProxy";

/// Sampling parameters used when the `options` collection is absent
pub fn default_generation_config() -> GenerationConfig {
    GenerationConfig::new(2048, 0.4, 32, 1.0)
}

async fn supply_rest(
    ctx: &dyn SupplyDataFunctions,
    item_index: usize,
    proxy: Option<String>,
    logger: NodeLogger,
) -> Result<SupplyData, NodeError> {
    let credentials = google_palm_credentials(ctx).await?;
    let config = resolve_chat_config(ctx, item_index, &default_generation_config())?;

    logger.debug(&[
        "Supplying chat model:".into(),
        json!({
            "model": config.model,
            "generationConfig": config.generation,
            "safetySettings": config.safety_settings,
            "enableSearch": config.enable_search,
            "proxy": proxy.as_deref().map(redact_proxy_url),
        }),
    ]);

    let client = build_http_client(proxy.as_deref())?;
    let base_url = credentials.base_url().to_string();
    let model = RestChatModel::new(client, credentials.api_key, base_url, config, logger);

    Ok(SupplyData {
        response: Arc::new(model),
    })
}

/// Google Gemini Chat Model (REST)
pub struct LmChatGoogleGeminiRest {
    description: NodeTypeDescription,
}

impl LmChatGoogleGeminiRest {
    pub fn new() -> Self {
        let properties = vec![
            connection_hint_notice(&[ConnectionType::AiChain, ConnectionType::AiAgent]),
            model_name_property(),
            enable_search_property(),
            additional_options(),
        ];
        Self {
            description: gemini_chat_description(
                "Google Gemini Chat Model REST",
                REST_NODE_NAME,
                "Chat Model Google Gemini over the REST API",
                properties,
            ),
        }
    }
}

impl Default for LmChatGoogleGeminiRest {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NodeType for LmChatGoogleGeminiRest {
    fn description(&self) -> &NodeTypeDescription {
        &self.description
    }

    async fn supply_data(
        &self,
        ctx: &dyn SupplyDataFunctions,
        item_index: usize,
    ) -> Result<SupplyData, NodeError> {
        supply_rest(ctx, item_index, None, NodeLogger::disabled(REST_NODE_NAME)).await
    }
}

/// Where the proxy node takes its proxy URL from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxySource {
    /// `HTTPS_PROXY`, then `HTTP_PROXY`, read at supply time
    Environment,
    /// A fixed URL, or no proxy
    Fixed(Option<String>),
}

impl ProxySource {
    fn resolve(&self) -> Option<String> {
        match self {
            ProxySource::Environment => proxy_url_from_env(),
            ProxySource::Fixed(url) => url.clone(),
        }
    }
}

/// Google Gemini Chat Model (REST) with proxy support and debug logging
pub struct LmChatGoogleGeminiProxy {
    description: NodeTypeDescription,
    proxy: ProxySource,
    log_sink: Arc<dyn LogSink>,
}

impl LmChatGoogleGeminiProxy {
    pub fn new() -> Self {
        let properties = vec![
            connection_hint_notice(&[ConnectionType::AiChain, ConnectionType::AiAgent]),
            model_name_property(),
            enable_search_property(),
            debug_property(),
            additional_options(),
        ];
        Self {
            description: gemini_chat_description(
                "Google Gemini Chat Model Proxy",
                PROXY_NODE_NAME,
                "Chat Model Google Gemini with proxy support",
                properties,
            ),
            proxy: ProxySource::Environment,
            log_sink: Arc::new(LogFacadeSink),
        }
    }

    /// Use a fixed proxy instead of the environment
    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = ProxySource::Fixed(proxy);
        self
    }

    /// Send debug output somewhere other than the `log` facade
    pub fn with_log_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.log_sink = sink;
        self
    }
}

impl Default for LmChatGoogleGeminiProxy {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NodeType for LmChatGoogleGeminiProxy {
    fn description(&self) -> &NodeTypeDescription {
        &self.description
    }

    async fn supply_data(
        &self,
        ctx: &dyn SupplyDataFunctions,
        item_index: usize,
    ) -> Result<SupplyData, NodeError> {
        let debug = parameter(ctx, "debug", item_index, false)?;
        let logger = NodeLogger::with_sink(PROXY_NODE_NAME, debug, self.log_sink.clone());

        let result = supply_rest(ctx, item_index, self.proxy.resolve(), logger.clone()).await;
        if let Err(e) = &result {
            logger.error(&["Failed to supply chat model:".into(), e.to_string().into()]);
        }
        result
    }
}
