// SPDX-License-Identifier: MIT

//! Google Gemini Chat Model Plus - SDK-style node

use super::description::{gemini_chat_description, ConnectionType, NodeTypeDescription};
use super::options::{
    additional_options, enable_search_property, model_name_property, resolve_chat_config,
};
use super::shared_fields::connection_hint_notice;
use super::{google_palm_credentials, NodeType, SupplyData, SupplyDataFunctions};
use crate::genai::model::sdk::{GenAiClient, SdkChatModel};
use crate::genai::model::GenerationConfig;
use crate::genai::proxy::build_http_client;
use crate::genai::NodeError;
use async_trait::async_trait;
use std::sync::Arc;

pub const NODE_NAME: &str = "lmChatGoogleGeminiPlus";

/// Sampling parameters used when the `options` collection is absent
pub fn default_generation_config() -> GenerationConfig {
    GenerationConfig::new(1024, 0.7, 40, 0.9)
}

pub struct LmChatGoogleGeminiPlus {
    description: NodeTypeDescription,
}

impl LmChatGoogleGeminiPlus {
    pub fn new() -> Self {
        let properties = vec![
            connection_hint_notice(&[ConnectionType::AiChain, ConnectionType::AiAgent]),
            model_name_property(),
            enable_search_property(),
            additional_options(),
        ];
        Self {
            description: gemini_chat_description(
                "Google Gemini Chat Model Plus",
                NODE_NAME,
                "Chat Model Google Gemini",
                properties,
            ),
        }
    }
}

impl Default for LmChatGoogleGeminiPlus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NodeType for LmChatGoogleGeminiPlus {
    fn description(&self) -> &NodeTypeDescription {
        &self.description
    }

    async fn supply_data(
        &self,
        ctx: &dyn SupplyDataFunctions,
        item_index: usize,
    ) -> Result<SupplyData, NodeError> {
        let credentials = google_palm_credentials(ctx).await?;
        let config = resolve_chat_config(ctx, item_index, &default_generation_config())?;

        let client = GenAiClient::new(credentials.api_key.as_str())
            .with_base_url(credentials.base_url())
            .with_http_client(build_http_client(None)?);

        Ok(SupplyData {
            response: Arc::new(SdkChatModel::new(client, config)),
        })
    }
}
