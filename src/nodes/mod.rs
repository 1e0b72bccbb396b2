// SPDX-License-Identifier: MIT

//! Node module - the host plugin contract and the Gemini chat nodes
//!
//! A host drives a node in two ways: it reads the node's
//! [`NodeTypeDescription`] to render the parameter form, and it calls
//! [`NodeType::supply_data`] to obtain a chat adapter for its chains/agents.
//! Node variants:
//! - `LmChatGoogleGeminiPlus` - SDK-style client
//! - `LmChatGoogleGeminiRest` - raw REST client
//! - `LmChatGoogleGeminiProxy` - raw REST client with env proxy and debug logging

pub mod description;
pub mod gemini_plus;
pub mod gemini_rest;
pub mod host;
pub mod options;
pub mod registry;
pub mod shared_fields;

pub use description::NodeTypeDescription;
pub use gemini_plus::LmChatGoogleGeminiPlus;
pub use gemini_rest::{LmChatGoogleGeminiProxy, LmChatGoogleGeminiRest};
pub use host::StaticHost;
pub use registry::NodeRegistry;

use crate::genai::listing::{list_models, ModelOption};
use crate::genai::model::ChatModel;
use crate::genai::proxy::build_http_client;
use crate::genai::{NodeError, DEFAULT_API_BASE_URL};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Name of the credential set every Gemini node requires
pub const GOOGLE_PALM_API: &str = "googlePalmApi";

/// Contents of the `googlePalmApi` credential set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GooglePalmApiCredentials {
    pub api_key: String,
    /// Base URL override, e.g. a regional or self-hosted gateway
    #[serde(default)]
    pub host: Option<String>,
}

impl GooglePalmApiCredentials {
    /// API base URL: the credential host when set, else the public endpoint
    pub fn base_url(&self) -> &str {
        self.host
            .as_deref()
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .unwrap_or(DEFAULT_API_BASE_URL)
    }
}

/// What `supply_data` hands back to the host
pub struct SupplyData {
    pub response: Arc<dyn ChatModel>,
}

/// Host-side accessors available while supplying data
#[async_trait]
pub trait SupplyDataFunctions: Send + Sync {
    /// Decrypted credential set by name
    async fn get_credentials(&self, name: &str) -> Result<Value, NodeError>;

    /// Parameter value for an item; dotted names address nested values
    fn get_node_parameter(&self, name: &str, item_index: usize) -> Option<Value>;
}

/// Core trait for node types
#[async_trait]
pub trait NodeType: Send + Sync {
    fn description(&self) -> &NodeTypeDescription;

    /// Build the chat adapter for one item
    async fn supply_data(
        &self,
        ctx: &dyn SupplyDataFunctions,
        item_index: usize,
    ) -> Result<SupplyData, NodeError>;

    /// Fill a dynamic dropdown. Every Gemini node lists models for `modelName`.
    async fn load_options(
        &self,
        method: &str,
        ctx: &dyn SupplyDataFunctions,
    ) -> Result<Vec<ModelOption>, NodeError> {
        match method {
            "modelName" => {
                let credentials = google_palm_credentials(ctx).await?;
                let client = build_http_client(None)?;
                list_models(&client, credentials.base_url(), &credentials.api_key).await
            }
            other => Err(NodeError::UnknownLoadOptions(other.to_string())),
        }
    }
}

/// Resolve and parse the `googlePalmApi` credential set
pub async fn google_palm_credentials(
    ctx: &dyn SupplyDataFunctions,
) -> Result<GooglePalmApiCredentials, NodeError> {
    let raw = ctx.get_credentials(GOOGLE_PALM_API).await?;
    serde_json::from_value(raw)
        .map_err(|e| NodeError::credentials(format!("{}: {}", GOOGLE_PALM_API, e)))
}
