// SPDX-License-Identifier: MIT

//! Declarative node descriptions
//!
//! These types serialize to the camelCase JSON a host reads to register a
//! node and render its parameter form.

use super::GOOGLE_PALM_API;
use serde::Serialize;
use serde_json::{json, Value};

/// Connection kinds between AI nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ConnectionType {
    #[serde(rename = "ai_agent")]
    AiAgent,
    #[serde(rename = "ai_chain")]
    AiChain,
    #[serde(rename = "ai_document")]
    AiDocument,
    #[serde(rename = "ai_vectorStore")]
    AiVectorStore,
    #[serde(rename = "ai_retriever")]
    AiRetriever,
    #[serde(rename = "ai_languageModel")]
    AiLanguageModel,
}

impl ConnectionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionType::AiAgent => "ai_agent",
            ConnectionType::AiChain => "ai_chain",
            ConnectionType::AiDocument => "ai_document",
            ConnectionType::AiVectorStore => "ai_vectorStore",
            ConnectionType::AiRetriever => "ai_retriever",
            ConnectionType::AiLanguageModel => "ai_languageModel",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyType {
    #[default]
    String,
    Number,
    Boolean,
    Options,
    Collection,
    FixedCollection,
    Notice,
}

/// Entry of a property's `options` list
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyOption {
    /// Selectable value of an `options` property
    Value {
        name: String,
        value: Value,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    /// Nested property of a `collection`
    Property(Box<NodeProperty>),
    /// Named group of a `fixedCollection`
    Group {
        name: String,
        #[serde(rename = "displayName")]
        display_name: String,
        values: Vec<NodeProperty>,
    },
}

impl PropertyOption {
    pub fn value(
        name: impl Into<String>,
        value: impl Into<Value>,
        description: Option<&str>,
    ) -> Self {
        PropertyOption::Value {
            name: name.into(),
            value: value.into(),
            description: description.map(str::to_string),
        }
    }
}

/// One field of a node's parameter form
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeProperty {
    pub display_name: String,
    pub name: String,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    pub default: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<PropertyOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_options: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routing: Option<Value>,
}

impl NodeProperty {
    pub fn new(
        display_name: impl Into<String>,
        name: impl Into<String>,
        property_type: PropertyType,
        default: impl Into<Value>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            name: name.into(),
            property_type,
            default: default.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_options(mut self, options: Vec<PropertyOption>) -> Self {
        self.options = options;
        self
    }

    pub fn with_type_options(mut self, type_options: Value) -> Self {
        self.type_options = Some(type_options);
        self
    }

    pub fn with_routing(mut self, routing: Value) -> Self {
        self.routing = Some(routing);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeDefaults {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CredentialRequirement {
    pub name: String,
    pub required: bool,
}

/// Everything a host needs to register a node type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeTypeDescription {
    pub display_name: String,
    pub name: String,
    pub icon: String,
    pub group: Vec<String>,
    pub version: u32,
    pub description: String,
    pub defaults: NodeDefaults,
    pub codex: Value,
    pub inputs: Vec<ConnectionType>,
    pub outputs: Vec<ConnectionType>,
    pub output_names: Vec<String>,
    pub credentials: Vec<CredentialRequirement>,
    pub request_defaults: Value,
    pub properties: Vec<NodeProperty>,
}

impl NodeTypeDescription {
    /// Property by name, searching top-level properties only
    pub fn property(&self, name: &str) -> Option<&NodeProperty> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// Common description shape shared by every Gemini chat node
pub fn gemini_chat_description(
    display_name: &str,
    name: &str,
    description: &str,
    properties: Vec<NodeProperty>,
) -> NodeTypeDescription {
    NodeTypeDescription {
        display_name: display_name.to_string(),
        name: name.to_string(),
        icon: "file:google.svg".to_string(),
        group: vec!["transform".to_string()],
        version: 1,
        description: description.to_string(),
        defaults: NodeDefaults {
            name: "Google Gemini Chat Model".to_string(),
        },
        codex: json!({
            "categories": ["AI"],
            "subcategories": {
                "AI": ["Language Models", "Root Nodes"],
                "Language Models": ["Chat Models (Recommended)"]
            }
        }),
        inputs: vec![],
        outputs: vec![ConnectionType::AiLanguageModel],
        output_names: vec!["Model".to_string()],
        credentials: vec![CredentialRequirement {
            name: GOOGLE_PALM_API.to_string(),
            required: true,
        }],
        request_defaults: json!({
            "ignoreHttpStatusErrors": true,
            "baseURL": "={{ $credentials.host }}"
        }),
        properties,
    }
}
