// SPDX-License-Identifier: MIT

//! In-memory host used by the CLI and tests
//!
//! Parameters come from a JSON/YAML document. A top-level array holds one
//! parameter object per item; any other document applies to every item.

use super::SupplyDataFunctions;
use crate::genai::NodeError;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct StaticHost {
    parameters: Value,
    credentials: HashMap<String, Value>,
}

impl StaticHost {
    pub fn new(parameters: Value) -> Self {
        Self {
            parameters,
            credentials: HashMap::new(),
        }
    }

    /// Parse parameters from YAML (JSON is accepted too)
    pub fn from_yaml_str(content: &str) -> Result<Self, NodeError> {
        let parameters: Value = serde_yaml::from_str(content)?;
        Ok(Self::new(parameters))
    }

    /// Parse parameters from JSON
    pub fn from_json_str(content: &str) -> Result<Self, NodeError> {
        let parameters: Value = serde_json::from_str(content)?;
        Ok(Self::new(parameters))
    }

    /// Load parameters from a `.json` or YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, NodeError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_yaml_str(&content),
        }
    }

    pub fn with_credentials(mut self, name: impl Into<String>, value: Value) -> Self {
        self.credentials.insert(name.into(), value);
        self
    }

    /// Set a top-level parameter on the shared (non per-item) document
    pub fn set_parameter(&mut self, name: impl Into<String>, value: Value) {
        if !self.parameters.is_object() {
            self.parameters = Value::Object(Map::new());
        }
        if let Value::Object(map) = &mut self.parameters {
            map.insert(name.into(), value);
        }
    }

    fn item_parameters(&self, item_index: usize) -> Option<&Value> {
        match &self.parameters {
            Value::Array(items) => items.get(item_index),
            other => Some(other),
        }
    }
}

#[async_trait]
impl SupplyDataFunctions for StaticHost {
    async fn get_credentials(&self, name: &str) -> Result<Value, NodeError> {
        self.credentials
            .get(name)
            .cloned()
            .ok_or_else(|| NodeError::credentials(format!("no credentials named '{}'", name)))
    }

    fn get_node_parameter(&self, name: &str, item_index: usize) -> Option<Value> {
        name.split('.')
            .try_fold(self.item_parameters(item_index)?, |value, key| value.get(key))
            .cloned()
    }
}
