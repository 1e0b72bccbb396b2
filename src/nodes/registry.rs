// SPDX-License-Identifier: MIT

use super::{LmChatGoogleGeminiPlus, LmChatGoogleGeminiProxy, LmChatGoogleGeminiRest, NodeType};
use crate::genai::NodeError;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Node types keyed by their registered name
#[derive(Clone)]
pub struct NodeRegistry {
    nodes: Arc<RwLock<HashMap<String, Arc<dyn NodeType>>>>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self {
            nodes: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Registry preloaded with the Gemini chat nodes
    pub async fn with_builtin_nodes() -> Self {
        let registry = Self::new();
        registry.register(Arc::new(LmChatGoogleGeminiPlus::new())).await;
        registry.register(Arc::new(LmChatGoogleGeminiRest::new())).await;
        registry.register(Arc::new(LmChatGoogleGeminiProxy::new())).await;
        registry
    }

    pub async fn register(&self, node: Arc<dyn NodeType>) {
        let mut nodes = self.nodes.write().await;
        nodes.insert(node.description().name.clone(), node);
    }

    pub async fn get(&self, name: &str) -> Option<Arc<dyn NodeType>> {
        let nodes = self.nodes.read().await;
        nodes.get(name).cloned()
    }

    /// Like [`get`](Self::get) but failing with `UnknownNode`
    pub async fn require(&self, name: &str) -> Result<Arc<dyn NodeType>, NodeError> {
        self.get(name)
            .await
            .ok_or_else(|| NodeError::UnknownNode(name.to_string()))
    }

    /// Registered node names, sorted
    pub async fn names(&self) -> Vec<String> {
        let nodes = self.nodes.read().await;
        let mut names: Vec<String> = nodes.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
