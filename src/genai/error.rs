// SPDX-License-Identifier: MIT

//! Typed error handling for gemini-nodes-rs
//!
//! Every failure on the call path ends up here and is returned to the host
//! unchanged. Nothing is retried or recovered locally.

use thiserror::Error;

/// Top-level error type for node execution
#[derive(Debug, Error)]
pub enum NodeError {
    /// Credential set missing or incomplete
    #[error("Credentials error: {0}")]
    Credentials(String),

    /// A node parameter could not be read as the expected type
    #[error("Invalid parameter '{name}': {message}")]
    Parameter { name: String, message: String },

    /// Transport failure, kept as the original client error
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Non-2xx response from the remote API
    #[error("Gemini API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response body did not carry the expected fields
    #[error("Invalid response from Gemini: {0}")]
    InvalidResponse(String),

    /// Endpoint or proxy URL could not be built
    #[error(transparent)]
    Url(#[from] url::ParseError),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// No node type registered under this name
    #[error("Node type '{0}' not found")]
    UnknownNode(String),

    /// Node does not provide the requested load-options method
    #[error("Unknown load options method: {0}")]
    UnknownLoadOptions(String),
}

impl NodeError {
    /// Create a credentials error
    pub fn credentials(message: impl Into<String>) -> Self {
        Self::Credentials(message.into())
    }

    /// Create a parameter error
    pub fn parameter(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create an API error
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create an invalid response error
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }

    /// Returns true if the error came from the transport layer
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_))
    }
}
