// SPDX-License-Identifier: MIT

//! Gemini client layer
//!
//! Everything a node needs between "the host handed me a message" and
//! "here is the generated text":
//! - [message] - polymorphic message input and its normalization
//! - [search] - search tool dialect selection from the model version
//! - [safety] - safety settings and the known category/threshold names
//! - [model] - the `ChatModel` trait with REST and SDK-style implementations
//! - [listing] - model listing for the host's option loader
//! - [logger] - conditional per-node logging shim
//! - [proxy] - outbound proxy resolution from the environment

pub mod error;
pub mod listing;
pub mod logger;
pub mod message;
pub mod model;
pub mod proxy;
pub mod safety;
pub mod search;

pub use error::NodeError;
pub use message::Message;

/// Production endpoint of the generative-language API
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// API version path segment used for every request
pub const API_VERSION: &str = "v1beta";
