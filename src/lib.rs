// SPDX-License-Identifier: MIT

//! Gemini chat-model nodes for workflow-automation hosts.
//!
//! - [genai] - message normalization, request construction and the Gemini clients
//! - [nodes] - the host plugin contract and the node variants built on it

pub mod genai;
pub mod nodes;
