// SPDX-License-Identifier: MIT

//! Search tool selection
//!
//! The generateContent tool schema changed across model generations: 2.x
//! models take `google_search`, 1.5 models take `google_search_retrieval`.
//! The dialect is picked from the version embedded in the model id.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};

static GEMINI_VERSION: Lazy<Regex> = Lazy::new(|| {
    // Static pattern, always compiles
    Regex::new(r"gemini-(\d+)\.(\d+)").unwrap()
});

/// Major/minor version parsed from a model id such as `models/gemini-1.5-pro`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelVersion {
    pub major: u32,
    pub minor: u32,
}

impl ModelVersion {
    /// Parse the first `gemini-<major>.<minor>` occurrence in the model id
    pub fn parse(model: &str) -> Option<Self> {
        let caps = GEMINI_VERSION.captures(model)?;
        let major = caps.get(1)?.as_str().parse().ok()?;
        let minor = caps.get(2)?.as_str().parse().ok()?;
        Some(Self { major, minor })
    }
}

/// Search tool dialect sent in the REST `tools` array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchTool {
    /// `{"google_search": {}}` for 2.x and later
    GoogleSearch,
    /// `{"google_search_retrieval": {}}` for 1.5 and later 1.x
    GoogleSearchRetrieval,
    /// `{}` for anything else. The API ignores it, so search is silently off.
    Unrecognized,
}

impl SearchTool {
    /// Pick the dialect for a model version; `None` versions fall through to `Unrecognized`
    pub fn for_version(version: Option<ModelVersion>) -> Self {
        match version {
            Some(v) if v.major >= 2 => SearchTool::GoogleSearch,
            Some(v) if v.major == 1 && v.minor >= 5 => SearchTool::GoogleSearchRetrieval,
            _ => SearchTool::Unrecognized,
        }
    }

    /// REST tool object for this dialect
    pub fn to_rest_json(self) -> Value {
        match self {
            SearchTool::GoogleSearch => json!({ "google_search": {} }),
            SearchTool::GoogleSearchRetrieval => json!({ "google_search_retrieval": {} }),
            SearchTool::Unrecognized => json!({}),
        }
    }
}

/// Decide the search tool for a request. Returns `None` when search is off,
/// in which case the request carries no `tools` field at all.
pub fn select_search_tool(model: &str, enable_search: bool) -> Option<SearchTool> {
    if !enable_search {
        return None;
    }

    Some(SearchTool::for_version(ModelVersion::parse(model)))
}
