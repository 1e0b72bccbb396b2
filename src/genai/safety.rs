// SPDX-License-Identifier: MIT

//! Safety settings
//!
//! Category and threshold are kept as the raw strings the host stored, so
//! values the API learns later (or typos) reach it unchanged.

use serde::{Deserialize, Serialize};

/// One (harm category, block threshold) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySetting {
    pub category: String,
    pub threshold: String,
}

impl SafetySetting {
    pub fn new(category: impl Into<String>, threshold: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            threshold: threshold.into(),
        }
    }
}

/// Selectable entry for the safety settings dropdowns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafetyOption {
    pub name: &'static str,
    pub value: &'static str,
    pub description: &'static str,
}

pub const HARM_CATEGORIES: &[SafetyOption] = &[
    SafetyOption {
        name: "HARM_CATEGORY_HARASSMENT",
        value: "HARM_CATEGORY_HARASSMENT",
        description: "Harassment content",
    },
    SafetyOption {
        name: "HARM_CATEGORY_HATE_SPEECH",
        value: "HARM_CATEGORY_HATE_SPEECH",
        description: "Hate speech and content",
    },
    SafetyOption {
        name: "HARM_CATEGORY_SEXUALLY_EXPLICIT",
        value: "HARM_CATEGORY_SEXUALLY_EXPLICIT",
        description: "Sexually explicit content",
    },
    SafetyOption {
        name: "HARM_CATEGORY_DANGEROUS_CONTENT",
        value: "HARM_CATEGORY_DANGEROUS_CONTENT",
        description: "Dangerous content",
    },
    SafetyOption {
        name: "HARM_CATEGORY_CIVIC_INTEGRITY",
        value: "HARM_CATEGORY_CIVIC_INTEGRITY",
        description: "Content that may be used to harm civic integrity",
    },
];

pub const HARM_THRESHOLDS: &[SafetyOption] = &[
    SafetyOption {
        name: "HARM_BLOCK_THRESHOLD_UNSPECIFIED",
        value: "HARM_BLOCK_THRESHOLD_UNSPECIFIED",
        description: "Threshold is unspecified",
    },
    SafetyOption {
        name: "BLOCK_LOW_AND_ABOVE",
        value: "BLOCK_LOW_AND_ABOVE",
        description: "Content with NEGLIGIBLE will be allowed",
    },
    SafetyOption {
        name: "BLOCK_MEDIUM_AND_ABOVE",
        value: "BLOCK_MEDIUM_AND_ABOVE",
        description: "Content with NEGLIGIBLE and LOW will be allowed",
    },
    SafetyOption {
        name: "BLOCK_ONLY_HIGH",
        value: "BLOCK_ONLY_HIGH",
        description: "Content with NEGLIGIBLE, LOW, and MEDIUM will be allowed",
    },
    SafetyOption {
        name: "BLOCK_NONE",
        value: "BLOCK_NONE",
        description: "All content will be allowed",
    },
    SafetyOption {
        name: "OFF",
        value: "OFF",
        description: "Turn off the safety filter",
    },
];
