// SPDX-License-Identifier: MIT

//! Properties shared across AI nodes

use super::description::{ConnectionType, NodeProperty, PropertyType};
use serde_json::json;

/// Creator-view connection string and label for a connection type.
/// Root views (agents, chains) share the empty connection string.
fn hint_target(connection_type: ConnectionType) -> Option<(&'static str, &'static str)> {
    match connection_type {
        ConnectionType::AiAgent => Some(("", "AI Agent")),
        ConnectionType::AiChain => Some(("", "AI Chain")),
        ConnectionType::AiDocument => Some(("ai_document", "Document Loader")),
        ConnectionType::AiVectorStore => Some(("ai_vectorStore", "Vector Store")),
        ConnectionType::AiRetriever => Some(("ai_retriever", "Vector Store Retriever")),
        ConnectionType::AiLanguageModel => None,
    }
}

fn article(next_word: &str) -> &'static str {
    match next_word.chars().next() {
        Some(c) if "aeiouAEIOU".contains(c) => "an",
        _ => "a",
    }
}

fn connection_parameter(connection: &str) -> String {
    if connection.is_empty() {
        "data-action-parameter-creatorview='AI'".to_string()
    } else {
        format!("data-action-parameter-connectiontype='{}'", connection)
    }
}

/// Lowercase a label but keep a leading "AI" capitalized
fn lowercase_label(label: &str) -> String {
    let lower = label.to_lowercase();
    match lower.strip_prefix("ai ") {
        Some(rest) => format!("AI {}", rest),
        None => lower,
    }
}

/// Notice telling the user which node this one must be connected to
pub fn connection_hint_notice(connection_types: &[ConnectionType]) -> NodeProperty {
    // Group labels by connection string, keeping first-seen order
    let mut grouped: Vec<(&str, Vec<&str>)> = Vec::new();
    for &connection_type in connection_types {
        let Some((connection, label)) = hint_target(connection_type) else {
            log::warn!(
                "No connection hint for connection type {}",
                connection_type.as_str()
            );
            continue;
        };
        match grouped.iter_mut().find(|(c, _)| *c == connection) {
            Some((_, labels)) => labels.push(label),
            None => grouped.push((connection, vec![label])),
        }
    }

    let display_name = match grouped.as_slice() {
        [(connection, labels)] => format!(
            "This node must be connected to {} {}. <a data-action='openSelectiveNodeCreator' {}>Insert one</a>",
            article(labels[0]),
            lowercase_label(labels[0]),
            connection_parameter(connection)
        ),
        groups => {
            let links: Vec<String> = groups
                .iter()
                .map(|(connection, labels)| {
                    let locale = if labels.len() > 1 {
                        format!("{} {}", article(labels[0]), labels.join(" or "))
                    } else {
                        format!("{} {}", article(labels[0]), labels[0])
                    };
                    format!(
                        "<a class=\"test\" data-action='openSelectiveNodeCreator' {}>{}</a>",
                        connection_parameter(connection),
                        locale
                    )
                })
                .collect();
            format!("This node needs to be connected to {}.", links.join(" or "))
        }
    };

    NodeProperty::new(display_name, "notice", PropertyType::Notice, "")
        .with_type_options(json!({ "containerClass": "ndv-connection-hint-notice" }))
}
