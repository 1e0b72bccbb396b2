// SPDX-License-Identifier: MIT

//! Node parameters: the form fields every Gemini node shares and the
//! resolution of their stored values into a [`ChatModelConfig`].

use super::description::{NodeProperty, PropertyOption, PropertyType};
use super::SupplyDataFunctions;
use crate::genai::model::{ChatModelConfig, GenerationConfig};
use crate::genai::safety::{SafetyOption, SafetySetting, HARM_CATEGORIES, HARM_THRESHOLDS};
use crate::genai::NodeError;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

pub const DEFAULT_MODEL_NAME: &str = "models/gemini-1.0-pro";

fn safety_options(options: &[SafetyOption]) -> Vec<PropertyOption> {
    options
        .iter()
        .map(|o| PropertyOption::value(o.name, o.value, Some(o.description)))
        .collect()
}

/// `modelName` dropdown, filled from `GET /v1beta/models`
pub fn model_name_property() -> NodeProperty {
    NodeProperty::new("Model", "modelName", PropertyType::Options, DEFAULT_MODEL_NAME)
        .with_description(
            "The model which will generate the completion. <a href=\"https://developers.generativeai.google/api/rest/generativelanguage/models/list\">Learn more</a>.",
        )
        .with_type_options(json!({
            "loadOptions": {
                "routing": {
                    "request": { "method": "GET", "url": "/v1beta/models" },
                    "output": {
                        "postReceive": [
                            { "type": "rootProperty", "properties": { "property": "models" } },
                            {
                                "type": "filter",
                                "properties": { "pass": "={{ !$responseItem.name.includes('embedding') }}" }
                            },
                            {
                                "type": "setKeyValue",
                                "properties": {
                                    "name": "={{$responseItem.name}}",
                                    "value": "={{$responseItem.name}}",
                                    "description": "={{$responseItem.description}}"
                                }
                            },
                            { "type": "sort", "properties": { "key": "name" } }
                        ]
                    }
                }
            }
        }))
        .with_routing(json!({ "send": { "type": "body", "property": "model" } }))
}

pub fn enable_search_property() -> NodeProperty {
    NodeProperty::new("Enable Google Search", "enableSearch", PropertyType::Boolean, false)
        .with_description("Whether to enable Google Search capability")
}

pub fn debug_property() -> NodeProperty {
    NodeProperty::new("Debug", "debug", PropertyType::Boolean, false)
        .with_description("Whether to log requests, responses and errors of this node")
}

/// `options` collection: sampling parameters and safety settings
pub fn additional_options() -> NodeProperty {
    let safety_settings = NodeProperty::new(
        "Safety Settings",
        "safetySettings",
        PropertyType::FixedCollection,
        json!({
            "values": {
                "category": HARM_CATEGORIES[0].name,
                "threshold": HARM_THRESHOLDS[0].name
            }
        }),
    )
    .with_placeholder("Add Option")
    .with_type_options(json!({ "multipleValues": true }))
    .with_options(vec![PropertyOption::Group {
        name: "values".to_string(),
        display_name: "Values".to_string(),
        values: vec![
            NodeProperty::new(
                "Safety Category",
                "category",
                PropertyType::Options,
                "HARM_CATEGORY_UNSPECIFIED",
            )
            .with_description("The category of harmful content to block")
            .with_options(safety_options(HARM_CATEGORIES)),
            NodeProperty::new(
                "Safety Threshold",
                "threshold",
                PropertyType::Options,
                "HARM_BLOCK_THRESHOLD_UNSPECIFIED",
            )
            .with_description("The threshold of harmful content to block")
            .with_options(safety_options(HARM_THRESHOLDS)),
        ],
    }]);

    let fields = vec![
        NodeProperty::new("Maximum Number of Tokens", "maxOutputTokens", PropertyType::Number, 2048)
            .with_description("The maximum number of tokens to generate in the completion"),
        NodeProperty::new("Sampling Temperature", "temperature", PropertyType::Number, 0.4)
            .with_type_options(json!({ "maxValue": 1, "minValue": 0, "numberPrecision": 1 }))
            .with_description(
                "Controls randomness: Lowering results in less random completions. As the temperature approaches zero, the model will become deterministic and repetitive.",
            ),
        NodeProperty::new("Top K", "topK", PropertyType::Number, 32)
            .with_type_options(json!({ "maxValue": 40, "minValue": -1, "numberPrecision": 1 }))
            .with_description(
                "Used to remove \"long tail\" low probability responses. Defaults to -1, which disables it.",
            ),
        NodeProperty::new("Top P", "topP", PropertyType::Number, 1)
            .with_type_options(json!({ "maxValue": 1, "minValue": 0, "numberPrecision": 1 }))
            .with_description(
                "Controls diversity via nucleus sampling: 0.5 means half of all likelihood-weighted options are considered. We generally recommend altering this or temperature but not both.",
            ),
        safety_settings,
    ];

    NodeProperty::new("Options", "options", PropertyType::Collection, json!({}))
        .with_placeholder("Add Option")
        .with_description("Additional options to add")
        .with_options(
            fields
                .into_iter()
                .map(|p| PropertyOption::Property(Box::new(p)))
                .collect(),
        )
}

/// Read a parameter, falling back to `default` when it is unset or null
pub fn parameter<T: DeserializeOwned>(
    ctx: &dyn SupplyDataFunctions,
    name: &str,
    item_index: usize,
    default: T,
) -> Result<T, NodeError> {
    match ctx.get_node_parameter(name, item_index) {
        None | Some(Value::Null) => Ok(default),
        Some(value) => {
            serde_json::from_value(value).map_err(|e| NodeError::parameter(name, e.to_string()))
        }
    }
}

/// Sampling parameters. A missing `options` collection yields `defaults`;
/// a present one sets only the fields it carries, with their stored values
/// passed through as-is.
pub fn resolve_generation_config(
    ctx: &dyn SupplyDataFunctions,
    item_index: usize,
    defaults: &GenerationConfig,
) -> Result<GenerationConfig, NodeError> {
    parameter(ctx, "options", item_index, defaults.clone())
}

/// Safety settings from `options.safetySettings.values`; a single entry is
/// accepted in place of a list.
pub fn resolve_safety_settings(
    ctx: &dyn SupplyDataFunctions,
    item_index: usize,
) -> Result<Option<Vec<SafetySetting>>, NodeError> {
    const NAME: &str = "options.safetySettings.values";
    let settings = match ctx.get_node_parameter(NAME, item_index) {
        None | Some(Value::Null) => return Ok(None),
        Some(single @ Value::Object(_)) => serde_json::from_value(single).map(|s| vec![s]),
        Some(list) => serde_json::from_value(list),
    };
    settings
        .map(Some)
        .map_err(|e| NodeError::parameter(NAME, e.to_string()))
}

/// Resolve the full adapter configuration for one item
pub fn resolve_chat_config(
    ctx: &dyn SupplyDataFunctions,
    item_index: usize,
    defaults: &GenerationConfig,
) -> Result<ChatModelConfig, NodeError> {
    Ok(ChatModelConfig {
        model: parameter(ctx, "modelName", item_index, DEFAULT_MODEL_NAME.to_string())?,
        generation: resolve_generation_config(ctx, item_index, defaults)?,
        safety_settings: resolve_safety_settings(ctx, item_index)?,
        enable_search: parameter(ctx, "enableSearch", item_index, false)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::StaticHost;

    fn defaults() -> GenerationConfig {
        GenerationConfig::new(2048, 0.4, 32, 1.0)
    }

    #[test]
    fn test_missing_options_use_defaults() {
        let host = StaticHost::new(json!({ "modelName": "models/gemini-1.5-pro" }));
        let config = resolve_chat_config(&host, 0, &defaults()).unwrap();

        assert_eq!(config.model, "models/gemini-1.5-pro");
        assert_eq!(config.generation, defaults());
        assert_eq!(config.safety_settings, None);
        assert!(!config.enable_search);
    }

    #[test]
    fn test_empty_host_uses_default_model() {
        let host = StaticHost::default();
        let config = resolve_chat_config(&host, 0, &defaults()).unwrap();
        assert_eq!(config.model, DEFAULT_MODEL_NAME);
    }

    #[test]
    fn test_partial_options_only_set_given_fields() {
        let host = StaticHost::new(json!({ "options": { "temperature": 0.9 } }));
        let config = resolve_chat_config(&host, 0, &defaults()).unwrap();
        assert_eq!(
            config.generation,
            GenerationConfig {
                temperature: Some(json!(0.9)),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_integer_top_p_kept_as_stored() {
        let host = StaticHost::new(json!({
            "options": { "maxOutputTokens": 2048, "temperature": 0.4, "topK": 32, "topP": 1 }
        }));
        let config = resolve_generation_config(&host, 0, &GenerationConfig::default()).unwrap();
        assert_eq!(config.top_p, Some(json!(1)));
        assert_eq!(config.max_output_tokens, Some(json!(2048)));
    }

    #[test]
    fn test_fractional_and_string_options_not_rejected() {
        let host = StaticHost::new(json!({
            "options": { "maxOutputTokens": 1024.5, "temperature": "0.4", "topK": 32.5 }
        }));
        let config = resolve_chat_config(&host, 0, &defaults()).unwrap();
        assert_eq!(config.generation.max_output_tokens, Some(json!(1024.5)));
        assert_eq!(config.generation.temperature, Some(json!("0.4")));
        assert_eq!(config.generation.top_k, Some(json!(32.5)));
        assert_eq!(config.generation.top_p, None);
    }

    #[test]
    fn test_safety_settings_list_and_single() {
        let host = StaticHost::new(json!({
            "options": { "safetySettings": { "values": [
                { "category": "HARM_CATEGORY_HARASSMENT", "threshold": "BLOCK_NONE" },
                { "category": "HARM_CATEGORY_HATE_SPEECH", "threshold": "BLOCK_ONLY_HIGH" }
            ] } }
        }));
        let settings = resolve_safety_settings(&host, 0).unwrap().unwrap();
        assert_eq!(settings.len(), 2);
        assert_eq!(settings[1].threshold, "BLOCK_ONLY_HIGH");

        let host = StaticHost::new(json!({
            "options": { "safetySettings": { "values":
                { "category": "HARM_CATEGORY_HARASSMENT", "threshold": "BLOCK_NONE" }
            } }
        }));
        let settings = resolve_safety_settings(&host, 0).unwrap().unwrap();
        assert_eq!(
            settings,
            vec![SafetySetting::new("HARM_CATEGORY_HARASSMENT", "BLOCK_NONE")]
        );
    }

    #[test]
    fn test_malformed_parameter_reports_name() {
        let host = StaticHost::new(json!({ "enableSearch": "yes please" }));
        let err = resolve_chat_config(&host, 0, &defaults()).unwrap_err();
        assert!(matches!(err, NodeError::Parameter { ref name, .. } if name == "enableSearch"));
    }

    #[test]
    fn test_additional_options_schema() {
        let options = serde_json::to_value(additional_options()).unwrap();
        assert_eq!(options["type"], "collection");
        let names: Vec<&str> = options["options"]
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o["name"].as_str().unwrap())
            .collect();
        assert_eq!(
            names,
            vec!["maxOutputTokens", "temperature", "topK", "topP", "safetySettings"]
        );
        assert_eq!(options["options"][0]["default"], 2048);
        assert_eq!(options["options"][4]["type"], "fixedCollection");
        assert_eq!(
            options["options"][4]["options"][0]["values"][0]["options"][0]["value"],
            "HARM_CATEGORY_HARASSMENT"
        );
    }
}
