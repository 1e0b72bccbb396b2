// SPDX-License-Identifier: MIT

//! Model listing for the host's `modelName` dropdown

use super::{NodeError, API_VERSION};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteModel {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<RemoteModel>,
}

/// One selectable dropdown entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelOption {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Fetch `GET /v1beta/models` and turn it into dropdown options
pub async fn list_models(
    client: &Client,
    base_url: &str,
    api_key: &str,
) -> Result<Vec<ModelOption>, NodeError> {
    let mut url = Url::parse(&format!(
        "{}/{}/models",
        base_url.trim_end_matches('/'),
        API_VERSION
    ))?;
    url.query_pairs_mut().append_pair("key", api_key);

    let resp = client.get(url).send().await?;
    let status = resp.status();
    if !status.is_success() {
        let text = resp.text().await?;
        return Err(NodeError::api(status.as_u16(), text));
    }

    let body: ListModelsResponse = resp.json().await?;
    Ok(to_options(body.models))
}

/// Drop embedding models, map to options and sort by name
pub fn to_options(models: Vec<RemoteModel>) -> Vec<ModelOption> {
    let mut options: Vec<ModelOption> = models
        .into_iter()
        .filter(|m| !m.name.contains("embedding"))
        .map(|m| ModelOption {
            value: m.name.clone(),
            name: m.name,
            description: m.description,
        })
        .collect();
    options.sort_by(|a, b| a.name.cmp(&b.name));
    options
}
