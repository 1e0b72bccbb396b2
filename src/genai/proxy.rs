// SPDX-License-Identifier: MIT

//! Outbound HTTP client construction
//!
//! The proxy-aware node routes its calls through `HTTPS_PROXY` (falling back
//! to `HTTP_PROXY`). Every other client is built with proxying disabled so
//! the environment never changes where a plain node sends its traffic.

use super::NodeError;
use reqwest::{Client, Proxy};
use std::env;
use url::Url;

/// Environment variables consulted for a proxy, in priority order
pub const PROXY_ENV_VARS: [&str; 2] = ["HTTPS_PROXY", "HTTP_PROXY"];

/// Resolve the proxy URL from the process environment
pub fn proxy_url_from_env() -> Option<String> {
    proxy_url_from(|key| env::var(key).ok())
}

/// Resolve the proxy URL through an arbitrary lookup; blank values are skipped
pub fn proxy_url_from<F>(lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    PROXY_ENV_VARS
        .iter()
        .find_map(|key| lookup(key).filter(|value| !value.trim().is_empty()))
}

/// Build the client used for API calls, routed through `proxy` when given
pub fn build_http_client(proxy: Option<&str>) -> Result<Client, NodeError> {
    let builder = Client::builder();
    let builder = match proxy {
        Some(url) => builder.proxy(Proxy::all(url)?),
        None => builder.no_proxy(),
    };
    Ok(builder.build()?)
}

/// Proxy URL safe to log: username and password are removed
pub fn redact_proxy_url(proxy: &str) -> String {
    match Url::parse(proxy) {
        Ok(mut url) => {
            let _ = url.set_username("");
            let _ = url.set_password(None);
            url.to_string()
        }
        Err(_) => "<unparseable proxy url>".to_string(),
    }
}
