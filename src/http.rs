//! HTTP client utilities
//!
//! Builds the reqwest::Client used by the platform adapter, with a fixed
//! request timeout and proxy selection from the usual environment variables

use crate::error::AppError;
use reqwest::{Client, Proxy};
use std::time::Duration;
use url::Url;

/// Per-request timeout for every platform call
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Build a reqwest Client with the given timeout and user agent
///
/// Recognized env vars:
/// - HTTP_PROXY / http_proxy
/// - HTTPS_PROXY / https_proxy
/// - ALL_PROXY / all_proxy
/// - NO_PROXY / no_proxy
pub fn build_client(timeout: Duration, user_agent: &str) -> Result<Client, AppError> {
    let mut builder = Client::builder().timeout(timeout).user_agent(user_agent);

    let all_proxy = getenv_first(&["ALL_PROXY", "all_proxy"]);
    let https_proxy = getenv_first(&["HTTPS_PROXY", "https_proxy"]).or_else(|| all_proxy.clone());
    let http_proxy = getenv_first(&["HTTP_PROXY", "http_proxy"]).or(all_proxy);

    if https_proxy.is_some() || http_proxy.is_some() {
        let rules = parse_no_proxy(&getenv_first(&["NO_PROXY", "no_proxy"]).unwrap_or_default());
        let proxy = Proxy::custom(move |url: &Url| {
            if should_bypass_proxy(url.host_str().unwrap_or(""), &rules) {
                return None;
            }
            match url.scheme() {
                "https" => https_proxy.clone().or_else(|| http_proxy.clone()),
                "http" => http_proxy.clone().or_else(|| https_proxy.clone()),
                _ => None,
            }
        });
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))
}

fn getenv_first(keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| std::env::var(k).ok())
        .find(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, PartialEq)]
enum NoProxyRule {
    Wildcard,
    /// Host or any subdomain
    Domain(String),
    Exact(String),
}

fn parse_no_proxy(val: &str) -> Vec<NoProxyRule> {
    val.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|token| {
            if token == "*" {
                return NoProxyRule::Wildcard;
            }
            let t = token.trim_start_matches('.').to_ascii_lowercase();
            if t == "localhost" || t.parse::<std::net::IpAddr>().is_ok() {
                NoProxyRule::Exact(t)
            } else {
                NoProxyRule::Domain(t)
            }
        })
        .collect()
}

fn should_bypass_proxy(host: &str, rules: &[NoProxyRule]) -> bool {
    if host.is_empty() {
        return false;
    }
    let host = host.to_ascii_lowercase();
    rules.iter().any(|rule| match rule {
        NoProxyRule::Wildcard => true,
        NoProxyRule::Exact(ex) => host == *ex,
        NoProxyRule::Domain(suffix) => host == *suffix || host.ends_with(&format!(".{}", suffix)),
    })
}
