//! Request header injection for the cookie session
//!
//! Every call carries the session cookies, the CSRF token and the headers the
//! web app sends. Caller headers are merged in underneath, except
//! `content-type`, which always comes from the caller.

use crate::auth::SessionBundle;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::warn;

/// Public bearer token embedded in the x.com web app
pub const WEB_BEARER_TOKEN: &str = "AAAAAAAAAAAAAAAAAAAAANRILgAAAAAAnNwIzUejRCOuH5E6I8xnZz4puTs%3D1Zv7ttfk8LF81IUq16cHjhLTvJu4FA33AGWWjCpTnA";

pub type HeaderPairs = Vec<(String, String)>;

/// Headers injected into every request made with `bundle`
pub fn session_headers(bundle: &SessionBundle, language: &str) -> HeaderPairs {
    let mut headers: HeaderPairs = vec![
        ("authorization".into(), format!("Bearer {}", WEB_BEARER_TOKEN)),
        ("content-type".into(), "application/json".into()),
        ("x-twitter-auth-type".into(), "OAuth2Session".into()),
        ("x-twitter-active-user".into(), "yes".into()),
        ("x-twitter-client-language".into(), language.to_string()),
        ("referer".into(), "https://x.com/".into()),
        ("cookie".into(), bundle.cookie_header()),
    ];
    if let Some(csrf) = bundle.csrf_token() {
        headers.push(("x-csrf-token".into(), csrf.to_string()));
    }

    // Captured headers fill gaps only
    for (name, value) in &bundle.headers {
        if !contains(&headers, name) {
            headers.push((name.to_ascii_lowercase(), value.clone()));
        }
    }
    headers
}

/// Combine injected headers with the caller's
pub fn merge_headers(injected: &[(String, String)], caller: &[(String, String)]) -> HeaderPairs {
    let mut merged: HeaderPairs = injected.to_vec();
    for (name, value) in caller {
        if name.eq_ignore_ascii_case("content-type") {
            merged.retain(|(n, _)| !n.eq_ignore_ascii_case("content-type"));
            merged.push((name.clone(), value.clone()));
        } else if !contains(&merged, name) {
            merged.push((name.clone(), value.clone()));
        }
    }
    merged
}

/// Convert to a HeaderMap, dropping anything that is not valid HTTP
pub fn to_header_map(pairs: &[(String, String)]) -> HeaderMap {
    let mut map = HeaderMap::with_capacity(pairs.len());
    for (name, value) in pairs {
        let parsed_name = HeaderName::from_bytes(name.trim().as_bytes());
        let parsed_value = HeaderValue::from_str(value.trim());
        match (parsed_name, parsed_value) {
            (Ok(n), Ok(v)) => {
                map.insert(n, v);
            }
            _ => warn!("Dropping malformed header {:?}", name),
        }
    }
    map
}

fn contains(headers: &[(String, String)], name: &str) -> bool {
    headers.iter().any(|(n, _)| n.eq_ignore_ascii_case(name))
}
