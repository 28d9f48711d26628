//! Session bundle: the cookie and header material of one logged-in account

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

pub const AUTH_TOKEN_COOKIE: &str = "auth_token";
pub const CSRF_COOKIE: &str = "ct0";
/// Carries the viewer's numeric id as `u%3D<id>`
pub const TWID_COOKIE: &str = "twid";

#[derive(Debug, Error, PartialEq)]
pub enum BundleError {
    #[error("session bundle is missing the {0} cookie")]
    MissingCookie(&'static str),
    #[error("session bundle is not valid JSON: {0}")]
    Malformed(String),
}

/// Serialized credential material written to `session.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionBundle {
    /// Screen name confirmed by the last successful probe
    #[serde(default)]
    pub account: Option<String>,
    pub cookies: BTreeMap<String, String>,
    /// Extra headers captured alongside the cookies
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    pub created_at: DateTime<Utc>,
}

impl SessionBundle {
    pub fn new(cookies: BTreeMap<String, String>, headers: BTreeMap<String, String>) -> Self {
        Self {
            account: None,
            cookies,
            headers,
            created_at: Utc::now(),
        }
    }

    /// Decode a stored bundle, rejecting ones that cannot authenticate
    pub fn from_json(data: &str) -> Result<Self, BundleError> {
        let bundle: SessionBundle =
            serde_json::from_str(data).map_err(|e| BundleError::Malformed(e.to_string()))?;
        bundle.check()?;
        Ok(bundle)
    }

    pub fn check(&self) -> Result<(), BundleError> {
        for name in [AUTH_TOKEN_COOKIE, CSRF_COOKIE] {
            if self.cookies.get(name).map_or(true, |v| v.trim().is_empty()) {
                return Err(BundleError::MissingCookie(name));
            }
        }
        Ok(())
    }

    pub fn csrf_token(&self) -> Option<&str> {
        self.cookies.get(CSRF_COOKIE).map(String::as_str)
    }

    /// `Cookie` header value, names in stable order
    pub fn cookie_header(&self) -> String {
        self.cookies
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Numeric id of the logged-in account, when the `twid` cookie is present
    pub fn viewer_id(&self) -> Option<String> {
        let raw = self.cookies.get(TWID_COOKIE)?;
        let decoded = urlencoding::decode(raw).ok()?;
        let id = decoded.trim_matches('"').strip_prefix("u=")?;
        (!id.is_empty() && id.chars().all(|c| c.is_ascii_digit())).then(|| id.to_string())
    }
}

/// Split a browser `Cookie` header (`a=1; b=2`) into name/value pairs
pub fn parse_cookie_header(header: &str) -> BTreeMap<String, String> {
    header
        .split(';')
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            let name = name.trim();
            (!name.is_empty()).then(|| (name.to_string(), value.trim().to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cookies(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_cookie_header() {
        let parsed = parse_cookie_header("auth_token=abc; ct0=def ;guest_id=v1%3A1;; junk");
        assert_eq!(parsed.get("auth_token").unwrap(), "abc");
        assert_eq!(parsed.get("ct0").unwrap(), "def");
        assert_eq!(parsed.get("guest_id").unwrap(), "v1%3A1");
        assert_eq!(parsed.len(), 3);
    }

    #[test]
    fn test_cookie_header_is_sorted() {
        let bundle = SessionBundle::new(cookies(&[("ct0", "b"), ("auth_token", "a")]), BTreeMap::new());
        assert_eq!(bundle.cookie_header(), "auth_token=a; ct0=b");
        assert_eq!(bundle.csrf_token(), Some("b"));
    }

    #[test]
    fn test_check_requires_both_cookies() {
        let bundle = SessionBundle::new(cookies(&[("auth_token", "a")]), BTreeMap::new());
        assert_eq!(bundle.check(), Err(BundleError::MissingCookie("ct0")));

        let bundle = SessionBundle::new(cookies(&[("auth_token", " "), ("ct0", "b")]), BTreeMap::new());
        assert_eq!(bundle.check(), Err(BundleError::MissingCookie("auth_token")));
    }

    #[test]
    fn test_viewer_id_from_twid() {
        let bundle = SessionBundle::new(
            cookies(&[("auth_token", "a"), ("ct0", "b"), ("twid", "u%3D1234567890")]),
            BTreeMap::new(),
        );
        assert_eq!(bundle.viewer_id().as_deref(), Some("1234567890"));

        let bundle = SessionBundle::new(cookies(&[("twid", "\"u=42\"")]), BTreeMap::new());
        assert_eq!(bundle.viewer_id().as_deref(), Some("42"));

        let bundle = SessionBundle::new(cookies(&[("twid", "garbage")]), BTreeMap::new());
        assert!(bundle.viewer_id().is_none());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            SessionBundle::from_json("{not json"),
            Err(BundleError::Malformed(_))
        ));
        let incomplete = r#"{"cookies":{"ct0":"x"},"created_at":"2024-01-01T00:00:00Z"}"#;
        assert_eq!(
            SessionBundle::from_json(incomplete),
            Err(BundleError::MissingCookie("auth_token"))
        );
    }
}
