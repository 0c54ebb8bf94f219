// src/config/profile.rs
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::consts::{BASE_URL_TEMPLATE, PLACEHOLDER_URL, SESSION_COOKIE};
use crate::error::ConfigError;

/// A named credential/target binding. Scopes one archive, one cursor state
/// and one materialized dataset per data source.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub profile_name: String,
    pub custom_url: String,
    #[serde(default)]
    pub cookies: BTreeMap<String, String>,
}

impl Profile {
    pub fn new(name: &str, custom_url: &str) -> Self {
        Self {
            profile_name: s!(name),
            custom_url: s!(custom_url),
            cookies: BTreeMap::new(),
        }
    }

    pub fn with_cookie(mut self, name: &str, value: &str) -> Self {
        self.cookies.insert(s!(name), s!(value));
        self
    }

    /// The `sessionid` cookie; the feed wants it echoed as a query parameter.
    pub fn session_id(&self) -> Result<&str, ConfigError> {
        self.cookies
            .get(SESSION_COOKIE)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::MissingSessionId(self.profile_name.clone()))
    }

    pub fn has_placeholder_url(&self) -> bool {
        self.custom_url.contains(PLACEHOLDER_URL)
    }

    pub fn base_url(&self) -> String {
        BASE_URL_TEMPLATE.replace("{custom_url}", self.custom_url.trim())
    }

    /// `Cookie:` header value. Empty cookie values are left out.
    pub fn cookie_header(&self) -> String {
        self.cookies
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_is_required() {
        let p = Profile::new("main", "someone");
        assert!(matches!(p.session_id(), Err(ConfigError::MissingSessionId(_))));

        let p = p.with_cookie("sessionid", "  ");
        assert!(p.session_id().is_err());

        let p = p.with_cookie("sessionid", "abc123");
        assert_eq!(p.session_id().unwrap(), "abc123");
    }

    #[test]
    fn cookie_header_skips_empty_values() {
        let p = Profile::new("main", "someone")
            .with_cookie("sessionid", "abc")
            .with_cookie("steamCountry", "")
            .with_cookie("steamLoginSecure", "xyz");
        assert_eq!(p.cookie_header(), "sessionid=abc; steamLoginSecure=xyz");
    }

    #[test]
    fn base_url_uses_custom_url() {
        let p = Profile::new("main", " someone ");
        assert_eq!(p.base_url(), "https://steamcommunity.com/id/someone/gcpd/570");
    }
}
