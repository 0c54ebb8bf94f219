// src/core/net.rs
// Blocking HTTP GET against the profile's base URL.
// One request at a time; the fetcher decides about retries and pacing.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{COOKIE, HeaderMap, HeaderValue, USER_AGENT};

use crate::config::Profile;
use crate::config::consts::{REQUEST_TIMEOUT_SECS, USER_AGENT as UA};
use crate::error::{FetchError, TransportError};

/// Raw HTTP reply; status classification happens in the fetcher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }
}

/// Issue one GET with the given query parameters.
pub trait Transport {
    fn get(&self, query: &[(&str, &str)]) -> Result<HttpReply, TransportError>;
}

/// Cookie-authenticated transport bound to one profile's endpoint.
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn for_profile(profile: &Profile) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(UA));
        let cookies = profile.cookie_header();
        if !cookies.is_empty() {
            let v = HeaderValue::from_str(&cookies)
                .map_err(|e| FetchError::Setup(format!("invalid cookie value: {e}")))?;
            headers.insert(COOKIE, v);
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .default_headers(headers)
            .build()
            .map_err(|e| FetchError::Setup(e.to_string()))?;
        Ok(Self { client, base_url: profile.base_url() })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Transport for HttpTransport {
    fn get(&self, query: &[(&str, &str)]) -> Result<HttpReply, TransportError> {
        let resp = self.client.get(&self.base_url).query(query).send()?;
        let status = resp.status().as_u16();
        let body = resp.text()?;
        Ok(HttpReply { status, body })
    }
}
