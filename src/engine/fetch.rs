// src/engine/fetch.rs
//
// One authenticated request per page, wrapped in the retry policy.
// 200 -> parsed page, 401/403 -> fatal auth error, anything else -> retry.

use tracing::debug;

use crate::config::Profile;
use crate::core::net::{HttpTransport, Transport};
use crate::engine::retry::{Attempt, RetryPolicy, Sleeper, ThreadSleeper};
use crate::engine::types::Page;
use crate::error::FetchError;

pub struct PageFetcher {
    transport: Box<dyn Transport>,
    sleeper: Box<dyn Sleeper>,
    policy: RetryPolicy,
}

impl PageFetcher {
    pub fn new(transport: Box<dyn Transport>, policy: RetryPolicy) -> Self {
        Self::with_sleeper(transport, Box::new(ThreadSleeper), policy)
    }

    pub fn with_sleeper(transport: Box<dyn Transport>, sleeper: Box<dyn Sleeper>, policy: RetryPolicy) -> Self {
        Self { transport, sleeper, policy }
    }

    pub fn for_profile(profile: &Profile, policy: RetryPolicy) -> Result<Self, FetchError> {
        let transport = HttpTransport::for_profile(profile)?;
        debug!("Fetch: endpoint {}", transport.base_url());
        Ok(Self::new(Box::new(transport), policy))
    }

    /// GET with the given query and return the body of the first 200 reply.
    pub fn fetch_document(&self, query: &[(&str, &str)]) -> Result<String, FetchError> {
        self.policy.run(self.sleeper.as_ref(), |_| match self.transport.get(query) {
            Err(e) => Attempt::Retry(e.to_string()),
            Ok(reply) => match reply.status {
                200 => Attempt::Done(reply.body),
                401 | 403 => Attempt::Fatal(FetchError::Auth { status: reply.status }),
                other => Attempt::Retry(format!("HTTP {other}")),
            },
        })
    }

    /// One page of a paginated feed. A 200 whose body is not valid JSON is
    /// treated as transient and retried.
    pub fn fetch_page(&self, tab: &str, session_id: &str, cursor: Option<&str>) -> Result<Page, FetchError> {
        let mut query = vec![("ajax", "1"), ("tab", tab), ("sessionid", session_id)];
        if let Some(c) = cursor {
            query.push(("continue_token", c));
        }

        self.policy.run(self.sleeper.as_ref(), |_| match self.transport.get(&query) {
            Err(e) => Attempt::Retry(e.to_string()),
            Ok(reply) => match reply.status {
                200 => match serde_json::from_str::<Page>(&reply.body) {
                    Ok(page) => Attempt::Done(page),
                    Err(e) => Attempt::Retry(format!("unparseable payload: {e}")),
                },
                401 | 403 => Attempt::Fatal(FetchError::Auth { status: reply.status }),
                other => Attempt::Retry(format!("HTTP {other}")),
            },
        })
    }
}
