// src/engine/types.rs
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One payload of the paginated feed: `{success, html, continue_token?}`.
/// Unknown fields are kept so an archived page round-trips verbatim.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub html: String,
    #[serde(
        default,
        deserialize_with = "de_cursor",
        skip_serializing_if = "Option::is_none"
    )]
    pub continue_token: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Page {
    pub fn new(html: impl Into<String>, continue_token: Option<&str>) -> Self {
        Self {
            success: true,
            html: html.into(),
            continue_token: continue_token.map(str::to_owned),
            extra: Map::new(),
        }
    }

    /// False for the "nothing more" payloads: unsuccessful or blank markup.
    pub fn has_content(&self) -> bool {
        self.success && !self.html.trim().is_empty()
    }

    /// Next-page cursor; an empty token counts as absent.
    pub fn next_cursor(&self) -> Option<&str> {
        self.continue_token.as_deref().filter(|t| !t.is_empty())
    }
}

// Cursor may arrive as a string or a bare number.
fn de_cursor<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncMode {
    /// Archive was empty: walk the whole feed.
    Historical,
    /// Archive had pages: walk until the newest known row shows up.
    Sync,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// Unsuccessful payload or empty markup.
    EndOfFeed,
    /// Page came back without a next cursor.
    LastPage,
    /// The stop-at identifier appeared on a fetched page.
    FoundKnownRow,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncReport {
    pub source: &'static str,
    pub mode: SyncMode,
    pub resumed: bool,
    pub stop_at: Option<String>,
    pub pages_fetched: usize,
    pub pages_archived: usize,
    pub stop: StopReason,
}

impl SyncReport {
    pub fn is_up_to_date(&self) -> bool {
        self.pages_archived == 0
    }
}
