// tests/common/mod.rs
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use gcpd_scrape::core::net::{HttpReply, Transport};
use gcpd_scrape::engine::PageFetcher;
use gcpd_scrape::engine::retry::{RetryPolicy, Sleeper};
use gcpd_scrape::error::TransportError;

/// One conduct-summary row; timestamps grow with the id.
pub fn conduct_row(id: u32) -> String {
    let ts = format!("2024-03-{:02} {:02}:00:00 GMT", 1 + id / 24, id % 24);
    let mut cells = vec![id.to_string(), ts, "No".into(), "No".into(), "Yes".into()];
    cells.extend((0..9).map(|i| (i * id).to_string()));
    cells.push("9500".into());
    let tds: String = cells.iter().map(|c| format!("<td>{c}</td>")).collect();
    format!("<tr>{tds}</tr>")
}

pub fn table(rows: &[String]) -> String {
    format!(
        "<div><table class=\"generic_kv_table\"><tr><th>Match</th><th>Date</th></tr>{}</table></div>",
        rows.concat()
    )
}

pub fn payload(html: &str, token: Option<&str>) -> String {
    let mut v = serde_json::json!({ "success": true, "html": html });
    if let Some(t) = token {
        v["continue_token"] = serde_json::Value::from(t);
    }
    v.to_string()
}

/// Remote feed simulator: ids newest first, fixed page size. The cursor of a
/// page is the id of its last row; a request with cursor `c` returns the
/// rows below `c`. The last page carries no cursor.
#[derive(Clone, Default)]
pub struct Feed {
    pub ids: Rc<RefCell<Vec<u32>>>,
    pub page_size: usize,
    pub requests: Rc<RefCell<Vec<Option<String>>>>,
    /// Status codes to answer with before serving real pages.
    pub failures: Rc<RefCell<VecDeque<u16>>>,
}

impl Feed {
    pub fn new(ids: &[u32], page_size: usize) -> Self {
        Self {
            ids: Rc::new(RefCell::new(ids.to_vec())),
            page_size,
            ..Default::default()
        }
    }

    pub fn set_ids(&self, ids: &[u32]) {
        *self.ids.borrow_mut() = ids.to_vec();
    }

    pub fn fail_with(&self, statuses: &[u16]) {
        self.failures.borrow_mut().extend(statuses.iter().copied());
    }

    pub fn requested(&self) -> Vec<Option<String>> {
        self.requests.borrow().clone()
    }

    pub fn serve(&self, cursor: Option<&str>) -> String {
        let ids = self.ids.borrow();
        let below: Vec<u32> = match cursor.and_then(|c| c.parse::<u32>().ok()) {
            Some(c) => ids.iter().copied().filter(|&i| i < c).collect(),
            None => ids.clone(),
        };
        if below.is_empty() {
            return serde_json::json!({ "success": true, "html": "" }).to_string();
        }
        let page: Vec<u32> = below.iter().copied().take(self.page_size).collect();
        let rows: Vec<String> = page.iter().map(|&i| conduct_row(i)).collect();
        let more = below.len() > page.len();
        let token = page.last().map(|l| l.to_string()).filter(|_| more);
        payload(&table(&rows), token.as_deref())
    }
}

impl Transport for Feed {
    fn get(&self, query: &[(&str, &str)]) -> Result<HttpReply, TransportError> {
        let cursor = query.iter().find(|(k, _)| *k == "continue_token").map(|(_, v)| v.to_string());
        self.requests.borrow_mut().push(cursor.clone());
        if let Some(status) = self.failures.borrow_mut().pop_front() {
            return Ok(HttpReply::new(status, ""));
        }
        Ok(HttpReply::new(200, self.serve(cursor.as_deref())))
    }
}

/// Replays canned replies in order.
pub struct Scripted(pub RefCell<VecDeque<HttpReply>>);

impl Scripted {
    pub fn new(replies: Vec<HttpReply>) -> Self {
        Self(RefCell::new(replies.into()))
    }
}

impl Transport for Scripted {
    fn get(&self, _query: &[(&str, &str)]) -> Result<HttpReply, TransportError> {
        self.0
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| TransportError("script exhausted".into()))
    }
}

#[derive(Clone, Default)]
pub struct RecordingSleeper(pub Rc<RefCell<Vec<Duration>>>);

impl Sleeper for RecordingSleeper {
    fn sleep(&self, d: Duration) {
        self.0.borrow_mut().push(d);
    }
}

pub fn fetcher(transport: impl Transport + 'static) -> PageFetcher {
    PageFetcher::new(Box::new(transport), RetryPolicy::immediate(3))
}
