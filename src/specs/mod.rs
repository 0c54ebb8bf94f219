//! # Data source "specs"
//!
//! One module per remote feed. Each one says *which* tab of the GCPD endpoint
//! to page through, *how* its table rows map onto typed columns, and
//! *whether* the feed syncs incrementally or is re-fetched from scratch.
//!
//! ## What lives here
//! - The `tab` query value each feed is served under.
//! - The **row schema**: column names in page order and the kind of each
//!   column (identifier, timestamp, flag, number, text).
//! - The **sync policy**: `Incremental` feeds keep their archive and stop at
//!   the newest known row; `FullRefresh` feeds wipe the archive every pass.
//!
//! ## What does **not** live here
//! - Pagination, retries, checkpoints (`engine`).
//! - Archive and cursor persistence (`store`).
//! - Type coercion and dedup (`data`), which only *reads* the schema.
//!
//! ## Typical call chain
//! ```text
//! cli → engine::fetch(&CONDUCT_SUMMARY, ..) → store::PageArchive
//!     → data::process(&CONDUCT_SUMMARY, ..) → processed/<key>.csv
//! ```
//!
//! Snapshot pages that are not paginated (`hero_standings`) keep their own
//! fetch/process pair but reuse the same fetcher and row extractor.
pub mod conduct_summary;
pub mod hero_standings;
pub mod playstyle_stats;

pub use conduct_summary::SOURCE as CONDUCT_SUMMARY;
pub use playstyle_stats::SOURCE as PLAYSTYLE_STATS;

/// Textual value that maps to `true` in flag columns; anything else is `false`.
pub const FLAG_TRUE: &str = "Yes";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    /// Natural key. Required; numeric.
    Id,
    /// Required; parsed from text with the timezone word stripped.
    Timestamp,
    Flag,
    Number,
    Text,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
}

pub const fn col(name: &'static str, kind: ColumnKind) -> Column {
    Column { name, kind }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncPolicy {
    /// Keep the archive; resume from cursor state; stop at the newest known row.
    Incremental,
    /// Empty the archive and page through the whole feed every pass.
    FullRefresh,
}

#[derive(Debug, PartialEq, Eq)]
pub struct DataSource {
    /// Stable short name; used for directory and file names.
    pub key: &'static str,
    pub title: &'static str,
    /// `tab=` query value on the feed endpoint.
    pub tab: &'static str,
    pub policy: SyncPolicy,
    pub columns: &'static [Column],
}

impl DataSource {
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| s!(c.name)).collect()
    }

    fn index_of(&self, kind: ColumnKind) -> Option<usize> {
        self.columns.iter().position(|c| c.kind == kind)
    }

    pub fn id_index(&self) -> Option<usize> {
        self.index_of(ColumnKind::Id)
    }

    pub fn timestamp_index(&self) -> Option<usize> {
        self.index_of(ColumnKind::Timestamp)
    }
}

/// Paginated feeds, in the order a full sync walks them.
pub static FEEDS: [&DataSource; 2] = [&CONDUCT_SUMMARY, &PLAYSTYLE_STATS];
