// src/specs/conduct_summary.rs
//! Conduct summary feed (`MatchPlayerReportIncoming`).
//!
//! One row per summarized match, newest first:
//! MatchID, SummaryDate, three Yes/No flags, then counters and the behavior score.

use super::{Column, ColumnKind::*, DataSource, SyncPolicy, col};

const COLUMNS: &[Column] = &[
    col("MatchID", Id),
    col("SummaryDate", Timestamp),
    col("Periodic", Flag),
    col("ExcessiveReports", Flag),
    col("ExcessiveAbandons", Flag),
    col("MatchCount", Number),
    col("PositiveMatches", Number),
    col("ReportedMatches", Number),
    col("AbandonedMatches", Number),
    col("Reports", Number),
    col("ReportingParties", Number),
    col("CommsReports", Number),
    col("CommsReportingParties", Number),
    col("Commends", Number),
    col("BehaviorScore", Number),
];

pub static SOURCE: DataSource = DataSource {
    key: "conduct_summary",
    title: "Conduct Summary",
    tab: "MatchPlayerReportIncoming",
    policy: SyncPolicy::Incremental,
    columns: COLUMNS,
};
