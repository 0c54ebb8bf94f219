// src/specs/playstyle_stats.rs
//! Playstyle stats feed (`PlayerPlaystyleStats`).
//!
//! Re-downloaded from scratch on every pass; no cursor state is kept.

use super::{Column, ColumnKind::*, DataSource, SyncPolicy, col};

const COLUMNS: &[Column] = &[
    col("MatchID", Id),
    col("Timestamp", Timestamp),
    col("Hero", Text),
    col("FightScore", Number),
    col("FarmScore", Number),
    col("PushScore", Number),
    col("Versatility", Number),
    col("Kills", Number),
    col("Deaths", Number),
    col("Assists", Number),
    col("LastHits", Number),
    col("Denies", Number),
    col("GPM", Number),
    col("XPPM", Number),
    col("NetWorth", Number),
    col("Damage", Number),
    col("Heals", Number),
];

pub static SOURCE: DataSource = DataSource {
    key: "playstyle_stats",
    title: "Playstyle Stats",
    tab: "PlayerPlaystyleStats",
    policy: SyncPolicy::FullRefresh,
    columns: COLUMNS,
};
