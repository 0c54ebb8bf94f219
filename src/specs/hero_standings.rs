// src/specs/hero_standings.rs
//! Ranked hero standings (`GameHeroStandings`).
//!
//! A single HTML page, not a paginated feed: downloaded whole into
//! `raw_ranked_stats.html` and parsed with header-driven columns. A derived
//! `WinRate` column (percent) is appended.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::{AppConfig, Profile};
use crate::core::html;
use crate::data::{Dataset, Value};
use crate::engine::PageFetcher;
use crate::error::{ConfigError, MaterializeError, StoreError, SyncError};
use crate::file;
use crate::paths::ProfilePaths;

pub const TITLE: &str = "Ranked Hero Standings";
pub const CATEGORY: &str = "Stats";
pub const TAB: &str = "GameHeroStandings";
pub const RAW_FILE: &str = "raw_ranked_stats.html";
pub const OUTPUT_STEM: &str = "ranked_hero_stats";

const HERO_COLUMN: &str = "Hero";
const WIN_RATE_COLUMN: &str = "WinRate";
/// Placeholder hero the site emits for unknown entries.
const BOGUS_HERO: &str = "-127";

/// Download the standings page for `profile` and store it as-is.
pub fn fetch(profile: &Profile, config: &AppConfig, data_root: &Path) -> Result<PathBuf, SyncError> {
    if profile.has_placeholder_url() {
        return Err(ConfigError::PlaceholderUrl(profile.profile_name.clone()).into());
    }
    let fetcher = PageFetcher::for_profile(profile, config.retry_policy())?;
    let paths = ProfilePaths::new(data_root, &profile.profile_name);
    fetch_with(&fetcher, &paths)
}

pub fn fetch_with(fetcher: &PageFetcher, paths: &ProfilePaths) -> Result<PathBuf, SyncError> {
    let body = fetcher.fetch_document(&[("category", CATEGORY), ("tab", TAB)])?;
    let path = paths.snapshot_file(RAW_FILE);
    file::write_atomic(&path, body.as_bytes())?;
    info!("{}: saved {} bytes to {}", OUTPUT_STEM, body.len(), path.display());
    Ok(path)
}

/// Parse the standings table. `None` when there is no header or no row
/// survives.
pub fn parse(markup: &str) -> Option<Dataset> {
    let Some(header) = html::extract_header(markup) else {
        warn!("{}: no header row in standings table", OUTPUT_STEM);
        return None;
    };
    let hero_idx = header.iter().position(|h| h == HERO_COLUMN);

    let mut columns = header.clone();
    columns.push(s!(WIN_RATE_COLUMN));
    let mut ds = Dataset::new(columns);

    for raw in html::extract_rows(markup) {
        if raw.len() != header.len() {
            continue;
        }
        if hero_idx.is_some_and(|i| raw[i] == BOGUS_HERO) {
            continue;
        }
        let row: Vec<Value> = raw
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                if Some(i) == hero_idx { Value::Text(cell.clone()) } else { Value::parse_number(cell) }
            })
            .collect();
        ds.rows.push(row);
    }

    if ds.is_empty() {
        return None;
    }

    let wins = ds.column_index("Wins");
    let losses = ds.column_index("Losses");
    for row in &mut ds.rows {
        let w = wins.and_then(|i| row[i].as_f64());
        let l = losses.and_then(|i| row[i].as_f64());
        row.push(Value::Float(win_rate(w, l)));
    }
    Some(ds)
}

fn win_rate(wins: Option<f64>, losses: Option<f64>) -> f64 {
    match (wins, losses) {
        (Some(w), Some(l)) if w + l != 0.0 => w * 100.0 / (w + l),
        _ => 0.0,
    }
}

/// Parse the stored snapshot and write `processed/ranked_hero_stats.csv`.
pub fn process(paths: &ProfilePaths) -> Result<Option<Dataset>, MaterializeError> {
    let raw = paths.snapshot_file(RAW_FILE);
    if !raw.exists() {
        warn!("{}: {} not found; download it first", OUTPUT_STEM, raw.display());
        return Ok(None);
    }
    let markup = fs::read_to_string(&raw).map_err(|e| StoreError::io(&raw, e))?;
    let Some(ds) = parse(&markup) else {
        return Ok(None);
    };
    let out = file::write_dataset_csv(&paths.output_file(OUTPUT_STEM), &ds)?;
    info!("{}: wrote {} row(s) to {}", OUTPUT_STEM, ds.len(), out.display());
    Ok(Some(ds))
}
