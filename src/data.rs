// src/data.rs
//
// Dataset materialization: archived pages -> typed, deduplicated table.
//
// The table is rebuilt from the full archive on every run and written over
// the previous output. Order of pages is irrelevant; the final sort is by
// timestamp, newest first.

use std::cmp::Reverse;
use std::collections::HashSet;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{info, warn};

use crate::core::html;
use crate::core::sanitize::strip_tz_suffix;
use crate::error::MaterializeError;
use crate::file;
use crate::paths::ProfilePaths;
use crate::specs::{ColumnKind, DataSource, FLAG_TRUE};
use crate::store::PageArchive;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
];

/// One typed cell.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Missing,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Time(NaiveDateTime),
}

impl Value {
    /// Integer first, then finite float; anything else is `Missing`.
    pub fn parse_number(s: &str) -> Value {
        let t = s.trim();
        if let Ok(i) = t.parse::<i64>() {
            return Value::Int(i);
        }
        match t.parse::<f64>() {
            Ok(f) if f.is_finite() => Value::Float(f),
            _ => Value::Missing,
        }
    }

    pub fn coerce(raw: &str, kind: ColumnKind) -> Value {
        match kind {
            ColumnKind::Id | ColumnKind::Number => Value::parse_number(raw),
            ColumnKind::Timestamp => parse_timestamp(raw).map_or(Value::Missing, Value::Time),
            ColumnKind::Flag => Value::Bool(raw.trim() == FLAG_TRUE),
            ColumnKind::Text => Value::Text(s!(raw)),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<NaiveDateTime> {
        match self {
            Value::Time(t) => Some(*t),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Missing => Ok(()),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Text(s) => f.write_str(s),
            Value::Time(t) => write!(f, "{}", t.format(TIMESTAMP_FORMAT)),
        }
    }
}

/// Parse a feed timestamp such as `2024-05-01 10:00:00 GMT`. A bare date
/// reads as midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let t = strip_tz_suffix(raw);
    if t.is_empty() {
        return None;
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(t, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(t, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Dataset {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns, rows: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cells of one column, top to bottom.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Value>> {
        let i = self.column_index(name)?;
        Some(self.rows.iter().filter_map(move |r| r.get(i)))
    }
}

/// Apply `source`'s schema to extracted rows.
///
/// Rows with the wrong cell count, or without an identifier or a timestamp,
/// are dropped. The first row seen for an identifier wins. Output is sorted
/// newest first; rows with equal timestamps keep their relative order.
pub fn materialize<I>(source: &DataSource, raw_rows: I) -> Dataset
where
    I: IntoIterator<Item = Vec<String>>,
{
    let width = source.columns.len();
    let id_idx = source.id_index();
    let ts_idx = source.timestamp_index();

    let mut ds = Dataset::new(source.column_names());
    let mut seen: HashSet<String> = HashSet::new();
    let (mut malformed, mut incomplete, mut duplicate) = (0usize, 0usize, 0usize);

    for raw in raw_rows {
        if raw.len() != width {
            malformed += 1;
            continue;
        }
        let row: Vec<Value> = raw
            .iter()
            .zip(source.columns)
            .map(|(cell, col)| Value::coerce(cell, col.kind))
            .collect();

        let required_missing = [id_idx, ts_idx]
            .into_iter()
            .flatten()
            .any(|i| row[i].is_missing());
        if required_missing {
            incomplete += 1;
            continue;
        }
        if let Some(i) = id_idx {
            if !seen.insert(row[i].to_string()) {
                duplicate += 1;
                continue;
            }
        }
        ds.rows.push(row);
    }

    if let Some(i) = ts_idx {
        ds.rows.sort_by_key(|r| Reverse(r[i].as_time()));
    }

    if malformed + incomplete + duplicate > 0 {
        info!(
            "{}: dropped {} malformed, {} incomplete, {} duplicate row(s)",
            source.key, malformed, incomplete, duplicate
        );
    }
    ds
}

/// Rebuild `source`'s dataset from its archive and write it to
/// `processed/<key>.csv`. `Ok(None)` when there is nothing to materialize;
/// the previous output is then left alone.
pub fn process(source: &DataSource, paths: &ProfilePaths) -> Result<Option<Dataset>, MaterializeError> {
    let archive = PageArchive::open(paths.raw_dir(source))?;
    if !archive.has_any()? {
        warn!("{}: no archived pages in {}", source.key, archive.dir().display());
        return Ok(None);
    }

    let pages = archive.list_all()?;
    info!("{}: materializing {} page(s)", source.key, pages.len());
    let rows = pages
        .iter()
        .filter(|p| !p.html.trim().is_empty())
        .flat_map(|p| html::extract_rows(&p.html));

    let ds = materialize(source, rows);
    if ds.is_empty() {
        warn!("{}: no valid rows extracted", source.key);
        return Ok(None);
    }

    let out = file::write_dataset_csv(&paths.output_file(source.key), &ds)?;
    info!("{}: wrote {} row(s) to {}", source.key, ds.len(), out.display());
    Ok(Some(ds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specs::{CONDUCT_SUMMARY, PLAYSTYLE_STATS};
    use pretty_assertions::assert_eq;

    fn conduct(id: &str, date: &str, score: &str) -> Vec<String> {
        let mut row = vec![s!(id), s!(date), s!("Yes"), s!("No"), s!("")];
        row.extend(["20", "18", "2", "0", "3", "2", "1", "1", "7"].map(String::from));
        row.push(s!(score));
        row
    }

    #[test]
    fn numbers_parse_or_go_missing() {
        assert_eq!(Value::parse_number(" 42 "), Value::Int(42));
        assert_eq!(Value::parse_number("-3"), Value::Int(-3));
        assert_eq!(Value::parse_number("2.5"), Value::Float(2.5));
        assert_eq!(Value::parse_number("n/a"), Value::Missing);
        assert_eq!(Value::parse_number("NaN"), Value::Missing);
        assert_eq!(Value::parse_number(""), Value::Missing);
    }

    #[test]
    fn timestamps_drop_zone_word() {
        let t = parse_timestamp("2024-05-01 10:00:00 GMT").unwrap();
        assert_eq!(t.format(TIMESTAMP_FORMAT).to_string(), "2024-05-01 10:00:00");
        assert!(parse_timestamp("2024-05-01").is_some());
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn flags_are_yes_or_false() {
        assert_eq!(Value::coerce("Yes", ColumnKind::Flag), Value::Bool(true));
        assert_eq!(Value::coerce("No", ColumnKind::Flag), Value::Bool(false));
        assert_eq!(Value::coerce("", ColumnKind::Flag), Value::Bool(false));
    }

    #[test]
    fn display_matches_csv_output() {
        assert_eq!(Value::Bool(true).to_string(), "True");
        assert_eq!(Value::Missing.to_string(), "");
        assert_eq!(Value::Float(3.0).to_string(), "3");
    }

    #[test]
    fn drops_bad_rows_dedups_and_sorts() {
        let rows = vec![
            conduct("1", "2024-01-01 00:00:00 GMT", "9000"),
            conduct("3", "2024-03-01 00:00:00 GMT", "9100"),
            conduct("1", "2024-02-01 00:00:00 GMT", "1"),   // duplicate id, later date
            conduct("x", "2024-04-01 00:00:00 GMT", "1"),   // no id
            conduct("4", "garbage", "1"),                  // no timestamp
            vec![s!("5"), s!("2024-05-01 00:00:00 GMT")],  // too short
            conduct("2", "2024-02-01 00:00:00 GMT", "oops"),
        ];
        let ds = materialize(&CONDUCT_SUMMARY, rows);

        let ids: Vec<String> = ds.column("MatchID").unwrap().map(|v| v.to_string()).collect();
        assert_eq!(ids, vec!["3", "2", "1"]);
        // first occurrence wins
        assert_eq!(ds.rows[2][14], Value::Int(9000));
        // unparseable number becomes missing, not text
        assert_eq!(ds.rows[1][14], Value::Missing);
        assert_eq!(ds.rows[0][2], Value::Bool(true));
        assert_eq!(ds.rows[0][3], Value::Bool(false));
    }

    #[test]
    fn text_columns_stay_text() {
        let mut row = vec![s!("10"), s!("2024-01-01 12:00:00 GMT"), s!("Pudge")];
        row.extend((0..14).map(|i| i.to_string()));
        let ds = materialize(&PLAYSTYLE_STATS, vec![row]);
        assert_eq!(ds.rows[0][2], Value::Text(s!("Pudge")));
        assert_eq!(ds.rows[0][3], Value::Int(0));
    }
}
