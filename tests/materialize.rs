// tests/materialize.rs
mod common;

use std::fs;

use pretty_assertions::assert_eq;

use common::{conduct_row, payload, table};
use gcpd_scrape::data::{self, Value};
use gcpd_scrape::engine::Page;
use gcpd_scrape::paths::ProfilePaths;
use gcpd_scrape::specs::{CONDUCT_SUMMARY, ColumnKind};
use gcpd_scrape::store::PageArchive;

fn store(archive: &mut PageArchive, key: Option<&str>, html: &str) {
    let page: Page = serde_json::from_str(&payload(html, key)).unwrap();
    archive.put(key, &page).unwrap();
}

fn rows(ids: &[u32]) -> String {
    let r: Vec<String> = ids.iter().map(|&i| conduct_row(i)).collect();
    table(&r)
}

#[test]
fn overlapping_pages_yield_one_row_per_id() {
    let tmp = tempfile::tempdir().unwrap();
    let paths = ProfilePaths::new(tmp.path(), "p");
    let mut a = PageArchive::open(paths.raw_dir(&CONDUCT_SUMMARY)).unwrap();
    store(&mut a, Some("10"), &rows(&[12, 11, 10]));
    store(&mut a, Some("8"), &rows(&[10, 9, 8]));
    store(&mut a, None, &rows(&[8, 7]));

    let ds = data::process(&CONDUCT_SUMMARY, &paths).unwrap().unwrap();
    assert_eq!(ds.len(), 6);
    let ids: Vec<String> = ds.column("MatchID").unwrap().map(|v| v.to_string()).collect();
    assert_eq!(ids, vec!["12", "11", "10", "9", "8", "7"]);
}

#[test]
fn page_without_table_changes_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let with = ProfilePaths::new(tmp.path(), "with");
    let without = ProfilePaths::new(tmp.path(), "without");

    for paths in [&with, &without] {
        let mut a = PageArchive::open(paths.raw_dir(&CONDUCT_SUMMARY)).unwrap();
        store(&mut a, Some("5"), &rows(&[6, 5]));
        store(&mut a, None, &rows(&[4]));
    }
    let mut a = PageArchive::open(with.raw_dir(&CONDUCT_SUMMARY)).unwrap();
    store(&mut a, Some("x"), "<div class=\"error\">Something went wrong</div>");

    let left = data::process(&CONDUCT_SUMMARY, &with).unwrap().unwrap();
    let right = data::process(&CONDUCT_SUMMARY, &without).unwrap().unwrap();
    assert_eq!(left, right);
}

#[test]
fn output_is_sorted_and_typed() {
    let tmp = tempfile::tempdir().unwrap();
    let paths = ProfilePaths::new(tmp.path(), "p");
    let mut a = PageArchive::open(paths.raw_dir(&CONDUCT_SUMMARY)).unwrap();
    // pages stored out of order
    store(&mut a, Some("a"), &rows(&[3, 30]));
    store(&mut a, Some("b"), &rows(&[17, 2, 40]));

    let ds = data::process(&CONDUCT_SUMMARY, &paths).unwrap().unwrap();

    let ts: Vec<_> = ds.column("SummaryDate").unwrap().map(|v| v.as_time().unwrap()).collect();
    assert!(ts.windows(2).all(|w| w[0] >= w[1]));

    for (col, kind) in CONDUCT_SUMMARY.columns.iter().map(|c| (c.name, c.kind)) {
        for v in ds.column(col).unwrap() {
            match kind {
                ColumnKind::Id | ColumnKind::Number => {
                    assert!(matches!(v, Value::Int(_) | Value::Float(_) | Value::Missing), "{col}: {v:?}")
                }
                ColumnKind::Flag => assert!(matches!(v, Value::Bool(_))),
                ColumnKind::Timestamp => assert!(matches!(v, Value::Time(_))),
                ColumnKind::Text => {}
            }
        }
    }
}

#[test]
fn csv_is_overwritten_not_appended() {
    let tmp = tempfile::tempdir().unwrap();
    let paths = ProfilePaths::new(tmp.path(), "p");
    let mut a = PageArchive::open(paths.raw_dir(&CONDUCT_SUMMARY)).unwrap();
    store(&mut a, None, &rows(&[2, 1]));

    data::process(&CONDUCT_SUMMARY, &paths).unwrap();
    data::process(&CONDUCT_SUMMARY, &paths).unwrap();

    let out = fs::read_to_string(paths.output_file(CONDUCT_SUMMARY.key)).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("MatchID,SummaryDate,Periodic,"));
    assert!(lines[1].starts_with("2,2024-03-01 02:00:00,False,False,True,0,2,"));
}

#[test]
fn nothing_to_process() {
    let tmp = tempfile::tempdir().unwrap();
    let paths = ProfilePaths::new(tmp.path(), "p");
    assert!(data::process(&CONDUCT_SUMMARY, &paths).unwrap().is_none());

    let mut a = PageArchive::open(paths.raw_dir(&CONDUCT_SUMMARY)).unwrap();
    store(&mut a, None, "<p>no table</p>");
    assert!(data::process(&CONDUCT_SUMMARY, &paths).unwrap().is_none());
    assert!(!paths.output_file(CONDUCT_SUMMARY.key).exists());
}
