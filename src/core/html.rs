// src/core/html.rs
//
// Row extraction from the table embedded in a feed page.
// Prefers `table.generic_kv_table`, falls back to the first `<table>`.
// Never fails: a page without a table yields no rows and a warning.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::warn;

use super::sanitize::normalize_ws;

static DATA_TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table.generic_kv_table").expect("data table selector"));
static ANY_TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("table selector"));
static TR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").expect("tr selector"));
static TD: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").expect("td selector"));
static TH: LazyLock<Selector> = LazyLock::new(|| Selector::parse("th").expect("th selector"));

fn find_table(doc: &Html) -> Option<ElementRef<'_>> {
    doc.select(&DATA_TABLE)
        .next()
        .or_else(|| doc.select(&ANY_TABLE).next())
}

fn cell_text(cell: ElementRef<'_>) -> String {
    normalize_ws(&cell.text().collect::<String>())
}

/// Cell text of every row after the header row. Cell counts are not checked
/// here; the materializer drops rows that don't fit the schema.
pub fn extract_rows(markup: &str) -> Vec<Vec<String>> {
    if markup.trim().is_empty() {
        return Vec::new();
    }
    let doc = Html::parse_document(markup);
    let Some(table) = find_table(&doc) else {
        warn!("Extract: no data table in page markup ({} bytes)", markup.len());
        return Vec::new();
    };
    table
        .select(&TR)
        .skip(1)
        .map(|tr| tr.select(&TD).map(cell_text).collect())
        .collect()
}

/// `<th>` texts of the first table row.
pub fn extract_header(markup: &str) -> Option<Vec<String>> {
    let doc = Html::parse_document(markup);
    let table = find_table(&doc)?;
    let first = table.select(&TR).next()?;
    let headers: Vec<String> = first.select(&TH).map(cell_text).collect();
    if headers.is_empty() { None } else { Some(headers) }
}

/// First-cell values (natural identifiers) of every data row, in page order.
pub fn row_ids(markup: &str) -> Vec<String> {
    extract_rows(markup)
        .into_iter()
        .filter_map(|row| row.into_iter().next())
        .collect()
}

pub fn first_row_id(markup: &str) -> Option<String> {
    row_ids(markup).into_iter().next()
}
