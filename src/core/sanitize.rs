// src/core/sanitize.rs
use crate::config::consts::FINAL_PAGE_KEY;

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Turn an opaque continuation cursor into a safe file stem.
///
/// ASCII alphanumerics, `-` and `_` pass through; every other byte becomes
/// `%XX`. Distinct cursors always map to distinct stems, and no cursor maps
/// to the terminal page stem (`final_page`).
pub fn page_key_filename(cursor: &str) -> String {
    let mut out = String::with_capacity(cursor.len());
    for b in cursor.bytes() {
        if b.is_ascii_alphanumeric() || b == b'-' || b == b'_' {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    if out == FINAL_PAGE_KEY {
        let first = out.remove(0);
        out.insert_str(0, &format!("%{:02X}", first as u32));
    }
    out
}

/// Strip a trailing timezone word (`"2024-01-02 10:00:00 GMT"` -> `"2024-01-02 10:00:00"`).
pub fn strip_tz_suffix(s: &str) -> &str {
    let t = s.trim();
    match t.rsplit_once(' ') {
        Some((head, tail)) if !tail.is_empty() && tail.chars().all(|c| c.is_ascii_alphabetic()) => head.trim_end(),
        _ => t,
    }
}
