// src/store/archive.rs
//
// Raw page archive for one (profile, source): one pretty JSON file per page,
// named by the sanitized continuation cursor it returned, or `final_page`.
//
// Every record carries the sync pass that wrote it and a global write
// sequence. Within a pass pages arrive newest data first, so the newest
// archived page is the earliest write of the latest pass. Filesystem
// timestamps only break ties between legacy records that carry neither.

use std::cmp::Reverse;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::consts::{FINAL_PAGE_KEY, PAGE_EXT};
use crate::core::sanitize::page_key_filename;
use crate::engine::types::Page;
use crate::error::StoreError;
use crate::file;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArchivedPage {
    /// Sync pass that wrote this record. Absent in legacy records (reads as 0).
    #[serde(default)]
    pub pass: u64,
    /// Write order across the whole archive.
    #[serde(default)]
    pub fetch_seq: u64,
    #[serde(flatten)]
    pub page: Page,
}

#[derive(Debug)]
pub struct PageArchive {
    dir: PathBuf,
    pass: u64,
    next_seq: u64,
}

impl PageArchive {
    /// Open (without creating) the archive directory. Writes continue the
    /// latest pass until `start_pass` is called.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        let entries = Self::scan(&dir)?;
        let pass = entries.iter().map(|e| e.record.pass).max().unwrap_or(0);
        let next_seq = entries
            .iter()
            .map(|e| e.record.fetch_seq)
            .max()
            .map_or(0, |m| m + 1);
        Ok(Self { dir, pass, next_seq })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn current_pass(&self) -> u64 {
        self.pass
    }

    /// Begin a fresh pass: pages written from now on are newer than
    /// everything already stored.
    pub fn start_pass(&mut self) -> u64 {
        self.pass += 1;
        self.pass
    }

    pub fn path_for(&self, key: Option<&str>) -> PathBuf {
        let stem = match key {
            Some(k) => page_key_filename(k),
            None => s!(FINAL_PAGE_KEY),
        };
        self.dir.join(join!(&stem, ".", PAGE_EXT))
    }

    pub fn has_any(&self) -> Result<bool, StoreError> {
        Ok(!self.page_files()?.is_empty())
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.page_files()?.len())
    }

    /// Store `page` under `key` (`None` = terminal page). Overwrites.
    pub fn put(&mut self, key: Option<&str>, page: &Page) -> Result<PathBuf, StoreError> {
        let path = self.path_for(key);
        let record = ArchivedPage { pass: self.pass, fetch_seq: self.next_seq, page: page.clone() };
        file::write_json_atomic(&path, &record)?;
        debug!("Archive: wrote {} (pass {}, seq {})", path.display(), self.pass, self.next_seq);
        self.next_seq += 1;
        Ok(path)
    }

    /// Page holding the newest archived data: the first page written by the
    /// latest pass.
    pub fn most_recent(&self) -> Result<Option<Page>, StoreError> {
        self.newest_before(u64::MAX)
    }

    /// Like `most_recent`, ignoring pages written by pass `pass` or later.
    pub fn newest_before(&self, pass: u64) -> Result<Option<Page>, StoreError> {
        let newest = Self::scan(&self.dir)?
            .into_iter()
            .filter(|e| e.record.pass < pass)
            .max_by_key(|e| (e.record.pass, Reverse(e.record.fetch_seq), e.modified));
        Ok(newest.map(|e| e.record.page))
    }

    /// Every readable page, in filename order.
    pub fn list_all(&self) -> Result<Vec<Page>, StoreError> {
        Ok(Self::scan(&self.dir)?.into_iter().map(|e| e.record.page).collect())
    }

    /// Delete every stored page.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        if self.dir.exists() {
            fs::remove_dir_all(&self.dir).map_err(|e| StoreError::io(&self.dir, e))?;
        }
        self.pass = 0;
        self.next_seq = 0;
        Ok(())
    }

    fn page_files(&self) -> Result<Vec<PathBuf>, StoreError> {
        list_page_files(&self.dir)
    }

    // Unreadable or malformed records are skipped with a warning.
    fn scan(dir: &Path) -> Result<Vec<Entry>, StoreError> {
        let mut out = Vec::new();
        for path in list_page_files(dir)? {
            let record: ArchivedPage = match file::read_json(&path) {
                Ok(r) => r,
                Err(e) => {
                    warn!("Archive: skipping {}: {}", path.display(), e);
                    continue;
                }
            };
            let modified = fs::metadata(&path)
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            out.push(Entry { record, modified });
        }
        Ok(out)
    }
}

struct Entry {
    record: ArchivedPage,
    modified: SystemTime,
}

fn list_page_files(dir: &Path) -> Result<Vec<PathBuf>, StoreError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let rd = fs::read_dir(dir).map_err(|e| StoreError::io(dir, e))?;
    let mut files = Vec::new();
    for entry in rd {
        let path = entry.map_err(|e| StoreError::io(dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|x| x == PAGE_EXT) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
