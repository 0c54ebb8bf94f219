// src/store/cursor.rs
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::StoreError;
use crate::file;

#[derive(Debug, Serialize, Deserialize)]
struct CursorState {
    next_continue_token: String,
}

/// Single-slot checkpoint: the cursor of the next page to fetch.
/// File absent means nothing to resume.
#[derive(Clone, Debug)]
pub struct CursorStore {
    path: PathBuf,
}

impl CursorStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A corrupt state file is reported and treated as absent.
    pub fn load(&self) -> Result<Option<String>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        match file::read_json::<CursorState>(&self.path) {
            Ok(s) if s.next_continue_token.is_empty() => Ok(None),
            Ok(s) => Ok(Some(s.next_continue_token)),
            Err(e @ StoreError::Json { .. }) => {
                warn!("Cursor: ignoring unreadable state: {}", e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub fn save(&self, token: &str) -> Result<(), StoreError> {
        let state = CursorState { next_continue_token: s!(token) };
        file::write_json_atomic(&self.path, &state)
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        file::remove_if_exists(&self.path)
    }
}
