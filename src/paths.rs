// src/paths.rs
//
// On-disk layout for one profile:
//
//   <root>/<profile>/raw_<source>/<cursor>.json   page archive
//   <root>/<profile>/<source>_state.json          cursor state
//   <root>/<profile>/raw_ranked_stats.html        hero standings snapshot
//   <root>/<profile>/processed/<source>.csv       materialized datasets

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::config::consts::PROCESSED_SUBDIR;
use crate::error::StoreError;
use crate::specs::DataSource;

/// True when `name` is a single ordinary path component, so that
/// `root.join(name)` stays directly under `root`.
pub fn is_plain_name(name: &str) -> bool {
    if name.contains(['/', '\\']) {
        return false;
    }
    let mut parts = Path::new(name).components();
    matches!((parts.next(), parts.next()), (Some(Component::Normal(_)), None))
}

#[derive(Clone, Debug)]
pub struct ProfilePaths {
    dir: PathBuf,
    contained: bool,
}

impl ProfilePaths {
    pub fn new(root: &Path, profile_name: &str) -> Self {
        Self {
            dir: root.join(profile_name),
            contained: is_plain_name(profile_name),
        }
    }

    pub fn profile_dir(&self) -> &Path {
        &self.dir
    }

    pub fn raw_dir(&self, source: &DataSource) -> PathBuf {
        self.dir.join(join!("raw_", source.key))
    }

    pub fn state_file(&self, source: &DataSource) -> PathBuf {
        self.dir.join(join!(source.key, "_state.json"))
    }

    pub fn processed_dir(&self) -> PathBuf {
        self.dir.join(PROCESSED_SUBDIR)
    }

    pub fn output_file(&self, stem: &str) -> PathBuf {
        self.processed_dir().join(join!(stem, ".csv"))
    }

    pub fn snapshot_file(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Remove the whole profile directory: archives, state, outputs.
    /// Refuses when the profile name would point outside the data root.
    pub fn delete_all(&self) -> Result<(), StoreError> {
        if !self.contained {
            let e = io::Error::new(io::ErrorKind::InvalidInput, "profile directory is outside the data root");
            return Err(StoreError::io(&self.dir, e));
        }
        if self.dir.exists() {
            fs::remove_dir_all(&self.dir).map_err(|e| StoreError::io(&self.dir, e))?;
        }
        Ok(())
    }
}
