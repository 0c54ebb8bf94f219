// src/engine/mod.rs
pub mod fetch;
pub mod retry;
pub mod sync;
pub mod types;

use std::path::Path;

use crate::config::{AppConfig, Profile};
use crate::error::{ConfigError, SyncError};
use crate::paths::ProfilePaths;
use crate::progress::Progress;
use crate::specs::DataSource;

pub use fetch::PageFetcher;
pub use types::{Page, StopReason, SyncMode, SyncReport};

/// Run one sync pass of `source` for `profile` against the live endpoint.
/// Errors are fatal for this pass only; archive and cursor state stay usable.
pub fn fetch(
    source: &'static DataSource,
    profile: &Profile,
    config: &AppConfig,
    data_root: &Path,
    progress: Option<&mut dyn Progress>,
) -> Result<SyncReport, SyncError> {
    if profile.has_placeholder_url() {
        return Err(ConfigError::PlaceholderUrl(profile.profile_name.clone()).into());
    }
    let session_id = profile.session_id()?;
    let fetcher = PageFetcher::for_profile(profile, config.retry_policy())?;
    let paths = ProfilePaths::new(data_root, &profile.profile_name);
    sync::sync_source(source, &paths, &fetcher, session_id, progress)
}
