// src/engine/sync.rs
//
// One sync pass over one paginated source.
//
// Mode is picked from the archive: empty -> historical (walk everything),
// non-empty -> sync (walk until the newest known row shows up again).
// After every archived page the next cursor is checkpointed, so a killed
// process resumes where it stopped, still inside the same pass. Any
// non-fatal stop clears the checkpoint; fatal errors leave it as it was.

use tracing::{info, warn};

use crate::core::html;
use crate::engine::fetch::PageFetcher;
use crate::engine::types::{StopReason, SyncMode, SyncReport};
use crate::error::SyncError;
use crate::paths::ProfilePaths;
use crate::progress::Progress;
use crate::specs::{DataSource, SyncPolicy};
use crate::store::{CursorStore, PageArchive};

pub fn sync_source(
    source: &'static DataSource,
    paths: &ProfilePaths,
    fetcher: &PageFetcher,
    session_id: &str,
    mut progress: Option<&mut dyn Progress>,
) -> Result<SyncReport, SyncError> {
    if let Some(p) = progress.as_deref_mut() {
        p.begin(source.title);
    }
    // reborrow with a shorter object lifetime so `progress` stays usable below
    let res = run_pass(
        source,
        paths,
        fetcher,
        session_id,
        progress.as_mut().map(|p| &mut **p as &mut dyn Progress),
    );
    if let Some(p) = progress.as_deref_mut() {
        match &res {
            Ok(r) if r.is_up_to_date() => p.log(&format!("{}: already up to date", source.title)),
            Ok(r) => p.log(&format!("{}: {} new page(s)", source.title, r.pages_archived)),
            Err(e) => p.log(&format!("{}: {}", source.title, e)),
        }
        p.finish();
    }
    res
}

fn run_pass(
    source: &'static DataSource,
    paths: &ProfilePaths,
    fetcher: &PageFetcher,
    session_id: &str,
    mut progress: Option<&mut dyn Progress>,
) -> Result<SyncReport, SyncError> {
    let mut archive = PageArchive::open(paths.raw_dir(source))?;
    let incremental = source.policy == SyncPolicy::Incremental;
    let cursor_store = CursorStore::new(paths.state_file(source));

    if !incremental {
        info!("{}: full refresh, clearing {}", source.key, archive.dir().display());
        archive.clear()?;
    }

    let mut cursor = if incremental { cursor_store.load()? } else { None };
    let resumed = cursor.is_some();
    if let Some(c) = &cursor {
        // pages keep ranking under the interrupted pass
        info!("{}: resuming interrupted pass {} from cursor {}", source.key, archive.current_pass(), c);
        if let Some(p) = progress.as_deref_mut() {
            p.log(&format!("Resuming {} from saved position", source.title));
        }
    } else {
        archive.start_pass();
    }

    // A resumed pass continues whatever the interrupted one was doing, so
    // it looks past its own pages for the stop-at row.
    let (mode, known) = if resumed {
        match archive.newest_before(archive.current_pass())? {
            Some(page) => (SyncMode::Sync, Some(page)),
            None => (SyncMode::Historical, None),
        }
    } else if archive.has_any()? {
        (SyncMode::Sync, archive.most_recent()?)
    } else {
        (SyncMode::Historical, None)
    };
    let stop_at = known.and_then(|page| html::first_row_id(&page.html));
    if mode == SyncMode::Sync && stop_at.is_none() {
        warn!("{}: newest archived page has no rows; no stop-at identifier", source.key);
    }
    info!("{}: {:?} mode, stop at {:?}", source.key, mode, stop_at);

    let mut pages_fetched = 0usize;
    let mut pages_archived = 0usize;

    let stop = loop {
        let page = fetcher.fetch_page(source.tab, session_id, cursor.as_deref())?;
        if !page.has_content() {
            info!("{}: end of feed", source.key);
            break StopReason::EndOfFeed;
        }
        pages_fetched += 1;
        if let Some(p) = progress.as_deref_mut() {
            p.page_done(pages_fetched);
        }

        if let Some(id) = &stop_at {
            if html::row_ids(&page.html).iter().any(|r| r == id) {
                info!("{}: found known row {} on page {}", source.key, id, pages_fetched);
                break StopReason::FoundKnownRow;
            }
        }

        let next = page.next_cursor().map(str::to_owned);
        archive.put(next.as_deref(), &page)?;
        pages_archived += 1;

        let Some(next) = next else {
            info!("{}: last page reached", source.key);
            break StopReason::LastPage;
        };
        if incremental {
            cursor_store.save(&next)?;
        }
        cursor = Some(next);
    };

    if incremental {
        cursor_store.clear()?;
    }
    info!(
        "{}: fetched {} page(s), archived {}, stop: {:?}",
        source.key, pages_fetched, pages_archived, stop
    );

    Ok(SyncReport {
        source: source.key,
        mode,
        resumed,
        stop_at,
        pages_fetched,
        pages_archived,
        stop,
    })
}
