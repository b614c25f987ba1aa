//! Local filesystem watching and the event relevance filter

use std::path::Path;
use std::sync::Arc;

use notify::event::ModifyKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{info, trace, warn};

use crate::error::Result;
use crate::state::SyncState;

/// Metadata directory of the storage backend; events under it are churn
/// from our own pulls and pushes, never user edits.
pub const GIT_DIR: &str = ".git";

/// Decide whether a filesystem event represents a local change worth
/// pushing. Pure over (event kind, path, is-directory):
///
/// - anything under the backend metadata directory is noise,
/// - dotfiles (and dot-directories) are noise,
/// - a "modified" event on a directory is mtime churn from child writes,
/// - access events are reads.
///
/// Everything else (create, delete, move, file-modify) marks the
/// directory dirty.
pub fn should_mark_dirty(kind: &EventKind, path: &Path, is_dir: bool) -> bool {
    if path.components().any(|c| c.as_os_str() == GIT_DIR) {
        return false;
    }

    let dot_basename = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'));
    if dot_basename {
        return false;
    }

    match kind {
        EventKind::Access(_) => false,
        // renames are moves, not mtime churn, even on directories
        EventKind::Modify(ModifyKind::Name(_)) => true,
        EventKind::Modify(_) if is_dir => false,
        _ => true,
    }
}

/// Recursive watcher over the local directory. Raises the shared dirty
/// flag from notify's event thread; dropping it ends the subscription.
#[derive(Debug)]
pub struct LocalWatcher {
    _watcher: RecommendedWatcher,
}

impl LocalWatcher {
    pub fn start(path: &Path, state: Arc<SyncState>) -> Result<Self> {
        let mut watcher =
            notify::recommended_watcher(move |result: std::result::Result<Event, notify::Error>| {
                match result {
                    Ok(event) => handle_event(&event, &state),
                    Err(error) => warn!(%error, "filesystem watcher error"),
                }
            })?;

        watcher.watch(path, RecursiveMode::Recursive)?;
        info!(path = %path.display(), "watching local directory");

        Ok(Self { _watcher: watcher })
    }
}

fn handle_event(event: &Event, state: &SyncState) {
    for path in &event.paths {
        // A path that no longer exists cannot be stat'ed; removed entries
        // count as files, which keeps delete events relevant.
        let is_dir = path.is_dir();
        if should_mark_dirty(&event.kind, path, is_dir) {
            trace!(path = %path.display(), kind = ?event.kind, "local change detected");
            state.mark_dirty();
            return;
        }
    }
}
