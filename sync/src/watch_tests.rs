//! Unit and integration tests for the local change watcher

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use notify::event::{
    AccessKind, CreateKind, DataChange, MetadataKind, ModifyKind, RemoveKind, RenameMode,
};
use notify::EventKind;

use super::*;
use crate::state::SyncState;

mod relevance_filter {
    use super::*;

    fn file_modify() -> EventKind {
        EventKind::Modify(ModifyKind::Data(DataChange::Any))
    }

    #[test]
    fn git_metadata_paths_are_ignored() {
        let kind = EventKind::Create(CreateKind::File);
        assert!(!should_mark_dirty(&kind, Path::new("/d/notes/.git/index"), false));
        assert!(!should_mark_dirty(
            &kind,
            Path::new("/d/notes/.git/refs/heads/master"),
            false
        ));
    }

    #[test]
    fn dot_basenames_are_ignored() {
        let kind = EventKind::Create(CreateKind::File);
        assert!(!should_mark_dirty(&kind, Path::new("/d/notes/.swapfile"), false));
        assert!(!should_mark_dirty(&kind, Path::new("/d/notes/.cache"), true));
    }

    #[test]
    fn directory_modification_is_ignored() {
        assert!(!should_mark_dirty(&file_modify(), Path::new("/d/notes/sub"), true));
        assert!(!should_mark_dirty(
            &EventKind::Modify(ModifyKind::Metadata(MetadataKind::Any)),
            Path::new("/d/notes/sub"),
            true
        ));
    }

    #[test]
    fn access_events_are_ignored() {
        assert!(!should_mark_dirty(
            &EventKind::Access(AccessKind::Any),
            Path::new("/d/notes/a.txt"),
            false
        ));
    }

    #[test]
    fn file_changes_mark_dirty() {
        assert!(should_mark_dirty(
            &EventKind::Create(CreateKind::File),
            Path::new("/d/notes/a.txt"),
            false
        ));
        assert!(should_mark_dirty(&file_modify(), Path::new("/d/notes/a.txt"), false));
        assert!(should_mark_dirty(
            &EventKind::Remove(RemoveKind::File),
            Path::new("/d/notes/a.txt"),
            false
        ));
    }

    #[test]
    fn directory_creation_and_removal_mark_dirty() {
        assert!(should_mark_dirty(
            &EventKind::Create(CreateKind::Folder),
            Path::new("/d/notes/sub"),
            true
        ));
        assert!(should_mark_dirty(
            &EventKind::Remove(RemoveKind::Folder),
            Path::new("/d/notes/sub"),
            false
        ));
    }

    #[test]
    fn renames_mark_dirty_even_for_directories() {
        let kind = EventKind::Modify(ModifyKind::Name(RenameMode::Any));
        assert!(should_mark_dirty(&kind, Path::new("/d/notes/renamed"), true));
        assert!(should_mark_dirty(&kind, Path::new("/d/notes/renamed.txt"), false));
    }

    #[test]
    fn nested_file_under_dot_directory_uses_basename_only() {
        // only the final segment decides "hidden"; this matches the
        // metadata-dir rule being the sole whole-path filter
        let kind = EventKind::Create(CreateKind::File);
        assert!(should_mark_dirty(&kind, Path::new("/d/notes/.cache/data.txt"), false));
    }
}

mod live_watcher {
    use super::*;

    async fn wait_for_dirty(state: &SyncState, deadline: Duration) -> bool {
        let started = std::time::Instant::now();
        while started.elapsed() < deadline {
            if state.is_dirty() {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
        false
    }

    #[tokio::test]
    async fn file_write_marks_the_state_dirty() {
        let dir = tempfile::tempdir().unwrap();
        let state = Arc::new(SyncState::new());
        state.clear_dirty();

        let _watcher = LocalWatcher::start(dir.path(), state.clone()).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        std::fs::write(dir.path().join("note.txt"), b"hello").unwrap();

        assert!(
            wait_for_dirty(&state, Duration::from_secs(5)).await,
            "watcher never observed the write"
        );
    }

    #[tokio::test]
    async fn git_directory_churn_leaves_the_state_clean() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(GIT_DIR)).unwrap();

        let state = Arc::new(SyncState::new());
        state.clear_dirty();

        let _watcher = LocalWatcher::start(dir.path(), state.clone()).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        std::fs::write(dir.path().join(GIT_DIR).join("index"), b"x").unwrap();
        std::fs::write(dir.path().join(".hidden"), b"x").unwrap();

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(!state.is_dirty());
    }
}
