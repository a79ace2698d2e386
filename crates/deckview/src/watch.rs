//! Live reload: notice when the deck source changes on disk.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use notify_debouncer_mini::notify::{self, RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{DebounceEventResult, DebouncedEventKind, Debouncer, new_debouncer};

const DEBOUNCE: Duration = Duration::from_millis(200);

/// Watches one deck file. The parent directory is watched so that editors
/// which replace the file on save are still picked up.
pub struct DeckWatcher {
    path: PathBuf,
    _debouncer: Debouncer<RecommendedWatcher>,
    rx: Receiver<DebounceEventResult>,
}

impl DeckWatcher {
    pub fn start(path: &Path) -> notify::Result<Self> {
        let path = path
            .canonicalize()
            .map_err(|e| notify::Error::io(e).add_path(path.to_path_buf()))?;
        let dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();

        let (tx, rx) = mpsc::channel();
        let mut debouncer = new_debouncer(DEBOUNCE, tx)?;
        debouncer.watcher().watch(&dir, RecursiveMode::NonRecursive)?;
        log::info!("watching {} for changes", path.display());

        Ok(Self {
            path,
            _debouncer: debouncer,
            rx,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Non-blocking. True when the deck file changed since the last call.
    pub fn poll_changed(&self) -> bool {
        let mut changed = false;
        while let Ok(result) = self.rx.try_recv() {
            match result {
                Ok(events) => {
                    changed |= events.iter().any(|e| {
                        e.kind == DebouncedEventKind::Any && same_file(&e.path, &self.path)
                    });
                }
                Err(e) => log::warn!("file watcher error: {e}"),
            }
        }
        if changed {
            log::debug!("{} changed", self.path.display());
        }
        changed
    }
}

/// Only the deck's directory is watched, so the file name is enough.
fn same_file(event_path: &Path, target: &Path) -> bool {
    event_path.file_name() == target.file_name()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_file_filters_siblings() {
        let target = Path::new("/talks/intro.md");
        assert!(same_file(Path::new("/talks/intro.md"), target));
        assert!(!same_file(Path::new("/talks/intro.md.swp"), target));
        assert!(!same_file(Path::new("/talks/other.md"), target));
    }

    #[test]
    fn test_missing_file_fails_to_start() {
        assert!(DeckWatcher::start(Path::new("/no/such/deck.md")).is_err());
    }

    #[test]
    fn test_quiet_watcher_reports_nothing() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../sample-decks/intro.md");
        let watcher = DeckWatcher::start(&path).unwrap();
        assert!(!watcher.poll_changed());
        assert!(watcher.path().ends_with("intro.md"));
    }
}
