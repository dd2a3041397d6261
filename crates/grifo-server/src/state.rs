use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::sync::broadcast;

use grifo_core::paths;

/// Poll cadence for the change feed. Every mutating operation rewrites the
/// state file, so mtime polling at this rate is enough for the UI.
const WATCH_INTERVAL: Duration = Duration::from_millis(800);

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub root: PathBuf,
    pub event_tx: broadcast::Sender<()>,
}

impl AppState {
    pub fn new(root: PathBuf) -> Self {
        let (tx, _) = broadcast::channel(64);

        // The watcher needs a runtime; sync unit tests construct AppState
        // without one and simply get no change feed.
        if tokio::runtime::Handle::try_current().is_ok() {
            tokio::spawn(watch_state_file(root.clone(), tx.clone()));
        }

        Self { root, event_tx: tx }
    }
}

/// Broadcast whenever the state file changes on disk. This catches both API
/// mutations and CLI runs against the same root. The initial mtime is taken
/// as the baseline so clients connecting to an idle server see no event.
async fn watch_state_file(root: PathBuf, tx: broadcast::Sender<()>) {
    let state_file = paths::state_path(&root);
    let mut last_mtime = mtime(&state_file).await;
    loop {
        tokio::time::sleep(WATCH_INTERVAL).await;
        let current = mtime(&state_file).await;
        if current.is_some() && current != last_mtime {
            last_mtime = current;
            let _ = tx.send(());
        }
    }
}

async fn mtime(path: &Path) -> Option<SystemTime> {
    let meta = tokio::fs::metadata(path).await.ok()?;
    meta.modified().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_stores_root() {
        let state = AppState::new(PathBuf::from("/tmp/test"));
        assert_eq!(state.root, PathBuf::from("/tmp/test"));
    }

    #[tokio::test]
    async fn watcher_broadcasts_on_state_file_change() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(dir.path().to_path_buf());
        let mut rx = state.event_tx.subscribe();

        // Yield so the watcher records its missing-file baseline before the
        // write below; the write then counts as a change.
        tokio::time::sleep(Duration::from_millis(50)).await;
        std::fs::create_dir_all(paths::grifo_dir(dir.path())).unwrap();
        std::fs::write(paths::state_path(dir.path()), "version: 1\n").unwrap();

        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv()).await;
        assert!(event.is_ok(), "expected a change event within the timeout");
    }
}
