//! File watcher for hot reloading parameter files
//!
//! Editors often save by writing a temporary file and renaming it over the
//! original, which replaces the watched inode. The watcher therefore watches
//! each file's directory and filters events down to the registered files.

use anyhow::{Result, anyhow};
use notify::RecursiveMode;
use notify_debouncer_mini::{DebouncedEvent, new_debouncer};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, channel};
use std::time::Duration;

/// Default debounce window
pub const DEFAULT_DEBOUNCE_MS: u64 = 100;

/// Event emitted when a watched file changes
#[derive(Debug, Clone, PartialEq)]
pub enum WatchEvent {
    /// A watched file was written, created or replaced
    Modified(PathBuf),
    /// The watcher itself reported a problem
    Error(String),
}

/// Watches parameter files for changes
pub struct ParamWatcher {
    debouncer: notify_debouncer_mini::Debouncer<notify::RecommendedWatcher>,
    receiver: Receiver<WatchEvent>,
    /// Canonical paths of the watched files
    files: Arc<Mutex<Vec<PathBuf>>>,
}

impl ParamWatcher {
    /// Create a watcher; `debounce_ms` defaults to [`DEFAULT_DEBOUNCE_MS`]
    pub fn new(debounce_ms: Option<u64>) -> Result<Self> {
        let (tx, rx) = channel();
        let files: Arc<Mutex<Vec<PathBuf>>> = Arc::new(Mutex::new(Vec::new()));
        let files_in_handler = Arc::clone(&files);

        let debounce = Duration::from_millis(debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS));
        let debouncer = new_debouncer(
            debounce,
            move |result: std::result::Result<Vec<DebouncedEvent>, notify::Error>| match result {
                Ok(events) => {
                    let files = files_in_handler.lock();
                    for event in events {
                        let path = event.path.canonicalize().unwrap_or(event.path);
                        if files.contains(&path) {
                            let _ = tx.send(WatchEvent::Modified(path));
                        }
                    }
                }
                Err(e) => {
                    let _ = tx.send(WatchEvent::Error(format!("Watch error: {:?}", e)));
                }
            },
        )
        .map_err(|e| anyhow!("Failed to create file watcher: {:?}", e))?;

        Ok(Self {
            debouncer,
            receiver: rx,
            files,
        })
    }

    /// Watch a parameter file; the file must exist
    pub fn watch(&mut self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();
        let canonical = path
            .canonicalize()
            .map_err(|e| anyhow!("Cannot watch {}: {}", path.display(), e))?;
        let directory = canonical
            .parent()
            .ok_or_else(|| anyhow!("{} has no parent directory", canonical.display()))?
            .to_path_buf();

        {
            let mut files = self.files.lock();
            if !files.contains(&canonical) {
                files.push(canonical.clone());
            }
        }

        self.debouncer
            .watcher()
            .watch(&directory, RecursiveMode::NonRecursive)
            .map_err(|e| anyhow!("Failed to watch {}: {}", directory.display(), e))?;

        tracing::info!("Watching: {}", canonical.display());
        Ok(canonical)
    }

    /// Paths currently watched
    pub fn watched(&self) -> Vec<PathBuf> {
        self.files.lock().clone()
    }

    /// Try to receive a watch event (non-blocking)
    pub fn try_recv(&self) -> Option<WatchEvent> {
        self.receiver.try_recv().ok()
    }

    /// Receive a watch event (blocking)
    pub fn recv(&self) -> Option<WatchEvent> {
        self.receiver.recv().ok()
    }

    /// Receive a watch event with timeout
    pub fn recv_timeout(&self, timeout: Duration) -> Option<WatchEvent> {
        self.receiver.recv_timeout(timeout).ok()
    }

    /// Drain pending events, keeping one per changed file
    pub fn drain(&self) -> Vec<WatchEvent> {
        let mut events: Vec<WatchEvent> = Vec::new();
        for event in self.receiver.try_iter() {
            if !events.contains(&event) {
                events.push(event);
            }
        }
        events
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_files_cannot_be_watched() {
        let mut watcher = ParamWatcher::new(None).unwrap();
        let missing = std::env::temp_dir().join("ribbed-watch-test-does-not-exist.json");
        assert!(watcher.watch(&missing).is_err());
        assert!(watcher.watched().is_empty());
    }

    #[test]
    fn watching_registers_the_canonical_path() {
        let path = std::env::temp_dir().join(format!("ribbed-watch-{}.json", std::process::id()));
        std::fs::write(&path, "{}").unwrap();

        let mut watcher = ParamWatcher::new(Some(10)).unwrap();
        let canonical = watcher.watch(&path).unwrap();
        watcher.watch(&path).unwrap();
        assert_eq!(watcher.watched(), vec![canonical]);
        assert!(watcher.try_recv().is_none());

        std::fs::remove_file(&path).unwrap();
    }
}
