use anyhow::{Context, Result};
use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{new_debouncer, DebouncedEvent, DebouncedEventKind};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

/// Events emitted by the file watcher
#[derive(Debug, Clone, PartialEq)]
pub enum WatchEvent {
    /// The patch source changed; reload it
    SourceChanged(Vec<String>),
}

/// A debounced watcher on a patch file or a repository working tree
pub struct FileWatcher {
    _watcher: notify_debouncer_mini::Debouncer<RecommendedWatcher>,
}

impl FileWatcher {
    /// Start watching `target`. Directories are watched recursively; for a
    /// file its parent directory is watched so editors that replace the file
    /// are still seen. Events are debounced by `debounce_ms` milliseconds.
    pub fn new(target: &Path, debounce_ms: u64, tx: mpsc::Sender<WatchEvent>) -> Result<Self> {
        let (watch_dir, only) = if target.is_dir() {
            (target.to_path_buf(), None)
        } else {
            let parent = target
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            (parent.to_path_buf(), target.file_name().map(|n| n.to_os_string()))
        };

        let mut debouncer = new_debouncer(
            Duration::from_millis(debounce_ms),
            move |result: std::result::Result<Vec<DebouncedEvent>, notify::Error>| match result {
                Ok(events) => {
                    let changed = events
                        .iter()
                        .filter(|e| e.kind == DebouncedEventKind::Any)
                        .map(|e| &e.path)
                        .filter(|p| only.as_ref().map_or(true, |name| p.file_name() == Some(name.as_os_str())));
                    let paths = relevant_paths(changed);
                    if !paths.is_empty() && tx.send(WatchEvent::SourceChanged(paths)).is_err() {
                        log::debug!("Watch receiver dropped");
                    }
                }
                Err(e) => log::warn!("File watcher error: {}", e),
            },
        )
        .context("Failed to create file watcher")?;

        let mode = if target.is_dir() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        debouncer
            .watcher()
            .watch(&watch_dir, mode)
            .with_context(|| format!("Failed to watch {}", watch_dir.display()))?;

        log::debug!("Watching {}", target.display());
        Ok(FileWatcher {
            _watcher: debouncer,
        })
    }
}

/// Drop `.git/` internals except the index, which changes on stage/unstage
fn relevant_paths<'a>(paths: impl Iterator<Item = &'a PathBuf>) -> Vec<String> {
    paths
        .filter(|p| {
            let mut components = p.components().map(|c| c.as_os_str());
            match components.position(|c| c == ".git") {
                Some(_) => p.file_name().is_some_and(|n| n == "index"),
                None => true,
            }
        })
        .map(|p| p.to_string_lossy().to_string())
        .collect()
}
