//! Watching the data directory for log changes.
//!
//! Editors and sync tools often write a file in several steps, so change
//! events are collected until the directory has been quiet for a moment and
//! only then reported, once.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use thiserror::Error;
use tokio::sync::mpsc;

/// Configuration for watch mode.
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// How long the files must stay unchanged before a rebuild (default: 1 second).
    pub quiet_period: Duration,
    /// Number of rebuild attempts per change (default: 3).
    pub retry_attempts: u32,
    /// Delay between rebuild attempts (default: 500ms).
    pub retry_delay: Duration,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            quiet_period: Duration::from_secs(1),
            retry_attempts: 3,
            retry_delay: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Error)]
pub enum WatcherError {
    #[error("failed to create watcher: {0}")]
    Notify(#[from] notify::Error),

    #[error("data directory does not exist: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("event channel closed unexpectedly")]
    ChannelClosed,
}

/// Trailing-edge debouncer: fires once after events stop arriving.
#[derive(Debug)]
struct Debouncer {
    quiet_period: Duration,
    last_event: Option<Instant>,
}

impl Debouncer {
    fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            last_event: None,
        }
    }

    fn record(&mut self, now: Instant) {
        self.last_event = Some(now);
    }

    /// When the pending change becomes due, if one is pending.
    fn deadline(&self) -> Option<Instant> {
        self.last_event.map(|t| t + self.quiet_period)
    }

    /// Returns true (once) if a pending change is due at `now`.
    fn fire(&mut self, now: Instant) -> bool {
        match self.deadline() {
            Some(deadline) if now >= deadline => {
                self.last_event = None;
                true
            }
            _ => false,
        }
    }
}

/// True if the event changes one of the named files.
fn is_relevant(event: &Event, names: &[&str]) -> bool {
    let changes_content = matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    );

    changes_content
        && event.paths.iter().any(|p| {
            p.file_name()
                .and_then(OsStr::to_str)
                .is_some_and(|name| names.contains(&name))
        })
}

/// Watches the named files inside `dir` and awaits `on_change` after each
/// burst of modifications.
///
/// Runs until the watcher fails.
pub async fn watch_files<F, Fut>(
    dir: impl AsRef<Path>,
    names: &[&str],
    config: &WatcherConfig,
    mut on_change: F,
) -> Result<(), WatcherError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(WatcherError::DirectoryNotFound(dir.to_path_buf()));
    }
    let dir = dir
        .canonicalize()
        .map_err(|_| WatcherError::DirectoryNotFound(dir.to_path_buf()))?;

    let (tx, mut rx) = mpsc::channel::<Event>(100);
    let mut watcher = RecommendedWatcher::new(
        move |result: Result<Event, notify::Error>| match result {
            // Dropped when full; the burst is reported anyway
            Ok(event) => {
                let _ = tx.try_send(event);
            }
            Err(e) => log::warn!("Watch error: {}", e),
        },
        notify::Config::default(),
    )?;
    // Files are often replaced rather than rewritten, so watch the directory
    watcher.watch(&dir, RecursiveMode::NonRecursive)?;

    log::info!("Watching {} in {}", names.join(", "), dir.display());

    let mut debouncer = Debouncer::new(config.quiet_period);
    loop {
        let received = match debouncer.deadline() {
            Some(deadline) => {
                let deadline = tokio::time::Instant::from_std(deadline);
                match tokio::time::timeout_at(deadline, rx.recv()).await {
                    Ok(received) => received,
                    Err(_) => {
                        if debouncer.fire(Instant::now()) {
                            log::info!("Log files changed, rebuilding");
                            on_change().await;
                        }
                        continue;
                    }
                }
            }
            None => rx.recv().await,
        };

        let Some(event) = received else {
            return Err(WatcherError::ChannelClosed);
        };

        if is_relevant(&event, names) {
            log::debug!("File event: {:?} {:?}", event.kind, event.paths);
            debouncer.record(Instant::now());
        }
    }
}
