use anyhow::{Context, Result};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode, DebounceEventResult};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Quiet period before a burst of saves triggers one rebuild.
const DEBOUNCE: Duration = Duration::from_secs(2);

/// Watch `guide_path` and call `rebuild` after every debounced change.
///
/// Blocks until the watcher shuts down. Rebuild failures are logged and the
/// watch continues, so a half-saved file does not end the session.
pub fn watch_guide<F>(guide_path: &Path, mut rebuild: F) -> Result<()>
where
    F: FnMut() -> Result<()>,
{
    let watch_dir = guide_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let file_name = guide_path
        .file_name()
        .context("Guide path has no file name")?
        .to_os_string();

    let (tx, rx) = mpsc::channel();

    let mut debouncer = new_debouncer(DEBOUNCE, move |result: DebounceEventResult| match result {
        Ok(events) => {
            let touched = events
                .iter()
                .any(|e| e.path.file_name() == Some(file_name.as_os_str()));
            if touched {
                let _ = tx.send(());
            }
        }
        Err(e) => warn!(error = %e, "File watcher error"),
    })
    .context("Failed to create debouncer")?;

    debouncer
        .watcher()
        .watch(&watch_dir, RecursiveMode::NonRecursive)
        .with_context(|| format!("Failed to watch {}", watch_dir.display()))?;

    info!(file = %guide_path.display(), "Watching for changes (Ctrl+C to stop)");

    while rx.recv().is_ok() {
        info!("Detected changes, rebuilding");
        if let Err(e) = rebuild() {
            error!(error = %format!("{e:#}"), "Rebuild failed");
        }
    }

    Ok(())
}
