//! The watch loop: re-render templates as the source directory changes.

use std::collections::BTreeSet;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use sitesmith_render::Renderer;
use tokio::sync::mpsc;

use crate::watcher::{FileWatcher, WatchEvent};

/// Events arriving within this window of each other are handled as one batch.
pub const DEBOUNCE: Duration = Duration::from_millis(100);

/// Errors that can occur in watch mode.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("File watch error: {0}")]
    WatchError(String),

    #[error("File watcher stopped unexpectedly")]
    Disconnected,
}

/// What happened while watching.
#[derive(Debug, Clone, Default)]
pub struct WatchSummary {
    /// Re-render passes that succeeded
    pub passes: usize,

    /// Re-render passes that failed
    pub failures: usize,
}

/// Watch the renderer's source directory and re-render on every change.
///
/// Blocks until `shutdown` completes. A failing re-render is logged and the
/// loop keeps going, so a template typo does not end the session.
pub async fn watch<R, S>(renderer: &R, shutdown: S) -> Result<WatchSummary, WatchError>
where
    R: Renderer + ?Sized,
    S: Future<Output = ()>,
{
    let source_dir = renderer.source_dir().to_path_buf();
    let (watcher, mut rx) = FileWatcher::new(&[source_dir.clone()])
        .map_err(|e| WatchError::WatchError(e.to_string()))?;

    tracing::info!(
        "Watching {} for changes (press Ctrl-C to stop)",
        source_dir.display()
    );

    tokio::pin!(shutdown);
    let mut summary = WatchSummary::default();

    loop {
        let first = tokio::select! {
            _ = &mut shutdown => break,
            event = rx.recv() => match event {
                Some(event) => event,
                None => return Err(WatchError::Disconnected),
            },
        };

        let changed = collect_burst(first, &mut rx).await;
        tracing::debug!("{} path(s) changed", changed.len());

        match renderer.rerender(&changed) {
            Ok(report) => {
                summary.passes += 1;
                if report.count() > 0 {
                    tracing::info!(
                        "Re-rendered {} file(s) in {}ms",
                        report.count(),
                        report.duration_ms
                    );
                }
            }
            Err(e) => {
                summary.failures += 1;
                tracing::error!("Re-render failed: {}", e);
            }
        }
    }

    drop(watcher);
    tracing::info!("Stopped watching {}", source_dir.display());

    Ok(summary)
}

/// Drain events until the channel has been quiet for [`DEBOUNCE`].
async fn collect_burst(first: WatchEvent, rx: &mut mpsc::Receiver<WatchEvent>) -> Vec<PathBuf> {
    let mut changed = BTreeSet::from([first.into_path()]);

    while let Ok(Some(event)) = tokio::time::timeout(DEBOUNCE, rx.recv()).await {
        changed.insert(event.into_path());
    }

    changed.into_iter().collect()
}
