//! Progress reporting for long-running stages of the worker pool.

use std::sync::Mutex;

use tracing::info;

/// Receives progress of one pool run at a time.
///
/// Implementations must tolerate `advance` being called from the task that
/// drives the pool while workers are still running.
pub trait ProgressSink: Send + Sync {
    fn begin(&self, stage: &str, total: usize);
    fn advance(&self, completed: usize, total: usize);
    fn finish(&self, stage: &str);
}

/// Logs a `Checked i/n` line every `every` completions, and once at the end.
pub struct LogProgress {
    every: usize,
    stage: Mutex<String>,
}

impl LogProgress {
    pub fn new(every: usize) -> Self {
        Self {
            every: every.max(1),
            stage: Mutex::new(String::new()),
        }
    }

    fn stage(&self) -> String {
        self.stage
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }
}

impl ProgressSink for LogProgress {
    fn begin(&self, stage: &str, total: usize) {
        if let Ok(mut current) = self.stage.lock() {
            *current = stage.to_string();
        }
        info!("{stage}: {total} tasks queued");
    }

    fn advance(&self, completed: usize, total: usize) {
        if completed % self.every == 0 || completed == total {
            info!("Checked {completed}/{total} ({})", self.stage());
        }
    }

    fn finish(&self, _stage: &str) {}
}

/// Discards every update.
pub struct SilentProgress;

impl ProgressSink for SilentProgress {
    fn begin(&self, _stage: &str, _total: usize) {}
    fn advance(&self, _completed: usize, _total: usize) {}
    fn finish(&self, _stage: &str) {}
}
