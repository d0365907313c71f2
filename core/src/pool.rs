//! The bounded worker pool shared by brute force, hidden expansion and
//! validation.
//!
//! At most `concurrency` tasks are in flight at any time. Every task runs on
//! its own tokio task under a per-task timeout, so a slow, failing or
//! panicking task only ever produces its own [`TaskOutcome`]. There is no retry
//! and no cancellation besides the timeout.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tokio::time::timeout;
use tracing::debug;

use crate::progress::ProgressSink;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome<T> {
    Completed(T),
    TimedOut,
    Failed(String),
}

impl<T> TaskOutcome<T> {
    pub fn completed(self) -> Option<T> {
        match self {
            Self::Completed(value) => Some(value),
            Self::TimedOut | Self::Failed(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    concurrency: usize,
    task_timeout: Duration,
}

impl WorkerPool {
    pub fn new(concurrency: usize, task_timeout: Duration) -> Self {
        Self {
            concurrency: concurrency.max(1),
            task_timeout,
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Runs `make(item)` for every item and collects the outcomes in completion
    /// order.
    ///
    /// A permit is taken before each spawn, so submission waits only while the
    /// pool is full. Finished tasks are drained between submissions to keep
    /// progress reporting live.
    pub async fn run<I, T, F, Fut>(
        &self,
        stage: &str,
        items: Vec<I>,
        mut make: F,
        progress: &dyn ProgressSink,
    ) -> Vec<TaskOutcome<T>>
    where
        T: Send + 'static,
        F: FnMut(I) -> Fut,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        let total: usize = items.len();
        let semaphore: Arc<Semaphore> = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks: JoinSet<TaskOutcome<T>> = JoinSet::new();
        let mut outcomes: Vec<TaskOutcome<T>> = Vec::with_capacity(total);

        progress.begin(stage, total);

        for item in items {
            let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
                break;
            };
            let task = make(item);
            let limit: Duration = self.task_timeout;

            tasks.spawn(async move {
                let _permit = permit;
                match timeout(limit, task).await {
                    Ok(Ok(value)) => TaskOutcome::Completed(value),
                    Ok(Err(e)) => TaskOutcome::Failed(e.to_string()),
                    Err(_) => TaskOutcome::TimedOut,
                }
            });

            while let Some(joined) = tasks.try_join_next() {
                outcomes.push(flatten(joined));
                progress.advance(outcomes.len(), total);
            }
        }

        while let Some(joined) = tasks.join_next().await {
            outcomes.push(flatten(joined));
            progress.advance(outcomes.len(), total);
        }

        progress.finish(stage);
        outcomes
    }
}

fn flatten<T>(joined: Result<TaskOutcome<T>, JoinError>) -> TaskOutcome<T> {
    match joined {
        Ok(outcome) => outcome,
        Err(e) if e.is_panic() => {
            debug!("worker task panicked");
            TaskOutcome::Failed("task panicked".to_string())
        }
        Err(_) => TaskOutcome::Failed("task cancelled".to_string()),
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
