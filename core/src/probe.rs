//! DNS probing of many hostnames through the worker pool.

use std::sync::Arc;

use subrecon_common::store::HostnameSet;
use subrecon_common::success;
use tracing::trace;

use crate::pool::{TaskOutcome, WorkerPool};
use crate::progress::ProgressSink;
use crate::resolver::Resolve;

/// Counters of one probing pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSummary {
    pub probed: usize,
    pub resolved: usize,
    pub added: usize,
    pub timed_out: usize,
    pub failed: usize,
}

/// Resolves batches of hostnames and records the ones that answer.
pub struct Prober<'a> {
    pool: &'a WorkerPool,
    resolver: Arc<dyn Resolve>,
    progress: &'a dyn ProgressSink,
}

enum Hit {
    Added,
    Known,
    Miss,
}

impl<'a> Prober<'a> {
    pub fn new(
        pool: &'a WorkerPool,
        resolver: Arc<dyn Resolve>,
        progress: &'a dyn ProgressSink,
    ) -> Self {
        Self {
            pool,
            resolver,
            progress,
        }
    }

    pub fn resolver(&self) -> &dyn Resolve {
        self.resolver.as_ref()
    }

    /// Resolves every host and adds the resolving ones to `store` from inside
    /// the workers. With `announce`, every new name gets a success line.
    pub async fn probe_into(
        &self,
        stage: &str,
        hosts: Vec<String>,
        store: &Arc<HostnameSet>,
        announce: bool,
    ) -> ProbeSummary {
        let probed: usize = hosts.len();
        let outcomes: Vec<TaskOutcome<Hit>> = self
            .pool
            .run(
                stage,
                hosts,
                |host: String| {
                    let resolver: Arc<dyn Resolve> = Arc::clone(&self.resolver);
                    let store: Arc<HostnameSet> = Arc::clone(store);
                    async move {
                        let resolution = resolver.resolve(&host).await;
                        let Some(nameserver) = resolution.nameserver() else {
                            trace!("{host} did not resolve");
                            return Ok(Hit::Miss);
                        };
                        if !store.add(&host) {
                            return Ok(Hit::Known);
                        }
                        if announce {
                            success!("Found: {host} ({nameserver})");
                        }
                        Ok(Hit::Added)
                    }
                },
                self.progress,
            )
            .await;

        let mut summary: ProbeSummary = ProbeSummary {
            probed,
            ..ProbeSummary::default()
        };
        for outcome in outcomes {
            match outcome {
                TaskOutcome::Completed(Hit::Added) => {
                    summary.resolved += 1;
                    summary.added += 1;
                }
                TaskOutcome::Completed(Hit::Known) => summary.resolved += 1,
                TaskOutcome::Completed(Hit::Miss) => {}
                TaskOutcome::TimedOut => summary.timed_out += 1,
                TaskOutcome::Failed(_) => summary.failed += 1,
            }
        }
        summary
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
