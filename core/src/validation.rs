//! Second, independent resolution pass over the candidate set.
//!
//! Validation works on a snapshot taken when it starts, so the validated set is
//! always a subset of the candidates known at that moment.

use std::sync::Arc;

use subrecon_common::hostname::Hostname;
use subrecon_common::store::HostnameSet;
use subrecon_common::info;

use crate::probe::{ProbeSummary, Prober};

pub async fn validate(
    prober: &Prober<'_>,
    candidates: &HostnameSet,
    validated: &Arc<HostnameSet>,
) -> ProbeSummary {
    let snapshot: Vec<String> = candidates
        .snapshot()
        .into_iter()
        .map(Hostname::into_string)
        .collect();

    info!(
        "Validating {} names through {}",
        snapshot.len(),
        prober.resolver().name()
    );
    prober.probe_into("validation", snapshot, validated, false).await
}

/// Copies the whole candidate snapshot into `validated` without resolving.
pub fn accept_all(candidates: &HostnameSet, validated: &HostnameSet) -> usize {
    validated.extend(candidates.snapshot())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::pool::WorkerPool;
    use crate::probe::tests::{StubResolver, store};
    use crate::progress::SilentProgress;

    #[tokio::test]
    async fn validate_keeps_resolving_candidates() {
        let candidates = store();
        candidates.extend(["www.example.com", "old.example.com", "api.example.com"]);
        let validated = store();

        let pool = WorkerPool::new(3, Duration::from_secs(5));
        let resolver =
            StubResolver::new(&["www.example.com", "api.example.com", "late.example.com"]);
        let prober = Prober::new(&pool, Arc::new(resolver), &SilentProgress);

        let summary = validate(&prober, &candidates, &validated).await;

        assert_eq!(summary.probed, 3);
        let names: Vec<String> =
            validated.snapshot().into_iter().map(Hostname::into_string).collect();
        assert_eq!(names, vec!["api.example.com", "www.example.com"]);
    }

    #[test]
    fn accept_all_copies_every_candidate() {
        let candidates = store();
        candidates.extend(["a.example.com", "b.example.com"]);
        let validated = store();

        assert_eq!(accept_all(&candidates, &validated), 2);
        assert_eq!(validated.snapshot(), candidates.snapshot());
    }
}
