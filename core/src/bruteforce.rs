//! Dictionary brute force: every word of the capped wordlist is probed as a
//! direct child of the target domain.

use std::sync::Arc;

use subrecon_common::hostname::TargetDomain;
use subrecon_common::info;
use subrecon_common::store::HostnameSet;
use subrecon_common::wordlist::Wordlist;

use crate::probe::{ProbeSummary, Prober};

/// `<word>.<domain>` for the first `max` words of the list.
pub fn candidates(wordlist: &Wordlist, domain: &TargetDomain, max: usize) -> Vec<String> {
    wordlist
        .truncated(max)
        .iter()
        .map(|word| domain.join(word))
        .collect()
}

/// Probes every word of the capped wordlist below the domain.
pub async fn brute_force(
    prober: &Prober<'_>,
    wordlist: &Wordlist,
    store: &Arc<HostnameSet>,
    max: usize,
) -> ProbeSummary {
    let hosts: Vec<String> = candidates(wordlist, store.domain(), max);
    info!(
        "Brute forcing {} names through {}",
        hosts.len(),
        prober.resolver().name()
    );
    prober.probe_into("brute force", hosts, store, true).await
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
