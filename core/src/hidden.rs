//! Expansion of already known names into environment variants
//! (`dev-api`, `api-staging`, ...) that are often left out of public records.

use std::collections::HashSet;
use std::sync::Arc;

use subrecon_common::hostname::{Hostname, TargetDomain};
use subrecon_common::info;
use subrecon_common::store::HostnameSet;

use crate::probe::{ProbeSummary, Prober};

const PREFIXES: [&str; 6] = ["dev-", "test-", "staging-", "prod-", "uat-", "qa-"];
const SUFFIXES: [&str; 5] = ["-dev", "-test", "-stage", "-prod", "-staging"];

const MAX_BASES: usize = 20;
const MAX_BASE_LEN: usize = 50;

/// Variants of the first [`MAX_BASES`] distinct label bases of `snapshot`.
///
/// A base is the part of a name in front of the domain. Bases of
/// [`MAX_BASE_LEN`] characters or more are skipped.
pub fn derive_variants(snapshot: &[Hostname], domain: &TargetDomain) -> Vec<String> {
    let mut bases: Vec<&str> = Vec::new();
    for host in snapshot {
        let base: &str = host.relative_to(domain);
        if base.is_empty() || base.len() >= MAX_BASE_LEN || bases.contains(&base) {
            continue;
        }
        bases.push(base);
        if bases.len() == MAX_BASES {
            break;
        }
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut variants: Vec<String> = Vec::new();
    for base in bases {
        let prefixed = PREFIXES.iter().map(|p| format!("{p}{base}"));
        let suffixed = SUFFIXES.iter().map(|s| format!("{base}{s}"));
        for label in prefixed.chain(suffixed) {
            let name: String = domain.join(&label);
            if seen.insert(name.clone()) {
                variants.push(name);
            }
        }
    }
    variants
}

/// Probes every variant that is not already in `store`.
pub async fn expand_hidden(prober: &Prober<'_>, store: &Arc<HostnameSet>) -> ProbeSummary {
    let snapshot: Vec<Hostname> = store.snapshot();
    let variants: Vec<String> = derive_variants(&snapshot, store.domain())
        .into_iter()
        .filter(|name| !store.contains(name))
        .collect();

    info!(
        "Probing {} variants of {} known names",
        variants.len(),
        snapshot.len()
    );
    prober.probe_into("hidden expansion", variants, store, true).await
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
