//! # Hostname Store
//!
//! [`HostnameSet`] is the deduplicating set shared by every producer of a run:
//! passive collectors, brute-force and hidden-expansion probes write candidates
//! into one instance, the validation pass writes into a second one.
//!
//! The set is owned by the run and handed to tasks behind an `Arc`. All
//! operations take the inner lock for the duration of a single call, so
//! "check then insert" is atomic and the uniqueness invariant holds under any
//! interleaving of writers.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::hostname::{Hostname, HostnameError, TargetDomain};

#[derive(Debug)]
pub struct HostnameSet {
    domain: TargetDomain,
    names: Mutex<HashSet<Hostname>>,
}

impl HostnameSet {
    pub fn new(domain: TargetDomain) -> Self {
        Self {
            domain,
            names: Mutex::new(HashSet::new()),
        }
    }

    pub fn domain(&self) -> &TargetDomain {
        &self.domain
    }

    /// Normalizes and inserts `raw`.
    ///
    /// Returns `Ok(true)` when the name was not present yet, `Ok(false)` for a
    /// duplicate and an error when `raw` is not a valid name below the domain.
    pub fn try_add(&self, raw: &str) -> Result<bool, HostnameError> {
        let host: Hostname = Hostname::parse(raw, &self.domain)?;
        Ok(self.insert(host))
    }

    /// Like [`HostnameSet::try_add`], but rejected names are absorbed silently.
    pub fn add(&self, raw: &str) -> bool {
        self.try_add(raw).unwrap_or(false)
    }

    /// Inserts an already validated hostname.
    pub fn insert(&self, host: Hostname) -> bool {
        self.lock().insert(host)
    }

    /// Adds every accepted name of `names` and returns how many were new.
    pub fn extend<I, S>(&self, names: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let accepted: Vec<Hostname> = names
            .into_iter()
            .filter_map(|raw| Hostname::parse(raw.as_ref(), &self.domain).ok())
            .collect();

        let mut guard = self.lock();
        accepted
            .into_iter()
            .filter(|host| guard.insert(host.clone()))
            .count()
    }

    pub fn contains(&self, raw: &str) -> bool {
        match Hostname::parse(raw, &self.domain) {
            Ok(host) => self.lock().contains(&host),
            Err(_) => false,
        }
    }

    /// Point-in-time copy of the set, sorted ascending.
    pub fn snapshot(&self) -> Vec<Hostname> {
        let mut hosts: Vec<Hostname> = self.lock().iter().cloned().collect();
        hosts.sort();
        hosts
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drops every name. Handles held by other owners see the empty set.
    pub fn clear(&self) {
        self.lock().clear();
    }

    // Every mutation is a single insert, so a poisoned lock still guards a consistent set.
    fn lock(&self) -> MutexGuard<'_, HashSet<Hostname>> {
        self.names.lock().unwrap_or_else(PoisonError::into_inner)
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
