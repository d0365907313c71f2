//! In-process stand-ins for every external collaborator of a run.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use subrecon_common::config::Config;
use subrecon_common::hostname::{Hostname, TargetDomain};
use subrecon_common::store::HostnameSet;
use subrecon_common::wordlist::Wordlist;
use subrecon_core::enumeration::EnumerationService;
use subrecon_core::progress::SilentProgress;
use subrecon_core::report::{Report, ReportSink};
use subrecon_core::resolver::{Resolution, Resolve};
use subrecon_core::sources::{Collector, SourceError};
use subrecon_core::zone::{ZoneTransfer, ZoneTransferError};

pub fn domain() -> TargetDomain {
    TargetDomain::new("example.com").expect("valid test domain")
}

/// A config with no pauses between external calls.
pub fn config() -> Config {
    let mut cfg = Config::new(domain());
    cfg.source_delay = Duration::ZERO;
    cfg.timeout = Duration::from_secs(5);
    cfg
}

/// A silent service around `resolver` with an empty wordlist.
pub fn service(cfg: Config, resolver: Arc<dyn Resolve>) -> EnumerationService {
    EnumerationService::new(cfg, resolver)
        .with_progress(Arc::new(SilentProgress))
        .with_wordlist(Wordlist::default())
}

pub fn names(report_names: &[Hostname]) -> Vec<String> {
    report_names.iter().map(|h| h.as_str().to_string()).collect()
}

/*************************************************************
                          Collectors
**************************************************************/

/// Returns a fixed list of names.
pub struct StaticCollector {
    pub name: &'static str,
    pub names: Vec<String>,
    pub calls: AtomicUsize,
}

impl StaticCollector {
    pub fn new(name: &'static str, names: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            name,
            names: names.iter().map(|n| n.to_string()).collect(),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl Collector for StaticCollector {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn collect(&self, _domain: &TargetDomain) -> Result<HashSet<String>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.names.iter().cloned().collect())
    }
}

/// A single collector returning `names`, as a ready collector list.
pub fn seed(names: &[&str]) -> Vec<Arc<dyn Collector>> {
    vec![StaticCollector::new("seed", names) as Arc<dyn Collector>]
}

/// Returns the next list of `rounds` on every call, repeating the last one.
pub struct RotatingCollector {
    rounds: Vec<Vec<String>>,
    calls: AtomicUsize,
}

impl RotatingCollector {
    pub fn new(rounds: &[&[&str]]) -> Arc<Self> {
        Arc::new(Self {
            rounds: rounds
                .iter()
                .map(|round| round.iter().map(|n| n.to_string()).collect())
                .collect(),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl Collector for RotatingCollector {
    fn name(&self) -> &'static str {
        "rotating"
    }

    async fn collect(&self, _domain: &TargetDomain) -> Result<HashSet<String>, SourceError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let round = self.rounds.get(call).or(self.rounds.last());
        Ok(round.into_iter().flatten().cloned().collect())
    }
}

/// Fails on every call.
#[derive(Default)]
pub struct FailingCollector {
    pub calls: AtomicUsize,
}

#[async_trait]
impl Collector for FailingCollector {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn collect(&self, _domain: &TargetDomain) -> Result<HashSet<String>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(SourceError::Schema("service unavailable".to_string()))
    }
}

/// Panics on every call.
pub struct PanickingCollector;

#[async_trait]
impl Collector for PanickingCollector {
    fn name(&self) -> &'static str {
        "panicking"
    }

    async fn collect(&self, _domain: &TargetDomain) -> Result<HashSet<String>, SourceError> {
        panic!("collector bug")
    }
}

/*************************************************************
                          Resolvers
**************************************************************/

/// Resolves exactly the given names, after an optional random delay, and
/// records the highest number of concurrent lookups.
pub struct StubResolver {
    known: HashSet<String>,
    max_delay_ms: u64,
    in_flight: AtomicUsize,
    pub peak: AtomicUsize,
    pub lookups: AtomicUsize,
}

impl StubResolver {
    pub fn new(known: &[&str]) -> Self {
        Self {
            known: known.iter().map(|n| n.to_string()).collect(),
            max_delay_ms: 0,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            lookups: AtomicUsize::new(0),
        }
    }

    pub fn with_random_delay(mut self, max_delay_ms: u64) -> Self {
        self.max_delay_ms = max_delay_ms;
        self
    }
}

#[async_trait]
impl Resolve for StubResolver {
    async fn resolve(&self, hostname: &str) -> Resolution {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.lookups.fetch_add(1, Ordering::SeqCst);

        if self.max_delay_ms > 0 {
            let delay = rand::random_range(0..=self.max_delay_ms);
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        if self.known.contains(hostname) {
            Resolution::resolved_by("stub")
        } else {
            Resolution::Unresolved
        }
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

/// Confirms every name, and adds `late` to `candidates` on its first lookup.
pub struct GrowingValidator {
    candidates: Arc<HostnameSet>,
    late: String,
}

impl GrowingValidator {
    pub fn new(candidates: Arc<HostnameSet>, late: &str) -> Self {
        Self {
            candidates,
            late: late.to_string(),
        }
    }
}

#[async_trait]
impl Resolve for GrowingValidator {
    async fn resolve(&self, _hostname: &str) -> Resolution {
        self.candidates.add(&self.late);
        Resolution::resolved_by("stub")
    }

    fn name(&self) -> &'static str {
        "growing"
    }
}

/*************************************************************
                       Zone and sinks
**************************************************************/

pub struct StaticZone {
    pub names: Vec<String>,
}

#[async_trait]
impl ZoneTransfer for StaticZone {
    async fn transfer(&self, _domain: &TargetDomain) -> Result<Vec<String>, ZoneTransferError> {
        Ok(self.names.clone())
    }
}

pub struct RefusingZone;

#[async_trait]
impl ZoneTransfer for RefusingZone {
    async fn transfer(&self, domain: &TargetDomain) -> Result<Vec<String>, ZoneTransferError> {
        Err(ZoneTransferError::Refused(domain.to_string()))
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub reports: Mutex<Vec<Report>>,
}

impl ReportSink for RecordingSink {
    fn emit(&self, report: &Report) -> anyhow::Result<()> {
        self.reports
            .lock()
            .map_err(|_| anyhow::anyhow!("sink poisoned"))?
            .push(report.clone());
        Ok(())
    }
}

pub struct BrokenSink;

impl ReportSink for BrokenSink {
    fn emit(&self, _report: &Report) -> anyhow::Result<()> {
        anyhow::bail!("disk full")
    }
}
