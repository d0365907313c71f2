//! # Enumeration Service
//!
//! Implements the "find the subdomains of a domain" use case.
//!
//! A run moves through fixed stages, strictly in order:
//!
//! ```text
//! Idle -> PassiveCollecting -> ActiveCollecting -> HiddenExpansion
//!      -> Validating -> Reporting -> Done
//! ```
//!
//! Disabled stages are passed through without doing anything. No stage can
//! abort the run: a failing collector, a refused zone transfer or an
//! unreadable wordlist only cost their own contribution.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use subrecon_common::config::Config;
use subrecon_common::hostname::TargetDomain;
use subrecon_common::store::HostnameSet;
use subrecon_common::wordlist::Wordlist;
use subrecon_common::{error, info, success, warn};
use tracing::debug;

use crate::bruteforce::brute_force;
use crate::hidden::expand_hidden;
use crate::http::HttpClient;
use crate::pool::WorkerPool;
use crate::probe::{ProbeSummary, Prober};
use crate::progress::{LogProgress, ProgressSink};
use crate::report::{Report, ReportSink};
use crate::resolver::{self, Resolve, SystemResolver};
use crate::sources::{Collector, default_collectors};
use crate::validation::{accept_all, validate};
use crate::zone::{AxfrTransfer, ZoneTransfer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    PassiveCollecting,
    ActiveCollecting,
    HiddenExpansion,
    Validating,
    Reporting,
    Done,
}

impl Stage {
    pub fn next(self) -> Self {
        match self {
            Self::Idle => Self::PassiveCollecting,
            Self::PassiveCollecting => Self::ActiveCollecting,
            Self::ActiveCollecting => Self::HiddenExpansion,
            Self::HiddenExpansion => Self::Validating,
            Self::Validating => Self::Reporting,
            Self::Reporting | Self::Done => Self::Done,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label: &str = match self {
            Self::Idle => "idle",
            Self::PassiveCollecting => "passive collection",
            Self::ActiveCollecting => "active collection",
            Self::HiddenExpansion => "hidden expansion",
            Self::Validating => "validation",
            Self::Reporting => "reporting",
            Self::Done => "done",
        };
        f.write_str(label)
    }
}

/// Application service for one enumeration run.
///
/// Owns the candidate and validated sets for the lifetime of the run. Every
/// collaborator is a trait object so tests can swap any of them for a stub.
pub struct EnumerationService {
    config: Config,
    collectors: Vec<Arc<dyn Collector>>,
    resolver: Arc<dyn Resolve>,
    validator: Arc<dyn Resolve>,
    zone_transfer: Option<Arc<dyn ZoneTransfer>>,
    wordlist: Wordlist,
    progress: Arc<dyn ProgressSink>,
    sinks: Vec<Arc<dyn ReportSink>>,
    candidates: Arc<HostnameSet>,
    validated: Arc<HostnameSet>,
    stage: Stage,
}

impl EnumerationService {
    /// A service with no collectors, no zone transfer and the built-in
    /// wordlist. `resolver` is used for every probe, validation included.
    pub fn new(config: Config, resolver: Arc<dyn Resolve>) -> Self {
        let domain: TargetDomain = config.domain.clone();
        let progress: Arc<dyn ProgressSink> = Arc::new(LogProgress::new(config.progress_every));
        Self {
            collectors: Vec::new(),
            validator: Arc::clone(&resolver),
            resolver,
            zone_transfer: None,
            wordlist: Wordlist::builtin(),
            progress,
            sinks: Vec::new(),
            candidates: Arc::new(HostnameSet::new(domain.clone())),
            validated: Arc::new(HostnameSet::new(domain)),
            stage: Stage::Idle,
            config,
        }
    }

    /// The production wiring: every passive source, AXFR against the
    /// domain's name servers, the resolver chosen by the configuration for
    /// probing and the operating system for validation.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let http: Arc<HttpClient> =
            Arc::new(HttpClient::new(config.timeout).context("building the http client")?);
        let collectors: Vec<Arc<dyn Collector>> = default_collectors(http, config.source_delay);
        let resolver: Arc<dyn Resolve> = resolver::select(&config);
        let validator: Arc<dyn Resolve> = Arc::new(SystemResolver::new(config.dns_timeout));
        let wordlist: Wordlist = load_wordlist(&config);

        let mut service: Self = Self::new(config, resolver)
            .with_collectors(collectors)
            .with_validator(validator)
            .with_wordlist(wordlist);

        let axfr = AxfrTransfer::new(
            &service.config.nameservers,
            service.config.dns_timeout,
            service.config.timeout,
        );
        match axfr {
            Ok(axfr) => service = service.with_zone_transfer(Arc::new(axfr)),
            Err(e) => warn!("Zone transfer disabled: {e}"),
        }

        Ok(service)
    }

    pub fn with_collectors(mut self, collectors: Vec<Arc<dyn Collector>>) -> Self {
        self.collectors = collectors;
        self
    }

    pub fn with_validator(mut self, validator: Arc<dyn Resolve>) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_zone_transfer(mut self, zone_transfer: Arc<dyn ZoneTransfer>) -> Self {
        self.zone_transfer = Some(zone_transfer);
        self
    }

    pub fn with_wordlist(mut self, wordlist: Wordlist) -> Self {
        self.wordlist = wordlist;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn ReportSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn candidates(&self) -> &Arc<HostnameSet> {
        &self.candidates
    }

    pub fn validated(&self) -> &Arc<HostnameSet> {
        &self.validated
    }

    /// Runs every stage once and returns the report handed to the sinks.
    ///
    /// Every call is a fresh run: the stage machine restarts at `Idle` and both
    /// sets are emptied, so nothing found by an earlier call is reported again.
    pub async fn run(&mut self) -> Report {
        self.reset();
        let started: Instant = Instant::now();
        let pool: WorkerPool = WorkerPool::new(self.config.concurrency(), self.config.timeout);

        self.enter(Stage::PassiveCollecting);
        if self.config.passive {
            self.collect_passive().await;
        }

        self.enter(Stage::ActiveCollecting);
        if self.config.active {
            self.collect_active(&pool).await;
        }

        self.enter(Stage::HiddenExpansion);
        self.find_hidden(&pool).await;

        self.enter(Stage::Validating);
        if self.config.validate {
            self.validate_candidates(&pool).await;
        } else {
            let copied: usize = accept_all(&self.candidates, &self.validated);
            info!("Validation skipped, keeping all {copied} names");
        }

        self.enter(Stage::Reporting);
        let report: Report = Report {
            domain: self.config.domain.clone(),
            validated: self.validated.snapshot(),
            discovered: self.candidates.snapshot(),
            elapsed: started.elapsed(),
        };
        for sink in &self.sinks {
            if let Err(e) = sink.emit(&report) {
                error!("Could not write results: {e:#}");
            }
        }

        self.enter(Stage::Done);
        report
    }

    fn reset(&mut self) {
        if self.stage != Stage::Idle {
            debug!("restarting after {}", self.stage);
        }
        self.stage = Stage::Idle;
        self.candidates.clear();
        self.validated.clear();
    }

    fn enter(&mut self, stage: Stage) {
        debug_assert_eq!(self.stage.next(), stage);
        debug!("entering {stage}");
        self.stage = stage;
    }

    async fn collect_passive(&self) {
        info!("Starting passive enumeration");

        for (index, collector) in self.collectors.iter().enumerate() {
            if index > 0 {
                pause(self.config.source_delay).await;
            }
            info!("Running {}", collector.name());

            let task_collector: Arc<dyn Collector> = Arc::clone(collector);
            let domain: TargetDomain = self.config.domain.clone();
            let joined = tokio::spawn(async move { task_collector.collect(&domain).await }).await;

            match joined {
                Ok(Ok(names)) => {
                    let added: usize = self.candidates.extend(&names);
                    debug!("{} returned {} names, {added} new", collector.name(), names.len());
                }
                Ok(Err(e)) => warn!("{} failed: {e}", collector.name()),
                Err(e) if e.is_panic() => warn!("{} panicked", collector.name()),
                Err(e) => warn!("{} was cancelled: {e}", collector.name()),
            }
        }

        success!(
            "Passive enumeration found {} unique subdomains",
            self.candidates.len()
        );
    }

    async fn collect_active(&self, pool: &WorkerPool) {
        info!("Starting active enumeration");

        if let Some(zone_transfer) = &self.zone_transfer {
            info!("Attempting DNS zone transfer");
            match zone_transfer.transfer(&self.config.domain).await {
                Ok(names) => {
                    let added: usize = self.candidates.extend(&names);
                    success!("Zone transfer added {added} names");
                }
                Err(e) => info!("No zone transfer: {e}"),
            }
            pause(self.config.source_delay).await;
        }

        let prober: Prober<'_> =
            Prober::new(pool, Arc::clone(&self.resolver), self.progress.as_ref());
        let summary: ProbeSummary =
            brute_force(&prober, &self.wordlist, &self.candidates, self.config.max_wordlist).await;
        log_summary("Brute force", &summary);

        success!(
            "Active enumeration completed. Total: {} subdomains",
            self.candidates.len()
        );
    }

    async fn find_hidden(&self, pool: &WorkerPool) {
        info!("Looking for hidden subdomains");
        let prober: Prober<'_> =
            Prober::new(pool, Arc::clone(&self.resolver), self.progress.as_ref());
        let summary: ProbeSummary = expand_hidden(&prober, &self.candidates).await;
        log_summary("Hidden expansion", &summary);
    }

    async fn validate_candidates(&self, pool: &WorkerPool) {
        let prober: Prober<'_> =
            Prober::new(pool, Arc::clone(&self.validator), self.progress.as_ref());
        let summary: ProbeSummary = validate(&prober, &self.candidates, &self.validated).await;
        log_summary("Validation", &summary);
        success!(
            "Validation complete: {} valid subdomains",
            self.validated.len()
        );
    }
}

/// The built-in wordlist, with the configured custom list in front of it.
///
/// An unreadable custom list is reported and the built-in list used alone.
pub fn load_wordlist(config: &Config) -> Wordlist {
    let builtin: Wordlist = Wordlist::builtin();
    let Some(path) = &config.wordlist else {
        return builtin;
    };

    match Wordlist::load(path) {
        Ok(custom) => {
            success!("Loaded {} words from {}", custom.len(), path.display());
            builtin.merged_after(&custom)
        }
        Err(e) => {
            error!("{e}");
            builtin
        }
    }
}

fn log_summary(stage: &str, summary: &ProbeSummary) {
    info!(
        "{stage}: {} probed, {} resolved, {} new",
        summary.probed, summary.resolved, summary.added
    );
    if summary.timed_out > 0 || summary.failed > 0 {
        warn!(
            "{stage}: {} probes timed out, {} failed",
            summary.timed_out, summary.failed
        );
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config() -> Config {
        Config::new(TargetDomain::new("example.com").unwrap())
    }

    #[test]
    fn stages_advance_in_order_and_stop_at_done() {
        let mut stage = Stage::Idle;
        let mut seen = vec![stage];
        while stage != Stage::Done {
            stage = stage.next();
            seen.push(stage);
        }
        assert_eq!(
            seen,
            vec![
                Stage::Idle,
                Stage::PassiveCollecting,
                Stage::ActiveCollecting,
                Stage::HiddenExpansion,
                Stage::Validating,
                Stage::Reporting,
                Stage::Done
            ]
        );
        assert_eq!(Stage::Done.next(), Stage::Done);
    }

    #[test]
    fn load_wordlist_puts_custom_words_first() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "zzz-internal\nwww").unwrap();
        let mut cfg = config();
        cfg.wordlist = Some(file.path().to_path_buf());

        let list = load_wordlist(&cfg);
        let words: Vec<&str> = list.iter().take(3).collect();
        assert_eq!(words, vec!["zzz-internal", "www", "mail"]);
        assert_eq!(list.len(), Wordlist::builtin().len() + 1);
    }

    #[test]
    fn load_wordlist_survives_a_missing_file() {
        let mut cfg = config();
        cfg.wordlist = Some("/no/such/wordlist.txt".into());
        assert_eq!(load_wordlist(&cfg), Wordlist::builtin());
    }

    #[tokio::test]
    async fn from_config_wires_every_passive_source() {
        let service = EnumerationService::from_config(config()).unwrap();
        assert_eq!(service.collectors.len(), 8);
        assert!(service.zone_transfer.is_some());
        assert_eq!(service.resolver.name(), "nameservers");
        assert_eq!(service.validator.name(), "system");
        assert_eq!(service.stage(), Stage::Idle);
    }
}
