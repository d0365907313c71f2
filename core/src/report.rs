use std::time::Duration;

use subrecon_common::hostname::{Hostname, TargetDomain};

/// The result of one run, handed to every [`ReportSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub domain: TargetDomain,
    /// Names confirmed by validation, ascending.
    pub validated: Vec<Hostname>,
    /// Every name discovered by any stage, ascending.
    pub discovered: Vec<Hostname>,
    pub elapsed: Duration,
}

pub trait ReportSink: Send + Sync {
    fn emit(&self, report: &Report) -> anyhow::Result<()>;
}
