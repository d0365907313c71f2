use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::time::Duration;

use crate::hostname::TargetDomain;

/// Public recursive nameservers, in the order they are tried.
pub const DEFAULT_NAMESERVERS: [IpAddr; 7] = [
    IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)),
    IpAddr::V4(Ipv4Addr::new(8, 8, 4, 4)),
    IpAddr::V4(Ipv4Addr::new(1, 1, 1, 1)),
    IpAddr::V4(Ipv4Addr::new(1, 0, 0, 1)),
    IpAddr::V4(Ipv4Addr::new(9, 9, 9, 9)),
    IpAddr::V4(Ipv4Addr::new(208, 67, 222, 222)),
    IpAddr::V4(Ipv4Addr::new(208, 67, 220, 220)),
];

pub const DEFAULT_THREADS: usize = 20;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_DNS_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_SOURCE_DELAY: Duration = Duration::from_secs(1);
pub const MAX_WORDLIST: usize = 500;
pub const PROGRESS_EVERY: usize = 50;

const FAST_THREADS: usize = 10;
const FAST_TIMEOUT: Duration = Duration::from_secs(15);

/// Everything a single enumeration run reads. Built once by the CLI and shared
/// read-only afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub domain: TargetDomain,
    /// Size of the worker pool used for DNS probing and validation.
    pub threads: usize,
    /// Timeout for HTTP requests and for every task of the worker pool.
    pub timeout: Duration,
    /// Timeout of a single query against one nameserver.
    pub dns_timeout: Duration,
    /// Pause between two calls to external data sources.
    pub source_delay: Duration,
    pub wordlist: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub passive: bool,
    pub active: bool,
    pub validate: bool,
    /// Skips the nameserver pool and resolves through the operating system.
    pub use_system_resolver: bool,
    pub nameservers: Vec<IpAddr>,
    /// Upper bound on the number of words probed by brute force.
    pub max_wordlist: usize,
    /// How many completed tasks between two progress log lines.
    pub progress_every: usize,
}

impl Config {
    pub fn new(domain: TargetDomain) -> Self {
        Self {
            domain,
            threads: DEFAULT_THREADS,
            timeout: DEFAULT_TIMEOUT,
            dns_timeout: DEFAULT_DNS_TIMEOUT,
            source_delay: DEFAULT_SOURCE_DELAY,
            wordlist: None,
            output: None,
            passive: true,
            active: true,
            validate: true,
            use_system_resolver: false,
            nameservers: DEFAULT_NAMESERVERS.to_vec(),
            max_wordlist: MAX_WORDLIST,
            progress_every: PROGRESS_EVERY,
        }
    }

    /// Caps concurrency, timeout and brute-force size for a quick run.
    pub fn with_fast_policy(mut self) -> Self {
        self.threads = self.threads.min(FAST_THREADS);
        self.timeout = self.timeout.min(FAST_TIMEOUT);
        self.max_wordlist = self.max_wordlist.min(MAX_WORDLIST);
        self
    }

    /// Worker count, never zero.
    pub fn concurrency(&self) -> usize {
        self.threads.max(1)
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
