pub mod enumerate;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use clap::builder::RangedU64ValueParser;
use subrecon_common::config::{Config, DEFAULT_THREADS, DEFAULT_TIMEOUT};
use subrecon_common::hostname::TargetDomain;

#[derive(Parser, Debug)]
#[command(name = "subrecon")]
#[command(version, about = "Subdomain enumeration without API keys.")]
pub struct CommandLine {
    /// Target domain (e.g. example.com)
    pub domain: TargetDomain,

    /// File for validated subdomains [default: subdomains_<domain>.txt]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of concurrent DNS workers
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_THREADS,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub threads: usize,

    /// Extra words for the brute force, one per line
    #[arg(short, long)]
    pub wordlist: Option<PathBuf>,

    /// Run only passive enumeration
    #[arg(long)]
    pub passive_only: bool,

    /// Run only active enumeration
    #[arg(long)]
    pub active_only: bool,

    /// Skip DNS validation of the results
    #[arg(long)]
    pub no_validate: bool,

    /// Fewer workers and a shorter timeout
    #[arg(long)]
    pub fast: bool,

    /// HTTP and probe timeout in seconds
    #[arg(
        long,
        default_value_t = DEFAULT_TIMEOUT.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,

    /// Resolve through the operating system instead of public nameservers
    #[arg(long)]
    pub system_resolver: bool,

    /// Do not print the banner
    #[arg(long)]
    pub no_banner: bool,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn to_config(&self) -> Config {
        let mut cfg: Config = Config::new(self.domain.clone());
        cfg.threads = self.threads;
        cfg.timeout = Duration::from_secs(self.timeout);
        cfg.wordlist = self.wordlist.clone();
        cfg.output = self.output.clone();
        cfg.passive = !self.active_only;
        cfg.active = !self.passive_only;
        cfg.validate = !self.no_validate;
        cfg.use_system_resolver = self.system_resolver;

        if self.fast {
            cfg = cfg.with_fast_policy();
        }
        cfg
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

    fn parse(args: &[&str]) -> CommandLine {
        CommandLine::try_parse_from(std::iter::once("subrecon").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn defaults_enable_every_stage() {
        let cfg = parse(&["Example.COM"]).to_config();
        assert_eq!(cfg.domain.as_str(), "example.com");
        assert_eq!(cfg.threads, 20);
        assert_eq!(cfg.timeout, Duration::from_secs(30));
        assert!(cfg.passive && cfg.active && cfg.validate);
        assert!(!cfg.use_system_resolver);
    }

    #[test]
    fn stage_flags_map_to_config() {
        let cfg = parse(&["example.com", "--passive-only", "--no-validate"]).to_config();
        assert!(cfg.passive);
        assert!(!cfg.active);
        assert!(!cfg.validate);

        let cfg = parse(&["example.com", "--active-only"]).to_config();
        assert!(!cfg.passive);
        assert!(cfg.active);
    }

    #[test]
    fn fast_caps_threads_and_timeout() {
        let cfg = parse(&["example.com", "-t", "50", "--timeout", "60", "--fast"]).to_config();
        assert_eq!(cfg.threads, 10);
        assert_eq!(cfg.timeout, Duration::from_secs(15));
    }

    #[test]
    fn paths_are_passed_through() {
        let cfg = parse(&["example.com", "-o", "out.txt", "-w", "words.txt"]).to_config();
        assert_eq!(cfg.output, Some(PathBuf::from("out.txt")));
        assert_eq!(cfg.wordlist, Some(PathBuf::from("words.txt")));
    }

    #[test]
    fn zero_threads_or_timeout_are_rejected() {
        let rejected = |args: &[&str]| {
            CommandLine::try_parse_from(std::iter::once("subrecon").chain(args.iter().copied()))
                .is_err()
        };
        assert!(rejected(&["example.com", "--timeout", "0"]));
        assert!(rejected(&["example.com", "-t", "0"]));
        assert!(rejected(&["example.com", "-t", "-3"]));

        let cfg = parse(&["example.com", "-t", "1", "--timeout", "1"]).to_config();
        assert_eq!(cfg.threads, 1);
        assert_eq!(cfg.timeout, Duration::from_secs(1));
    }

    #[test]
    fn invalid_domain_is_rejected() {
        let args = ["subrecon", "exa mple.com"];
        assert!(CommandLine::try_parse_from(args).is_err());
    }
}
