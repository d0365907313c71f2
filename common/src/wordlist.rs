//! # Brute-force Wordlist
//!
//! The built-in list is a set of common service labels, each expanded with the
//! usual numbering and environment variations. A user supplied list is merged
//! in front of it, so its words survive the size cap applied before probing.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

const BASE_WORDS: &[&str] = &[
    // basics
    "www", "mail", "ftp", "smtp", "pop", "pop3", "imap", "webmail",
    // administration
    "admin", "administrator", "login", "dashboard", "control", "cpanel",
    "whm", "plesk", "webadmin", "server", "ns1", "ns2", "ns3", "ns4",
    // development
    "dev", "development", "test", "testing", "stage", "staging", "beta",
    "alpha", "demo", "sandbox", "lab", "experiment",
    // applications
    "app", "api", "api2", "api3", "mobile", "m", "wap", "apps",
    // services
    "blog", "news", "forum", "forums", "support", "help", "kb",
    "wiki", "docs", "documentation", "status", "monitor", "stats",
    "analytics", "metrics", "graph", "grafana", "prometheus",
    // files and storage
    "files", "file", "upload", "download", "storage", "backup",
    "share", "shared", "public", "private", "secure", "s",
    // cloud
    "aws", "azure", "cloud", "gcp", "s3", "bucket", "blob", "cdn",
    "cloudfront", "akamai", "fastly",
    // internal
    "internal", "intranet", "vpn", "proxy", "gateway", "router",
    "firewall", "fw", "switch", "hub", "printer", "print",
    // ci/cd
    "jenkins", "git", "gitlab", "github", "bitbucket", "svn",
    "docker", "registry", "nexus", "artifactory", "sonar",
    // databases
    "db", "database", "mysql", "postgres", "mongo", "redis",
    "elasticsearch", "kibana", "logstash", "rabbitmq",
    // mail
    "exchange", "owa",
    // dns
    "dns", "bind", "ns", "nameserver", "resolver",
    // everything else
    "portal", "center", "core", "main", "primary",
    "secondary", "failover", "replica", "cluster",
    "node", "service", "services", "svc", "endpoint",
    "bastion", "jump", "jumpserver", "terminal",
    "vcenter", "esxi", "hyperv", "xen", "kvm",
    "sharepoint", "jira", "confluence",
    "teamcity", "bamboo", "octopus", "ansible",
    "puppet", "chef", "salt", "terraform",
    "kafka", "zookeeper", "spark", "hadoop",
    "hive", "hbase", "cassandra", "couchbase",
    "orientdb", "neo4j", "arangodb", "influxdb",
    "alertmanager", "thanos",
    "consul", "etcd", "eureka",
    "istio", "linkerd", "envoy", "traefik",
    "nginx", "apache", "tomcat", "jetty",
    "iis", "weblogic", "websphere", "jboss",
    "wildfly", "glassfish", "payara",
    "php", "python", "ruby", "java",
    "go", "rust", "dotnet", "aspnet",
    "wordpress", "joomla", "drupal", "magento",
    "shopify", "woocommerce", "prestashop",
    "dynamics", "salesforce",
    "zendesk", "freshdesk", "helpdesk",
    "sentry", "rollbar", "bugsnag", "airbrake",
    "newrelic", "datadog", "appdynamics",
    "splunk", "sumologic", "loggly", "papertrail",
];

const SUFFIX_VARIATIONS: &[&str] = &[
    "1", "2", "01", "-01", "-prod", "-production", "-live", "-new", "-old",
];

const PREFIX_VARIATIONS: &[&str] = &["new-", "old-", "prod-"];

#[derive(Debug, Error)]
pub enum WordlistError {
    #[error("could not read wordlist {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// An ordered, deduplicated list of labels to probe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wordlist {
    words: Vec<String>,
}

impl Wordlist {
    /// The built-in list: every base word first, then all of their variations.
    pub fn builtin() -> Self {
        let plain = BASE_WORDS.iter().map(|w| w.to_string());
        let suffixed = BASE_WORDS
            .iter()
            .flat_map(|w| SUFFIX_VARIATIONS.iter().map(move |s| format!("{w}{s}")));
        let prefixed = BASE_WORDS
            .iter()
            .flat_map(|w| PREFIX_VARIATIONS.iter().map(move |p| format!("{p}{w}")));

        Self::from_words(plain.chain(suffixed).chain(prefixed))
    }

    /// Builds a list from arbitrary words, normalizing and dropping duplicates
    /// while keeping first-seen order.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen: HashSet<String> = HashSet::new();
        let words: Vec<String> = words
            .into_iter()
            .filter_map(|w| normalize_word(w.as_ref()))
            .filter(|w| seen.insert(w.clone()))
            .collect();
        Self { words }
    }

    /// Reads a line-delimited wordlist from disk.
    pub fn load(path: &Path) -> Result<Self, WordlistError> {
        let content: String = fs::read_to_string(path).map_err(|source| WordlistError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_words(content.lines()))
    }

    /// Returns `custom` followed by every word of `self` it does not already hold.
    pub fn merged_after(&self, custom: &Wordlist) -> Wordlist {
        Self::from_words(custom.words.iter().chain(self.words.iter()))
    }

    pub fn truncated(&self, max: usize) -> Wordlist {
        Self {
            words: self.words.iter().take(max).cloned().collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

fn normalize_word(raw: &str) -> Option<String> {
    let word: String = raw.trim().trim_matches('.').to_ascii_lowercase();
    if word.is_empty() || word.contains(char::is_whitespace) {
        return None;
    }
    Some(word)
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

    #[test]
    fn builtin_is_deduplicated_and_starts_with_plain_words() {
        let list = Wordlist::builtin();
        let words: Vec<&str> = list.iter().collect();
        let unique: HashSet<&str> = words.iter().copied().collect();

        assert_eq!(words.len(), unique.len());
        assert_eq!(words[0], "www");
        assert!(unique.contains("api-prod"));
        assert!(unique.contains("new-mail"));
        assert!(unique.contains("db01"));
    }

    #[test]
    fn builtin_keeps_every_base_word_inside_the_default_cap() {
        let capped = Wordlist::builtin().truncated(500);
        let words: HashSet<&str> = capped.iter().collect();
        assert_eq!(capped.len(), 500);
        for base in BASE_WORDS {
            assert!(words.contains(base), "{base} fell outside the cap");
        }
    }

    #[test]
    fn from_words_normalizes_and_skips_blank_lines() {
        let list = Wordlist::from_words(["  WWW ", "", "mail", "www", "two words", "vpn."]);
        assert_eq!(list.iter().collect::<Vec<_>>(), vec!["www", "mail", "vpn"]);
    }

    #[test]
    fn merged_after_puts_custom_words_first() {
        let builtin = Wordlist::from_words(["www", "mail"]);
        let custom = Wordlist::from_words(["intranet", "www"]);
        let merged = builtin.merged_after(&custom);
        assert_eq!(
            merged.iter().collect::<Vec<_>>(),
            vec!["intranet", "www", "mail"]
        );
    }

    #[test]
    fn load_reads_line_delimited_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "alpha\nbeta\n\nALPHA").unwrap();
        let list = Wordlist::load(file.path()).unwrap();
        assert_eq!(list.iter().collect::<Vec<_>>(), vec!["alpha", "beta"]);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Wordlist::load(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(matches!(err, WordlistError::Read { .. }));
    }
}
