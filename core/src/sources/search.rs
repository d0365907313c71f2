use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use subrecon_common::hostname::TargetDomain;
use tracing::{debug, warn};

use super::{Collector, SourceError, find_hostnames, hostname_pattern};
use crate::http::HttpClient;

/// A search engine endpoint and the number of matches after which the
/// remaining engines are skipped for the current dork.
struct Engine {
    name: &'static str,
    base: &'static str,
    limit: usize,
}

const ENGINES: [Engine; 2] = [
    Engine {
        name: "google",
        base: "https://www.google.com/search",
        limit: 50,
    },
    Engine {
        name: "duckduckgo",
        base: "https://duckduckgo.com/html/",
        limit: 30,
    },
];

const MIN_DOTS: usize = 2;

/// Search engine dorking. Result pages are plain HTML; hostnames are pattern
/// matched anywhere in the page.
pub struct SearchEngineCollector {
    http: Arc<HttpClient>,
    pause: Duration,
}

impl SearchEngineCollector {
    pub fn new(http: Arc<HttpClient>, pause: Duration) -> Self {
        Self { http, pause }
    }

    fn dorks(domain: &TargetDomain) -> [String; 2] {
        [format!("site:*.{domain}"), format!("inurl:{domain}")]
    }
}

#[async_trait]
impl Collector for SearchEngineCollector {
    fn name(&self) -> &'static str {
        "search-engines"
    }

    async fn collect(&self, domain: &TargetDomain) -> Result<HashSet<String>, SourceError> {
        let pattern: Regex = hostname_pattern(domain)?;
        let mut found: HashSet<String> = HashSet::new();

        for dork in Self::dorks(domain) {
            for engine in &ENGINES {
                match self.http.get_query(engine.base, &[("q", dork.as_str())]).await {
                    Ok(body) => {
                        let (names, matches) = parse_results(&body, &pattern);
                        found.extend(names);
                        if matches > engine.limit {
                            debug!(
                                "{} returned {matches} matches for {dork}, skipping the rest",
                                engine.name
                            );
                            break;
                        }
                    }
                    Err(e) => warn!("{} search failed: {e}", engine.name),
                }
                tokio::time::sleep(self.pause).await;
            }
        }

        Ok(found)
    }
}

/// Returns the subdomains found on a result page and the raw match count.
fn parse_results(body: &str, pattern: &Regex) -> (HashSet<String>, usize) {
    let matches: Vec<String> = find_hostnames(pattern, body);
    let count: usize = matches.len();
    let names: HashSet<String> = matches
        .into_iter()
        .filter(|m| m.matches('.').count() >= MIN_DOTS)
        .collect();
    (names, count)
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
    use crate::sources::tests::{domain, set};

    #[test]
    fn dorks_target_the_domain() {
        assert_eq!(
            SearchEngineCollector::dorks(&domain()),
            ["site:*.example.com".to_string(), "inurl:example.com".to_string()]
        );
    }

    #[test]
    fn parse_results_counts_duplicates() {
        let pattern = hostname_pattern(&domain()).unwrap();
        let body = r#"<a href="https://docs.example.com/a">docs.example.com</a> <cite>https://docs.example.com</cite>"#;
        let (names, count) = parse_results(body, &pattern);
        assert_eq!(names, set(&["docs.example.com"]));
        assert_eq!(count, 3);
    }

    #[test]
    fn parse_results_needs_two_dots() {
        let single = TargetDomain::new("localdomain").unwrap();
        let pattern = hostname_pattern(&single).unwrap();
        let (names, count) = parse_results("host.localdomain and a.host.localdomain", &pattern);
        assert_eq!(count, 2);
        assert_eq!(names, set(&["a.host.localdomain"]));
    }
}
