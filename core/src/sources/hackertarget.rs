use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use subrecon_common::hostname::TargetDomain;

use super::{Collector, SourceError, keep_if_mentions};
use crate::http::HttpClient;

/// HackerTarget host search. Plain text, one `host,ip` pair per line.
pub struct HackerTargetCollector {
    http: Arc<HttpClient>,
}

impl HackerTargetCollector {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Collector for HackerTargetCollector {
    fn name(&self) -> &'static str {
        "hackertarget"
    }

    async fn collect(&self, domain: &TargetDomain) -> Result<HashSet<String>, SourceError> {
        let url: String = format!("https://api.hackertarget.com/hostsearch/?q={domain}");
        let body: String = self.http.get_text(&url).await?;
        Ok(parse_hostsearch(&body, domain))
    }
}

fn parse_hostsearch(body: &str, domain: &TargetDomain) -> HashSet<String> {
    body.lines()
        .filter_map(|line| line.split_once(','))
        .filter_map(|(host, _)| keep_if_mentions(host, domain))
        .collect()
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
    fn parse_hostsearch_keeps_first_column() {
        let body = "www.example.com,93.184.216.34\nMail.Example.com,10.0.0.1\nother.org,1.2.3.4\nAPI count exceeded";
        assert_eq!(
            parse_hostsearch(body, &domain()),
            set(&["www.example.com", "mail.example.com"])
        );
    }
}
