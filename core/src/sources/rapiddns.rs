use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use regex::Regex;
use scraper::{Html, Selector};
use subrecon_common::hostname::TargetDomain;

use super::{Collector, SourceError, hostname_pattern, keep_if_mentions, scrape_raw, selector};
use crate::http::HttpClient;

/// RapidDNS listing. An HTML page whose result tables carry the hostname in
/// the first cell of each row.
pub struct RapidDnsCollector {
    http: Arc<HttpClient>,
}

impl RapidDnsCollector {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Collector for RapidDnsCollector {
    fn name(&self) -> &'static str {
        "rapiddns"
    }

    async fn collect(&self, domain: &TargetDomain) -> Result<HashSet<String>, SourceError> {
        let url: String = format!("https://rapiddns.io/subdomain/{domain}?full=1");
        let body: String = self.http.get_text(&url).await?;
        let pattern: Regex = hostname_pattern(domain)?;
        parse_tables(&body, domain, &pattern)
    }
}

fn parse_tables(
    body: &str,
    domain: &TargetDomain,
    pattern: &Regex,
) -> Result<HashSet<String>, SourceError> {
    let document: Html = Html::parse_document(body);
    let rows: Selector = selector("table tr")?;
    let cells: Selector = selector("td")?;

    let mut found: HashSet<String> = document
        .select(&rows)
        .filter_map(|row| row.select(&cells).next())
        .filter_map(|cell| keep_if_mentions(&cell.text().collect::<String>(), domain))
        .collect();

    found.extend(scrape_raw(pattern, body));
    Ok(found)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
