use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Url;
use scraper::{Html, Selector};
use subrecon_common::hostname::TargetDomain;
use tracing::debug;

use super::{Collector, SourceError, hostname_pattern, scrape_raw, selector};
use crate::http::{FetchError, HttpClient};

const MAX_SCRIPTS: usize = 3;
const SCRIPT_TIMEOUT: Duration = Duration::from_secs(10);

/// Hostnames referenced from the scripts of the target's root page.
pub struct ScriptCollector {
    http: Arc<HttpClient>,
}

impl ScriptCollector {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Collector for ScriptCollector {
    fn name(&self) -> &'static str {
        "scripts"
    }

    async fn collect(&self, domain: &TargetDomain) -> Result<HashSet<String>, SourceError> {
        let page_url: String = format!("http://{domain}/");
        let base: Url = Url::parse(&page_url).map_err(|e| FetchError::InvalidUrl {
            url: page_url.clone(),
            reason: e.to_string(),
        })?;

        let page: String = self.http.get_text(base.as_str()).await?;
        let scripts: Vec<Url> = script_sources(&page, &base)?;
        let pattern: Regex = hostname_pattern(domain)?;

        let mut found: HashSet<String> = HashSet::new();
        for url in scripts.into_iter().take(MAX_SCRIPTS) {
            match self.http.get_text_with_timeout(url.as_str(), SCRIPT_TIMEOUT).await {
                Ok(body) => found.extend(scrape_raw(&pattern, &body)),
                Err(e) => debug!("skipping script {url}: {e}"),
            }
        }

        Ok(found)
    }
}

/// Absolute URLs of every `<script src>` on the page, in document order.
fn script_sources(page: &str, base: &Url) -> Result<Vec<Url>, SourceError> {
    let document: Html = Html::parse_document(page);
    let scripts: Selector = selector("script[src]")?;

    Ok(document
        .select(&scripts)
        .filter_map(|script| script.value().attr("src"))
        .filter_map(|src| base.join(src).ok())
        .collect())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
