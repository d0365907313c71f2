use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use subrecon_common::hostname::TargetDomain;

use super::{Collector, SourceError, json_or_raw};
use crate::http::HttpClient;

/// Anubis subdomain database. Expected body: a JSON array of hostnames.
pub struct AnubisCollector {
    http: Arc<HttpClient>,
}

impl AnubisCollector {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Collector for AnubisCollector {
    fn name(&self) -> &'static str {
        "anubis"
    }

    async fn collect(&self, domain: &TargetDomain) -> Result<HashSet<String>, SourceError> {
        let url: String = format!("https://jonlu.ca/anubis/subdomains/{domain}");
        let body: String = self.http.get_text(&url).await?;
        parse_listing(&body, domain)
    }
}

fn parse_listing(body: &str, domain: &TargetDomain) -> Result<HashSet<String>, SourceError> {
    json_or_raw("anubis", body, domain, |entries: Vec<Value>| {
        entries
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_ascii_lowercase)
            .collect()
    })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
