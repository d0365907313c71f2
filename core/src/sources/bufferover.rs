use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use subrecon_common::hostname::TargetDomain;

use super::{Collector, SourceError, json_or_raw, keep_if_mentions};
use crate::http::HttpClient;

/// BufferOver passive DNS.
///
/// Expected body: a JSON object whose `FDNS_A` array holds `ip,host` strings.
pub struct BufferOverCollector {
    http: Arc<HttpClient>,
}

#[derive(Debug, Deserialize)]
struct ForwardDns {
    #[serde(rename = "FDNS_A", default)]
    fdns_a: Option<Vec<Value>>,
}

impl BufferOverCollector {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Collector for BufferOverCollector {
    fn name(&self) -> &'static str {
        "bufferover"
    }

    async fn collect(&self, domain: &TargetDomain) -> Result<HashSet<String>, SourceError> {
        let url: String = format!("https://dns.bufferover.run/dns?q=.{domain}");
        let body: String = self.http.get_text(&url).await?;
        parse_records(&body, domain)
    }
}

fn parse_records(body: &str, domain: &TargetDomain) -> Result<HashSet<String>, SourceError> {
    json_or_raw("bufferover", body, domain, |report: ForwardDns| {
        report
            .fdns_a
            .unwrap_or_default()
            .iter()
            .filter_map(Value::as_str)
            .flat_map(|record| record.split(','))
            .filter_map(|part| keep_if_mentions(part, domain))
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
