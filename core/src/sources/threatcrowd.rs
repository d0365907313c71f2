use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use subrecon_common::hostname::TargetDomain;

use super::{Collector, SourceError, json_or_raw};
use crate::http::HttpClient;

/// ThreatCrowd domain report.
///
/// Expected body: a JSON object with a `subdomains` array of strings and a
/// `resolutions` array of objects carrying a `domain` field.
pub struct ThreatCrowdCollector {
    http: Arc<HttpClient>,
}

#[derive(Debug, Deserialize)]
struct DomainReport {
    #[serde(default)]
    subdomains: Option<Vec<Value>>,
    #[serde(default)]
    resolutions: Option<Vec<Value>>,
}

impl ThreatCrowdCollector {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Collector for ThreatCrowdCollector {
    fn name(&self) -> &'static str {
        "threatcrowd"
    }

    async fn collect(&self, domain: &TargetDomain) -> Result<HashSet<String>, SourceError> {
        let url: String =
            format!("https://threatcrowd.org/searchApi/v2/domain/report/?domain={domain}");
        let body: String = self.http.get_text(&url).await?;
        parse_report(&body, domain)
    }
}

fn parse_report(body: &str, domain: &TargetDomain) -> Result<HashSet<String>, SourceError> {
    json_or_raw("threatcrowd", body, domain, |report: DomainReport| {
        let subdomains = report.subdomains.unwrap_or_default();
        let resolutions = report.resolutions.unwrap_or_default();

        let direct = subdomains.iter().filter_map(Value::as_str);
        let resolved = resolutions
            .iter()
            .filter_map(|r| r.get("domain"))
            .filter_map(Value::as_str);

        direct
            .chain(resolved)
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
