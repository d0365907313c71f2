use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use subrecon_common::hostname::TargetDomain;
use tracing::warn;

use super::{Collector, SourceError, find_hostnames, scrape_raw};
use crate::http::HttpClient;

const CERT_FIELDS: usize = 3;

/// Certificate transparency search on crt.sh.
///
/// Expected body: a JSON array of certificate entries whose `name_value`,
/// `common_name` and `subject_name` fields hold a string or a list of strings.
/// `name_value` usually packs several names separated by newlines.
pub struct CrtShCollector {
    http: Arc<HttpClient>,
    pause: Duration,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Deserialize)]
struct CertEntry {
    name_value: Option<OneOrMany>,
    common_name: Option<OneOrMany>,
    subject_name: Option<OneOrMany>,
}

impl CrtShCollector {
    pub fn new(http: Arc<HttpClient>, pause: Duration) -> Self {
        Self { http, pause }
    }

    fn queries(domain: &TargetDomain) -> [String; 3] {
        let d: &str = domain.as_str();
        [
            format!("https://crt.sh/?q=%25.{d}&output=json"),
            format!("https://crt.sh/?q={d}&output=json"),
            format!("https://crt.sh/?q=*.{d}&output=json"),
        ]
    }
}

#[async_trait]
impl Collector for CrtShCollector {
    fn name(&self) -> &'static str {
        "crt.sh"
    }

    async fn collect(&self, domain: &TargetDomain) -> Result<HashSet<String>, SourceError> {
        let pattern: Regex = super::hostname_pattern(domain)?;
        let mut found: HashSet<String> = HashSet::new();
        let mut last_error: Option<SourceError> = None;
        let mut succeeded: usize = 0;

        for url in Self::queries(domain) {
            match self.http.get_text(&url).await {
                Ok(body) => {
                    succeeded += 1;
                    found.extend(parse_entries(&body, &pattern));
                }
                Err(e) => {
                    warn!("crt.sh query failed: {e}");
                    last_error = Some(e.into());
                }
            }
            tokio::time::sleep(self.pause).await;
        }

        match last_error {
            Some(e) if succeeded == 0 => Err(e),
            _ => Ok(found),
        }
    }
}

fn parse_entries(body: &str, pattern: &Regex) -> HashSet<String> {
    let Ok(entries) = serde_json::from_str::<Vec<CertEntry>>(body) else {
        return scrape_raw(pattern, body);
    };

    let mut found: HashSet<String> = HashSet::new();
    for entry in entries {
        let fields: [Option<OneOrMany>; CERT_FIELDS] =
            [entry.name_value, entry.common_name, entry.subject_name];
        for value in fields.into_iter().flatten() {
            let values: Vec<String> = match value {
                OneOrMany::One(v) => vec![v],
                OneOrMany::Many(v) => v,
            };
            for v in values {
                found.extend(find_hostnames(pattern, &v));
            }
        }
    }
    found
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
