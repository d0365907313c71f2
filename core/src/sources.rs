//! Passive **data sources**.
//!
//! Every external service sits behind the [`Collector`] trait. A collector only
//! turns one service's response into candidate hostnames; containment and
//! normalization are left to the store, so collectors may return noise.
//!
//! Most services answer JSON. When a body does not deserialize into the shape
//! documented on its adapter, the collector falls back to pattern matching the
//! raw text.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use scraper::Selector;
use serde::de::DeserializeOwned;
use subrecon_common::hostname::TargetDomain;
use thiserror::Error;
use tracing::debug;

use crate::http::{FetchError, HttpClient};

mod anubis;
mod bufferover;
mod crtsh;
mod hackertarget;
mod rapiddns;
mod scripts;
mod search;
mod threatcrowd;

pub use anubis::AnubisCollector;
pub use bufferover::BufferOverCollector;
pub use crtsh::CrtShCollector;
pub use hackertarget::HackerTargetCollector;
pub use rapiddns::RapidDnsCollector;
pub use scripts::ScriptCollector;
pub use search::SearchEngineCollector;
pub use threatcrowd::ThreatCrowdCollector;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("unexpected response: {0}")]
    Schema(String),
    #[error("invalid hostname pattern: {0}")]
    Pattern(#[from] regex::Error),
}

#[async_trait]
pub trait Collector: Send + Sync {
    fn name(&self) -> &'static str;

    /// Queries the service for names below `domain`.
    async fn collect(&self, domain: &TargetDomain) -> Result<HashSet<String>, SourceError>;
}

/// The passive sources, in the order they are queried.
///
/// `pause` is the delay between two calls made by the same collector.
pub fn default_collectors(http: Arc<HttpClient>, pause: Duration) -> Vec<Arc<dyn Collector>> {
    vec![
        Arc::new(CrtShCollector::new(Arc::clone(&http), pause / 2)),
        Arc::new(HackerTargetCollector::new(Arc::clone(&http))),
        Arc::new(AnubisCollector::new(Arc::clone(&http))),
        Arc::new(ThreatCrowdCollector::new(Arc::clone(&http))),
        Arc::new(RapidDnsCollector::new(Arc::clone(&http))),
        Arc::new(BufferOverCollector::new(Arc::clone(&http))),
        Arc::new(SearchEngineCollector::new(Arc::clone(&http), pause)),
        Arc::new(ScriptCollector::new(http)),
    ]
}

/// Matches `<labels>.<domain>`, optionally behind an `http(s)://` scheme.
/// The hostname is capture group 1. It may not run on into a longer label, so
/// `foo.example.community` is not read as `foo.example.com`.
pub(crate) fn hostname_pattern(domain: &TargetDomain) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r"(?i)(?:https?://)?([\w.-]+\.{})(?:[^\w-]|$)",
        regex::escape(domain.as_str())
    ))
}

/// Every match of `pattern` in `text`, lowercased, duplicates kept.
pub(crate) fn find_hostnames(pattern: &Regex, text: &str) -> Vec<String> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_ascii_lowercase())
        .collect()
}

pub(crate) fn scrape_raw(pattern: &Regex, text: &str) -> HashSet<String> {
    find_hostnames(pattern, text).into_iter().collect()
}

/// Deserializes `body` as `T` and extracts names from it, or pattern matches
/// the raw body when it has another shape.
pub(crate) fn json_or_raw<T, F>(
    source: &str,
    body: &str,
    domain: &TargetDomain,
    extract: F,
) -> Result<HashSet<String>, SourceError>
where
    T: DeserializeOwned,
    F: FnOnce(T) -> HashSet<String>,
{
    match serde_json::from_str::<T>(body) {
        Ok(parsed) => Ok(extract(parsed)),
        Err(e) => {
            debug!("{source}: body is not the expected json ({e}), scraping raw text");
            let pattern: Regex = hostname_pattern(domain)?;
            Ok(scrape_raw(&pattern, body))
        }
    }
}

pub(crate) fn selector(css: &'static str) -> Result<Selector, SourceError> {
    Selector::parse(css).map_err(|e| SourceError::Schema(format!("css selector {css}: {e:?}")))
}

/// Keeps `name` lowercased and trimmed when it mentions the domain at all.
pub(crate) fn keep_if_mentions(name: &str, domain: &TargetDomain) -> Option<String> {
    let name: String = name.trim().to_ascii_lowercase();
    (!name.is_empty() && name.contains(domain.as_str())).then_some(name)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
