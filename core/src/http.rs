//! The HTTP client shared by every passive collector.

use std::time::Duration;

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use reqwest::{Client, Url};
use thiserror::Error;
use tracing::debug;

const USER_AGENTS: [&str; 3] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
];

const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const BROWSER_LANGUAGE: &str = "en-US,en;q=0.5";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("could not build http client: {0}")]
    Build(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },
    #[error("invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// A browser-looking client. Certificate validation is off because many
/// targets serve self-signed or mismatched certificates.
pub struct HttpClient {
    client: Client,
    timeout: Duration,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let mut headers: HeaderMap = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(BROWSER_LANGUAGE));

        let user_agent: &str = USER_AGENTS[rand::random_range(0..USER_AGENTS.len())];

        let client: Client = Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .danger_accept_invalid_certs(true)
            .timeout(timeout)
            .build()
            .map_err(FetchError::Build)?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        self.get_text_with_timeout(url, self.timeout).await
    }

    /// Fetches `url` and returns its body, failing on any non-2xx status.
    pub async fn get_text_with_timeout(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<String, FetchError> {
        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })
    }

    /// Fetches `base` with `params` appended as an encoded query string.
    pub async fn get_query(
        &self,
        base: &str,
        params: &[(&str, &str)],
    ) -> Result<String, FetchError> {
        let url: Url = with_query(base, params)?;
        self.get_text(url.as_str()).await
    }
}

pub fn with_query(base: &str, params: &[(&str, &str)]) -> Result<Url, FetchError> {
    Url::parse_with_params(base, params).map_err(|e| FetchError::InvalidUrl {
        url: base.to_string(),
        reason: e.to_string(),
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
