use std::time::Duration;

use async_trait::async_trait;
use tokio::net::lookup_host;
use tokio::time::timeout;
use tracing::trace;

use super::{Resolution, Resolve, SYSTEM_NAMESERVER};

/// Resolves through the operating system (`getaddrinfo`), one call per hostname.
pub struct SystemResolver {
    timeout: Duration,
}

impl SystemResolver {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl Resolve for SystemResolver {
    async fn resolve(&self, hostname: &str) -> Resolution {
        match timeout(self.timeout, lookup_host((hostname, 0))).await {
            Ok(Ok(mut addrs)) => {
                if addrs.any(|addr| addr.is_ipv4()) {
                    Resolution::resolved_by(SYSTEM_NAMESERVER)
                } else {
                    Resolution::Unresolved
                }
            }
            Ok(Err(e)) => {
                trace!("{hostname} via system: {e}");
                Resolution::Unresolved
            }
            Err(_) => {
                trace!("{hostname} via system: timed out");
                Resolution::Unresolved
            }
        }
    }

    fn name(&self) -> &'static str {
        "system"
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
