//! The **abstraction** for DNS resolution.
//!
//! Every probe of a run (brute force, hidden expansion, validation) answers one
//! question: does this hostname have an address record? [`Resolve`] is that
//! question, and two strategies answer it:
//!
//! * [`NameserverResolver`]: asks each public nameserver of the pool in order.
//! * [`SystemResolver`]: a single lookup through the operating system.
//!
//! The strategy is chosen once, in [`select`], from the run configuration.
//! Lookup failures of any kind are folded into [`Resolution::Unresolved`];
//! only building a strategy can fail.

use std::sync::Arc;

use async_trait::async_trait;
use subrecon_common::{config::Config, warn};
use thiserror::Error;

mod nameserver;
mod system;

pub use nameserver::NameserverResolver;
pub use system::SystemResolver;

/// Identifier reported when the operating system answered.
pub const SYSTEM_NAMESERVER: &str = "system";

/// Outcome of resolving one hostname.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// At least one address record was returned by `nameserver`.
    Resolved { nameserver: String },
    Unresolved,
}

impl Resolution {
    pub fn resolved_by(nameserver: impl Into<String>) -> Self {
        Self::Resolved {
            nameserver: nameserver.into(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }

    pub fn nameserver(&self) -> Option<&str> {
        match self {
            Self::Resolved { nameserver } => Some(nameserver),
            Self::Unresolved => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ResolverError {
    #[error("no nameservers configured")]
    NoNameservers,
}

#[async_trait]
pub trait Resolve: Send + Sync {
    /// Looks up address records for `hostname`. Never fails; any lookup error is
    /// reported as [`Resolution::Unresolved`].
    async fn resolve(&self, hostname: &str) -> Resolution;

    /// Short name of the strategy, used in log lines.
    fn name(&self) -> &'static str;
}

/// Picks the resolution strategy for a run.
///
/// The nameserver pool is used unless the configuration asks for the system
/// resolver or the pool cannot be built.
pub fn select(cfg: &Config) -> Arc<dyn Resolve> {
    if cfg.use_system_resolver {
        return Arc::new(SystemResolver::new(cfg.dns_timeout));
    }

    match NameserverResolver::new(&cfg.nameservers, cfg.dns_timeout) {
        Ok(resolver) => Arc::new(resolver),
        Err(e) => {
            warn!("Falling back to the system resolver: {e}");
            Arc::new(SystemResolver::new(cfg.dns_timeout))
        }
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
