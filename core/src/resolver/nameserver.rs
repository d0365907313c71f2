use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::TokioResolver;
use hickory_resolver::config::{NameServerConfig, ResolverConfig, ResolverOpts};
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::proto::xfer::Protocol;
use tokio::time::timeout;
use tracing::trace;

use super::{Resolution, Resolve, ResolverError};

const DNS_PORT: u16 = 53;

/// Resolves through a fixed list of public nameservers, one at a time.
///
/// Each nameserver gets its own single-server resolver so the priority order is
/// kept and one slow server only costs one attempt timeout.
pub struct NameserverResolver {
    servers: Vec<(IpAddr, TokioResolver)>,
    attempt_timeout: Duration,
}

impl NameserverResolver {
    pub fn new(nameservers: &[IpAddr], attempt_timeout: Duration) -> Result<Self, ResolverError> {
        if nameservers.is_empty() {
            return Err(ResolverError::NoNameservers);
        }

        let servers: Vec<(IpAddr, TokioResolver)> = nameservers
            .iter()
            .map(|ip| (*ip, build_resolver(&[*ip], attempt_timeout)))
            .collect();

        Ok(Self {
            servers,
            attempt_timeout,
        })
    }

    /// One resolver spreading its queries over the whole pool, for record
    /// types other than A (NS and SOA lookups of the zone transfer).
    pub fn pooled(
        nameservers: &[IpAddr],
        attempt_timeout: Duration,
    ) -> Result<TokioResolver, ResolverError> {
        if nameservers.is_empty() {
            return Err(ResolverError::NoNameservers);
        }
        Ok(build_resolver(nameservers, attempt_timeout))
    }

    pub fn nameservers(&self) -> impl Iterator<Item = &IpAddr> {
        self.servers.iter().map(|(ip, _)| ip)
    }
}

#[async_trait]
impl Resolve for NameserverResolver {
    async fn resolve(&self, hostname: &str) -> Resolution {
        let fqdn: String = format!("{}.", hostname.trim_end_matches('.'));

        for (ip, resolver) in &self.servers {
            match timeout(self.attempt_timeout, resolver.ipv4_lookup(fqdn.as_str())).await {
                Ok(Ok(lookup)) => {
                    if lookup.iter().next().is_some() {
                        return Resolution::resolved_by(ip.to_string());
                    }
                }
                Ok(Err(e)) => trace!("{hostname} via {ip}: {e}"),
                Err(_) => trace!("{hostname} via {ip}: timed out"),
            }
        }

        Resolution::Unresolved
    }

    fn name(&self) -> &'static str {
        "nameservers"
    }
}

fn build_resolver(nameservers: &[IpAddr], attempt_timeout: Duration) -> TokioResolver {
    let mut config: ResolverConfig = ResolverConfig::new();
    for ip in nameservers {
        config.add_name_server(NameServerConfig::new(
            SocketAddr::new(*ip, DNS_PORT),
            Protocol::Udp,
        ));
    }

    let mut options: ResolverOpts = ResolverOpts::default();
    options.timeout = attempt_timeout;
    options.attempts = 1;

    TokioResolver::builder_with_config(config, TokioConnectionProvider::default())
        .with_options(options)
        .build()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use subrecon_common::config::DEFAULT_NAMESERVERS;

    #[test]
    fn new_rejects_an_empty_pool() {
        assert!(matches!(
            NameserverResolver::new(&[], Duration::from_secs(1)),
            Err(ResolverError::NoNameservers)
        ));
    }

    #[tokio::test]
    async fn new_keeps_priority_order() {
        let resolver =
            NameserverResolver::new(&DEFAULT_NAMESERVERS, Duration::from_secs(1)).unwrap();
        let order: Vec<IpAddr> = resolver.nameservers().copied().collect();
        assert_eq!(order, DEFAULT_NAMESERVERS.to_vec());
    }

    #[tokio::test]
    async fn unreachable_nameserver_is_unresolved() {
        // TEST-NET-1, nothing answers there
        let dead = [IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1))];
        let resolver = NameserverResolver::new(&dead, Duration::from_millis(200)).unwrap();
        assert_eq!(resolver.resolve("www.example.com").await, Resolution::Unresolved);
    }

    #[tokio::test]
    #[ignore]
    async fn public_pool_resolves_a_known_name() {
        let resolver =
            NameserverResolver::new(&DEFAULT_NAMESERVERS, Duration::from_secs(5)).unwrap();
        let result = resolver.resolve("www.example.com").await;
        assert_eq!(result.nameserver(), Some("8.8.8.8"));
    }
}
