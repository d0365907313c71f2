//! # Zone Transfer
//!
//! Asks the domain's own name servers for a full copy of the zone (AXFR over
//! TCP). Almost every server refuses; the ones that do not hand over every
//! owner name of the zone at once.

use std::io;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::TokioResolver;
use subrecon_common::hostname::TargetDomain;
use subrecon_common::{info, success};
use subrecon_protocols::dns::{DNS_PORT, create_axfr_request, frame_len};
use subrecon_protocols::zone::{ZoneError, ZoneMessage, parse_transfer_message};
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

use crate::resolver::{NameserverResolver, ResolverError};

/// A transfer is complete once the closing SOA record arrives.
const SOA_BOUNDARIES: usize = 2;

#[derive(Debug, Error)]
pub enum ZoneTransferError {
    #[error("no NS or SOA host found for {0}")]
    NoServers(String),
    #[error("could not resolve name server {0}")]
    Unresolvable(String),
    #[error("timed out talking to {0}")]
    Timeout(SocketAddr),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Zone(#[from] ZoneError),
    #[error("could not build transfer request: {0}")]
    Request(String),
    #[error("response id {got:#06x} does not match request {expected:#06x}")]
    IdMismatch { expected: u16, got: u16 },
    #[error("transfer ended before the closing SOA record")]
    Incomplete,
    #[error("every name server of {0} refused the transfer")]
    Refused(String),
    #[error(transparent)]
    Resolver(#[from] ResolverError),
}

#[async_trait]
pub trait ZoneTransfer: Send + Sync {
    /// Returns every owner name of the zone, as sent by the first server that
    /// agreed to the transfer.
    async fn transfer(&self, domain: &TargetDomain) -> Result<Vec<String>, ZoneTransferError>;
}

pub struct AxfrTransfer {
    lookup: TokioResolver,
    io_timeout: Duration,
}

impl AxfrTransfer {
    pub fn new(
        nameservers: &[IpAddr],
        dns_timeout: Duration,
        io_timeout: Duration,
    ) -> Result<Self, ZoneTransferError> {
        Ok(Self {
            lookup: NameserverResolver::pooled(nameservers, dns_timeout)?,
            io_timeout,
        })
    }

    /// Hosts named by the NS records, then the SOA primary, without repeats.
    async fn transfer_hosts(&self, domain: &TargetDomain) -> Vec<String> {
        let fqdn: String = format!("{domain}.");
        let mut hosts: Vec<String> = Vec::new();

        match self.lookup.ns_lookup(fqdn.as_str()).await {
            Ok(records) => hosts.extend(records.iter().map(|ns| ns.to_string())),
            Err(e) => debug!("NS lookup for {domain} failed: {e}"),
        }
        match self.lookup.soa_lookup(fqdn.as_str()).await {
            Ok(records) => hosts.extend(records.iter().map(|soa| soa.mname().to_string())),
            Err(e) => debug!("SOA lookup for {domain} failed: {e}"),
        }

        let mut unique: Vec<String> = Vec::new();
        for host in hosts {
            let host: String = host.trim_end_matches('.').to_ascii_lowercase();
            if !host.is_empty() && !unique.contains(&host) {
                unique.push(host);
            }
        }
        unique
    }

    async fn server_address(&self, host: &str) -> Result<SocketAddr, ZoneTransferError> {
        let ips = self
            .lookup
            .lookup_ip(format!("{host}."))
            .await
            .map_err(|_| ZoneTransferError::Unresolvable(host.to_string()))?;
        let ip: IpAddr = ips
            .iter()
            .next()
            .ok_or_else(|| ZoneTransferError::Unresolvable(host.to_string()))?;
        Ok(SocketAddr::new(ip, DNS_PORT))
    }

    /// Runs one AXFR exchange against `server`.
    pub async fn attempt(
        &self,
        server: SocketAddr,
        domain: &TargetDomain,
    ) -> Result<Vec<String>, ZoneTransferError> {
        let (id, request) = create_axfr_request(domain.as_str())
            .map_err(|e| ZoneTransferError::Request(e.to_string()))?;

        let mut stream: TcpStream = timeout(self.io_timeout, TcpStream::connect(server))
            .await
            .map_err(|_| ZoneTransferError::Timeout(server))??;
        stream.write_all(&request).await?;

        let mut names: Vec<String> = Vec::new();
        let mut soa_seen: usize = 0;

        while soa_seen < SOA_BOUNDARIES {
            let mut prefix: [u8; 2] = [0; 2];
            match timeout(self.io_timeout, stream.read_exact(&mut prefix)).await {
                Ok(Ok(_)) => {}
                Ok(Err(e)) if e.kind() == io::ErrorKind::UnexpectedEof => break,
                Ok(Err(e)) => return Err(e.into()),
                Err(_) => return Err(ZoneTransferError::Timeout(server)),
            }

            let mut payload: Vec<u8> = vec![0; frame_len(prefix)];
            timeout(self.io_timeout, stream.read_exact(&mut payload))
                .await
                .map_err(|_| ZoneTransferError::Timeout(server))??;

            let message: ZoneMessage = parse_transfer_message(&payload)?;
            if message.id != id {
                return Err(ZoneTransferError::IdMismatch {
                    expected: id,
                    got: message.id,
                });
            }
            soa_seen += message.soa_records;
            names.extend(message.names);
        }

        if soa_seen < SOA_BOUNDARIES {
            return Err(ZoneTransferError::Incomplete);
        }
        Ok(names)
    }
}

#[async_trait]
impl ZoneTransfer for AxfrTransfer {
    async fn transfer(&self, domain: &TargetDomain) -> Result<Vec<String>, ZoneTransferError> {
        let hosts: Vec<String> = self.transfer_hosts(domain).await;
        if hosts.is_empty() {
            return Err(ZoneTransferError::NoServers(domain.to_string()));
        }

        for host in hosts {
            info!("Trying zone transfer on {host}");
            let attempt = match self.server_address(&host).await {
                Ok(server) => self.attempt(server, domain).await,
                Err(e) => Err(e),
            };
            match attempt {
                Ok(names) => {
                    success!("Zone transfer succeeded on {host}");
                    return Ok(names);
                }
                Err(e) => debug!("zone transfer on {host} failed: {e}"),
            }
        }

        Err(ZoneTransferError::Refused(domain.to_string()))
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
