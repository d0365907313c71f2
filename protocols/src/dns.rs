use anyhow::{Context, ensure};
use pnet::packet::dns::{DnsClass, DnsType, MutableDnsPacket, Opcode, Retcode};

pub const DNS_HDR_LEN: usize = 12;
pub const DNS_PORT: u16 = 53;

/// Query type of a full zone transfer (RFC 5936).
pub const AXFR: DnsType = DnsType(252);

const CLASS_IN: DnsClass = DnsClass(1);
const MAX_LABEL_LEN: usize = 63;
const TCP_LEN_PREFIX: usize = 2;

/// Builds a single-question query message for `name`.
pub fn create_query_packet(
    name: &str,
    qtype: DnsType,
    id: u16,
    recursive: bool,
) -> anyhow::Result<Vec<u8>> {
    let qname: Vec<u8> = encode_dns_name(name)?;
    let q_fixed_len: usize = 4;
    let total: usize = DNS_HDR_LEN + qname.len() + q_fixed_len;
    let mut buffer: Vec<u8> = vec![0u8; total];

    {
        let mut dns: MutableDnsPacket =
            MutableDnsPacket::new(&mut buffer).context("creating dns header")?;
        dns.set_id(id);
        dns.set_is_response(0);
        dns.set_opcode(Opcode::StandardQuery);
        dns.set_is_authoriative(0);
        dns.set_is_truncated(0);
        dns.set_is_recursion_desirable(u8::from(recursive));
        dns.set_is_recursion_available(0);
        dns.set_zero_reserved(0);
        dns.set_is_non_authenticated_data(0);
        dns.set_rcode(Retcode::NoError);
        dns.set_query_count(1);
        dns.set_response_count(0);
        dns.set_authority_rr_count(0);
        dns.set_additional_rr_count(0);
    }

    // The question section is written by hand after the header
    let mut cursor: usize = DNS_HDR_LEN;

    buffer[cursor..cursor + qname.len()].copy_from_slice(&qname);
    cursor += qname.len();

    buffer[cursor..cursor + 2].copy_from_slice(&qtype.0.to_be_bytes());
    cursor += 2;

    buffer[cursor..cursor + 2].copy_from_slice(&CLASS_IN.0.to_be_bytes());

    Ok(buffer)
}

/// Builds a TCP-framed AXFR request for `zone` with a random transaction id.
pub fn create_axfr_request(zone: &str) -> anyhow::Result<(u16, Vec<u8>)> {
    let id: u16 = rand::random();
    let message: Vec<u8> = create_query_packet(zone, AXFR, id, false)?;
    Ok((id, frame_for_tcp(&message)?))
}

/// Prefixes a message with its two-byte big-endian length, as DNS over TCP requires.
pub fn frame_for_tcp(message: &[u8]) -> anyhow::Result<Vec<u8>> {
    let len: u16 = u16::try_from(message.len()).context("dns message too large for tcp")?;
    let mut framed: Vec<u8> = Vec::with_capacity(TCP_LEN_PREFIX + message.len());
    framed.extend_from_slice(&len.to_be_bytes());
    framed.extend_from_slice(message);
    Ok(framed)
}

/// Reads the message length out of a TCP length prefix.
pub fn frame_len(prefix: [u8; 2]) -> usize {
    u16::from_be_bytes(prefix) as usize
}

pub fn encode_dns_name(name: &str) -> anyhow::Result<Vec<u8>> {
    let mut encoded: Vec<u8> = Vec::new();
    for label in name.split('.') {
        if label.is_empty() {
            continue;
        }
        ensure!(label.len() <= MAX_LABEL_LEN, "label '{label}' is longer than 63 bytes");
        encoded.push(label.len() as u8);
        encoded.extend_from_slice(label.as_bytes());
    }
    encoded.push(0);
    Ok(encoded)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
