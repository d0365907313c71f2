//! Parsing of zone-transfer response messages.
//!
//! An AXFR answer is a stream of ordinary DNS messages whose answer sections
//! together hold every record of the zone, opened and closed by the SOA record.
//! Only the owner names and the SOA count are of interest here.

use dns_parser::{Packet, RData, ResponseCode};
use hickory_proto::op::{Message, ResponseCode as WireResponseCode};
use hickory_proto::rr::RecordType;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ZoneError {
    #[error("transfer refused with response code {0}")]
    Refused(String),
    #[error("malformed transfer message: {0}")]
    Malformed(String),
}

/// The useful content of one message of a transfer.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ZoneMessage {
    pub id: u16,
    pub names: Vec<String>,
    pub soa_records: usize,
}

/// Extracts owner names from one transfer message.
///
/// `dns-parser` rejects record types it does not know (RRSIG, DNSKEY, ...),
/// which are common in signed zones; such messages are decoded with
/// `hickory-proto` instead.
pub fn parse_transfer_message(payload: &[u8]) -> Result<ZoneMessage, ZoneError> {
    match Packet::parse(payload) {
        Ok(packet) => {
            if !matches!(packet.header.response_code, ResponseCode::NoError) {
                return Err(ZoneError::Refused(format!("{:?}", packet.header.response_code)));
            }

            let mut message: ZoneMessage = ZoneMessage {
                id: packet.header.id,
                ..ZoneMessage::default()
            };
            for record in &packet.answers {
                if let RData::SOA(_) = record.data {
                    message.soa_records += 1;
                }
                message.names.push(owner_name(&record.name.to_string()));
            }
            Ok(message)
        }
        Err(e) => {
            debug!("dns-parser rejected transfer message ({e}), retrying with hickory");
            parse_with_hickory(payload)
        }
    }
}

fn parse_with_hickory(payload: &[u8]) -> Result<ZoneMessage, ZoneError> {
    let parsed: Message =
        Message::from_vec(payload).map_err(|e| ZoneError::Malformed(e.to_string()))?;

    if parsed.response_code() != WireResponseCode::NoError {
        return Err(ZoneError::Refused(parsed.response_code().to_string()));
    }

    Ok(ZoneMessage {
        id: parsed.id(),
        names: parsed
            .answers()
            .iter()
            .map(|record| owner_name(&record.name().to_string()))
            .collect(),
        soa_records: parsed
            .answers()
            .iter()
            .filter(|record| record.record_type() == RecordType::SOA)
            .count(),
    })
}

fn owner_name(name: &str) -> String {
    name.trim_end_matches('.').to_string()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
