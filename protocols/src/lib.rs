//! DNS wire helpers used by the zone-transfer probe.
//!
//! [`dns`] builds query messages and handles the TCP length framing,
//! [`zone`] reads the record owner names out of transfer responses.

pub mod dns;
pub mod zone;
