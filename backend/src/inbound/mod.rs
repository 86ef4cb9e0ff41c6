//! Inbound adapters translating external requests into note port calls.
//!
//! Framework details stay here; handlers see only the driving ports.

pub mod http;
