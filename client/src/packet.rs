//! # Payment Packet Codec
//!
//! The opaque end-to-end payment packet: destination account, amount, and
//! an optional data field (which is where a base64-encoded PSK details
//! envelope rides). Canonical JSON on the wire — this codec is a thin
//! collaborator, deliberately free of interesting internal state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while decoding a payment packet.
#[derive(Debug, Error)]
pub enum PacketError {
    #[error("invalid payment packet: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// A payment packet addressed to a destination account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentPacket {
    /// Destination account address (e.g. `g.eur.bank.bob`).
    pub account: String,
    /// Destination amount as a decimal string.
    pub amount: String,
    /// Attached data, typically a base64-encoded details envelope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

/// Serializes a packet to its canonical byte form.
pub fn serialize(packet: &PaymentPacket) -> Vec<u8> {
    // Serialization of a field-complete struct to JSON cannot fail.
    serde_json::to_vec(packet).unwrap_or_default()
}

/// Parses a packet from bytes.
pub fn parse(bytes: &[u8]) -> Result<PaymentPacket, PacketError> {
    Ok(serde_json::from_slice(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let packet = PaymentPacket {
            account: "test.ledger.alice".to_string(),
            amount: "10.25".to_string(),
            data: Some("aGVsbG8".to_string()),
        };

        let recovered = parse(&serialize(&packet)).unwrap();
        assert_eq!(recovered, packet);
    }

    #[test]
    fn data_field_is_optional() {
        let packet = PaymentPacket {
            account: "test.ledger.bob".to_string(),
            amount: "1".to_string(),
            data: None,
        };

        let bytes = serialize(&packet);
        assert!(!String::from_utf8(bytes.clone()).unwrap().contains("data"));
        assert_eq!(parse(&bytes).unwrap(), packet);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse(b"not a packet").is_err());
    }
}
