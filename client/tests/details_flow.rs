//! Integration tests for secure payment details riding inside packets.
//!
//! The receiver-side story: a packet arrives carrying a base64 details
//! envelope; only the holder of the shared secret can unwrap it, and the
//! quoting layer can still price the packet without touching the secret.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rivulet_client::packet::{self, PaymentPacket};
use rivulet_client::psk::{self, Headers, ProtocolError};
use rivulet_client::quoting::quote_by_packet;
use rivulet_client::transport::{ConnectorScript, MemoryLedger, Transport};

const SECRET: &[u8] = b"psk shared secret";

fn headers(pairs: &[(&str, &str)]) -> Headers {
    pairs.iter().copied().collect()
}

fn packet_with_details(data: &[u8]) -> Vec<u8> {
    let envelope = psk::create(
        &headers(&[("Payment-Id", "abc-123"), ("Memo", "two coffees")]),
        &headers(&[("Route-Hint", "test.other.")]),
        SECRET,
        data,
    )
    .unwrap();

    packet::serialize(&PaymentPacket {
        account: "test.other.bob".to_string(),
        amount: "9.99".to_string(),
        data: Some(STANDARD.encode(envelope)),
    })
}

#[test]
fn receiver_unwraps_packet_and_details_together() {
    let packet_bytes = packet_with_details(b"invoice #42");

    let unwrapped = psk::parse_from_packet(&packet_bytes, SECRET).unwrap();

    assert_eq!(unwrapped.account, "test.other.bob");
    assert_eq!(unwrapped.amount, "9.99");
    assert_eq!(unwrapped.headers.get("payment-id"), Some("abc-123"));
    assert_eq!(unwrapped.headers.get("memo"), Some("two coffees"));
    assert_eq!(unwrapped.unsafe_headers.get("route-hint"), Some("test.other."));
    assert!(unwrapped.unsafe_headers.contains("key"));
    assert_eq!(unwrapped.data, b"invoice #42");
}

#[test]
fn intermediary_without_the_secret_learns_nothing_private() {
    let packet_bytes = packet_with_details(b"invoice #42");

    // An intermediary can read the packet and the public layer...
    let parsed = packet::parse(&packet_bytes).unwrap();
    let envelope_bytes = STANDARD.decode(parsed.data.unwrap()).unwrap();
    let public = String::from_utf8_lossy(&envelope_bytes[..envelope_bytes.len().min(64)]).to_string();
    assert!(public.starts_with("PSK/1.0\n"));

    // ...but cannot unwrap the private layer.
    let err = psk::parse_from_packet(&packet_bytes, b"guessed secret").unwrap_err();
    assert!(matches!(err, ProtocolError::DecryptionFailed));
}

#[tokio::test]
async fn the_same_packet_can_be_quoted_without_the_secret() {
    let ledger = Arc::new(MemoryLedger::new("test.ledger.", "test.ledger.alice"));
    ledger.add_connector(
        "test.ledger.connie",
        ConnectorScript::Quote {
            source_amount: "10.25".to_string(),
            destination_amount: "9.99".to_string(),
            source_expiry_duration: Some(6),
            delay: None,
        },
    );

    let packet_bytes = packet_with_details(b"invoice #42");
    let result = quote_by_packet(ledger.clone() as Arc<dyn Transport>, &packet_bytes)
        .await
        .unwrap();

    assert_eq!(result.destination_amount.as_str(), "9.99");
    assert_eq!(result.source_amount.as_str(), "10.25");
}

#[test]
fn details_roundtrip_preserves_arbitrary_binary_data() {
    let payloads: Vec<Vec<u8>> = vec![
        Vec::new(),
        vec![0u8],
        (0u8..=255).collect(),
        b"PSK/1.0\n\nnested envelope lookalike".to_vec(),
    ];

    for data in payloads {
        let envelope = psk::create(&Headers::new(), &Headers::new(), SECRET, &data).unwrap();
        let details = psk::parse(&STANDARD.encode(envelope), SECRET).unwrap();
        assert_eq!(details.data, data);
    }
}
