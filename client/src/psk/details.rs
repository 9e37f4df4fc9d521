//! # Secure Details Codec
//!
//! Builds and parses the two-layer confidential envelope. `create` is the
//! sender side; `parse` is the receiver side; `parse_from_packet` unwraps
//! a details envelope straight out of a payment packet.
//!
//! The outer layer always leads with the reserved `Key` header so a
//! receiver can derive the payment key before touching the ciphertext.
//! Caller-supplied unsafe headers follow it; a caller trying to supply its
//! own `Key` header (any casing) is rejected outright, because letting
//! anyone override key derivation would defeat the entire construction.

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;

use crate::config::{KEY_HEADER, KEY_SCHEME};
use crate::crypto::{decrypt, derive_payment_key, encrypt, random_token, EncryptionError};
use crate::packet;

use super::envelope;
use super::error::ProtocolError;
use super::headers::Headers;

/// A fully unwrapped details envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct Details {
    /// Outer-layer headers, visible to every intermediary (includes the
    /// `Key` header the envelope arrived with).
    pub unsafe_headers: Headers,
    /// Inner-layer headers, visible only after decryption.
    pub headers: Headers,
    /// Inner-layer body bytes.
    pub data: Vec<u8>,
}

/// [`Details`] plus the fields of the packet that carried them.
#[derive(Debug, Clone, PartialEq)]
pub struct PacketDetails {
    pub account: String,
    pub amount: String,
    pub unsafe_headers: Headers,
    pub headers: Headers,
    pub data: Vec<u8>,
}

/// Builds a secure details envelope.
///
/// `headers` and `data` go into the encrypted private layer;
/// `unsafe_headers` ride in the clear on the public layer. Returns the
/// public-layer bytes — the caller attaches them (typically
/// base64-encoded) to an outbound packet.
///
/// # Errors
///
/// [`ProtocolError::ReservedHeader`] if `unsafe_headers` contains a `Key`
/// header in any casing.
pub fn create(
    headers: &Headers,
    unsafe_headers: &Headers,
    secret: &[u8],
    data: &[u8],
) -> Result<Vec<u8>, ProtocolError> {
    if unsafe_headers.contains(KEY_HEADER) {
        return Err(ProtocolError::ReservedHeader(KEY_HEADER.to_string()));
    }

    let token = random_token();
    let payment_key = derive_payment_key(secret, &token);

    let private_layer = envelope::encode(false, headers, data);
    let ciphertext =
        encrypt(&payment_key, &private_layer).map_err(|_| ProtocolError::EncryptFailed)?;

    let mut public_headers = Headers::new();
    public_headers.insert(
        KEY_HEADER,
        format!("{} {}", KEY_SCHEME, URL_SAFE_NO_PAD.encode(token)),
    );
    for (name, value) in unsafe_headers.iter() {
        public_headers.insert(name, value);
    }

    Ok(envelope::encode(true, &public_headers, &ciphertext))
}

/// Parses a base64-encoded details envelope using the shared secret.
///
/// A wrong secret surfaces as [`ProtocolError::DecryptionFailed`] — the
/// AEAD tag won't verify. Nothing about the private layer leaks before
/// that check passes.
pub fn parse(details_base64: &str, secret: &[u8]) -> Result<Details, ProtocolError> {
    let bytes = STANDARD.decode(details_base64)?;
    let public_layer = envelope::decode(&bytes, true)?;

    let token = extract_token(&public_layer.headers)?;
    let payment_key = derive_payment_key(secret, &token);

    let plaintext = decrypt(&payment_key, &public_layer.body).map_err(|e| match e {
        EncryptionError::DecryptFailed | EncryptionError::CiphertextTooShort => {
            ProtocolError::DecryptionFailed
        }
        EncryptionError::EncryptFailed => ProtocolError::EncryptFailed,
    })?;
    let private_layer = envelope::decode(&plaintext, false)?;

    Ok(Details {
        unsafe_headers: public_layer.headers,
        headers: private_layer.headers,
        data: private_layer.body,
    })
}

/// Parses a payment packet and the details envelope inside it.
pub fn parse_from_packet(packet_bytes: &[u8], secret: &[u8]) -> Result<PacketDetails, ProtocolError> {
    let packet = packet::parse(packet_bytes)?;
    let details = parse(packet.data.as_deref().unwrap_or_default(), secret)?;

    Ok(PacketDetails {
        account: packet.account,
        amount: packet.amount,
        unsafe_headers: details.unsafe_headers,
        headers: details.headers,
        data: details.data,
    })
}

/// Pulls the payment token out of the public layer's `Key` header.
///
/// The value must match `hmac-sha-256 <base64url(token)>` exactly; an
/// absent header, an unknown scheme, or undecodable token bytes all
/// collapse into [`ProtocolError::MissingKeyHeader`].
fn extract_token(headers: &Headers) -> Result<Vec<u8>, ProtocolError> {
    let value = headers.get(KEY_HEADER).ok_or(ProtocolError::MissingKeyHeader)?;
    let encoded = value
        .strip_prefix(KEY_SCHEME)
        .and_then(|rest| rest.strip_prefix(' '))
        .filter(|rest| !rest.is_empty())
        .ok_or(ProtocolError::MissingKeyHeader)?;

    URL_SAFE_NO_PAD
        .decode(encoded)
        .map_err(|_| ProtocolError::MissingKeyHeader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::PaymentPacket;

    const SECRET: &[u8] = b"the long-term shared secret";

    fn headers(pairs: &[(&str, &str)]) -> Headers {
        pairs.iter().copied().collect()
    }

    #[test]
    fn create_then_parse_roundtrip() {
        let private = headers(&[("Expires-At", "2026-08-07T12:00:00Z"), ("Memo", "coffee")]);
        let unsafe_h = headers(&[("Route-Hint", "g.us.west")]);

        let envelope_bytes = create(&private, &unsafe_h, SECRET, b"binary data").unwrap();
        let details = parse(&STANDARD.encode(envelope_bytes), SECRET).unwrap();

        assert_eq!(details.headers, private);
        assert_eq!(details.data, b"binary data");
        // The outer headers come back with the generated Key header merged in.
        assert_eq!(details.unsafe_headers.get("route-hint"), Some("g.us.west"));
        assert!(details.unsafe_headers.contains("Key"));
    }

    #[test]
    fn roundtrip_with_empty_data_and_headers() {
        let envelope_bytes = create(&Headers::new(), &Headers::new(), SECRET, b"").unwrap();
        let details = parse(&STANDARD.encode(envelope_bytes), SECRET).unwrap();

        assert!(details.headers.is_empty());
        assert!(details.data.is_empty());
        assert_eq!(details.unsafe_headers.len(), 1); // just Key
    }

    #[test]
    fn key_header_value_has_the_declared_scheme() {
        let envelope_bytes = create(&Headers::new(), &Headers::new(), SECRET, b"x").unwrap();
        let public_layer = envelope::decode(&envelope_bytes, true).unwrap();

        let value = public_layer.headers.get("key").unwrap();
        let token_b64 = value.strip_prefix("hmac-sha-256 ").unwrap();
        let token = URL_SAFE_NO_PAD.decode(token_b64).unwrap();
        assert_eq!(token.len(), crate::config::TOKEN_LENGTH);
    }

    #[test]
    fn create_rejects_reserved_key_header_in_any_case() {
        for name in ["Key", "key", "KEY", "kEy"] {
            let unsafe_h = headers(&[(name, "evil")]);
            let err = create(&Headers::new(), &unsafe_h, SECRET, b"").unwrap_err();
            assert!(matches!(err, ProtocolError::ReservedHeader(_)), "{name}");
        }
    }

    #[test]
    fn parse_with_wrong_secret_fails() {
        let envelope_bytes = create(&Headers::new(), &Headers::new(), SECRET, b"payload").unwrap();
        let err = parse(&STANDARD.encode(envelope_bytes), b"wrong secret").unwrap_err();
        assert!(matches!(err, ProtocolError::DecryptionFailed));
    }

    #[test]
    fn parse_rejects_missing_key_header() {
        // A public layer with no Key header at all.
        let bytes = envelope::encode(true, &headers(&[("Other", "header")]), b"junk");
        let err = parse(&STANDARD.encode(bytes), SECRET).unwrap_err();
        assert!(matches!(err, ProtocolError::MissingKeyHeader));
    }

    #[test]
    fn parse_rejects_unknown_key_scheme() {
        let bytes = envelope::encode(true, &headers(&[("Key", "aes-128-ctr dG9rZW4")]), b"junk");
        let err = parse(&STANDARD.encode(bytes), SECRET).unwrap_err();
        assert!(matches!(err, ProtocolError::MissingKeyHeader));
    }

    #[test]
    fn parse_rejects_undecodable_token() {
        let bytes = envelope::encode(true, &headers(&[("Key", "hmac-sha-256 !!!")]), b"junk");
        let err = parse(&STANDARD.encode(bytes), SECRET).unwrap_err();
        assert!(matches!(err, ProtocolError::MissingKeyHeader));
    }

    #[test]
    fn parse_rejects_invalid_base64_input() {
        let err = parse("not base64 at all!!", SECRET).unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidBase64(_)));
    }

    #[test]
    fn tokens_differ_between_envelopes() {
        // Two envelopes for the same payment details must not share key
        // material.
        let a = create(&Headers::new(), &Headers::new(), SECRET, b"same").unwrap();
        let b = create(&Headers::new(), &Headers::new(), SECRET, b"same").unwrap();

        let key_a = envelope::decode(&a, true).unwrap().headers.get("Key").unwrap().to_string();
        let key_b = envelope::decode(&b, true).unwrap().headers.get("Key").unwrap().to_string();
        assert_ne!(key_a, key_b);
    }

    #[test]
    fn parse_from_packet_merges_account_and_amount() {
        let private = headers(&[("header", "value")]);
        let unsafe_h = headers(&[("unsafeHeader", "value")]);
        let envelope_bytes = create(&private, &unsafe_h, SECRET, b"binary data").unwrap();

        let packet_bytes = packet::serialize(&PaymentPacket {
            account: "test.ledger.alice".to_string(),
            amount: "1".to_string(),
            data: Some(STANDARD.encode(envelope_bytes)),
        });

        let result = parse_from_packet(&packet_bytes, SECRET).unwrap();
        assert_eq!(result.account, "test.ledger.alice");
        assert_eq!(result.amount, "1");
        assert_eq!(result.headers.get("header"), Some("value"));
        assert_eq!(result.unsafe_headers.get("unsafeheader"), Some("value"));
        assert_eq!(result.data, b"binary data");
    }
}
