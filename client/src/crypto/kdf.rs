//! # Payment Key Derivation
//!
//! Every payment gets its own encryption key, derived as
//! `HMAC-SHA-256(secret, token)` where `secret` is the long-term value
//! shared between sender and receiver and `token` is 16 fresh random
//! bytes generated per payment.
//!
//! The token travels in the clear, in the public envelope's `Key` header.
//! That's fine: without the secret, the token derives nothing. With the
//! secret, the receiver regenerates the exact key — no session state, no
//! key exchange, no reuse across payments.

use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;

use crate::config::{AES_KEY_LENGTH, TOKEN_LENGTH};

type HmacSha256 = Hmac<Sha256>;

/// Derives the per-payment encryption key from the shared secret and a
/// payment token.
///
/// Deterministic: the receiver calls this with the token it pulled out of
/// the `Key` header and gets the same 32 bytes the sender encrypted with.
pub fn derive_payment_key(secret: &[u8], token: &[u8]) -> [u8; AES_KEY_LENGTH] {
    // HMAC accepts keys of any length, so this cannot actually fail.
    let mut mac =
        HmacSha256::new_from_slice(secret).expect("HMAC-SHA-256 accepts keys of any length");
    mac.update(token);
    mac.finalize().into_bytes().into()
}

/// Generates a fresh random payment token from the OS CSPRNG.
pub fn random_token() -> [u8; TOKEN_LENGTH] {
    let mut token = [0u8; TOKEN_LENGTH];
    rand::rngs::OsRng.fill_bytes(&mut token);
    token
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let k1 = derive_payment_key(b"shared secret", b"token-bytes");
        let k2 = derive_payment_key(b"shared secret", b"token-bytes");
        assert_eq!(k1, k2);
    }

    #[test]
    fn different_tokens_derive_different_keys() {
        let k1 = derive_payment_key(b"shared secret", b"token-one");
        let k2 = derive_payment_key(b"shared secret", b"token-two");
        assert_ne!(k1, k2);
    }

    #[test]
    fn different_secrets_derive_different_keys() {
        let k1 = derive_payment_key(b"secret-one", b"token");
        let k2 = derive_payment_key(b"secret-two", b"token");
        assert_ne!(k1, k2);
    }

    #[test]
    fn empty_secret_is_accepted() {
        // Degenerate but well-defined — HMAC pads short keys. Rejecting
        // weak secrets is a policy decision that belongs to the caller.
        let key = derive_payment_key(b"", b"token");
        assert_eq!(key.len(), AES_KEY_LENGTH);
    }

    #[test]
    fn tokens_are_random() {
        assert_ne!(random_token(), random_token());
    }

    #[test]
    fn matches_the_rfc_4231_test_vector() {
        // HMAC-SHA-256 test case 1 from RFC 4231. Catches regressions if
        // we ever swap out the MAC backend.
        let secret = [0x0b; 20];
        let expected =
            hex::decode("b0344c61d8db38535ca8afceaf0bf12b881dc200c9833da726e9376c2e32cff7")
                .unwrap();
        assert_eq!(derive_payment_key(&secret, b"Hi There").to_vec(), expected);
    }
}
