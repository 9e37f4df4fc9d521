//! # AES-256-GCM Encryption
//!
//! Authenticated encryption for the private layer of the payment details
//! envelope. One payment, one derived key, one encrypted blob.
//!
//! GCM is notoriously unforgiving about nonce reuse, but our usage pattern
//! makes this a non-issue: every payment derives a fresh key from a fresh
//! random token, so a key encrypts exactly one message in its lifetime.
//! We still use random 96-bit nonces from the OS CSPRNG rather than a
//! fixed nonce — keys being single-use is a property of the caller, not
//! something this module gets to assume forever.
//!
//! ## Wire format
//!
//! `encrypt()` returns `nonce || ciphertext` as a single `Vec<u8>`. The
//! first 12 bytes are the nonce, the rest is the ciphertext with the
//! 16-byte GCM tag appended. `decrypt()` expects the same layout.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::RngCore;
use thiserror::Error;

use crate::config::{AES_KEY_LENGTH, AES_NONCE_LENGTH};

/// Errors that can occur during encryption/decryption.
///
/// Intentionally vague. The difference between "wrong key" and "corrupted
/// ciphertext" is none of an attacker's business.
#[derive(Debug, Error)]
pub enum EncryptionError {
    #[error("encryption failed")]
    EncryptFailed,

    #[error("decryption failed -- wrong key or corrupted ciphertext")]
    DecryptFailed,

    #[error("ciphertext too short: must be at least {AES_NONCE_LENGTH} bytes")]
    CiphertextTooShort,
}

/// Encrypt plaintext with AES-256-GCM under a random nonce.
///
/// Returns `nonce || ciphertext`. The key is a derived payment key —
/// see [`crate::crypto::kdf::derive_payment_key`].
pub fn encrypt(key: &[u8; AES_KEY_LENGTH], plaintext: &[u8]) -> Result<Vec<u8>, EncryptionError> {
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| EncryptionError::EncryptFailed)?;

    let mut nonce_bytes = [0u8; AES_NONCE_LENGTH];
    rand::rngs::OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|_| EncryptionError::EncryptFailed)?;

    // Pack nonce || ciphertext into one buffer so the caller never has to
    // track the nonce separately.
    let mut out = Vec::with_capacity(AES_NONCE_LENGTH + ciphertext.len());
    out.extend_from_slice(&nonce_bytes);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Decrypt data previously produced by [`encrypt`].
///
/// Fails with `DecryptFailed` on a wrong key, a flipped bit, or a
/// truncated tag — deliberately without saying which.
pub fn decrypt(key: &[u8; AES_KEY_LENGTH], data: &[u8]) -> Result<Vec<u8>, EncryptionError> {
    if data.len() < AES_NONCE_LENGTH {
        return Err(EncryptionError::CiphertextTooShort);
    }

    let (nonce_bytes, ciphertext) = data.split_at(AES_NONCE_LENGTH);
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| EncryptionError::DecryptFailed)?;
    let nonce = Nonce::from_slice(nonce_bytes);

    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| EncryptionError::DecryptFailed)
}
