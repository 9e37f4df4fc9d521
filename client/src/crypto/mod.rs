//! # Cryptographic Primitives
//!
//! The two primitives the secure details codec is built on:
//!
//! - **encryption** — AES-256-GCM for the private envelope layer. AEAD,
//!   so tampering with the ciphertext is detected rather than decrypted
//!   into garbage headers.
//! - **kdf** — per-payment key derivation. A fresh random token plus
//!   HMAC-SHA-256 over a long-term shared secret yields a key that is
//!   unique to one payment and reconstructible by anyone holding the
//!   secret and the (public) token — which is exactly the receiver and
//!   nobody else.
//!
//! Nothing in here is novel cryptography, which is the point. Don't roll
//! your own.

pub mod encryption;
pub mod kdf;

pub use encryption::{decrypt, encrypt, EncryptionError};
pub use kdf::{derive_payment_key, random_token};
