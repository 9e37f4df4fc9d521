//! # PSK — Secure Payment Details
//!
//! A payment packet can carry arbitrary data end to end. This module
//! defines what Rivulet puts there: a two-layer envelope that lets
//! intermediary connectors read routing-relevant headers while keeping the
//! payload and receiver-private headers opaque to every hop except the one
//! holding the shared secret.
//!
//! ## The Two Layers
//!
//! ```text
//!   PSK/1.0                          ─┐
//!   Key: hmac-sha-256 <b64url token>  │  public layer — any hop can read
//!   Unsafe-Header: value              │
//!                                     │
//!   <AES-256-GCM ciphertext> ────────┐│
//!   └────────────────────────────────┼┘
//!      decrypts (receiver only) to:  │
//!   Private-Header: value           ─┤  private layer — no status line,
//!                                    │  headers + payload visible only
//!   <payload bytes>                 ─┘  after decryption
//! ```
//!
//! Both layers use the same canonical byte layout — optional status line,
//! header lines, one blank line, raw body — implemented once in
//! [`envelope`]. The [`details`] codec composes two of them with the
//! per-payment key derivation from [`crate::crypto`].
//!
//! ## Why a token in the clear?
//!
//! The `Key` header carries the random payment token, not the key. The
//! receiver holds the long-term secret and recomputes
//! `HMAC-SHA-256(secret, token)`; everyone else holds a useless 16 bytes.
//! Fresh token per payment means no key is ever used twice, with zero
//! shared session state between sender and receiver.

pub mod details;
pub mod envelope;
pub mod error;
pub mod headers;

pub use details::{create, parse, parse_from_packet, Details, PacketDetails};
pub use envelope::Envelope;
pub use error::ProtocolError;
pub use headers::Headers;
