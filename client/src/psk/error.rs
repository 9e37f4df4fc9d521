//! Error types for the PSK envelope and details codec.
//!
//! A [`ProtocolError`] means the message is corrupt or hostile — these are
//! not recoverable by retry, and the parser makes no attempt to salvage a
//! partially valid envelope.

use thiserror::Error;

/// Errors raised while building or parsing a secure details envelope.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The byte stream has no blank-line delimiter separating headers from
    /// body, or the header text is not valid UTF-8.
    #[error("invalid request: malformed envelope")]
    InvalidRequest,

    /// A status line was expected and the first line is not the literal
    /// `PSK/1.0`.
    #[error("invalid status line: {0:?}")]
    InvalidStatusLine(String),

    /// A header line does not parse as `Name: Value`.
    #[error("invalid header line: {0:?}")]
    InvalidHeaderLine(String),

    /// The public layer has no `Key` header, or its value doesn't match
    /// `hmac-sha-256 <base64url(token)>`.
    #[error("missing or malformed Key header")]
    MissingKeyHeader,

    /// The private layer would not decrypt — wrong secret or corrupted
    /// ciphertext. Deliberately not more specific than that.
    #[error("decryption failed -- wrong secret or corrupted ciphertext")]
    DecryptionFailed,

    /// Encrypting the private layer failed. Should never happen with a
    /// well-formed derived key.
    #[error("encryption failed")]
    EncryptFailed,

    /// A caller-supplied unsafe header collides with the reserved `Key`
    /// header. This is a caller bug, not a wire problem.
    #[error("reserved header name: {0:?}")]
    ReservedHeader(String),

    /// The details value is not valid base64.
    #[error("invalid base64 in details: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    /// The enclosing payment packet would not parse.
    #[error(transparent)]
    Packet(#[from] crate::packet::PacketError),
}
