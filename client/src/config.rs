//! # Protocol Configuration & Constants
//!
//! Every magic number in Rivulet lives here. If you're hardcoding a
//! constant somewhere else, you're doing it wrong and you owe the team
//! coffee.
//!
//! Most of these are wire-format literals: change one and you stop
//! interoperating with every connector and receiver on the network, so
//! treat this file as append-only in spirit.

use std::time::Duration;

// ---------------------------------------------------------------------------
// PSK Envelope Wire Format
// ---------------------------------------------------------------------------

/// Status line of the public envelope layer, without the trailing newline.
/// The private layer carries no status line — its position (inside the
/// ciphertext) already says what it is.
pub const STATUS_LINE: &str = "PSK/1.0";

/// The blank line separating header text from the body. The first
/// occurrence of this sequence is the layer delimiter; everything after it
/// is raw body bytes, newlines and all.
pub const DATA_DELIMITER: &str = "\n\n";

/// Name of the reserved outer header that transports the per-payment key
/// token. Caller-supplied unsafe headers may not use this name, in any
/// casing — a collision would let an attacker override key derivation.
pub const KEY_HEADER: &str = "Key";

/// Key-derivation scheme tag carried in the [`KEY_HEADER`] value. The full
/// header value is `hmac-sha-256 <base64url(token)>`. No other scheme is
/// accepted.
pub const KEY_SCHEME: &str = "hmac-sha-256";

/// Length in bytes of the random per-payment key token.
pub const TOKEN_LENGTH: usize = 16;

// ---------------------------------------------------------------------------
// Cryptographic Parameters
// ---------------------------------------------------------------------------

/// AES-256-GCM key length in bytes. Conveniently, also the output length
/// of HMAC-SHA-256, so a derived payment key is usable as-is.
pub const AES_KEY_LENGTH: usize = 32;

/// AES-256-GCM nonce length in bytes. 96 bits is the standard and the only
/// length you should use. 12 bytes. Not 16. Not 8. Twelve.
pub const AES_NONCE_LENGTH: usize = 12;

/// AES-256-GCM authentication tag length in bytes.
pub const AES_TAG_LENGTH: usize = 16;

// ---------------------------------------------------------------------------
// Quoting
// ---------------------------------------------------------------------------

/// How long a correlated quote request waits for a matching response
/// before it is abandoned, when the caller doesn't specify a timeout.
pub const DEFAULT_QUOTE_TIMEOUT: Duration = Duration::from_millis(5_000);

/// Source expiry duration applied to a winning quote whose connector
/// didn't state one, in seconds.
pub const DEFAULT_EXPIRY_DURATION_SECS: u64 = 10;

// ---------------------------------------------------------------------------
// Message Methods
// ---------------------------------------------------------------------------

/// Method tag of an outbound quote request.
pub const METHOD_QUOTE_REQUEST: &str = "quote_request";

/// Method tag of a connector's quote reply.
pub const METHOD_QUOTE_RESPONSE: &str = "quote_response";

/// Method tag of an explicit remote error reply. Terminates the matching
/// correlation immediately, whatever method it was expecting.
pub const METHOD_ERROR: &str = "error";

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// Capacity of the in-process ledger's inbound broadcast channel. Large
/// enough to absorb a full fan-out's worth of replies without lagging a
/// subscriber.
pub const INCOMING_CHANNEL_CAPACITY: usize = 256;
