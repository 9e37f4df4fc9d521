//! # Quoting Data Model
//!
//! Four shapes, four lifetimes:
//!
//! - [`QuoteRequest`] — what the caller asks for. Lives until the
//!   negotiation resolves.
//! - [`QuoteQuery`] — what actually goes on the wire to each connector.
//!   Unset fields are omitted entirely, never sent as `null`.
//! - [`QuoteResponse`] — one connector's answer. Ephemeral; dropped after
//!   selection.
//! - [`Quote`] — the final, normalized result handed back to the caller.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::amount::Amount;

/// A caller's request for a quote toward a destination address.
///
/// Exactly one of `source_amount` / `destination_amount` must be set —
/// the engine rejects anything else before touching the transport.
#[derive(Debug, Clone, Default)]
pub struct QuoteRequest {
    /// Where the payment is going.
    pub destination_address: String,
    /// Fix the amount on the sending side and ask what arrives.
    pub source_amount: Option<Amount>,
    /// Fix the amount on the receiving side and ask what it costs.
    pub destination_amount: Option<Amount>,
    /// Seconds between proposal and expiry of the source transfer. Not
    /// consulted during quoting; carried for callers that construct the
    /// transfer from the resulting quote.
    pub source_expiry_duration: Option<u64>,
    /// Seconds between proposal and expiry of the destination transfer.
    pub destination_expiry_duration: Option<u64>,
    /// Precision of the destination ledger, if known.
    pub destination_precision: Option<u32>,
    /// Scale of the destination ledger, if known.
    pub destination_scale: Option<u32>,
    /// Explicit connectors to quote against, in preference order. Falls
    /// back to the transport's advertised list when unset.
    pub connectors: Option<Vec<String>>,
    /// Per-connector response timeout. Defaults to
    /// [`crate::config::DEFAULT_QUOTE_TIMEOUT`].
    pub timeout: Option<Duration>,
}

/// The wire payload sent to each connector in a `quote_request` message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteQuery {
    /// The sender's own account address.
    pub source_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_amount: Option<Amount>,
    pub destination_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_amount: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_expiry_duration: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_precision: Option<u32>,
}

/// One connector's reply inside a `quote_response` message.
///
/// Amounts are validated during deserialization — a connector returning
/// `"source_amount": "cheap"` fails here, at the trust boundary, and is
/// recorded as that connector's failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub source_amount: Amount,
    pub destination_amount: Amount,
    /// The connector's account on the source ledger — where the source
    /// transfer should be addressed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_connector_account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_expiry_duration: Option<u64>,
}

/// The final negotiated quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// What the sender pays. If the caller fixed the source side, this is
    /// their amount echoed verbatim.
    pub source_amount: Amount,
    /// What the receiver gets. If the caller fixed the destination side,
    /// this is their amount echoed verbatim.
    pub destination_amount: Amount,
    /// The winning connector's source-ledger account. Absent for local
    /// delivery, where no connector is involved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connector_account: Option<String>,
    /// Seconds the source transfer should stay valid.
    pub source_expiry_duration: u64,
    /// Convenience: issue time plus `source_expiry_duration`.
    pub expires_at: DateTime<Utc>,
}
