//! Error types for quote negotiation.
//!
//! Per-connector failures never show up here individually — the
//! aggregator records them and either returns the surviving quotes or
//! raises [`QuoteError::AllQuotesFailed`] enumerating every failure.
//! Everything else propagates to the caller unmodified.

use thiserror::Error;

use crate::packet::PacketError;
use crate::transport::TransportError;

use super::amount::AmountError;

/// Errors that can occur while correlating one request with its response.
#[derive(Debug, Error)]
pub enum CorrelateError {
    /// The remote side answered with an explicit `error` method. The
    /// string is the remote-supplied message, verbatim.
    #[error("remote error: {0}")]
    Remote(String),

    /// No matching response arrived within the configured window.
    #[error("timed out after {elapsed_ms}ms (timeout: {timeout_ms}ms)")]
    Timeout {
        /// Milliseconds elapsed before giving up.
        elapsed_ms: u64,
        /// Configured timeout in milliseconds.
        timeout_ms: u64,
    },

    /// The transport closed its inbound stream while we were waiting.
    #[error("transport closed while awaiting response")]
    TransportClosed,

    /// Sending the request failed outright.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Errors that can occur during quote negotiation.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// The request set both amounts, or neither. Checked before any I/O.
    #[error("exactly one of source_amount or destination_amount must be set")]
    AmbiguousAmount,

    /// There were no connectors to quote against.
    #[error("no connectors to quote against")]
    NoConnectors,

    /// Every connector failed. The message joins each per-connector
    /// failure as `connector: reason`.
    #[error("all connectors failed to quote: {0}")]
    AllQuotesFailed(String),

    /// The transport failed before fan-out (connect or send).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A packet handed to `quote_by_packet` would not decode.
    #[error(transparent)]
    Packet(#[from] PacketError),

    /// An amount string would not validate.
    #[error(transparent)]
    Amount(#[from] AmountError),

    /// The quote query could not be encoded for the wire.
    #[error("failed to encode quote query: {0}")]
    EncodeQuery(#[from] serde_json::Error),
}
