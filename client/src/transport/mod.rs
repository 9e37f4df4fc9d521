//! # Ledger Transport
//!
//! The seam between Rivulet and whatever actually moves messages — a
//! ledger plugin, a websocket, a test harness. Everything above this trait
//! is testable without a network, which is not an accident.
//!
//! The transport owes us five things: an idempotent `connect`, static
//! ledger info (address prefix + advertised connectors), our own account
//! address, a fire-and-forget `send_message`, and an inbound message
//! stream. Connection lifecycle beyond that is the implementation's
//! problem.
//!
//! ## Wire format
//!
//! Messages on the stream are correlation envelopes:
//!
//! ```text
//! { ledger, account, data: { id, method, data } }
//! ```
//!
//! `id` correlates a response to its request; `method` is one of
//! `quote_request`, `quote_response`, or `error` (others are legal and
//! ignored by the quoting layer).

pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::broadcast;
use uuid::Uuid;

pub use memory::{ConnectorScript, MemoryLedger};

/// Errors surfaced by a transport implementation.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The transport is not connected yet.
    #[error("transport is not connected")]
    NotConnected,

    /// Establishing the connection failed.
    #[error("connect failed: {0}")]
    ConnectFailed(String),

    /// An outbound message could not be delivered to the ledger.
    #[error("failed to send message: {0}")]
    SendFailed(String),

    /// The inbound message stream closed underneath us.
    #[error("inbound message stream closed")]
    StreamClosed,
}

/// Static information a transport advertises about its ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerInfo {
    /// The ledger's address prefix, e.g. `test.ledger.`. Any destination
    /// under this prefix is local delivery.
    pub prefix: String,
    /// Connector accounts the ledger advertises by default.
    pub connectors: Vec<String>,
}

/// A correlation envelope as carried on the message stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Ledger prefix the message is scoped to.
    pub ledger: String,
    /// Peer account the message is addressed to (outbound) or from
    /// (inbound).
    pub account: String,
    /// The correlated payload.
    pub data: MessagePayload,
}

/// The correlated payload inside a [`Message`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessagePayload {
    /// Correlation id. Assigned by the correlator if the sender left it
    /// unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    /// Method tag, e.g. `quote_request`.
    pub method: String,
    /// Method-specific body.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub data: serde_json::Value,
}

/// The ledger transport seam.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Connects to the ledger. Idempotent — calling on an already
    /// connected transport is a no-op.
    async fn connect(&self) -> Result<(), TransportError>;

    /// The ledger's advertised info.
    fn info(&self) -> LedgerInfo;

    /// Our own account address on this ledger.
    fn account(&self) -> String;

    /// Sends a message to its `account` peer.
    async fn send_message(&self, message: Message) -> Result<(), TransportError>;

    /// Subscribes to the inbound message stream. Every subscriber sees
    /// every inbound message; dropping the receiver detaches it.
    fn incoming(&self) -> broadcast::Receiver<Message>;
}
