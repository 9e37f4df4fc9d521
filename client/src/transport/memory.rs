//! # In-Process Ledger
//!
//! A `Transport` implementation that lives entirely in memory: connectors
//! are scripted behaviors, replies arrive on the same broadcast stream a
//! real ledger plugin would use, and a sent-message counter lets tests
//! assert that a code path produced *zero* traffic.
//!
//! This is not a mock in the pejorative sense — the CLI's simulator runs
//! on it too. It implements the full transport contract, including the
//! delivery asymmetries that matter for correctness testing: delayed
//! replies, explicit error replies, and connectors that never answer.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::broadcast;

use crate::config::{INCOMING_CHANNEL_CAPACITY, METHOD_ERROR, METHOD_QUOTE_REQUEST, METHOD_QUOTE_RESPONSE};

use super::{LedgerInfo, Message, MessagePayload, Transport, TransportError};

/// How a scripted connector reacts to a `quote_request`.
#[derive(Debug, Clone)]
pub enum ConnectorScript {
    /// Reply with a `quote_response` carrying these amounts.
    Quote {
        source_amount: String,
        destination_amount: String,
        source_expiry_duration: Option<u64>,
        /// Delay before the reply lands, for exercising arrival-order
        /// independence and timeouts.
        delay: Option<Duration>,
    },
    /// Reply with an explicit `error` message.
    Error { message: String },
    /// Never reply. The requester's timeout is on its own.
    Silent,
}

/// An in-process ledger with scripted connectors.
pub struct MemoryLedger {
    prefix: String,
    account: String,
    connected: AtomicBool,
    connectors: RwLock<Vec<(String, ConnectorScript)>>,
    incoming_tx: broadcast::Sender<Message>,
    sent: AtomicUsize,
}

impl MemoryLedger {
    /// Creates a ledger with the given address prefix and client account.
    pub fn new(prefix: impl Into<String>, account: impl Into<String>) -> Self {
        let (incoming_tx, _) = broadcast::channel(INCOMING_CHANNEL_CAPACITY);
        Self {
            prefix: prefix.into(),
            account: account.into(),
            connected: AtomicBool::new(false),
            connectors: RwLock::new(Vec::new()),
            incoming_tx,
            sent: AtomicUsize::new(0),
        }
    }

    /// Registers a scripted connector. Registration order is the order the
    /// ledger advertises in [`LedgerInfo::connectors`].
    pub fn add_connector(&self, address: impl Into<String>, script: ConnectorScript) {
        self.connectors.write().push((address.into(), script));
    }

    /// Number of messages sent through this transport so far.
    pub fn sent_count(&self) -> usize {
        self.sent.load(Ordering::SeqCst)
    }

    /// Pushes an arbitrary message onto the inbound stream, bypassing the
    /// connector scripts. Lets tests deliver late, duplicate, or unrelated
    /// messages.
    pub fn inject(&self, message: Message) {
        // No subscribers is fine — the message just falls on the floor,
        // exactly like a reply arriving after everyone stopped listening.
        let _ = self.incoming_tx.send(message);
    }

    fn reply_for(&self, request: &Message) -> Option<(ConnectorScript, Message)> {
        if request.data.method != METHOD_QUOTE_REQUEST {
            return None;
        }
        let script = self
            .connectors
            .read()
            .iter()
            .find(|(address, _)| *address == request.account)
            .map(|(_, script)| script.clone())?;

        let payload = match &script {
            ConnectorScript::Quote {
                source_amount,
                destination_amount,
                source_expiry_duration,
                ..
            } => MessagePayload {
                id: request.data.id,
                method: METHOD_QUOTE_RESPONSE.to_string(),
                data: serde_json::json!({
                    "source_amount": source_amount,
                    "destination_amount": destination_amount,
                    "source_connector_account": request.account,
                    "source_expiry_duration": source_expiry_duration,
                }),
            },
            ConnectorScript::Error { message } => MessagePayload {
                id: request.data.id,
                method: METHOD_ERROR.to_string(),
                data: serde_json::json!({ "message": message }),
            },
            ConnectorScript::Silent => return None,
        };

        Some((
            script,
            Message {
                ledger: self.prefix.clone(),
                account: request.account.clone(),
                data: payload,
            },
        ))
    }
}

#[async_trait::async_trait]
impl Transport for MemoryLedger {
    async fn connect(&self) -> Result<(), TransportError> {
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn info(&self) -> LedgerInfo {
        LedgerInfo {
            prefix: self.prefix.clone(),
            connectors: self
                .connectors
                .read()
                .iter()
                .map(|(address, _)| address.clone())
                .collect(),
        }
    }

    fn account(&self) -> String {
        self.account.clone()
    }

    async fn send_message(&self, message: Message) -> Result<(), TransportError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(TransportError::NotConnected);
        }
        self.sent.fetch_add(1, Ordering::SeqCst);

        if let Some((script, reply)) = self.reply_for(&message) {
            let delay = match script {
                ConnectorScript::Quote { delay, .. } => delay,
                _ => None,
            };
            let tx = self.incoming_tx.clone();
            tokio::spawn(async move {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                let _ = tx.send(reply);
            });
        }
        Ok(())
    }

    fn incoming(&self) -> broadcast::Receiver<Message> {
        self.incoming_tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn quote_request(to: &str) -> Message {
        Message {
            ledger: "test.ledger.".to_string(),
            account: to.to_string(),
            data: MessagePayload {
                id: Some(Uuid::new_v4()),
                method: METHOD_QUOTE_REQUEST.to_string(),
                data: serde_json::json!({}),
            },
        }
    }

    #[tokio::test]
    async fn send_before_connect_is_rejected() {
        let ledger = MemoryLedger::new("test.ledger.", "test.ledger.alice");
        let err = ledger
            .send_message(quote_request("test.ledger.connie"))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::NotConnected));
        assert_eq!(ledger.sent_count(), 0);
    }

    #[tokio::test]
    async fn connect_is_idempotent() {
        let ledger = MemoryLedger::new("test.ledger.", "test.ledger.alice");
        ledger.connect().await.unwrap();
        ledger.connect().await.unwrap();
        ledger
            .send_message(quote_request("test.ledger.connie"))
            .await
            .unwrap();
        assert_eq!(ledger.sent_count(), 1);
    }

    #[tokio::test]
    async fn scripted_quote_reply_echoes_the_correlation_id() {
        let ledger = MemoryLedger::new("test.ledger.", "test.ledger.alice");
        ledger.add_connector(
            "test.ledger.connie",
            ConnectorScript::Quote {
                source_amount: "10".to_string(),
                destination_amount: "9".to_string(),
                source_expiry_duration: Some(6),
                delay: None,
            },
        );
        ledger.connect().await.unwrap();

        let mut rx = ledger.incoming();
        let request = quote_request("test.ledger.connie");
        let id = request.data.id;
        ledger.send_message(request).await.unwrap();

        let reply = rx.recv().await.unwrap();
        assert_eq!(reply.data.id, id);
        assert_eq!(reply.data.method, METHOD_QUOTE_RESPONSE);
        assert_eq!(reply.data.data["source_amount"], "10");
    }

    #[tokio::test]
    async fn silent_connector_never_replies() {
        let ledger = MemoryLedger::new("test.ledger.", "test.ledger.alice");
        ledger.add_connector("test.ledger.mute", ConnectorScript::Silent);
        ledger.connect().await.unwrap();

        let mut rx = ledger.incoming();
        ledger
            .send_message(quote_request("test.ledger.mute"))
            .await
            .unwrap();

        let outcome =
            tokio::time::timeout(Duration::from_millis(50), rx.recv()).await;
        assert!(outcome.is_err(), "no reply should arrive");
    }

    #[test]
    fn info_lists_connectors_in_registration_order() {
        let ledger = MemoryLedger::new("test.ledger.", "test.ledger.alice");
        ledger.add_connector("test.ledger.b", ConnectorScript::Silent);
        ledger.add_connector("test.ledger.a", ConnectorScript::Silent);

        assert_eq!(
            ledger.info().connectors,
            vec!["test.ledger.b", "test.ledger.a"]
        );
    }
}
