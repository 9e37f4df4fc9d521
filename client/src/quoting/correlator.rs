//! # Message Correlator
//!
//! Turns the transport's shared inbound stream into single-shot
//! request/response calls: send a message, get back the one reply that
//! carries your correlation id and the method you expected — or a remote
//! error, or a timeout. Nothing else.
//!
//! ## Dispatch map, not listeners
//!
//! Every in-flight correlation is an entry in a concurrent map from
//! correlation id to a oneshot completion handle. One dispatcher task
//! drains the inbound stream and routes each message by id; messages with
//! no matching entry — late replies, other clients' traffic — are dropped
//! on the floor. This keeps per-request cost at one map entry instead of
//! one stream subscription, and makes "no residual listener" a property
//! you can assert (see [`Correlator::pending_len`]).
//!
//! ## Resolution rules
//!
//! For an inbound message while an entry is registered:
//!
//! - id doesn't match any entry → ignore.
//! - method is the literal `error` → fail the correlation with the
//!   remote-supplied message.
//! - method matches what the entry expects → resolve with the message.
//! - any other method → ignore. It may belong to a different in-flight
//!   correlation sharing the stream; dropping the entry here would be
//!   wrong.
//!
//! Exactly one of resolve / remote-error / timeout happens per call, and
//! the entry is removed on every exit path: resolution (the dispatcher
//! removes it), timeout (an RAII guard removes it), and transport closure
//! (the dispatcher drains the whole map). Repeated calls never accumulate
//! state.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::config::METHOD_ERROR;
use crate::transport::{Message, Transport};

use super::error::CorrelateError;

/// One in-flight correlation: what method resolves it, and where to send
/// the verdict.
struct Pending {
    expected_method: String,
    tx: oneshot::Sender<Result<Message, CorrelateError>>,
}

/// Removes the pending entry when the requesting side gives up, whatever
/// the reason. A no-op if the dispatcher already resolved the entry.
struct PendingGuard {
    id: Uuid,
    pending: Arc<DashMap<Uuid, Pending>>,
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.pending.remove(&self.id);
    }
}

/// Correlates requests with responses over a transport's inbound stream.
///
/// Create one per negotiation (or longer); dropping it stops the
/// dispatcher task.
pub struct Correlator {
    transport: Arc<dyn Transport>,
    pending: Arc<DashMap<Uuid, Pending>>,
    dispatcher: JoinHandle<()>,
}

impl Correlator {
    /// Subscribes to the transport's inbound stream and starts the
    /// dispatcher. The subscription exists before any request is sent, so
    /// a reply can never arrive ahead of its listener.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        let pending: Arc<DashMap<Uuid, Pending>> = Arc::new(DashMap::new());
        let mut rx = transport.incoming();
        let map = Arc::clone(&pending);

        let dispatcher = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(message) => dispatch(&map, message),
                    Err(RecvError::Lagged(skipped)) => {
                        // Skipped messages can only cost us timeouts, not
                        // misrouted responses.
                        tracing::warn!(skipped, "inbound message stream lagged");
                    }
                    Err(RecvError::Closed) => {
                        drain(&map);
                        break;
                    }
                }
            }
        });

        Self {
            transport,
            pending,
            dispatcher,
        }
    }

    /// Sends `message` and waits for the response that matches its
    /// correlation id and `expected_method`, racing an independent timer.
    ///
    /// Assigns a fresh v4 UUID to the outbound payload if the sender left
    /// the id unset.
    pub async fn request(
        &self,
        mut message: Message,
        expected_method: &str,
        timeout: Duration,
    ) -> Result<Message, CorrelateError> {
        let id = *message.data.id.get_or_insert_with(Uuid::new_v4);

        let (tx, rx) = oneshot::channel();
        self.pending.insert(
            id,
            Pending {
                expected_method: expected_method.to_string(),
                tx,
            },
        );
        // From here on, every exit path releases the entry: the guard on
        // send failure or timeout, the dispatcher on resolution or drain.
        let _guard = PendingGuard {
            id,
            pending: Arc::clone(&self.pending),
        };

        tracing::debug!(%id, account = %message.account, method = %message.data.method, "sending message");
        self.transport.send_message(message).await?;

        let started = Instant::now();
        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(verdict)) => verdict,
            // The sender side vanished without a verdict — the map was
            // dropped wholesale, which only happens on teardown.
            Ok(Err(_)) => Err(CorrelateError::TransportClosed),
            Err(_) => Err(CorrelateError::Timeout {
                elapsed_ms: started.elapsed().as_millis() as u64,
                timeout_ms: timeout.as_millis() as u64,
            }),
        }
    }

    /// Number of in-flight correlations. Diagnostics; steady-state zero.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

impl Drop for Correlator {
    fn drop(&mut self) {
        self.dispatcher.abort();
    }
}

/// Routes one inbound message to its pending entry, if any.
fn dispatch(pending: &DashMap<Uuid, Pending>, message: Message) {
    let Some(id) = message.data.id else { return };
    let method = message.data.method.clone();

    // Remove-if keeps entries alive for unrelated methods on the same id:
    // only an explicit error or the expected method consumes the entry.
    let Some((_, entry)) =
        pending.remove_if(&id, |_, p| method == METHOD_ERROR || method == p.expected_method)
    else {
        tracing::debug!(%id, %method, "ignoring uncorrelated message");
        return;
    };

    let verdict = if method == METHOD_ERROR {
        Err(CorrelateError::Remote(remote_error_message(&message)))
    } else {
        tracing::debug!(%id, %method, "correlated response");
        Ok(message)
    };
    // The requester may have timed out a beat ago; its receiver is gone
    // and the verdict has nowhere to go. That is the correct outcome.
    let _ = entry.tx.send(verdict);
}

/// Fails every pending correlation when the inbound stream closes.
fn drain(pending: &DashMap<Uuid, Pending>) {
    let ids: Vec<Uuid> = pending.iter().map(|entry| *entry.key()).collect();
    for id in ids {
        if let Some((_, entry)) = pending.remove(&id) {
            let _ = entry.tx.send(Err(CorrelateError::TransportClosed));
        }
    }
}

/// Pulls the human-readable message out of a remote `error` payload.
fn remote_error_message(message: &Message) -> String {
    message
        .data
        .data
        .get("message")
        .and_then(serde_json::Value::as_str)
        .unwrap_or("unspecified remote error")
        .to_string()
}
