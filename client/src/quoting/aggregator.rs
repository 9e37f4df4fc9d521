//! # Quote Fan-Out Aggregator
//!
//! One quote request, N connectors, all in flight at once. The aggregator
//! is a join-all over independently failable correlations: each
//! connector's failure — timeout, remote error, malformed reply — becomes
//! a recorded `connector: reason` string instead of an escaping error,
//! and the policy applied after the join is "succeed if any succeeded".
//!
//! Two ordering guarantees matter downstream:
//!
//! - results come back in *connector-list order*, not arrival order, so
//!   best-quote selection is deterministic however the network races;
//! - a timed-out connector does not cancel its siblings — fan-out keeps
//!   going for the others.

use std::time::Duration;

use crate::config::{METHOD_QUOTE_REQUEST, METHOD_QUOTE_RESPONSE};
use crate::transport::{Message, MessagePayload};

use super::correlator::Correlator;
use super::error::QuoteError;
use super::types::{QuoteQuery, QuoteResponse};

/// Sends `query` to every connector concurrently and returns the
/// successful responses, in connector-list order.
///
/// # Errors
///
/// - [`QuoteError::NoConnectors`] — the list is empty; nothing was sent.
/// - [`QuoteError::AllQuotesFailed`] — every connector failed; the
///   message joins each recorded failure with `", "`.
pub async fn gather(
    correlator: &Correlator,
    ledger_prefix: &str,
    connectors: &[String],
    query: &QuoteQuery,
    timeout: Duration,
) -> Result<Vec<QuoteResponse>, QuoteError> {
    if connectors.is_empty() {
        return Err(QuoteError::NoConnectors);
    }
    let query_value = serde_json::to_value(query)?;

    let requests = connectors.iter().map(|connector| {
        let message = Message {
            ledger: ledger_prefix.to_string(),
            account: connector.clone(),
            data: MessagePayload {
                id: None,
                method: METHOD_QUOTE_REQUEST.to_string(),
                data: query_value.clone(),
            },
        };
        quote_one(correlator, connector, message, timeout)
    });
    // join_all preserves input order regardless of completion order.
    let settled = futures::future::join_all(requests).await;

    let mut responses = Vec::new();
    let mut failures = Vec::new();
    for (connector, outcome) in connectors.iter().zip(settled) {
        match outcome {
            Ok(response) => responses.push(response),
            Err(reason) => {
                tracing::debug!(%connector, %reason, "connector failed to quote");
                failures.push(format!("{connector}: {reason}"));
            }
        }
    }

    if responses.is_empty() {
        return Err(QuoteError::AllQuotesFailed(failures.join(", ")));
    }
    Ok(responses)
}

/// One connector's correlated quote exchange, with every failure mode
/// flattened to a recordable string.
async fn quote_one(
    correlator: &Correlator,
    connector: &str,
    message: Message,
    timeout: Duration,
) -> Result<QuoteResponse, String> {
    tracing::debug!(%connector, "requesting quote");
    let reply = correlator
        .request(message, METHOD_QUOTE_RESPONSE, timeout)
        .await
        .map_err(|e| e.to_string())?;

    // The reply came off the wire from an untrusted connector; amounts are
    // validated here, by deserialization, and nowhere downstream.
    serde_json::from_value(reply.data.data).map_err(|e| format!("invalid quote response: {e}"))
}
