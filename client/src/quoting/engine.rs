//! # Quote Negotiation Engine
//!
//! The top of the quoting stack. One call, one best quote:
//!
//! 1. Validate that the caller fixed exactly one side of the payment.
//! 2. Connect the transport (idempotent).
//! 3. Destination under our own ledger prefix? No network, no connectors —
//!    a pass-through quote, since a local transfer costs nothing.
//! 4. Otherwise fan the query out to every candidate connector and
//!    collect the survivors.
//! 5. Reduce left-to-right to the cheapest quote.
//! 6. Normalize: the caller's own amount is echoed back verbatim on the
//!    side they specified — a connector's rounding never silently
//!    overwrites the caller's authoritative input.

use std::sync::Arc;

use chrono::Utc;

use crate::config::{DEFAULT_EXPIRY_DURATION_SECS, DEFAULT_QUOTE_TIMEOUT};
use crate::packet;
use crate::transport::Transport;

use super::aggregator::gather;
use super::correlator::Correlator;
use super::error::QuoteError;
use super::types::{Quote, QuoteQuery, QuoteRequest, QuoteResponse};
use super::Amount;

/// Which side of the payment the caller fixed.
enum FixedSide {
    Source(Amount),
    Destination(Amount),
}

impl FixedSide {
    /// Validates the exactly-one-amount invariant and captures the side.
    fn from_request(request: &QuoteRequest) -> Result<Self, QuoteError> {
        match (&request.source_amount, &request.destination_amount) {
            (Some(amount), None) => Ok(FixedSide::Source(amount.clone())),
            (None, Some(amount)) => Ok(FixedSide::Destination(amount.clone())),
            _ => Err(QuoteError::AmbiguousAmount),
        }
    }

    fn amount(&self) -> &Amount {
        match self {
            FixedSide::Source(amount) | FixedSide::Destination(amount) => amount,
        }
    }
}

/// Negotiates the best available quote for `request`.
///
/// See the module docs for the flow. The amount XOR check runs before any
/// transport interaction, so a malformed request costs zero messages.
pub async fn quote(
    transport: Arc<dyn Transport>,
    request: &QuoteRequest,
) -> Result<Quote, QuoteError> {
    let fixed = FixedSide::from_request(request)?;

    transport.connect().await?;
    let info = transport.info();

    if request.destination_address.starts_with(&info.prefix) {
        tracing::debug!(
            destination = %request.destination_address,
            amount = %fixed.amount(),
            "destination is local, returning pass-through quote"
        );
        return Ok(local_quote(&fixed, request));
    }

    let query = QuoteQuery {
        source_address: transport.account(),
        source_amount: request.source_amount.clone(),
        destination_address: request.destination_address.clone(),
        destination_amount: request.destination_amount.clone(),
        destination_expiry_duration: request.destination_expiry_duration,
        destination_precision: request.destination_precision,
    };
    let connectors = request
        .connectors
        .clone()
        .unwrap_or_else(|| info.connectors.clone());
    let timeout = request.timeout.unwrap_or(DEFAULT_QUOTE_TIMEOUT);
    tracing::debug!(
        destination = %request.destination_address,
        connectors = connectors.len(),
        "fanning out quote request"
    );

    let correlator = Correlator::new(Arc::clone(&transport));
    let responses = gather(&correlator, &info.prefix, &connectors, &query, timeout).await?;

    // gather never returns an empty set, so the reduction always has a
    // seed; the error arm is unreachable in practice.
    let best = select_best(&responses).ok_or(QuoteError::NoConnectors)?;
    tracing::debug!(
        connector = best.source_connector_account.as_deref().unwrap_or("<unknown>"),
        source = %best.source_amount,
        destination = %best.destination_amount,
        "selected best quote"
    );

    Ok(normalize(best, &fixed))
}

/// Decodes a payment packet and negotiates a quote for delivering its
/// amount to its destination.
pub async fn quote_by_packet(
    transport: Arc<dyn Transport>,
    packet_bytes: &[u8],
) -> Result<Quote, QuoteError> {
    let packet = packet::parse(packet_bytes)?;
    let request = QuoteRequest {
        destination_address: packet.account,
        destination_amount: Some(packet.amount.parse()?),
        ..QuoteRequest::default()
    };
    quote(transport, &request).await
}

/// Reduces candidate quotes left-to-right to the best one.
///
/// A challenger replaces the incumbent only if its source amount is
/// strictly smaller, or the source amounts are equal and its destination
/// amount is strictly larger. Ties keep the earlier-listed candidate,
/// which together with the aggregator's stable ordering makes selection
/// deterministic.
pub fn select_best(responses: &[QuoteResponse]) -> Option<&QuoteResponse> {
    responses.iter().reduce(|incumbent, challenger| {
        let wins = challenger.source_amount < incumbent.source_amount
            || (challenger.source_amount == incumbent.source_amount
                && challenger.destination_amount > incumbent.destination_amount);
        if wins {
            challenger
        } else {
            incumbent
        }
    })
}

/// A pass-through quote for a destination on our own ledger: both sides
/// carry the caller's amount and no connector is involved.
fn local_quote(fixed: &FixedSide, request: &QuoteRequest) -> Quote {
    let expiry = request
        .destination_expiry_duration
        .unwrap_or(DEFAULT_EXPIRY_DURATION_SECS);
    Quote {
        source_amount: fixed.amount().clone(),
        destination_amount: fixed.amount().clone(),
        connector_account: None,
        source_expiry_duration: expiry,
        expires_at: Utc::now() + chrono::Duration::seconds(expiry as i64),
    }
}

/// Builds the final quote from the winning response, echoing the caller's
/// amount on the side they fixed.
fn normalize(best: &QuoteResponse, fixed: &FixedSide) -> Quote {
    let (source_amount, destination_amount) = match fixed {
        FixedSide::Source(amount) => (amount.clone(), best.destination_amount.clone()),
        FixedSide::Destination(amount) => (best.source_amount.clone(), amount.clone()),
    };
    let expiry = best
        .source_expiry_duration
        .unwrap_or(DEFAULT_EXPIRY_DURATION_SECS);

    Quote {
        source_amount,
        destination_amount,
        connector_account: best.source_connector_account.clone(),
        source_expiry_duration: expiry,
        expires_at: Utc::now() + chrono::Duration::seconds(expiry as i64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(source: &str, dest: &str) -> QuoteResponse {
        QuoteResponse {
            source_amount: source.parse().unwrap(),
            destination_amount: dest.parse().unwrap(),
            source_connector_account: None,
            source_expiry_duration: None,
        }
    }

    // -----------------------------------------------------------------------
    // Best-quote selection
    // -----------------------------------------------------------------------

    #[test]
    fn smaller_source_amount_wins() {
        let quotes = vec![response("5", "10"), response("3", "8")];
        let best = select_best(&quotes).unwrap();
        assert_eq!(best.source_amount.as_str(), "3");
    }

    #[test]
    fn equal_source_larger_destination_wins() {
        let quotes = vec![response("5", "10"), response("5", "12")];
        let best = select_best(&quotes).unwrap();
        assert_eq!(best.destination_amount.as_str(), "12");
    }

    #[test]
    fn equal_quotes_keep_the_first() {
        let mut first = response("5", "10");
        first.source_connector_account = Some("first".to_string());
        let mut second = response("5", "10");
        second.source_connector_account = Some("second".to_string());

        let quotes = vec![first, second];
        let best = select_best(&quotes).unwrap();
        assert_eq!(best.source_connector_account.as_deref(), Some("first"));
    }

    #[test]
    fn cheaper_source_beats_larger_destination() {
        // A challenger with a bigger payout but a bigger cost does not win.
        let quotes = vec![response("3", "10"), response("5", "12")];
        let best = select_best(&quotes).unwrap();
        assert_eq!(best.source_amount.as_str(), "3");
    }

    #[test]
    fn selection_reduces_left_to_right_over_many() {
        let quotes = vec![
            response("7", "10"),
            response("5", "10"),
            response("5", "11"),
            response("6", "20"),
        ];
        let best = select_best(&quotes).unwrap();
        assert_eq!(best.source_amount.as_str(), "5");
        assert_eq!(best.destination_amount.as_str(), "11");
    }

    #[test]
    fn selection_compares_numerically_not_lexically() {
        let quotes = vec![response("10", "9"), response("9.50", "9")];
        let best = select_best(&quotes).unwrap();
        assert_eq!(best.source_amount.as_str(), "9.50");
    }

    #[test]
    fn empty_slice_selects_nothing() {
        assert!(select_best(&[]).is_none());
    }

    // -----------------------------------------------------------------------
    // Request validation
    // -----------------------------------------------------------------------

    #[test]
    fn both_amounts_set_is_ambiguous() {
        let request = QuoteRequest {
            destination_address: "test.other.bob".to_string(),
            source_amount: Some("1".parse().unwrap()),
            destination_amount: Some("1".parse().unwrap()),
            ..QuoteRequest::default()
        };
        assert!(matches!(
            FixedSide::from_request(&request),
            Err(QuoteError::AmbiguousAmount)
        ));
    }

    #[test]
    fn neither_amount_set_is_ambiguous() {
        let request = QuoteRequest {
            destination_address: "test.other.bob".to_string(),
            ..QuoteRequest::default()
        };
        assert!(matches!(
            FixedSide::from_request(&request),
            Err(QuoteError::AmbiguousAmount)
        ));
    }
}
