//! # Quote Negotiation
//!
//! Finding out what a payment will cost before committing to it. The
//! sender doesn't trust any single connector to quote honestly or even to
//! answer, so the engine asks all of them at once and keeps the best
//! survivor.
//!
//! ## The stack
//!
//! ```text
//!   engine        validate → local short-circuit → fan out → select best
//!     │
//!   aggregator    N concurrent correlated requests, partial-failure
//!     │           tolerant, input-order results
//!   correlator    one request ↔ one response on a shared stream,
//!     │           timeout-raced, leak-free
//!   transport     connect / send / inbound broadcast stream
//! ```
//!
//! Each layer owns exactly one failure policy: the correlator turns
//! silence into a timeout, the aggregator turns individual failures into
//! recorded strings (and only fails when *everyone* failed), and the
//! engine turns caller mistakes into immediate errors before any traffic
//! is generated.
//!
//! ## Wire exchange
//!
//! ```text
//! → { ledger, account: <connector>, data: { id, method: "quote_request",
//!     data: { source_address, source_amount | destination_amount,
//!             destination_address, ... } } }
//!
//! ← { ..., data: { id, method: "quote_response",
//!     data: { source_amount, destination_amount,
//!             source_connector_account, source_expiry_duration } } }
//! ```

pub mod aggregator;
pub mod amount;
pub mod correlator;
pub mod engine;
pub mod error;
pub mod types;

pub use aggregator::gather;
pub use amount::{Amount, AmountError};
pub use correlator::Correlator;
pub use engine::{quote, quote_by_packet, select_best};
pub use error::{CorrelateError, QuoteError};
pub use types::{Quote, QuoteQuery, QuoteRequest, QuoteResponse};
