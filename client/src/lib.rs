// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Rivulet — Core Client Library
//!
//! Rivulet is the negotiation and secure-transport core of an interledger
//! payment client: the piece that haggles over price with intermediary
//! connectors you don't trust, and the piece that makes sure only the
//! intended receiver can read what a payment is actually *for*.
//!
//! Two subsystems carry all the weight:
//!
//! - **Quote negotiation** (`quoting`) — fan a quote request out to every
//!   candidate connector at once, correlate the asynchronous replies on a
//!   shared message stream, tolerate the connectors that time out or error,
//!   and reduce the survivors to the single cheapest quote. Deterministic
//!   given deterministic inputs, which matters more than it sounds when
//!   three connectors race each other over a flaky ledger.
//! - **Secure payment details** (`psk`) — a two-layer envelope carried
//!   inside the payment packet. The outer layer is readable by every hop
//!   (routing hints, plus the key token); the inner layer is encrypted
//!   under a key derived per payment from a long-term shared secret.
//!
//! ## Architecture
//!
//! The modules mirror the actual concerns of a paying client:
//!
//! - **config** — Protocol constants. One place, no scavenger hunts.
//! - **crypto** — AES-256-GCM and the HMAC-based payment-key KDF.
//! - **psk** — Envelope wire format and the secure details codec.
//! - **packet** — The opaque payment-packet codec (a thin collaborator).
//! - **transport** — The ledger transport seam, plus an in-process ledger
//!   for tests and simulation.
//! - **quoting** — Correlator, fan-out aggregator, and the negotiation
//!   engine on top.
//!
//! ## Design Philosophy
//!
//! 1. The transport is a seam, not a dependency — everything above it is
//!    testable without a network.
//! 2. Per-connector failure is a data point, not an exception.
//! 3. Anything that arrives off the wire is validated at the boundary,
//!    then trusted inside.

pub mod config;
pub mod crypto;
pub mod packet;
pub mod psk;
pub mod quoting;
pub mod transport;
