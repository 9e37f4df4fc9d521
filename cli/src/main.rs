// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Rivulet CLI
//!
//! Entry point for the `rivulet` binary. Parses CLI arguments, initializes
//! logging, and dispatches to one of three subcommands:
//!
//! - `quote`   — negotiate a quote against an in-process simulated ledger
//! - `details` — create or parse secure payment-details envelopes
//! - `version` — print build version information
//!
//! The quote subcommand is a full end-to-end run of the negotiation
//! engine: the connectors you describe with `--connector` become scripted
//! peers on an in-memory ledger, complete with delays, errors, and
//! silence. Useful for demos and for poking at failure handling without
//! standing up a real ledger.

mod cli;
mod logging;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use clap::Parser;

use rivulet_client::psk::{self, Headers};
use rivulet_client::quoting::{self, QuoteRequest};
use rivulet_client::transport::{ConnectorScript, MemoryLedger, Transport};

use cli::{Commands, ConnectorBehavior, DetailsCommand, RivuletCli};
use logging::LogFormat;

/// Address prefix of the simulated ledger the quote subcommand runs on.
const SIM_PREFIX: &str = "sim.ledger.";

/// Our own account on the simulated ledger.
const SIM_ACCOUNT: &str = "sim.ledger.sender";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = RivuletCli::parse();

    match cli.command {
        Commands::Quote(args) => run_quote(args).await,
        Commands::Details(command) => run_details(command),
        Commands::Version => {
            println!("rivulet {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Runs a quote negotiation on the simulated ledger and prints the
/// winning quote as JSON.
async fn run_quote(args: cli::QuoteArgs) -> Result<()> {
    logging::init_logging(
        "rivulet=info,rivulet_client=debug",
        LogFormat::from_str_lossy(&std::env::var("RIVULET_LOG_FORMAT").unwrap_or_default()),
    );

    let ledger = Arc::new(MemoryLedger::new(SIM_PREFIX, SIM_ACCOUNT));
    for spec in &args.connectors {
        let spec = cli::parse_connector_spec(spec)?;
        let address = format!("{SIM_PREFIX}{}", spec.name);
        let script = match spec.behavior {
            ConnectorBehavior::Quote {
                source_amount,
                destination_amount,
                delay_ms,
            } => ConnectorScript::Quote {
                source_amount,
                destination_amount,
                source_expiry_duration: Some(6),
                delay: delay_ms.map(Duration::from_millis),
            },
            ConnectorBehavior::Error { message } => ConnectorScript::Error { message },
            ConnectorBehavior::Silent => ConnectorScript::Silent,
        };
        tracing::info!(%address, "registering simulated connector");
        ledger.add_connector(address, script);
    }

    let request = QuoteRequest {
        destination_address: args.destination.clone(),
        source_amount: args
            .source_amount
            .as_deref()
            .map(str::parse)
            .transpose()
            .context("invalid --source-amount")?,
        destination_amount: args
            .destination_amount
            .as_deref()
            .map(str::parse)
            .transpose()
            .context("invalid --destination-amount")?,
        destination_expiry_duration: args.destination_expiry,
        timeout: Some(Duration::from_millis(args.timeout_ms)),
        ..QuoteRequest::default()
    };

    let quote = quoting::quote(ledger as Arc<dyn Transport>, &request)
        .await
        .context("quote negotiation failed")?;

    println!("{}", serde_json::to_string_pretty(&quote)?);
    Ok(())
}

/// Creates or parses a details envelope.
fn run_details(command: DetailsCommand) -> Result<()> {
    match command {
        DetailsCommand::Create(args) => {
            let secret = hex::decode(&args.secret).context("--secret must be hex")?;
            let headers = collect_headers(&args.headers)?;
            let unsafe_headers = collect_headers(&args.unsafe_headers)?;

            let envelope =
                psk::create(&headers, &unsafe_headers, &secret, args.data.as_bytes())
                    .context("failed to build details envelope")?;
            println!("{}", STANDARD.encode(envelope));
        }
        DetailsCommand::Parse(args) => {
            let secret = hex::decode(&args.secret).context("--secret must be hex")?;
            let details = psk::parse(&args.details, &secret)
                .context("failed to parse details envelope")?;

            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "unsafe_headers": headers_to_json(&details.unsafe_headers),
                    "headers": headers_to_json(&details.headers),
                    "data": data_to_json(&details.data),
                }))?
            );
        }
    }
    Ok(())
}

/// Builds a header map from repeated `Name=Value` arguments.
fn collect_headers(args: &[String]) -> Result<Headers> {
    let mut headers = Headers::new();
    for arg in args {
        let (name, value) = cli::parse_header_arg(arg)?;
        headers.insert(name, value);
    }
    Ok(headers)
}

fn headers_to_json(headers: &Headers) -> serde_json::Value {
    headers
        .iter()
        .map(|(name, value)| (name.to_string(), serde_json::json!(value)))
        .collect::<serde_json::Map<String, serde_json::Value>>()
        .into()
}

/// Payload bytes as a JSON string when textual, base64 otherwise.
fn data_to_json(data: &[u8]) -> serde_json::Value {
    match std::str::from_utf8(data) {
        Ok(text) => serde_json::json!(text),
        Err(_) => serde_json::json!({ "base64": STANDARD.encode(data) }),
    }
}
