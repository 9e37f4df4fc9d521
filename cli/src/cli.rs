//! # CLI Interface
//!
//! Defines the command-line argument structure for the `rivulet` binary
//! using `clap` derive. Supports three subcommands: `quote`, `details`,
//! and `version`.

use clap::{Parser, Subcommand};

/// Rivulet interledger payment client.
///
/// Negotiates payment quotes across connectors and encodes/decodes the
/// secure payment-details envelopes that ride inside payment packets.
#[derive(Parser, Debug)]
#[command(
    name = "rivulet",
    about = "Rivulet interledger payment client",
    version,
    propagate_version = true
)]
pub struct RivuletCli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the rivulet binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Negotiate a quote against an in-process simulated ledger.
    Quote(QuoteArgs),
    /// Create or parse secure payment-details envelopes.
    #[command(subcommand)]
    Details(DetailsCommand),
    /// Print version information and exit.
    Version,
}

/// Arguments for the `quote` subcommand.
///
/// The simulated ledger lives under the `sim.ledger.` prefix; every
/// `--connector` spec becomes a scripted connector on it. A destination
/// under `sim.ledger.` demonstrates the local-delivery short circuit.
#[derive(Parser, Debug)]
pub struct QuoteArgs {
    /// Destination address (e.g. `sim.other.bob`).
    #[arg(long)]
    pub destination: String,

    /// Fix the amount on the sending side.
    #[arg(long)]
    pub source_amount: Option<String>,

    /// Fix the amount on the receiving side.
    #[arg(long)]
    pub destination_amount: Option<String>,

    /// Simulated connector: `name=source:dest[:delay_ms]`. Repeatable.
    ///
    /// `--connector connie=10:9.5` registers `sim.ledger.connie` replying
    /// with source amount 10 and destination amount 9.5. Use the literal
    /// scripts `name=error:<message>` or `name=silent` to simulate a
    /// failing or unresponsive connector.
    #[arg(long = "connector", value_name = "SPEC")]
    pub connectors: Vec<String>,

    /// Per-connector response timeout in milliseconds.
    #[arg(long, default_value_t = 5_000)]
    pub timeout_ms: u64,

    /// Destination expiry duration in seconds.
    #[arg(long)]
    pub destination_expiry: Option<u64>,
}

/// Subcommands under `details`.
#[derive(Subcommand, Debug)]
pub enum DetailsCommand {
    /// Build a details envelope and print it base64-encoded.
    Create(CreateArgs),
    /// Parse a base64-encoded details envelope.
    Parse(ParseArgs),
}

/// Arguments for `details create`.
#[derive(Parser, Debug)]
pub struct CreateArgs {
    /// Hex-encoded shared secret.
    #[arg(long, env = "RIVULET_SECRET")]
    pub secret: String,

    /// Private payload carried in the encrypted layer.
    #[arg(long, default_value = "")]
    pub data: String,

    /// Private (encrypted) header as `Name=Value`. Repeatable.
    #[arg(long = "header", value_name = "NAME=VALUE")]
    pub headers: Vec<String>,

    /// Public header visible to intermediaries, as `Name=Value`.
    /// Repeatable. `Key` is reserved.
    #[arg(long = "unsafe-header", value_name = "NAME=VALUE")]
    pub unsafe_headers: Vec<String>,
}

/// Arguments for `details parse`.
#[derive(Parser, Debug)]
pub struct ParseArgs {
    /// Hex-encoded shared secret.
    #[arg(long, env = "RIVULET_SECRET")]
    pub secret: String,

    /// The base64-encoded details envelope.
    pub details: String,
}

/// Splits a `Name=Value` header argument.
pub fn parse_header_arg(arg: &str) -> anyhow::Result<(String, String)> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("header must be NAME=VALUE, got {arg:?}"))?;
    if name.is_empty() {
        anyhow::bail!("header name must not be empty in {arg:?}");
    }
    Ok((name.to_string(), value.to_string()))
}

/// A parsed `--connector` spec.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorSpec {
    /// Short connector name; the ledger prefix is prepended at setup.
    pub name: String,
    pub behavior: ConnectorBehavior,
}

/// What the simulated connector does with a quote request.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectorBehavior {
    Quote {
        source_amount: String,
        destination_amount: String,
        delay_ms: Option<u64>,
    },
    Error { message: String },
    Silent,
}

/// Parses `name=source:dest[:delay_ms]`, `name=error:<message>`, or
/// `name=silent`.
pub fn parse_connector_spec(spec: &str) -> anyhow::Result<ConnectorSpec> {
    let (name, script) = spec
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("connector spec must be name=script, got {spec:?}"))?;
    if name.is_empty() {
        anyhow::bail!("connector name must not be empty in {spec:?}");
    }

    let behavior = if script == "silent" {
        ConnectorBehavior::Silent
    } else if let Some(message) = script.strip_prefix("error:") {
        ConnectorBehavior::Error {
            message: message.to_string(),
        }
    } else {
        let mut parts = script.splitn(3, ':');
        let source = parts.next().unwrap_or_default();
        let dest = parts
            .next()
            .ok_or_else(|| anyhow::anyhow!("quote script must be source:dest[:delay_ms] in {spec:?}"))?;
        let delay_ms = parts.next().map(|s| s.parse::<u64>()).transpose()?;
        ConnectorBehavior::Quote {
            source_amount: source.to_string(),
            destination_amount: dest.to_string(),
            delay_ms,
        }
    };

    Ok(ConnectorSpec {
        name: name.to_string(),
        behavior,
    })
}
