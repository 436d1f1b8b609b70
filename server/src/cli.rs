//! Command-line interface definitions for the service binary.

use clap::Parser;

/// Top-level command-line interface definition.
///
/// The service is configured through the environment (`API_KEY`,
/// `OTP_SECRET`, `HOST`, `PORT`, `ENABLE_DOCS`); the flags here only
/// override where it listens.
#[derive(Debug, Parser)]
#[command(name = env!("CARGO_PKG_NAME"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = env!("CARGO_PKG_DESCRIPTION"))]
pub struct Cli {
    /// Optional override for the bind address (overrides HOST).
    #[arg(long)]
    pub host: Option<String>,

    /// Optional override for the listen port (overrides PORT).
    #[arg(long)]
    pub port: Option<u16>,
}
