//! Command-line helper for automation tools.
//!
//! `generate` prints the current 6-digit code for a secret and nothing else
//! on stdout, so callers can capture the output verbatim. `new-secret`
//! prints a freshly generated base32 secret for provisioning.

use clap::{Parser, Subcommand};
use eyre::Result;
use secrecy::SecretString;

use otpd_common::{TotpEngine, generate_secret};

/// Top-level CLI parser for the helper binary.
#[derive(Debug, Parser)]
#[command(name = env!("CARGO_PKG_NAME"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = env!("CARGO_PKG_DESCRIPTION"))]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Subcommands available for the helper.
#[derive(Debug, Subcommand)]
enum Command {
    /// Print the current 6-digit code for a secret to stdout.
    Generate {
        /// Base32-encoded TOTP secret; read from the OTP_SECRET environment
        /// variable when not passed as an argument.
        #[arg(env = "OTP_SECRET", hide_env_values = true)]
        secret: String,

        /// Also report the code's remaining validity on stderr.
        #[arg(long)]
        verbose: bool,
    },

    /// Print a freshly generated random base32 secret.
    NewSecret,
}

fn main() -> Result<()> {
    let invocation = Cli::parse();

    match invocation.command {
        Command::Generate { secret, verbose } => {
            let engine = TotpEngine::new(&SecretString::from(secret))?;
            let reading = engine.generate();
            if verbose {
                eprintln!("valid for {}s", reading.valid_for_seconds);
            }
            println!("{}", reading.otp);
        }
        Command::NewSecret => {
            println!("{}", generate_secret());
        }
    }
    Ok(())
}
