//! Entrypoint for the `otpd_server` binary.

use clap::Parser as _;
use eyre::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use otpd_server::{cli::Cli, config::Settings, http::start_http_server};

#[tokio::main]
async fn main() -> Result<()> {
    let invocation = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut settings = Settings::from_env()?;
    if let Some(host) = invocation.host {
        settings.host = host;
    }
    if let Some(port) = invocation.port {
        settings.port = port;
    }

    info!("OTP service starting up");
    start_http_server(settings).await?;
    info!("OTP service shut down");
    Ok(())
}
