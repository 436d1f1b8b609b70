//! HTTP server assembly: shared state, router construction, startup and
//! shutdown.

use std::{net::SocketAddr, sync::Arc};

use axum::{Router, http::header::HeaderName};
use eyre::{Result, WrapErr as _};
use secrecy::SecretString;
use tokio::{net::TcpListener, signal};
use tower_http::{
    catch_panic::CatchPanicLayer, sensitive_headers::SetSensitiveRequestHeadersLayer,
    trace::TraceLayer,
};
use tracing::info;

use otpd_common::TotpEngine;

use crate::{auth, config::Settings, routes};

/// Immutable state shared by all request handlers.
///
/// Everything here is read-only after startup, so handlers run on any number
/// of tasks concurrently without locking.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<TotpEngine>,
    pub api_key: Arc<SecretString>,
    pub enable_docs: bool,
}

/// Builds the application router with request logging, header scrubbing and
/// a panic guard that turns unexpected faults into opaque 500s.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(routes::routes())
        .layer(SetSensitiveRequestHeadersLayer::new([
            HeaderName::from_static(auth::API_KEY_HEADER),
            HeaderName::from_static(auth::SIGNATURE_HEADER),
        ]))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        .with_state(state)
}

/// Resolves when a shutdown signal is received.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to create SIGTERM signal handler");
        tokio::select! {
            _ = sigterm.recv() => {}
            _ = signal::ctrl_c() => {}
        }
    }
    #[cfg(not(unix))]
    {
        drop(signal::ctrl_c().await);
    }
}

/// Binds the listener and serves requests until a shutdown signal arrives.
///
/// # Errors
///
/// Returns an error if the bind address is invalid or the listener cannot be
/// bound.
pub async fn start_http_server(settings: Settings) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", settings.host, settings.port)
        .parse()
        .wrap_err("HOST and PORT do not form a valid socket address")?;

    let state = AppState {
        engine: Arc::new(settings.engine),
        api_key: Arc::new(settings.api_key),
        enable_docs: settings.enable_docs,
    };
    let app = create_app(state);

    let listener = TcpListener::bind(addr)
        .await
        .wrap_err_with(|| format!("Failed to bind {addr}"))?;
    info!("Listening on http://{addr}");

    let server = axum::serve(listener, app.into_make_service());
    tokio::select! {
        res = server => res?,
        () = shutdown_signal() => {
            info!("Received shutdown, shutting down");
        }
    }
    Ok(())
}
