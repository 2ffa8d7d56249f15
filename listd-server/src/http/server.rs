//! Axum server setup
//!
//! Server skeleton with:
//! - Correlation + tracing middleware
//! - Read timeout on request bodies, write timeout on whole requests
//! - Graceful shutdown on SIGTERM/Ctrl+C, bounded by a shutdown timeout

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::{middleware, Router};
use sqlx::PgPool;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::timeout::{RequestBodyTimeoutLayer, TimeoutLayer};
use tower_http::trace::TraceLayer;

use super::error::ApiError;
use super::middleware::{request_context, timeout_envelope};
use super::routes;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:3000)
    pub bind_addr: SocketAddr,

    /// Maximum time to receive a request body
    pub read_timeout: Duration,

    /// Maximum time to produce a response
    pub write_timeout: Duration,

    /// How long in-flight requests may run after a shutdown signal
    pub shutdown_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            read_timeout: Duration::from_secs(5),
            write_timeout: Duration::from_secs(10),
            shutdown_timeout: Duration::from_secs(5),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Build the application router with all routes and middleware.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let routes = Router::new()
        .merge(routes::health::router())
        .merge(routes::lists::router())
        .merge(routes::items::router());

    wrap(routes, config).with_state(Arc::new(state))
}

/// Fallbacks, timeouts and request middleware around `routes`.
fn wrap(routes: Router<Arc<AppState>>, config: &ServerConfig) -> Router<Arc<AppState>> {
    routes
        .fallback(|| async { ApiError::NoRoute })
        .method_not_allowed_fallback(|| async { ApiError::MethodNotAllowed })
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.write_timeout,
        ))
        // outside the timeout so its bare 408 gets an envelope
        .layer(middleware::map_response(timeout_envelope))
        .layer(RequestBodyTimeoutLayer::new(config.read_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_context))
}

/// Run the HTTP server until Ctrl+C or SIGTERM.
///
/// # Example
///
/// ```ignore
/// let pool = connect(&DbConfig::default()).await?;
/// run_server(pool, ServerConfig::default()).await?;
/// ```
pub async fn run_server(pool: PgPool, config: ServerConfig) -> Result<(), ServerError> {
    let app = build_router(AppState::new(pool), &config);

    // Bind listener
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "server listening");

    serve_until_shutdown(listener, app, config.shutdown_timeout, shutdown_signal()).await?;

    tracing::info!("server shutdown complete");
    Ok(())
}

/// Serve `app` until `signal` resolves, then drain for at most `grace`.
///
/// If the listener fails before the signal, that error is returned. If
/// draining takes longer than `grace`, remaining connections are dropped.
pub async fn serve_until_shutdown<F>(
    listener: TcpListener,
    app: Router,
    grace: Duration,
    signal: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send,
{
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = stop_rx.await;
            })
            .await
    });

    tokio::select! {
        joined = &mut server => {
            // Server stopped on its own: that is always a failure here.
            joined??;
            return Err(ServerError::Stopped);
        }
        _ = signal => {}
    }

    let _ = stop_tx.send(());

    match tokio::time::timeout(grace, &mut server).await {
        Ok(joined) => {
            joined??;
            Ok(())
        }
        Err(_) => {
            tracing::warn!(
                grace_ms = grace.as_millis() as u64,
                "graceful shutdown did not complete in time, closing remaining connections"
            );
            server.abort();
            Ok(())
        }
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("server stopped before a shutdown signal")]
    Stopped,
}
