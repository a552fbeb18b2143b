//! REST API over a running [`Service`].
//!
//! - `GET /prices` — the day's banded prices
//! - `POST /prices/reset` — relabel every hour Normal
//! - `GET /appliances` — registry contents with live status
//! - `POST /readings` — feed a load and/or average reading

mod handlers;
mod types;

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};

use crate::service::Service;

pub use types::{ApplianceRecord, ErrorResponse, ReadingRequest, ReadingResponse};

/// State shared by all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<Service>,
}

/// Builds the axum router with all API routes.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/prices", get(handlers::get_prices))
        .route("/prices/reset", post(handlers::reset_prices))
        .route("/appliances", get(handlers::get_appliances))
        .route("/readings", post(handlers::post_reading))
        .with_state(state)
}

/// Binds to `addr` and serves the API until `shutdown` resolves.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(
    state: AppState,
    addr: SocketAddr,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "api listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
