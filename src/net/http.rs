//! HTTP control endpoint.
//!
//! A single operation: `POST /resetIndexCounter` resets the datagram
//! sequence guard so senders may restart their packet counter from 1
//! (e.g. after a controller reboot). Every other route or method gets
//! the router's not-found / method-not-allowed response.

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::routing::post;
use log::{error, info};

use crate::config::SimConfig;
use crate::proto::seq_guard::SequenceGuard;

/// Build the control router around a shared sequence guard.
pub fn router(guard: Arc<SequenceGuard>) -> Router {
    Router::new()
        .route("/resetIndexCounter", post(reset_index_counter))
        .with_state(guard)
}

/// Bind the configured control port and serve until shutdown.
pub async fn serve(config: SimConfig, guard: Arc<SequenceGuard>) {
    let addr = format!("{}:{}", config.bind_addr, config.http_port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("control endpoint bind failed on {addr}: {e}");
            return;
        }
    };
    info!("control endpoint on http://{addr}");
    if let Err(e) = axum::serve(listener, router(guard)).await {
        error!("control endpoint terminated: {e}");
    }
}

async fn reset_index_counter(State(guard): State<Arc<SequenceGuard>>) -> &'static str {
    guard.reset();
    info!("packet index counter reset via control endpoint");
    "Packet index counter reset."
}
