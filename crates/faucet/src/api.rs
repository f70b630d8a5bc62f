//! HTTP API for faucet service

use super::service::FaucetService;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Query string of a transfer request
#[derive(Debug, Deserialize)]
pub struct TransferQuery {
    pub amount: Option<String>,
}

/// `GET /transfer/:addr?amount=<sol>`
///
/// Replies with the explorer URL as plain text, or a plain-text error.
pub async fn transfer_handler(
    State(service): State<Arc<FaucetService>>,
    Path(addr): Path<String>,
    Query(query): Query<TransferQuery>,
) -> Response {
    info!("Transfer request: address={}, amount={:?}", addr, query.amount);

    match service.transfer(&addr, query.amount.as_deref()).await {
        Ok(receipt) => {
            info!(
                "Sent {} lamports to {}, tx: {}",
                receipt.lamports, receipt.recipient, receipt.signature
            );
            receipt.explorer_url.into_response()
        }
        Err(e) => {
            if e.is_client_error() {
                warn!("Rejected transfer to {}: {}", addr, e);
            } else {
                error!("Transfer to {} failed: {}", addr, e);
            }
            e.into_response()
        }
    }
}

/// Build the router
pub fn router(service: Arc<FaucetService>) -> Router {
    let cors_enabled = service.config().cors_enabled;

    let mut app = Router::new()
        .route("/transfer/:addr", get(transfer_handler))
        .with_state(service)
        .layer(TraceLayer::new_for_http());

    if cors_enabled {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        app = app.layer(cors);
    }

    app
}
