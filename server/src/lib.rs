//! Larder Server - HTTP front end for the perishable inventory ledger.
//!
//! The server owns a single [`larder_engine::Ledger`], flushes it to a JSON
//! file after every change and exposes it over a small JSON API plus a CSV
//! export.

pub mod config;
pub mod error;
pub mod export;
pub mod handlers;
pub mod inventory;
pub mod routes;
pub mod storage;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::inventory::SharedInventory;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub inventory: SharedInventory,
    pub config: Arc<Config>,
}

/// Build the router with tracing and CORS layers.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(routes::create_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
