//! Bound storefront library.
//!
//! The catalog, cart and checkout engines plus the JSON HTTP adapter that
//! serves them. The `bound-storefront` binary and the `bound` CLI are thin
//! wrappers around this crate.
//!
//! # Modules
//!
//! - [`catalog`] - products, filtering and sorting
//! - [`cart`] - cart lines and order totals
//! - [`checkout`] - the checkout wizard
//! - [`contact`] - contact form and newsletter signup
//! - [`routes`] - HTTP handlers over the above

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod contact;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router with its middleware stack.
///
/// Sentry layers are added by the binary, outside this router.
pub fn app(state: AppState) -> Router {
    let session_layer =
        middleware::create_session_layer(state.sessions().clone(), state.config());

    routes::routes()
        .layer(session_layer)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::session_lock_middleware,
        ))
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
