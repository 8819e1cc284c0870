//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Products
//! GET  /products               - Listing (?category&brand&color&price&sort)
//! GET  /products/filters       - Filter options
//! GET  /products/{slug}        - Product detail
//!
//! # Cart
//! GET  /cart                   - Cart lines and totals
//! POST /cart/add               - Add a line
//! POST /cart/update            - Adjust quantity by delta
//! POST /cart/remove            - Remove a line
//! POST /cart/promo             - Apply promo code
//! GET  /cart/count             - Item count
//!
//! # Checkout
//! GET  /checkout               - Checkout state (starts one if needed)
//! PUT  /checkout/contact       - Replace contact form
//! PUT  /checkout/shipping      - Replace shipping form
//! PUT  /checkout/payment       - Replace payment form
//! POST /checkout/next          - Advance (places the order from payment)
//! POST /checkout/back          - Go back
//!
//! # Forms
//! POST /contact                - Contact form
//! POST /newsletter             - Newsletter signup
//! ```

pub mod cart;
pub mod checkout;
pub mod contact;
pub mod products;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/filters", get(products::filters))
        .route("/{slug}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/promo", post(cart::promo))
        .route("/count", get(cart::count))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show))
        .route("/contact", put(checkout::update_contact))
        .route("/shipping", put(checkout::update_shipping))
        .route("/payment", put(checkout::update_payment))
        .route("/next", post(checkout::next))
        .route("/back", post(checkout::back))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
        .route("/contact", post(contact::submit))
        .route("/newsletter", post(contact::subscribe))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running.
async fn health() -> &'static str {
    "ok"
}
