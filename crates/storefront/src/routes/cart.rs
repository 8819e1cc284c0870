//! Cart route handlers.
//!
//! The cart lives in the visitor's session. Every mutation returns the full
//! cart with freshly derived totals.

use axum::{Json, extract::State};
use bound_core::CartLineId;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::cart::{Cart, CartLine, LineSelection, OrderSummary};
use crate::catalog::ProductCatalog;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::session::{load_cart, save_cart};
use crate::state::AppState;

/// Add to cart request.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub slug: String,
    #[serde(flatten)]
    pub selection: LineSelection,
}

/// Quantity adjustment request.
#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    pub line_id: CartLineId,
    pub delta: i32,
}

/// Remove line request.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartRequest {
    pub line_id: CartLineId,
}

/// Promo code request.
#[derive(Debug, Deserialize)]
pub struct PromoRequest {
    pub code: String,
}

/// Totals formatted for display, rounded to cents.
#[derive(Debug, Clone, Serialize)]
pub struct DisplayTotals {
    pub subtotal: String,
    pub discount: String,
    pub shipping: String,
    pub total: String,
}

/// Exact totals plus their display form.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryView {
    #[serde(flatten)]
    pub summary: OrderSummary,
    pub display: DisplayTotals,
}

impl From<OrderSummary> for SummaryView {
    fn from(summary: OrderSummary) -> Self {
        Self {
            display: DisplayTotals {
                subtotal: summary.subtotal.display(),
                discount: summary.discount.display(),
                shipping: summary.shipping.display(),
                total: summary.total.display(),
            },
            summary,
        }
    }
}

/// Cart line with display prices.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineView {
    #[serde(flatten)]
    pub line: CartLine,
    pub display_price: String,
    pub display_line_total: String,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        let line_total = bound_core::Price::new(line.line_total(), line.unit_price.currency_code);
        Self {
            display_price: line.unit_price.display(),
            display_line_total: line_total.display(),
            line: line.clone(),
        }
    }
}

/// Cart response.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub is_empty: bool,
    pub promo_code: Option<String>,
    pub summary: SummaryView,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            lines: cart.lines().iter().map(CartLineView::from).collect(),
            is_empty: cart.is_empty(),
            promo_code: cart
                .promo()
                .applied
                .then(|| cart.promo().code.clone()),
            summary: cart.summary().into(),
        }
    }
}

/// Cart count response.
#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: u32,
}

/// Display cart.
///
/// GET /cart
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    let cart = load_cart(&session, &state).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Add a product to the cart.
///
/// POST /cart/add
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<CartView>> {
    let product = state
        .catalog()
        .find_by_slug(&request.slug)
        .ok_or_else(|| AppError::NotFound(format!("product '{}'", request.slug)))?;

    let mut cart = load_cart(&session, &state).await?;
    cart.add_line(product, request.selection)?;
    save_cart(&session, &cart).await?;

    add_breadcrumb("cart", "Added to cart", Some(&[("product", product.slug.as_str())]));
    Ok(Json(CartView::from(&cart)))
}

/// Adjust a line's quantity.
///
/// POST /cart/update
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<UpdateCartRequest>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session, &state).await?;
    cart.update_quantity(request.line_id, request.delta)?;
    save_cart(&session, &cart).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Remove a line.
///
/// POST /cart/remove
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<RemoveFromCartRequest>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session, &state).await?;
    let line = cart.remove_line(request.line_id)?;
    save_cart(&session, &cart).await?;

    add_breadcrumb("cart", "Removed from cart", Some(&[("product", line.slug.as_str())]));
    Ok(Json(CartView::from(&cart)))
}

/// Apply a promo code. Blank codes leave the cart unchanged.
///
/// POST /cart/promo
#[instrument(skip(state, session))]
pub async fn promo(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<PromoRequest>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session, &state).await?;
    if cart.apply_promo(&request.code) {
        save_cart(&session, &cart).await?;
        add_breadcrumb("cart", "Applied promo code", None);
    }
    Ok(Json(CartView::from(&cart)))
}

/// Cart item count for the header badge.
///
/// GET /cart/count
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> Result<Json<CountResponse>> {
    let cart = load_cart(&session, &state).await?;
    Ok(Json(CountResponse {
        count: cart.item_count(),
    }))
}
