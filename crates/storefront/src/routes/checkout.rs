//! Checkout route handlers.
//!
//! The checkout lives next to the cart in the visitor's session. Before each
//! action its order summary is refreshed from the cart; placing the order
//! clears the cart.

use axum::{Json, extract::State};
use bound_core::{CheckoutStep, PaymentMethod};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use super::cart::SummaryView;
use crate::cart::Cart;
use crate::checkout::{
    Checkout, ContactInfo, OrderConfirmation, PaymentInfo, ShippingInfo, StepProgress,
};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::session::{load_cart, load_checkout, save_cart, save_checkout};
use crate::state::AppState;

/// Payment form as echoed back to the client. Card details never leave
/// the server.
#[derive(Debug, Serialize)]
pub struct PaymentView {
    pub method: PaymentMethod,
    pub card_last4: Option<String>,
    pub upi_id: Option<String>,
}

impl From<&PaymentInfo> for PaymentView {
    fn from(payment: &PaymentInfo) -> Self {
        let digits: Vec<char> = payment
            .card
            .number
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        let card_last4 = (digits.len() >= 4)
            .then(|| digits.iter().skip(digits.len() - 4).collect::<String>());
        Self {
            method: payment.method,
            card_last4,
            upi_id: (!payment.upi_id.trim().is_empty()).then(|| payment.upi_id.clone()),
        }
    }
}

/// A placed order.
#[derive(Debug, Serialize)]
pub struct ConfirmationView {
    /// Display form, e.g. `#BND23782`.
    pub order_number: String,
    pub email: String,
    pub message: String,
    pub summary: SummaryView,
    pub placed_at: DateTime<Utc>,
}

impl From<&OrderConfirmation> for ConfirmationView {
    fn from(confirmation: &OrderConfirmation) -> Self {
        Self {
            order_number: confirmation.order_number.to_string(),
            email: confirmation.email.clone(),
            message: format!(
                "A confirmation email has been sent to {}",
                confirmation.email
            ),
            summary: confirmation.summary.into(),
            placed_at: confirmation.placed_at,
        }
    }
}

/// Checkout response.
#[derive(Debug, Serialize)]
pub struct CheckoutView {
    pub step: CheckoutStep,
    pub step_number: Option<u8>,
    pub progress: Vec<StepProgress>,
    /// Whether "Continue" is enabled.
    pub can_continue: bool,
    pub contact: ContactInfo,
    pub shipping: ShippingInfo,
    /// Choices for the shipping country field.
    pub countries: &'static [&'static str],
    pub payment: PaymentView,
    pub summary: SummaryView,
    pub confirmation: Option<ConfirmationView>,
}

impl From<&Checkout> for CheckoutView {
    fn from(checkout: &Checkout) -> Self {
        Self {
            step: checkout.step(),
            step_number: checkout.step().number(),
            progress: checkout.progress(),
            can_continue: checkout.can_continue(),
            contact: checkout.contact().clone(),
            shipping: checkout.shipping().clone(),
            countries: &ShippingInfo::COUNTRIES,
            payment: checkout.payment().into(),
            summary: (*checkout.summary()).into(),
            confirmation: checkout.confirmation().map(ConfirmationView::from),
        }
    }
}

/// Load the session's checkout, starting one if needed.
///
/// A placed order stays visible until the cart is filled again; then a new
/// checkout starts.
async fn open_checkout(session: &Session, state: &AppState) -> Result<(Cart, Checkout)> {
    let cart = load_cart(session, state).await?;
    let existing = load_checkout(session)
        .await?
        .filter(|checkout| !checkout.step().is_complete() || cart.is_empty());

    let mut checkout = match existing {
        Some(checkout) => checkout,
        None if cart.is_empty() => {
            return Err(AppError::BadRequest("cart is empty".to_string()));
        }
        None => {
            tracing::info!(items = cart.item_count(), "Checkout started");
            Checkout::new(cart.summary())
        }
    };
    checkout.refresh_summary(cart.summary());
    Ok((cart, checkout))
}

/// Apply one transition and persist the result.
async fn transition<F>(state: &AppState, session: &Session, action: F) -> Result<Json<CheckoutView>>
where
    F: FnOnce(&mut Checkout, &Cart) -> Result<()>,
{
    let (mut cart, mut checkout) = open_checkout(session, state).await?;
    action(&mut checkout, &cart)?;

    // Only true right after the order is placed.
    if checkout.step().is_complete() && !cart.is_empty() {
        if let Some(confirmation) = checkout.confirmation() {
            add_breadcrumb(
                "checkout",
                "Order placed",
                Some(&[("order_number", confirmation.order_number.as_str())]),
            );
        }
        cart.clear();
        save_cart(session, &cart).await?;
    }
    save_checkout(session, &checkout).await?;
    Ok(Json(CheckoutView::from(&checkout)))
}

/// Current checkout state.
///
/// GET /checkout
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<CheckoutView>> {
    transition(&state, &session, |_, _| Ok(())).await
}

/// Replace the contact form.
///
/// PUT /checkout/contact
#[instrument(skip(state, session, contact))]
pub async fn update_contact(
    State(state): State<AppState>,
    session: Session,
    Json(contact): Json<ContactInfo>,
) -> Result<Json<CheckoutView>> {
    transition(&state, &session, |checkout, _| {
        checkout.update_contact(contact)?;
        Ok(())
    })
    .await
}

/// Replace the shipping form.
///
/// PUT /checkout/shipping
#[instrument(skip(state, session, shipping))]
pub async fn update_shipping(
    State(state): State<AppState>,
    session: Session,
    Json(shipping): Json<ShippingInfo>,
) -> Result<Json<CheckoutView>> {
    transition(&state, &session, |checkout, _| {
        checkout.update_shipping(shipping)?;
        Ok(())
    })
    .await
}

/// Replace the payment form.
///
/// PUT /checkout/payment
#[instrument(skip(state, session, payment))]
pub async fn update_payment(
    State(state): State<AppState>,
    session: Session,
    Json(payment): Json<PaymentInfo>,
) -> Result<Json<CheckoutView>> {
    transition(&state, &session, |checkout, _| {
        checkout.update_payment(payment)?;
        Ok(())
    })
    .await
}

/// Advance one step, placing the order from the payment step.
///
/// POST /checkout/next
#[instrument(skip(state, session))]
pub async fn next(State(state): State<AppState>, session: Session) -> Result<Json<CheckoutView>> {
    transition(&state, &session, |checkout, cart| {
        if checkout.step() == CheckoutStep::Payment && cart.is_empty() {
            return Err(AppError::BadRequest("cart is empty".to_string()));
        }
        checkout.next()?;
        Ok(())
    })
    .await
}

/// Go back one step.
///
/// POST /checkout/back
#[instrument(skip(state, session))]
pub async fn back(State(state): State<AppState>, session: Session) -> Result<Json<CheckoutView>> {
    transition(&state, &session, |checkout, _| {
        checkout.back()?;
        Ok(())
    })
    .await
}
