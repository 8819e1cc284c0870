//! `bound checkout` - walk a cart through the checkout wizard.
//!
//! The file is a cart file plus the three checkout forms:
//!
//! ```yaml
//! lines:
//!   - slug: premium-sneakers
//!     size: "9"
//! contact:
//!   email: jordan@example.com
//!   phone: "5035550100"
//! shipping:
//!   first_name: Jordan
//!   last_name: Lee
//!   address: 500 Market St
//!   city: San Francisco
//!   state: CA
//!   zip: "94105"
//! payment:
//!   method: paypal
//! ```
//!
//! Nothing is charged or sent; the command stops at the first step whose
//! form is incomplete.

use std::path::Path;

use bound_storefront::checkout::{
    Checkout, CheckoutError, ContactInfo, OrderConfirmation, PaymentInfo, ShippingInfo,
};
use serde::Deserialize;
use tracing::info;

use super::quote::{self, CartFile};
use super::{CommandError, Context, emit, read_yaml};

/// A checkout described in YAML.
#[derive(Debug, Deserialize)]
pub struct CheckoutFile {
    #[serde(flatten)]
    pub cart: CartFile,
    #[serde(default)]
    pub contact: ContactInfo,
    #[serde(default)]
    pub shipping: ShippingInfo,
    #[serde(default)]
    pub payment: PaymentInfo,
}

/// Run every step of the wizard and return the placed order.
///
/// # Errors
///
/// Returns an error if the cart is empty or invalid, or if a step's form
/// is incomplete.
pub fn place_order(
    context: &Context,
    file: CheckoutFile,
) -> Result<(String, OrderConfirmation), CommandError> {
    let cart = file.cart.build(context)?;
    if cart.is_empty() {
        return Err(CommandError::EmptyCart);
    }

    let mut checkout = Checkout::new(cart.summary());
    let stopped = |checkout: &Checkout, source: CheckoutError| CommandError::Checkout {
        step: checkout.step(),
        source,
    };
    checkout.update_contact(file.contact).map_err(|e| stopped(&checkout, e))?;
    checkout.update_shipping(file.shipping).map_err(|e| stopped(&checkout, e))?;
    checkout.update_payment(file.payment).map_err(|e| stopped(&checkout, e))?;

    while !checkout.step().is_complete() {
        checkout.next().map_err(|e| stopped(&checkout, e))?;
    }

    let confirmation = checkout
        .confirmation()
        .cloned()
        .ok_or(CommandError::Checkout {
            step: checkout.step(),
            source: CheckoutError::AlreadyComplete,
        })?;
    Ok((quote::render(&cart), confirmation))
}

/// Dry-run a checkout file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or checkout stops early.
pub fn run(context: &Context, path: &Path) -> Result<(), CommandError> {
    let file: CheckoutFile = read_yaml(path)?;
    let (receipt, confirmation) = place_order(context, file)?;
    info!(order_number = %confirmation.order_number, "Checkout dry run complete");

    emit(&receipt);
    emit(&format!(
        "\nOrder {} placed. A confirmation email has been sent to {}.",
        confirmation.order_number, confirmation.email
    ));
    Ok(())
}
