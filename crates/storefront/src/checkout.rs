//! Checkout wizard.
//!
//! Checkout is a linear state machine over [`CheckoutStep`]:
//!
//! ```text
//! Contact -> Shipping -> Payment -> Complete
//! ```
//!
//! `next` only advances when the current step's form is complete. `back`
//! never validates. Leaving `Payment` places the order and produces an
//! [`OrderConfirmation`]; `Complete` is terminal.
//!
//! The wizard never touches the cart. The caller hands it a fresh
//! [`OrderSummary`] before each action via [`Checkout::refresh_summary`].

use bound_core::{CheckoutStep, OrderNumber, PaymentMethod};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::OrderSummary;

/// Errors returned by checkout transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("the {step} step is incomplete")]
    StepIncomplete { step: CheckoutStep },
    #[error("the order has already been placed")]
    AlreadyComplete,
}

/// Contact step.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: String,
    pub phone: String,
    /// "Save this information for next time". Stored, never acted on.
    #[serde(default)]
    pub save_info: bool,
}

impl ContactInfo {
    /// Minimum phone length, counted in characters.
    pub const MIN_PHONE_LEN: usize = 10;

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.email.contains('@') && self.phone.chars().count() >= Self::MIN_PHONE_LEN
    }
}

/// Shipping step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShippingInfo {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    /// Optional second address line.
    pub apartment: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
}

impl ShippingInfo {
    pub const DEFAULT_COUNTRY: &'static str = "United States";

    /// Countries offered in the country dropdown.
    pub const COUNTRIES: [&'static str; 5] = [
        "United States",
        "Canada",
        "United Kingdom",
        "Australia",
        "India",
    ];

    #[must_use]
    pub fn is_complete(&self) -> bool {
        [
            &self.first_name,
            &self.last_name,
            &self.address,
            &self.city,
            &self.state,
            &self.zip,
        ]
        .iter()
        .all(|field| !field.trim().is_empty())
    }
}

impl Default for ShippingInfo {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            address: String::new(),
            apartment: String::new(),
            city: String::new(),
            state: String::new(),
            zip: String::new(),
            country: Self::DEFAULT_COUNTRY.to_string(),
        }
    }
}

/// Card fields on the payment step.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CardDetails {
    pub number: String,
    pub name: String,
    /// `MM/YY`; only the separator is checked.
    pub expiry: String,
    pub cvv: String,
}

impl CardDetails {
    pub const MIN_NUMBER_LEN: usize = 16;
    pub const MIN_CVV_LEN: usize = 3;

    #[must_use]
    pub fn is_complete(&self) -> bool {
        let digits = self.number.chars().filter(|c| !c.is_whitespace()).count();
        digits >= Self::MIN_NUMBER_LEN
            && !self.name.trim().is_empty()
            && self.expiry.contains('/')
            && self.cvv.chars().count() >= Self::MIN_CVV_LEN
    }
}

/// Payment step.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentInfo {
    pub method: PaymentMethod,
    pub card: CardDetails,
    /// Carried for UPI payments but not validated.
    pub upi_id: String,
}

impl PaymentInfo {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.method.requires_card() || self.card.is_complete()
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    pub order_number: OrderNumber,
    /// Where the confirmation email goes.
    pub email: String,
    pub summary: OrderSummary,
    pub placed_at: DateTime<Utc>,
}

/// Progress of one step, for the step indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepState {
    Done,
    Current,
    Upcoming,
}

/// One entry in the step indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepProgress {
    pub step: CheckoutStep,
    pub number: u8,
    pub label: &'static str,
    pub state: StepState,
}

/// Checkout wizard state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkout {
    step: CheckoutStep,
    contact: ContactInfo,
    shipping: ShippingInfo,
    payment: PaymentInfo,
    summary: OrderSummary,
    confirmation: Option<OrderConfirmation>,
}

impl Checkout {
    /// Start a checkout at the contact step.
    #[must_use]
    pub fn new(summary: OrderSummary) -> Self {
        Self {
            step: CheckoutStep::default(),
            contact: ContactInfo::default(),
            shipping: ShippingInfo::default(),
            payment: PaymentInfo::default(),
            summary,
            confirmation: None,
        }
    }

    #[must_use]
    pub const fn step(&self) -> CheckoutStep {
        self.step
    }

    #[must_use]
    pub const fn contact(&self) -> &ContactInfo {
        &self.contact
    }

    #[must_use]
    pub const fn shipping(&self) -> &ShippingInfo {
        &self.shipping
    }

    #[must_use]
    pub const fn payment(&self) -> &PaymentInfo {
        &self.payment
    }

    /// Latest order summary snapshot.
    #[must_use]
    pub const fn summary(&self) -> &OrderSummary {
        &self.summary
    }

    /// Set once the order is placed.
    #[must_use]
    pub const fn confirmation(&self) -> Option<&OrderConfirmation> {
        self.confirmation.as_ref()
    }

    /// Whether the form for `step` passes validation. `Complete` has no
    /// form and is always complete.
    #[must_use]
    pub fn is_step_complete(&self, step: CheckoutStep) -> bool {
        match step {
            CheckoutStep::Contact => self.contact.is_complete(),
            CheckoutStep::Shipping => self.shipping.is_complete(),
            CheckoutStep::Payment => self.payment.is_complete(),
            CheckoutStep::Complete => true,
        }
    }

    /// Whether "Continue" is enabled on the current step.
    #[must_use]
    pub fn can_continue(&self) -> bool {
        !self.step.is_complete() && self.is_step_complete(self.step)
    }

    /// Step indicator entries for the three form steps.
    #[must_use]
    pub fn progress(&self) -> Vec<StepProgress> {
        CheckoutStep::FORM_STEPS
            .into_iter()
            .zip(1u8..)
            .map(|(step, number)| StepProgress {
                step,
                number,
                label: step.label(),
                state: match step.cmp(&self.step) {
                    std::cmp::Ordering::Less => StepState::Done,
                    std::cmp::Ordering::Equal => StepState::Current,
                    std::cmp::Ordering::Greater => StepState::Upcoming,
                },
            })
            .collect()
    }

    /// Replace the order summary snapshot. Ignored once the order is placed.
    pub fn refresh_summary(&mut self, summary: OrderSummary) {
        if !self.step.is_complete() {
            self.summary = summary;
        }
    }

    /// Replace the contact form.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::AlreadyComplete`] after the order is placed.
    pub fn update_contact(&mut self, contact: ContactInfo) -> Result<(), CheckoutError> {
        self.ensure_open()?;
        self.contact = contact;
        Ok(())
    }

    /// Replace the shipping form.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::AlreadyComplete`] after the order is placed.
    pub fn update_shipping(&mut self, shipping: ShippingInfo) -> Result<(), CheckoutError> {
        self.ensure_open()?;
        self.shipping = shipping;
        Ok(())
    }

    /// Replace the payment form.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::AlreadyComplete`] after the order is placed.
    pub fn update_payment(&mut self, payment: PaymentInfo) -> Result<(), CheckoutError> {
        self.ensure_open()?;
        self.payment = payment;
        Ok(())
    }

    /// Advance one step.
    ///
    /// Advancing from `Payment` places the order. On error the state is
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::StepIncomplete`] if the current form fails
    /// validation, or [`CheckoutError::AlreadyComplete`] from `Complete`.
    pub fn next(&mut self) -> Result<CheckoutStep, CheckoutError> {
        let Some(following) = self.step.following() else {
            return Err(CheckoutError::AlreadyComplete);
        };
        if !self.is_step_complete(self.step) {
            tracing::warn!(step = %self.step, "Checkout step incomplete");
            return Err(CheckoutError::StepIncomplete { step: self.step });
        }

        if following.is_complete() {
            let confirmation = OrderConfirmation {
                order_number: OrderNumber::generate(),
                email: self.contact.email.clone(),
                summary: self.summary,
                placed_at: Utc::now(),
            };
            tracing::info!(
                order_number = %confirmation.order_number,
                total = %confirmation.summary.total,
                payment_method = %self.payment.method,
                "Order placed"
            );
            self.confirmation = Some(confirmation);
        } else {
            tracing::info!(from = %self.step, to = %following, "Checkout advanced");
        }
        self.step = following;
        Ok(following)
    }

    /// Go back one step. A no-op on the first step.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::AlreadyComplete`] after the order is placed.
    pub fn back(&mut self) -> Result<CheckoutStep, CheckoutError> {
        self.ensure_open()?;
        if let Some(preceding) = self.step.preceding() {
            tracing::debug!(from = %self.step, to = %preceding, "Checkout went back");
            self.step = preceding;
        }
        Ok(self.step)
    }

    const fn ensure_open(&self) -> Result<(), CheckoutError> {
        if self.step.is_complete() {
            Err(CheckoutError::AlreadyComplete)
        } else {
            Ok(())
        }
    }
}
