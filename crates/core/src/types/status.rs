//! Status enums for checkout.

use serde::{Deserialize, Serialize};

/// A step of the checkout wizard.
///
/// Steps are strictly linear: `Contact -> Shipping -> Payment -> Complete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    #[default]
    Contact,
    Shipping,
    Payment,
    /// Terminal: the order has been placed.
    Complete,
}

impl CheckoutStep {
    /// The wizard steps a shopper fills in, in order.
    pub const FORM_STEPS: [Self; 3] = [Self::Contact, Self::Shipping, Self::Payment];

    /// 1-based step number shown in the step indicator, `None` once complete.
    #[must_use]
    pub const fn number(self) -> Option<u8> {
        match self {
            Self::Contact => Some(1),
            Self::Shipping => Some(2),
            Self::Payment => Some(3),
            Self::Complete => None,
        }
    }

    /// The step after this one, `None` for `Complete`.
    #[must_use]
    pub const fn following(self) -> Option<Self> {
        match self {
            Self::Contact => Some(Self::Shipping),
            Self::Shipping => Some(Self::Payment),
            Self::Payment => Some(Self::Complete),
            Self::Complete => None,
        }
    }

    /// The step before this one, `None` for `Contact` and `Complete`.
    ///
    /// `Complete` has no predecessor: a placed order cannot be reopened.
    #[must_use]
    pub const fn preceding(self) -> Option<Self> {
        match self {
            Self::Shipping => Some(Self::Contact),
            Self::Payment => Some(Self::Shipping),
            Self::Contact | Self::Complete => None,
        }
    }

    /// Label shown in the step indicator.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Contact => "Information",
            Self::Shipping => "Shipping",
            Self::Payment => "Payment",
            Self::Complete => "Complete",
        }
    }

    /// Returns `true` for the terminal state.
    #[must_use]
    pub const fn is_complete(self) -> bool {
        matches!(self, Self::Complete)
    }
}

impl std::fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Contact => write!(f, "contact"),
            Self::Shipping => write!(f, "shipping"),
            Self::Payment => write!(f, "payment"),
            Self::Complete => write!(f, "complete"),
        }
    }
}

/// Payment method chosen on the payment step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentMethod {
    /// Credit or debit card; the only method with field-level checks.
    #[default]
    #[serde(rename = "credit-card")]
    CreditCard,
    /// Redirects to `PayPal`; nothing to validate locally.
    #[serde(rename = "paypal")]
    PayPal,
    /// UPI collect request.
    #[serde(rename = "upi")]
    Upi,
}

impl PaymentMethod {
    /// Whether the payment step validates card fields for this method.
    #[must_use]
    pub const fn requires_card(self) -> bool {
        matches!(self, Self::CreditCard)
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreditCard => write!(f, "credit-card"),
            Self::PayPal => write!(f, "paypal"),
            Self::Upi => write!(f, "upi"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credit-card" => Ok(Self::CreditCard),
            "paypal" => Ok(Self::PayPal),
            "upi" => Ok(Self::Upi),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_step_numbers() {
        let numbers: Vec<_> = CheckoutStep::FORM_STEPS
            .iter()
            .filter_map(|step| step.number())
            .collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(CheckoutStep::Complete.number(), None);
    }

    #[test]
    fn test_step_sequence_is_linear() {
        assert_eq!(CheckoutStep::Contact.following(), Some(CheckoutStep::Shipping));
        assert_eq!(CheckoutStep::Payment.following(), Some(CheckoutStep::Complete));
        assert_eq!(CheckoutStep::Complete.following(), None);

        assert_eq!(CheckoutStep::Payment.preceding(), Some(CheckoutStep::Shipping));
        assert_eq!(CheckoutStep::Contact.preceding(), None);
        assert_eq!(CheckoutStep::Complete.preceding(), None);
    }

    #[test]
    fn test_step_serde() {
        let json = serde_json::to_string(&CheckoutStep::Shipping).unwrap();
        assert_eq!(json, "\"shipping\"");
    }

    #[test]
    fn test_payment_method_roundtrip() {
        for method in [PaymentMethod::CreditCard, PaymentMethod::PayPal, PaymentMethod::Upi] {
            let parsed: PaymentMethod = method.to_string().parse().unwrap();
            assert_eq!(parsed, method);
            let json = serde_json::to_string(&method).unwrap();
            assert_eq!(json, format!("\"{method}\""));
        }
        assert!("cash".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_only_card_requires_card_fields() {
        assert!(PaymentMethod::CreditCard.requires_card());
        assert!(!PaymentMethod::PayPal.requires_card());
        assert!(!PaymentMethod::Upi.requires_card());
    }
}
