//! Contact form and newsletter signup.
//!
//! Both forms are one-shot: invalid input is silently ignored and yields
//! `None`, valid input yields a receipt. Nothing is delivered anywhere; the
//! receipt is the whole result.

use bound_core::Email;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The "Get in touch" form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// Proof that a contact message was accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactReceipt {
    pub id: Uuid,
    pub name: String,
    pub email: Email,
    pub subject: String,
    pub received_at: DateTime<Utc>,
}

impl ContactForm {
    /// Submit the form.
    ///
    /// Every field must be non-blank and the email must parse. On success
    /// the form is reset to empty.
    pub fn submit(&mut self) -> Option<ContactReceipt> {
        let blank = [&self.name, &self.subject, &self.message]
            .iter()
            .any(|field| field.trim().is_empty());
        if blank {
            tracing::debug!("Ignored contact form with blank fields");
            return None;
        }
        let email = match Email::parse(&self.email) {
            Ok(email) => email,
            Err(e) => {
                tracing::debug!(error = %e, "Ignored contact form with invalid email");
                return None;
            }
        };

        let receipt = ContactReceipt {
            id: Uuid::new_v4(),
            name: self.name.trim().to_string(),
            email,
            subject: self.subject.trim().to_string(),
            received_at: Utc::now(),
        };
        tracing::info!(
            id = %receipt.id,
            email = %receipt.email.masked(),
            "Contact message received"
        );
        *self = Self::default();
        Some(receipt)
    }
}

/// A newsletter subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: Uuid,
    pub email: Email,
    pub subscribed_at: DateTime<Utc>,
}

/// Subscribe `email` to the newsletter. Addresses are lowercased.
#[must_use]
pub fn subscribe(email: &str) -> Option<Subscription> {
    let email = Email::parse(&email.trim().to_lowercase()).ok()?;
    let subscription = Subscription {
        id: Uuid::new_v4(),
        email,
        subscribed_at: Utc::now(),
    };
    tracing::info!(email = %subscription.email.masked(), "Newsletter subscription");
    Some(subscription)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn filled() -> ContactForm {
        ContactForm {
            name: "Sam".to_string(),
            email: "sam@example.com".to_string(),
            subject: "Sizing".to_string(),
            message: "Does the oxford run small?".to_string(),
        }
    }

    #[test]
    fn test_submit_resets_form() {
        let mut form = filled();
        let receipt = form.submit().unwrap();
        assert_eq!(receipt.email.as_str(), "sam@example.com");
        assert_eq!(receipt.subject, "Sizing");
        assert_eq!(form, ContactForm::default());
    }

    #[test]
    fn test_invalid_submission_is_noop() {
        let mut form = ContactForm {
            message: "  ".to_string(),
            ..filled()
        };
        let before = form.clone();
        assert!(form.submit().is_none());
        assert_eq!(form, before);

        let mut form = ContactForm {
            email: "sam.example.com".to_string(),
            ..filled()
        };
        assert!(form.submit().is_none());
        assert_eq!(form.email, "sam.example.com");
    }

    #[test]
    fn test_subscribe() {
        let subscription = subscribe("  Sam@Example.COM ").unwrap();
        assert_eq!(subscription.email.as_str(), "sam@example.com");
        assert!(subscribe("").is_none());
        assert!(subscribe("not an email").is_none());
    }

    #[test]
    fn test_receipts_are_unique() {
        let a = filled().submit().unwrap();
        let b = filled().submit().unwrap();
        assert_ne!(a.id, b.id);
    }
}
