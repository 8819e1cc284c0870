//! Contact form and newsletter route handlers.
//!
//! Invalid submissions are not errors: they return `accepted: false` and
//! nothing else happens.

use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::contact::{self, ContactForm};

/// Newsletter signup request.
#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub email: String,
}

/// Response for form submission.
#[derive(Debug, Serialize)]
pub struct FormResponse {
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FormResponse {
    const fn ignored() -> Self {
        Self {
            accepted: false,
            id: None,
            message: None,
        }
    }
}

/// Submit the contact form. Addresses stay out of the span.
///
/// POST /contact
#[instrument(skip(form))]
pub async fn submit(Json(form): Json<ContactForm>) -> Json<FormResponse> {
    let mut form = form;
    let response = form.submit().map_or_else(FormResponse::ignored, |receipt| FormResponse {
        accepted: true,
        id: Some(receipt.id),
        message: Some(format!(
            "Thanks {}, we'll get back to you at {}.",
            receipt.name, receipt.email
        )),
    });
    Json(response)
}

/// Subscribe to the newsletter.
///
/// POST /newsletter
#[instrument(skip(request))]
pub async fn subscribe(Json(request): Json<SubscribeRequest>) -> Json<FormResponse> {
    let response =
        contact::subscribe(&request.email).map_or_else(FormResponse::ignored, |subscription| {
            FormResponse {
                accepted: true,
                id: Some(subscription.id),
                message: Some(format!("Subscribed {}", subscription.email)),
            }
        });
    Json(response)
}
