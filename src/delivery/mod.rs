//! Outbound email delivery.
//!
//! Approved drafts are handed to an [`EmailDelivery`] implementation. The
//! production implementation posts them to an HTTP hook (see
//! [`webhook::WebhookDelivery`]); tests substitute their own.

use std::future::Future;

use serde::Serialize;
use thiserror::Error;

use crate::domain::types::ClientId;

#[cfg(feature = "server")]
pub mod webhook;

/// Body posted to the delivery endpoint.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct DeliveryPayload {
    pub to_email: String,
    pub cc_emails: Vec<String>,
    pub subject: String,
    pub body: String,
    pub client_id: ClientId,
    pub client_name: String,
    pub template_type: String,
    pub attachments: Vec<String>,
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The endpoint answered with a non-2xx status.
    #[error("delivery endpoint returned {status}: {body}")]
    Status { status: u16, body: String },
    /// The request never produced a response.
    #[error("delivery request failed: {0}")]
    Transport(String),
}

/// Sends an email on behalf of the practice. No retries are attempted.
pub trait EmailDelivery {
    fn deliver(
        &self,
        payload: &DeliveryPayload,
    ) -> impl Future<Output = Result<(), DeliveryError>>;
}
