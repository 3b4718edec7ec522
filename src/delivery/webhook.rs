use std::time::Duration;

use log::{error, info};

use crate::delivery::{DeliveryError, DeliveryPayload, EmailDelivery};

/// Posts payloads as JSON to a fixed URL; anything but 2xx is a failure.
#[derive(Clone, Debug)]
pub struct WebhookDelivery {
    client: reqwest::Client,
    url: String,
    timeout: Option<Duration>,
}

impl WebhookDelivery {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            timeout: None,
        }
    }

    /// Overrides the transport default request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl EmailDelivery for WebhookDelivery {
    async fn deliver(&self, payload: &DeliveryPayload) -> Result<(), DeliveryError> {
        let mut request = self.client.post(&self.url).json(payload);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| {
            error!("Email delivery to {} failed: {e}", self.url);
            DeliveryError::Transport(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Email delivery rejected with {status}: {body}");
            return Err(DeliveryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        info!("Delivered email to {}", payload.to_email);
        Ok(())
    }
}
