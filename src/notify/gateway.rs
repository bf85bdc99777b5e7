//! Delivery transport for push notifications.
//!
//! [`PushGateway`] is the external-collaborator boundary: the rest of
//! the gateway never knows how a notification reaches a device. The
//! default [`HttpPushGateway`] POSTs the payload to the endpoint URL
//! recorded in the subscription, with a client-level timeout.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

/// Notification payload shown to a subscriber.
///
/// Shape matches the reference client's service worker: a title naming
/// the sender and room, a body with the message preview, and the room
/// URL to open on tap.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PushPayload {
    /// Notification title, `"<sender> @ <room name>"`.
    pub title: String,
    /// Message content preview, truncated to 100 characters.
    pub body: String,
    /// Relative room URL, `"/room/<code>"`.
    pub url: String,
}

/// Errors local to push delivery. Logged by the dispatcher, never
/// propagated to the message sender.
#[derive(Debug, thiserror::Error)]
pub enum PushError {
    /// The subscription payload did not contain a usable endpoint.
    #[error("invalid push endpoint: {0}")]
    InvalidEndpoint(String),

    /// The HTTP request failed or timed out.
    #[error("push delivery failed: {0}")]
    Delivery(String),
}

/// Transport abstraction for delivering one notification to one endpoint.
#[async_trait]
pub trait PushGateway: Send + Sync + std::fmt::Debug {
    /// Attempts a single delivery. Each call is independent; the
    /// dispatcher continues with other subscribers on error.
    ///
    /// # Errors
    ///
    /// Returns a [`PushError`] when the endpoint is unusable or the
    /// delivery attempt fails.
    async fn deliver(&self, endpoint: &str, payload: &PushPayload) -> Result<(), PushError>;
}

/// HTTP implementation of [`PushGateway`].
///
/// Posts the JSON payload to the endpoint URL. The underlying client
/// carries a request timeout so one slow endpoint cannot stall the
/// fan-out loop.
#[derive(Debug, Clone)]
pub struct HttpPushGateway {
    client: reqwest::Client,
}

impl HttpPushGateway {
    /// Creates a gateway whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns a [`PushError::Delivery`] if the HTTP client cannot be
    /// constructed.
    pub fn new(timeout: Duration) -> Result<Self, PushError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PushError::Delivery(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PushGateway for HttpPushGateway {
    async fn deliver(&self, endpoint: &str, payload: &PushPayload) -> Result<(), PushError> {
        let response = self
            .client
            .post(endpoint)
            .json(payload)
            .send()
            .await
            .map_err(|e| PushError::Delivery(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(PushError::Delivery(format!(
                "endpoint returned {}",
                response.status()
            )))
        }
    }
}
