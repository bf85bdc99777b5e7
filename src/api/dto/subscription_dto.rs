//! Subscription DTOs.

use serde::Deserialize;
use utoipa::ToSchema;

/// Request body for `PUT /rooms/{id}/subscriptions`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeRequest {
    /// Opaque client-generated session identifier.
    pub session_id: String,
    /// Serialized push subscription as produced by the client's push
    /// API. Stored opaquely; only the `endpoint` field is read at
    /// delivery time.
    pub subscription: String,
}
