//! Events published by the shipping service, and cancellation requests sent to it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EventStatus;

/// Outcome of a shipment creation attempt.
///
/// Published on [`topics::SHIPPING_ORDER_RESPONSE`](crate::topics::SHIPPING_ORDER_RESPONSE).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingResponse {
    /// Order the shipment is for.
    pub order_id: Uuid,
    /// Customer receiving the shipment.
    pub user_id: i64,
    /// Shipment id, present on success.
    pub shipment_id: Option<Uuid>,
    /// Shipment outcome.
    pub status: EventStatus,
    /// Carrier tracking number, present on success.
    pub tracking_number: Option<String>,
    /// Carrier name.
    pub carrier: Option<String>,
    /// Estimated delivery date, ISO 8601 date string.
    pub estimated_delivery_date: Option<String>,
    /// Populated when `status` is `FAILED`.
    pub failure_reason: Option<String>,
    /// Flow correlation id.
    pub correlation_id: String,
    /// Unix epoch milliseconds.
    pub timestamp: i64,
}

/// Ask the shipping service to cancel a shipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingCancelRequest {
    /// Order whose shipment is cancelled.
    pub order_id: Uuid,
    /// Customer the shipment was for.
    pub user_id: i64,
    /// Shipment to cancel.
    pub shipment_id: Uuid,
    /// `ORDER_CANCELLED`, `PAYMENT_FAILED`, or `INVENTORY_FAILED`.
    pub reason: String,
    /// Flow correlation id.
    pub correlation_id: String,
    /// Unix epoch milliseconds.
    pub timestamp: i64,
}
