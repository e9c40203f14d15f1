//! Events published by the payment service, and refund requests sent to it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EventStatus;

/// Outcome of a charge attempt.
///
/// Published on [`topics::PAYMENT_ORDER_RESPONSE`](crate::topics::PAYMENT_ORDER_RESPONSE).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    /// Order the charge was for.
    pub order_id: Uuid,
    /// Customer charged.
    pub user_id: i64,
    /// Gateway transaction id, present on success.
    pub transaction_id: Option<String>,
    /// Charge outcome.
    pub status: EventStatus,
    /// Amount charged or attempted.
    pub amount: f64,
    /// Payment method label, e.g. `CARD`.
    pub payment_method: Option<String>,
    /// Populated when `status` is `FAILED`.
    pub failure_reason: Option<String>,
    /// Flow correlation id.
    pub correlation_id: String,
    /// Unix epoch milliseconds.
    pub timestamp: i64,
}

/// Ask the payment service to refund an earlier charge.
///
/// Published on [`topics::PAYMENT_REFUND_REQUEST`](crate::topics::PAYMENT_REFUND_REQUEST).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRefundRequest {
    /// Order whose charge is being refunded.
    pub order_id: Uuid,
    /// Customer refunded.
    pub user_id: i64,
    /// Gateway transaction id of the original charge.
    pub transaction_id: String,
    /// Amount to refund.
    pub amount: f64,
    /// `INVENTORY_FAILED`, `SHIPPING_FAILED`, or `ORDER_CANCELLED`.
    pub reason: String,
    /// Flow correlation id.
    pub correlation_id: String,
    /// Unix epoch milliseconds.
    pub timestamp: i64,
}
