//! Events published by the inventory service, and restore requests sent to it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EventStatus;

/// Outcome of a stock reservation attempt.
///
/// Published on
/// [`topics::INVENTORY_ORDER_RESERVE_RESPONSE`](crate::topics::INVENTORY_ORDER_RESERVE_RESPONSE).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryReserveResponse {
    /// Order the reservation was for.
    pub order_id: Uuid,
    /// Customer placing the order.
    pub user_id: i64,
    /// Reservation outcome.
    pub status: EventStatus,
    /// Populated when `status` is `FAILED`.
    pub failure_reason: Option<String>,
    /// Per-product reservation results.
    pub reserved_items: Vec<ReservedItem>,
    /// Flow correlation id.
    pub correlation_id: String,
    /// Unix epoch milliseconds.
    pub timestamp: i64,
}

/// Per-product outcome within a reservation response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservedItem {
    /// Product the line concerns.
    pub product_id: Uuid,
    /// Units requested.
    pub quantity: i32,
    /// Whether this line was reserved.
    pub reserved: bool,
}

/// Ask the inventory service to restore previously reserved stock.
///
/// Published on
/// [`topics::ORDER_INVENTORY_RESTORE_REQUEST`](crate::topics::ORDER_INVENTORY_RESTORE_REQUEST).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRestoreRequest {
    /// Order whose reservation is being released.
    pub order_id: Uuid,
    /// Customer placing the order.
    pub user_id: i64,
    /// Products and quantities to restore.
    pub items: Vec<RestoreItem>,
    /// `PAYMENT_FAILED`, `SHIPPING_FAILED`, or `ORDER_CANCELLED`.
    pub reason: String,
    /// Flow correlation id.
    pub correlation_id: String,
    /// Unix epoch milliseconds.
    pub timestamp: i64,
}

/// One product line in a restore request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreItem {
    /// Product to restore.
    pub product_id: Uuid,
    /// Units to return to stock.
    pub quantity: i32,
}
