//! Events published by the order service.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ask the payment service to charge an order.
///
/// Published on [`topics::ORDER_PAYMENT_REQUEST`](crate::topics::ORDER_PAYMENT_REQUEST).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPaymentRequest {
    /// Order being paid for.
    pub order_id: Uuid,
    /// Customer placing the order.
    pub user_id: i64,
    /// Amount to charge, in the shop currency.
    pub amount: f64,
    /// Flow correlation id.
    pub correlation_id: String,
    /// Unix epoch milliseconds.
    pub timestamp: i64,
}

/// Ask the inventory service to reserve stock for an order.
///
/// Published on
/// [`topics::ORDER_INVENTORY_RESERVE_REQUEST`](crate::topics::ORDER_INVENTORY_RESERVE_REQUEST).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryReserveRequest {
    /// Order the reservation belongs to.
    pub order_id: Uuid,
    /// Customer placing the order.
    pub user_id: i64,
    /// Products and quantities to reserve.
    pub items: Vec<InventoryItem>,
    /// Flow correlation id.
    pub correlation_id: String,
    /// Unix epoch milliseconds.
    pub timestamp: i64,
}

/// One product line in a reservation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    /// Product to reserve.
    pub product_id: Uuid,
    /// Units requested.
    pub quantity: i32,
}

/// Ask the shipping service to create a shipment for a paid order.
///
/// Published on [`topics::ORDER_SHIPPING_REQUEST`](crate::topics::ORDER_SHIPPING_REQUEST).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingRequest {
    /// Order to ship.
    pub order_id: Uuid,
    /// Customer receiving the shipment.
    pub user_id: i64,
    /// Street address.
    pub shipping_address: String,
    /// City.
    pub city: String,
    /// State or province.
    pub state: String,
    /// Postal code.
    pub zip_code: String,
    /// Country.
    pub country: String,
    /// Contact phone number.
    pub phone_number: String,
    /// Order total, echoed for carrier insurance.
    pub order_amount: f64,
    /// Flow correlation id.
    pub correlation_id: String,
    /// Unix epoch milliseconds.
    pub timestamp: i64,
}

/// Ask the notification service to inform the customer of an order change.
///
/// Published on
/// [`topics::ORDER_NOTIFICATION_REQUEST`](crate::topics::ORDER_NOTIFICATION_REQUEST).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    /// Order the notification concerns.
    pub order_id: Uuid,
    /// Customer to notify.
    pub user_id: i64,
    /// Delivery address for the notification.
    pub user_email: String,
    /// `ORDER_CONFIRMED`, `ORDER_SHIPPED`, or `ORDER_CANCELLED`.
    pub notification_type: String,
    /// Current order status label.
    pub order_status: String,
    /// Order total, for the message body.
    pub order_amount: f64,
    /// Free-form message text.
    pub message: String,
    /// Flow correlation id.
    pub correlation_id: String,
    /// Unix epoch milliseconds.
    pub timestamp: i64,
}
