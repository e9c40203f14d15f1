//! Topic names for inter-service messaging.
//!
//! Names follow the `<producer>.<consumer>.<intent>` convention. A topic
//! string appears here exactly once; services reference these constants
//! rather than repeating literals.

/// Order service asks the payment service to charge an order.
pub const ORDER_PAYMENT_REQUEST: &str = "order.payment.request";

/// Payment service reports the charge outcome back to the order service.
pub const PAYMENT_ORDER_RESPONSE: &str = "payment.order.response";

/// Order service asks the payment service to refund a charge.
pub const PAYMENT_REFUND_REQUEST: &str = "payment.refund.request";

/// Order service asks the inventory service to reserve stock.
pub const ORDER_INVENTORY_RESERVE_REQUEST: &str = "order.inventory.reserve.request";

/// Inventory service reports the reservation outcome to the order service.
pub const INVENTORY_ORDER_RESERVE_RESPONSE: &str = "inventory.order.reserve.response";

/// Order service asks the inventory service to restore reserved stock.
pub const ORDER_INVENTORY_RESTORE_REQUEST: &str = "order.inventory.restore.request";

/// Order service asks the shipping service to create a shipment.
pub const ORDER_SHIPPING_REQUEST: &str = "order.shipping.request";

/// Shipping service reports the shipment outcome to the order service.
pub const SHIPPING_ORDER_RESPONSE: &str = "shipping.order.response";

/// Order service asks the notification service to inform the customer.
pub const ORDER_NOTIFICATION_REQUEST: &str = "order.notification.request";

/// External payment gateway webhook deliveries.
pub const PAYMENT_GATEWAY_WEBHOOK: &str = "payment.gateway.webhook";
