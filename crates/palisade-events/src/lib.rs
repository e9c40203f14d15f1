//! Shared event contracts for the Palisade shop services.
//!
//! Every message that crosses a service boundary is defined here once, so
//! producers and consumers agree on field names and topic strings at compile
//! time. Payloads serialize to camelCase JSON; the wire format is the
//! contract, the Rust names are not.
//!
//! Each event carries a `correlation_id` that ties together the messages of
//! one business flow, and a `timestamp` in Unix epoch milliseconds.

#![doc(html_root_url = "https://docs.rs/palisade-events/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod inventory;
mod order;
mod payment;
mod shipping;
mod status;

pub mod topics;

pub use inventory::{InventoryReserveResponse, InventoryRestoreRequest, ReservedItem, RestoreItem};
pub use order::{
    InventoryItem, InventoryReserveRequest, NotificationRequest, OrderPaymentRequest,
    ShippingRequest,
};
pub use payment::{PaymentRefundRequest, PaymentResponse};
pub use shipping::{ShippingCancelRequest, ShippingResponse};
pub use status::EventStatus;

/// Generate a fresh correlation id for a new business flow.
///
/// Time-ordered UUIDs keep log output for one flow roughly contiguous when
/// sorted by id.
#[must_use]
pub fn new_correlation_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

/// Current Unix time in milliseconds, for event timestamps.
#[must_use]
pub fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correlation_ids_are_unique() {
        assert_ne!(new_correlation_id(), new_correlation_id());
    }

    #[test]
    fn test_now_millis_is_positive() {
        assert!(now_millis() > 0);
    }
}
