//! Access-log recorder.
//!
//! A [`RecordHandle`] is opened when a request enters the pipeline and
//! finalized by the driver with the terminal status, so every request
//! produces exactly one completion record whether it was forwarded,
//! short-circuited, or failed.

use std::time::Instant;

use http::{Method, StatusCode};
use palisade_core::{Identity, StatusBand};

use crate::context::RouteTarget;
use crate::types::Request;

/// Known backend services, keyed by a substring of the route id.
const SERVICE_NAMES: &[(&str, &str)] = &[
    ("user-service", "USER-SERVICE"),
    ("product-service", "PRODUCT-SERVICE"),
    ("order-service", "ORDER-SERVICE"),
    ("cart-service", "CART-SERVICE"),
    ("inventory-service", "INVENTORY-SERVICE"),
    ("payment-service", "PAYMENT-SERVICE"),
    ("shipping-service", "SHIPPING-SERVICE"),
];

/// Resolves the canonical service label for a route id.
///
/// Unrecognized ids are uppercased as-is so new routes still get a
/// stable label without a table change.
#[must_use]
pub fn service_name(route_id: &str) -> String {
    for (needle, label) in SERVICE_NAMES {
        if route_id.contains(needle) {
            return (*label).to_string();
        }
    }
    route_id.to_uppercase()
}

/// Opens access-log records.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessRecorder;

impl AccessRecorder {
    /// Captures the request-scoped fields and starts the wall clock.
    #[must_use]
    pub fn start(request: &Request, route: Option<&RouteTarget>, client: String) -> RecordHandle {
        let path = request
            .uri()
            .path_and_query()
            .map_or_else(|| request.uri().path().to_string(), ToString::to_string);

        let (route_id, service, target) = match route {
            Some(route) => (
                Some(route.route_id.clone()),
                service_name(&route.route_id),
                Some(format!("{}:{}", route.host, route.port)),
            ),
            None => (None, "UNKNOWN".to_string(), None),
        };

        RecordHandle {
            method: request.method().clone(),
            path,
            client,
            route_id,
            service,
            target,
            started: Instant::now(),
        }
    }
}

/// An open access-log record.
///
/// Finalize with [`finish`](Self::finish); dropping the handle without
/// finishing loses the completion record, which the pipeline driver
/// never does.
#[derive(Debug)]
pub struct RecordHandle {
    method: Method,
    path: String,
    client: String,
    route_id: Option<String>,
    service: String,
    target: Option<String>,
    started: Instant,
}

impl RecordHandle {
    /// The resolved service label.
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }

    /// The captured request path (with query).
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Resolves the user label for the completion record.
    ///
    /// A verified identity wins; without one, auth-endpoint traffic is
    /// labeled `AUTH_IN_PROGRESS` and everything else `PUBLIC`.
    #[must_use]
    pub fn user_label(&self, identity: Option<&Identity>) -> String {
        match identity {
            Some(identity) => identity.log_id(),
            None if self.path.contains("/api/auth/") => "AUTH_IN_PROGRESS".to_string(),
            None => "PUBLIC".to_string(),
        }
    }

    /// Logs the completion record with the terminal status, the identity
    /// (if any) associated with the request, and the duration.
    pub fn finish(self, status: StatusCode, identity: Option<&Identity>) {
        let band = StatusBand::classify(status);
        let duration_ms = self.started.elapsed().as_millis();
        let user = self.user_label(identity);

        tracing::info!(
            method = %self.method,
            path = %self.path,
            client = %self.client,
            route_id = self.route_id.as_deref().unwrap_or("-"),
            service = %self.service,
            target = self.target.as_deref().unwrap_or("-"),
            status = status.as_u16(),
            band = band.label(),
            user = %user,
            duration_ms,
            "request completed"
        );
    }
}
