//! Per-request filter context.
//!
//! The [`FilterContext`] carries state through the pipeline: the request
//! id, the identity established by the authenticate stage, route metadata
//! supplied by the embedding router, and the open access-log record.

use std::net::SocketAddr;
use std::time::Instant;

use palisade_core::{Identity, RequestId};

use crate::recorder::RecordHandle;
use crate::types::Request;

/// Route metadata resolved by the embedding router.
///
/// The pipeline does not route; the embedder resolves the destination
/// before (or while) running the pipeline and attaches it here. Used only
/// by the access-log recorder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTarget {
    /// Router-assigned route id, e.g. `order-service`.
    pub route_id: String,
    /// Destination host.
    pub host: String,
    /// Destination port.
    pub port: u16,
}

impl RouteTarget {
    /// Creates a route target.
    #[must_use]
    pub fn new(route_id: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            route_id: route_id.into(),
            host: host.into(),
            port,
        }
    }
}

/// Mutable per-request state flowing through the pipeline.
#[derive(Debug)]
pub struct FilterContext {
    /// Unique identifier for this request.
    request_id: RequestId,

    /// Identity established by the authenticate stage.
    identity: Option<Identity>,

    /// Route metadata from the embedding router, if resolved.
    route: Option<RouteTarget>,

    /// Transport peer address, if known.
    peer_addr: Option<SocketAddr>,

    /// Whether the request matched a public path and skipped verification.
    public_bypass: bool,

    /// Open access-log record, finalized by the pipeline driver.
    record: Option<RecordHandle>,

    /// When the request entered the pipeline.
    started_at: Instant,
}

impl FilterContext {
    /// Creates a context with a fresh request id.
    #[must_use]
    pub fn new() -> Self {
        Self {
            request_id: RequestId::new(),
            identity: None,
            route: None,
            peer_addr: None,
            public_bypass: false,
            record: None,
            started_at: Instant::now(),
        }
    }

    /// Attaches route metadata.
    #[must_use]
    pub fn with_route(mut self, route: RouteTarget) -> Self {
        self.route = Some(route);
        self
    }

    /// Attaches the transport peer address.
    #[must_use]
    pub fn with_peer_addr(mut self, addr: SocketAddr) -> Self {
        self.peer_addr = Some(addr);
        self
    }

    /// Returns the request id.
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns the verified identity, if one was established.
    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Stores the verified identity.
    ///
    /// Only the authenticate stage should call this.
    pub fn set_identity(&mut self, identity: Identity) {
        self.identity = Some(identity);
    }

    /// Returns the route metadata, if resolved.
    #[must_use]
    pub fn route(&self) -> Option<&RouteTarget> {
        self.route.as_ref()
    }

    /// Returns the transport peer address, if known.
    #[must_use]
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer_addr
    }

    /// Whether the request matched a public path and skipped verification.
    #[must_use]
    pub fn public_bypass(&self) -> bool {
        self.public_bypass
    }

    /// Marks the request as public-path bypassed.
    pub fn set_public_bypass(&mut self) {
        self.public_bypass = true;
    }

    /// Stores the open access-log record.
    pub fn set_record(&mut self, record: RecordHandle) {
        self.record = Some(record);
    }

    /// Takes the open access-log record for finalization.
    pub fn take_record(&mut self) -> Option<RecordHandle> {
        self.record.take()
    }

    /// Returns when the request entered the pipeline.
    #[must_use]
    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Resolves the client address the way the access log reports it:
    /// first `X-Forwarded-For` entry, then `X-Real-IP`, then the transport
    /// peer, else `UNKNOWN`.
    #[must_use]
    pub fn client_addr(&self, request: &Request) -> String {
        resolve_client_addr(request, self.peer_addr)
    }
}

impl Default for FilterContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Client address resolution shared by the origin stage and the recorder.
pub(crate) fn resolve_client_addr(request: &Request, peer: Option<SocketAddr>) -> String {
    let header = |name: &str| {
        request
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    if let Some(forwarded) = header("x-forwarded-for") {
        // Comma list; the first entry is the original client.
        if let Some(first) = forwarded.split(',').next().map(str::trim) {
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    if let Some(real_ip) = header("x-real-ip") {
        return real_ip.to_string();
    }

    peer.map_or_else(|| "UNKNOWN".to_string(), |addr| addr.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http_body_util::Full;

    fn request_with_headers(headers: &[(&str, &str)]) -> Request {
        let mut builder = http::Request::builder().uri("/api/orders/1");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(Full::new(Bytes::new())).unwrap()
    }

    #[test]
    fn test_forwarded_for_takes_first_entry() {
        let request = request_with_headers(&[
            ("x-forwarded-for", "203.0.113.7, 10.0.0.1"),
            ("x-real-ip", "10.0.0.2"),
        ]);
        assert_eq!(resolve_client_addr(&request, None), "203.0.113.7");
    }

    #[test]
    fn test_real_ip_fallback() {
        let request = request_with_headers(&[("x-real-ip", "10.0.0.2")]);
        assert_eq!(resolve_client_addr(&request, None), "10.0.0.2");
    }

    #[test]
    fn test_peer_fallback() {
        let request = request_with_headers(&[]);
        let peer: SocketAddr = "192.0.2.1:443".parse().unwrap();
        assert_eq!(resolve_client_addr(&request, Some(peer)), "192.0.2.1:443");
    }

    #[test]
    fn test_unknown_when_nothing_available() {
        let request = request_with_headers(&[]);
        assert_eq!(resolve_client_addr(&request, None), "UNKNOWN");
    }

    #[test]
    fn test_context_defaults() {
        let ctx = FilterContext::new();
        assert!(ctx.identity().is_none());
        assert!(ctx.route().is_none());
        assert!(!ctx.public_bypass());
    }

    #[test]
    fn test_context_identity_roundtrip() {
        let mut ctx = FilterContext::new();
        ctx.set_identity(Identity {
            subject: "alice".to_string(),
            role: "CUSTOMER".to_string(),
            user_id: Some(7),
        });
        assert_eq!(ctx.identity().unwrap().subject, "alice");
    }
}
