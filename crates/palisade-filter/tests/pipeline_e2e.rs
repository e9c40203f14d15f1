//! End-to-end tests driving full requests through the standard pipeline.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
use http_body_util::Full;
use palisade_config::GatewayConfig;
use palisade_core::fixtures::{TokenSigner, TEST_SECRET_B64};
use palisade_filter::{FilterContext, FilterPipeline, Request, Response, RouteTarget};

fn test_config() -> GatewayConfig {
    GatewayConfig::builder().signing_secret(TEST_SECRET_B64).build()
}

fn pipeline() -> FilterPipeline {
    FilterPipeline::standard(&test_config()).expect("valid test secret")
}

fn request(method: Method, uri: &str, headers: &[(&str, &str)]) -> Request {
    let mut builder = http::Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Full::new(Bytes::new())).unwrap()
}

/// Forward handler that records whether it ran and what headers it saw.
struct ForwardProbe {
    invoked: Arc<AtomicBool>,
    headers: Arc<Mutex<Option<HeaderMap>>>,
}

impl ForwardProbe {
    fn new() -> Self {
        Self {
            invoked: Arc::new(AtomicBool::new(false)),
            headers: Arc::new(Mutex::new(None)),
        }
    }

    fn handler(
        &self,
    ) -> impl FnOnce(&mut FilterContext, Request) -> palisade_filter::BoxFuture<'static, Response> + Send
    {
        let invoked = self.invoked.clone();
        let headers = self.headers.clone();
        move |_ctx, req| {
            invoked.store(true, Ordering::SeqCst);
            *headers.lock().unwrap() = Some(req.headers().clone());
            Box::pin(async {
                http::Response::builder()
                    .status(StatusCode::OK)
                    .body(Full::new(Bytes::from("backend response")))
                    .unwrap()
            })
        }
    }

    fn invoked(&self) -> bool {
        self.invoked.load(Ordering::SeqCst)
    }

    fn forwarded_headers(&self) -> HeaderMap {
        self.headers.lock().unwrap().clone().expect("forward ran")
    }
}

#[tokio::test]
async fn valid_token_is_forwarded_with_identity_headers() {
    let pipeline = pipeline();
    let probe = ForwardProbe::new();
    let bearer = TokenSigner::test().bearer("alice", "CUSTOMER", Some(42));

    let ctx = FilterContext::new().with_route(RouteTarget::new("order-service", "10.0.0.5", 8082));
    let response = pipeline
        .process(
            ctx,
            request(Method::GET, "/api/orders/17", &[("authorization", &bearer)]),
            probe.handler(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(probe.invoked());

    let headers = probe.forwarded_headers();
    assert_eq!(headers.get("x-user-name").unwrap(), "alice");
    assert_eq!(headers.get("x-user-role").unwrap(), "CUSTOMER");
    assert_eq!(headers.get("x-user-id").unwrap(), "42");
}

#[tokio::test]
async fn missing_token_short_circuits_with_401() {
    let pipeline = pipeline();
    let probe = ForwardProbe::new();

    let response = pipeline
        .process(
            FilterContext::new(),
            request(Method::GET, "/api/orders/17", &[]),
            probe.handler(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(!probe.invoked());
}

#[tokio::test]
async fn tampered_token_gets_same_401_as_missing() {
    let pipeline = pipeline();
    let probe = ForwardProbe::new();
    let mut bearer = TokenSigner::test().bearer("alice", "CUSTOMER", None);
    bearer.push('x');

    let response = pipeline
        .process(
            FilterContext::new(),
            request(Method::GET, "/api/cart/3", &[("authorization", &bearer)]),
            probe.handler(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(!probe.invoked());
}

#[tokio::test]
async fn disallowed_role_is_denied_with_403() {
    let pipeline = pipeline();
    let probe = ForwardProbe::new();
    let bearer = TokenSigner::test().bearer("bob", "GUEST", Some(9));

    let response = pipeline
        .process(
            FilterContext::new(),
            request(Method::GET, "/api/payments/1", &[("authorization", &bearer)]),
            probe.handler(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(!probe.invoked());
}

#[tokio::test]
async fn public_path_forwards_without_credentials() {
    let pipeline = pipeline();
    let probe = ForwardProbe::new();

    let response = pipeline
        .process(
            FilterContext::new(),
            request(Method::POST, "/api/auth/login", &[]),
            probe.handler(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(probe.invoked());

    let headers = probe.forwarded_headers();
    assert!(headers.get("x-user-name").is_none());
    assert!(headers.get("x-user-role").is_none());
}

#[tokio::test]
async fn forged_identity_headers_never_reach_the_backend() {
    let pipeline = pipeline();
    let probe = ForwardProbe::new();

    // Public path: no token required, but the forged headers must still vanish.
    let response = pipeline
        .process(
            FilterContext::new(),
            request(
                Method::POST,
                "/api/auth/login",
                &[("x-user-name", "mallory"), ("x-user-role", "ADMIN"), ("x-user-id", "1")],
            ),
            probe.handler(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let headers = probe.forwarded_headers();
    assert!(headers.get("x-user-name").is_none());
    assert!(headers.get("x-user-role").is_none());
    assert!(headers.get("x-user-id").is_none());
}

#[tokio::test]
async fn forged_headers_are_replaced_by_verified_claims() {
    let pipeline = pipeline();
    let probe = ForwardProbe::new();
    let bearer = TokenSigner::test().bearer("alice", "CUSTOMER", None);

    let response = pipeline
        .process(
            FilterContext::new(),
            request(
                Method::GET,
                "/api/orders/17",
                &[("authorization", &bearer), ("x-user-role", "ADMIN")],
            ),
            probe.handler(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let headers = probe.forwarded_headers();
    assert_eq!(headers.get("x-user-role").unwrap(), "CUSTOMER");
}

#[tokio::test]
async fn blocked_origin_is_diagnostic_only() {
    let pipeline = pipeline();
    let probe = ForwardProbe::new();
    let bearer = TokenSigner::test().bearer("alice", "CUSTOMER", None);

    let response = pipeline
        .process(
            FilterContext::new(),
            request(
                Method::GET,
                "/api/orders/17",
                &[
                    ("authorization", &bearer),
                    ("origin", "http://not-on-the-list.example"),
                    ("x-forwarded-for", "203.0.113.7, 10.0.0.1"),
                ],
            ),
            probe.handler(),
        )
        .await;

    // Origin diagnostics never reject; authentication decides.
    assert_eq!(response.status(), StatusCode::OK);
    assert!(probe.invoked());
}

#[tokio::test]
async fn blocked_preflight_still_traverses_the_pipeline() {
    let pipeline = pipeline();
    let probe = ForwardProbe::new();
    let bearer = TokenSigner::test().bearer("alice", "CUSTOMER", None);

    let response = pipeline
        .process(
            FilterContext::new(),
            request(
                Method::OPTIONS,
                "/api/products",
                &[
                    ("authorization", &bearer),
                    ("origin", "http://evil.test"),
                ],
            ),
            probe.handler(),
        )
        .await;

    // The blocked preflight is logged, not rejected; later stages still run.
    assert_eq!(response.status(), StatusCode::OK);
    assert!(probe.invoked());
}

#[tokio::test]
async fn completion_record_carries_the_authenticated_user() {
    let pipeline = pipeline();
    let bearer = TokenSigner::test().bearer("alice", "CUSTOMER", Some(42));
    let user = Arc::new(Mutex::new(None));
    let seen = user.clone();

    let response = pipeline
        .process(
            FilterContext::new(),
            request(Method::GET, "/api/orders/17", &[("authorization", &bearer)]),
            move |ctx: &mut FilterContext, _req| {
                let record = ctx.take_record().expect("access-log stage opened a record");
                *seen.lock().unwrap() = Some(record.user_label(ctx.identity()));
                ctx.set_record(record);
                Box::pin(async {
                    http::Response::builder()
                        .status(StatusCode::OK)
                        .body(Full::new(Bytes::from("backend response")))
                        .unwrap()
                })
            },
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(user.lock().unwrap().as_deref(), Some("user:alice"));
}

#[tokio::test]
async fn unmatched_path_defaults_to_allow_for_any_authenticated_role() {
    let pipeline = pipeline();
    let probe = ForwardProbe::new();
    let bearer = TokenSigner::test().bearer("bob", "GUEST", None);

    let response = pipeline
        .process(
            FilterContext::new(),
            request(Method::GET, "/api/products", &[("authorization", &bearer)]),
            probe.handler(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(probe.invoked());
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let pipeline = pipeline();
    let probe = ForwardProbe::new();
    let token = TokenSigner::test().sign(&serde_json::json!({
        "sub": "alice",
        "role": "CUSTOMER",
        "exp": 1_000_000_000
    }));
    let bearer = format!("Bearer {token}");

    let response = pipeline
        .process(
            FilterContext::new(),
            request(Method::GET, "/api/orders/17", &[("authorization", &bearer)]),
            probe.handler(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(!probe.invoked());
}

#[tokio::test]
async fn standard_pipeline_stage_order() {
    let pipeline = pipeline();
    assert_eq!(
        pipeline.stage_names(),
        vec!["origin_diagnostics", "access_log", "authenticate", "authorize"]
    );
}
