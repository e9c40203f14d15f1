//! Origin allowlist diagnostics.
//!
//! This stage classifies the request's `Origin` header against the
//! configured allowlist and logs the verdict. It is diagnostic-only:
//! blocked origins are reported, never rejected, because actual CORS
//! enforcement happens at the HTTP layer in front of the pipeline.
//! Blocked verdicts additionally resolve and log the caller address.

use http::Method;
use palisade_config::CorsConfig;

use crate::context::FilterContext;
use crate::stage::{BoxFuture, FilterStage, StageOutcome, StagePriority};
use crate::types::Request;

/// Exact-match origin allowlist.
///
/// One trailing slash is stripped from each side before comparison;
/// there are no wildcard patterns at this layer.
#[derive(Debug, Clone)]
pub struct OriginPolicy {
    allowed: Vec<String>,
}

/// Verdict for one request's origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OriginVerdict {
    /// Whether the origin is on the allowlist.
    pub allowed: bool,
    /// Whether this is a CORS preflight (`OPTIONS`) request.
    pub preflight: bool,
}

impl OriginPolicy {
    /// Builds the policy from the shared origin allowlist.
    #[must_use]
    pub fn new(config: &CorsConfig) -> Self {
        Self {
            allowed: config
                .allowed_origins
                .iter()
                .map(|origin| normalize(origin).to_string())
                .collect(),
        }
    }

    /// Classifies an origin and method.
    #[must_use]
    pub fn classify(&self, origin: &str, method: &Method) -> OriginVerdict {
        let normalized = normalize(origin);
        OriginVerdict {
            allowed: self.allowed.iter().any(|entry| entry == normalized),
            preflight: method == Method::OPTIONS,
        }
    }
}

fn normalize(origin: &str) -> &str {
    origin.strip_suffix('/').unwrap_or(origin)
}

/// The origin diagnostics stage.
#[derive(Debug, Clone)]
pub struct OriginStage {
    policy: OriginPolicy,
}

impl OriginStage {
    /// Creates the stage from the shared origin allowlist.
    #[must_use]
    pub fn new(config: &CorsConfig) -> Self {
        Self {
            policy: OriginPolicy::new(config),
        }
    }
}

impl FilterStage for OriginStage {
    fn name(&self) -> &'static str {
        StagePriority::OriginDiagnostics.name()
    }

    fn priority(&self) -> StagePriority {
        StagePriority::OriginDiagnostics
    }

    fn apply<'a>(
        &'a self,
        ctx: &'a mut FilterContext,
        request: Request,
    ) -> BoxFuture<'a, StageOutcome> {
        Box::pin(async move {
            let origin = request
                .headers()
                .get(http::header::ORIGIN)
                .and_then(|v| v.to_str().ok());

            // Same-origin and non-browser requests carry no Origin header;
            // nothing to classify.
            if let Some(origin) = origin {
                let verdict = self.policy.classify(origin, request.method());
                let request_id = ctx.request_id();

                match (verdict.allowed, verdict.preflight) {
                    (true, true) => tracing::debug!(
                        %request_id,
                        origin,
                        path = request.uri().path(),
                        "preflight from allowed origin"
                    ),
                    (true, false) => tracing::debug!(
                        %request_id,
                        origin,
                        method = %request.method(),
                        path = request.uri().path(),
                        "request from allowed origin"
                    ),
                    (false, preflight) => {
                        let client = ctx.client_addr(&request);
                        tracing::warn!(
                            %request_id,
                            origin,
                            preflight,
                            method = %request.method(),
                            path = request.uri().path(),
                            client = %client,
                            "request from origin outside the allowlist"
                        );
                    }
                }
            }

            StageOutcome::Continue(request)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http_body_util::Full;

    fn policy(origins: &[&str]) -> OriginPolicy {
        OriginPolicy::new(&CorsConfig {
            allowed_origins: origins.iter().map(ToString::to_string).collect(),
        })
    }

    #[test]
    fn test_exact_match_allowed() {
        let policy = policy(&["http://localhost:5173"]);
        let verdict = policy.classify("http://localhost:5173", &Method::GET);
        assert!(verdict.allowed);
        assert!(!verdict.preflight);
    }

    #[test]
    fn test_trailing_slash_normalized_both_sides() {
        let policy = policy(&["http://shop.example/"]);
        assert!(policy.classify("http://shop.example", &Method::GET).allowed);
        assert!(policy.classify("http://shop.example/", &Method::GET).allowed);
    }

    #[test]
    fn test_no_wildcard_matching() {
        let policy = policy(&["http://shop.example"]);
        assert!(!policy.classify("http://evil.shop.example", &Method::GET).allowed);
        assert!(!policy.classify("https://shop.example", &Method::GET).allowed);
    }

    #[test]
    fn test_preflight_is_options() {
        let policy = policy(&["http://shop.example"]);
        assert!(policy.classify("http://shop.example", &Method::OPTIONS).preflight);
        assert!(!policy.classify("http://shop.example", &Method::POST).preflight);
    }

    #[tokio::test]
    async fn test_stage_always_continues() {
        let stage = OriginStage::new(&CorsConfig {
            allowed_origins: vec!["http://shop.example".to_string()],
        });
        let mut ctx = FilterContext::new();

        let request: Request = http::Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/orders/1")
            .header(http::header::ORIGIN, "http://blocked.example")
            .header("x-forwarded-for", "203.0.113.7")
            .body(Full::new(Bytes::new()))
            .unwrap();

        let outcome = stage.apply(&mut ctx, request).await;
        assert!(matches!(outcome, StageOutcome::Continue(_)));
    }
}
