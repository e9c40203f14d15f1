//! Authentication stage.
//!
//! Strips inbound identity headers, verifies the bearer token, and
//! injects the verified identity as headers on the forwarded request.
//!
//! Header stripping is unconditional and happens before anything else:
//! `X-User-Name`, `X-User-Role`, and `X-User-Id` are trust signals for
//! the backend services, so a caller must never be able to supply them.
//! Public paths skip verification but are stripped all the same.

use http::header::{HeaderValue, AUTHORIZATION};
use palisade_config::AuthConfig;
use palisade_core::{KeyError, TokenVerifier};

use crate::context::FilterContext;
use crate::stage::{BoxFuture, FilterStage, StageOutcome, StagePriority};
use crate::types::{Request, Response, ResponseExt};

/// Verified subject, injected on the forwarded request.
pub const USER_NAME_HEADER: &str = "x-user-name";

/// Verified role, injected on the forwarded request.
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Verified numeric user id, injected when the token carried one.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The authentication stage.
pub struct AuthenticateStage {
    verifier: TokenVerifier,
    public_paths: Vec<String>,
}

impl AuthenticateStage {
    /// Builds the stage from the auth configuration section.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError`] if the signing secret is not valid base64.
    pub fn from_config(config: &AuthConfig) -> Result<Self, KeyError> {
        Ok(Self {
            verifier: TokenVerifier::from_base64_secret(&config.signing_secret)?,
            public_paths: config.public_paths.clone(),
        })
    }

    /// Builds the stage from an existing verifier.
    #[must_use]
    pub fn new(verifier: TokenVerifier, public_paths: Vec<String>) -> Self {
        Self {
            verifier,
            public_paths,
        }
    }

    fn is_public(&self, path: &str) -> bool {
        self.public_paths.iter().any(|f| path.contains(f.as_str()))
    }

    fn rejection() -> Response {
        use palisade_core::AuthError;
        // Both failure modes share one envelope so a caller cannot probe
        // which check rejected the token.
        let err = AuthError::InvalidCredential;
        Response::json_error(err.status_code(), err.error_code(), err.public_message())
    }
}

impl std::fmt::Debug for AuthenticateStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticateStage")
            .field("public_paths", &self.public_paths)
            .finish_non_exhaustive()
    }
}

impl FilterStage for AuthenticateStage {
    fn name(&self) -> &'static str {
        StagePriority::Authenticate.name()
    }

    fn priority(&self) -> StagePriority {
        StagePriority::Authenticate
    }

    fn apply<'a>(
        &'a self,
        ctx: &'a mut FilterContext,
        request: Request,
    ) -> BoxFuture<'a, StageOutcome> {
        Box::pin(async move {
            let mut request = request;

            let headers = request.headers_mut();
            headers.remove(USER_NAME_HEADER);
            headers.remove(USER_ROLE_HEADER);
            headers.remove(USER_ID_HEADER);

            let path = request.uri().path().to_string();
            if self.is_public(&path) {
                ctx.set_public_bypass();
                tracing::debug!(
                    request_id = %ctx.request_id(),
                    path = %path,
                    "public path, skipping verification"
                );
                return StageOutcome::Continue(request);
            }

            let raw = request
                .headers()
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok());

            let identity = match self.verifier.verify_header(raw) {
                Ok(identity) => identity,
                Err(err) => {
                    tracing::warn!(
                        request_id = %ctx.request_id(),
                        path = %path,
                        error = %err,
                        "authentication failed"
                    );
                    let e = Response::json_error(
                        err.status_code(),
                        err.error_code(),
                        err.public_message(),
                    );
                    return StageOutcome::Complete(e);
                }
            };

            // Claims come from an untrusted token; a subject or role that
            // cannot form a header value is rejected rather than dropped.
            let Ok(name) = HeaderValue::from_str(&identity.subject) else {
                tracing::warn!(
                    request_id = %ctx.request_id(),
                    "subject claim is not a valid header value"
                );
                return StageOutcome::Complete(Self::rejection());
            };
            let Ok(role) = HeaderValue::from_str(&identity.role) else {
                tracing::warn!(
                    request_id = %ctx.request_id(),
                    "role claim is not a valid header value"
                );
                return StageOutcome::Complete(Self::rejection());
            };

            let headers = request.headers_mut();
            headers.insert(USER_NAME_HEADER, name);
            headers.insert(USER_ROLE_HEADER, role);
            if let Some(user_id) = identity.user_id {
                headers.insert(
                    USER_ID_HEADER,
                    HeaderValue::from_str(&user_id.to_string())
                        .unwrap_or_else(|_| HeaderValue::from_static("")),
                );
            }

            tracing::debug!(
                request_id = %ctx.request_id(),
                user = %identity.log_id(),
                role = %identity.role,
                "identity attached"
            );
            ctx.set_identity(identity);

            StageOutcome::Continue(request)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::StatusCode;
    use http_body_util::Full;
    use palisade_core::fixtures::TokenSigner;

    fn stage() -> AuthenticateStage {
        let config = AuthConfig {
            signing_secret: palisade_core::fixtures::TEST_SECRET_B64.to_string(),
            ..AuthConfig::default()
        };
        AuthenticateStage::from_config(&config).unwrap()
    }

    fn request(uri: &str, headers: &[(&str, &str)]) -> Request {
        let mut builder = http::Request::builder().uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(Full::new(Bytes::new())).unwrap()
    }

    #[tokio::test]
    async fn test_valid_token_attaches_identity() {
        let stage = stage();
        let mut ctx = FilterContext::new();
        let bearer = TokenSigner::test().bearer("alice", "CUSTOMER", Some(7));

        let outcome = stage
            .apply(&mut ctx, request("/api/orders/1", &[("authorization", &bearer)]))
            .await;

        let StageOutcome::Continue(forwarded) = outcome else {
            panic!("expected Continue");
        };
        assert_eq!(forwarded.headers().get(USER_NAME_HEADER).unwrap(), "alice");
        assert_eq!(forwarded.headers().get(USER_ROLE_HEADER).unwrap(), "CUSTOMER");
        assert_eq!(forwarded.headers().get(USER_ID_HEADER).unwrap(), "7");
        assert_eq!(ctx.identity().unwrap().subject, "alice");
    }

    #[tokio::test]
    async fn test_missing_token_completes_401() {
        let stage = stage();
        let mut ctx = FilterContext::new();

        let outcome = stage.apply(&mut ctx, request("/api/orders/1", &[])).await;

        let StageOutcome::Complete(response) = outcome else {
            panic!("expected Complete");
        };
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(ctx.identity().is_none());
    }

    #[tokio::test]
    async fn test_tampered_token_completes_401() {
        let stage = stage();
        let mut ctx = FilterContext::new();
        let mut bearer = TokenSigner::test().bearer("alice", "CUSTOMER", None);
        bearer.truncate(bearer.len() - 2);

        let outcome = stage
            .apply(&mut ctx, request("/api/orders/1", &[("authorization", &bearer)]))
            .await;

        assert!(matches!(outcome, StageOutcome::Complete(_)));
    }

    #[tokio::test]
    async fn test_inbound_identity_headers_stripped() {
        let stage = stage();
        let mut ctx = FilterContext::new();
        let bearer = TokenSigner::test().bearer("alice", "CUSTOMER", None);

        let outcome = stage
            .apply(
                &mut ctx,
                request(
                    "/api/orders/1",
                    &[
                        ("authorization", &bearer),
                        (USER_NAME_HEADER, "mallory"),
                        (USER_ROLE_HEADER, "ADMIN"),
                        (USER_ID_HEADER, "1"),
                    ],
                ),
            )
            .await;

        let StageOutcome::Continue(forwarded) = outcome else {
            panic!("expected Continue");
        };
        // Forged values are gone; only verified claims remain.
        assert_eq!(forwarded.headers().get(USER_NAME_HEADER).unwrap(), "alice");
        assert_eq!(forwarded.headers().get(USER_ROLE_HEADER).unwrap(), "CUSTOMER");
        assert!(forwarded.headers().get(USER_ID_HEADER).is_none());
    }

    #[tokio::test]
    async fn test_public_path_bypasses_but_still_strips() {
        let stage = stage();
        let mut ctx = FilterContext::new();

        let outcome = stage
            .apply(
                &mut ctx,
                request("/api/auth/login", &[(USER_ROLE_HEADER, "ADMIN")]),
            )
            .await;

        let StageOutcome::Continue(forwarded) = outcome else {
            panic!("expected Continue");
        };
        assert!(ctx.public_bypass());
        assert!(ctx.identity().is_none());
        assert!(forwarded.headers().get(USER_ROLE_HEADER).is_none());
    }

    #[tokio::test]
    async fn test_actuator_is_public() {
        let stage = stage();
        let mut ctx = FilterContext::new();

        let outcome = stage.apply(&mut ctx, request("/actuator/health", &[])).await;
        assert!(matches!(outcome, StageOutcome::Continue(_)));
        assert!(ctx.public_bypass());
    }
}
