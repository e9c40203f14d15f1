//! HS256 bearer-token verification.
//!
//! [`TokenVerifier`] validates the `Authorization: Bearer <token>` header
//! against HMAC key material decoded from the configured signing secret.
//! The token must be a three-segment JWS signed with HMAC-SHA256; the
//! signature comparison is constant-time.
//!
//! Verification failures are reported to the caller as a single
//! [`AuthError::InvalidCredential`]; the concrete cause (bad structure,
//! signature mismatch, expiry, missing claim) is only visible in debug
//! logs, and the raw token is never logged.

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};
use subtle::ConstantTimeEq;

use crate::error::{AuthError, KeyError};
use crate::identity::Identity;

type HmacSha256 = Hmac<Sha256>;

const BEARER_PREFIX: &str = "Bearer ";

/// Claims carried in the token payload.
#[derive(Debug, Deserialize)]
struct Claims {
    sub: Option<String>,
    role: Option<String>,
    #[serde(rename = "userId")]
    user_id: Option<serde_json::Value>,
    exp: Option<i64>,
}

/// JOSE header of the token.
#[derive(Debug, Deserialize)]
struct Header {
    alg: String,
}

/// Verifies bearer credentials against an HMAC-SHA256 signing key.
///
/// The verifier is immutable after construction and safe to share across
/// arbitrarily many concurrent requests.
///
/// # Example
///
/// ```
/// use palisade_core::{fixtures, TokenVerifier};
///
/// let verifier = TokenVerifier::from_base64_secret(fixtures::TEST_SECRET_B64).unwrap();
/// let token = fixtures::TokenSigner::test().bearer("alice", "CUSTOMER", Some(42));
///
/// let identity = verifier.verify_header(Some(&token)).unwrap();
/// assert_eq!(identity.subject, "alice");
/// assert_eq!(identity.role, "CUSTOMER");
/// assert_eq!(identity.user_id, Some(42));
/// ```
#[derive(Clone)]
pub struct TokenVerifier {
    key: Vec<u8>,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Key material stays out of Debug output.
        f.debug_struct("TokenVerifier").finish_non_exhaustive()
    }
}

impl TokenVerifier {
    /// Creates a verifier from a standard-base64-encoded signing secret.
    pub fn from_base64_secret(secret: &str) -> Result<Self, KeyError> {
        let key = STANDARD.decode(secret).map_err(|e| KeyError {
            reason: e.to_string(),
        })?;
        Ok(Self { key })
    }

    /// Creates a verifier from raw key bytes.
    #[must_use]
    pub fn from_key_bytes(key: impl Into<Vec<u8>>) -> Self {
        Self { key: key.into() }
    }

    /// Verifies a raw Authorization header value.
    ///
    /// An absent header or any shape other than `Bearer <token>` fails
    /// immediately with [`AuthError::MissingCredential`] without touching
    /// the signature machinery.
    pub fn verify_header(&self, raw: Option<&str>) -> Result<Identity, AuthError> {
        let token = raw
            .and_then(|value| value.strip_prefix(BEARER_PREFIX))
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::MissingCredential)?;
        self.verify(token)
    }

    /// Verifies a bare token string and extracts the identity claims.
    pub fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let mut segments = token.split('.');
        let (Some(header_b64), Some(payload_b64), Some(signature_b64), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(self.reject(token, "token is not a three-segment JWS"));
        };

        let header_json = URL_SAFE_NO_PAD
            .decode(header_b64)
            .map_err(|_| self.reject(token, "header segment is not valid base64"))?;
        let header: Header = serde_json::from_slice(&header_json)
            .map_err(|_| self.reject(token, "header segment is not valid JSON"))?;
        if header.alg != "HS256" {
            return Err(self.reject(token, "unsupported signing algorithm"));
        }

        let provided = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| self.reject(token, "signature segment is not valid base64"))?;
        if !self.signature_matches(header_b64, payload_b64, &provided) {
            return Err(self.reject(token, "signature mismatch"));
        }

        let payload_json = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| self.reject(token, "payload segment is not valid base64"))?;
        let claims: Claims = serde_json::from_slice(&payload_json)
            .map_err(|_| self.reject(token, "payload segment is not valid JSON"))?;

        if let Some(exp) = claims.exp {
            if exp <= unix_now() {
                return Err(self.reject(token, "token expired"));
            }
        }

        let Some(subject) = claims.sub.filter(|s| !s.is_empty()) else {
            return Err(self.reject(token, "missing subject claim"));
        };
        // A roleless identity must never reach authorization; treat it as
        // a verification failure, not a deferred policy denial.
        let Some(role) = claims.role.filter(|r| !r.is_empty()) else {
            return Err(self.reject(token, "missing role claim"));
        };

        Ok(Identity {
            subject,
            role,
            user_id: claims.user_id.and_then(parse_user_id),
        })
    }

    fn signature_matches(&self, header_b64: &str, payload_b64: &str, provided: &[u8]) -> bool {
        let Ok(mut mac) = HmacSha256::new_from_slice(&self.key) else {
            return false;
        };
        mac.update(header_b64.as_bytes());
        mac.update(b".");
        mac.update(payload_b64.as_bytes());
        let expected = mac.finalize().into_bytes();
        expected.ct_eq(provided).into()
    }

    /// Logs the internal failure cause (token redacted) and collapses it
    /// to the single externally visible variant.
    fn reject(&self, token: &str, reason: &'static str) -> AuthError {
        tracing::debug!(reason, token_len = token.len(), "credential rejected");
        AuthError::InvalidCredential
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
}

/// The original wire format carries `userId` as a number, but some signers
/// emit it as a numeric string; accept both, drop anything else.
fn parse_user_id(value: serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.parse().ok(),
        other => {
            tracing::debug!(claim_type = ?other, "ignoring non-numeric userId claim");
            None
        }
    }
}
