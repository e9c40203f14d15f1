//! Test fixtures for Palisade development and testing.
//!
//! This module provides a token signer so tests across the workspace can
//! mint valid (or deliberately broken) HS256 credentials without pulling
//! in a JWT issuance dependency. Production code never signs tokens;
//! issuance is out of scope for the gateway.
//!
//! # Example
//!
//! ```
//! use palisade_core::{fixtures, TokenVerifier};
//!
//! let token = fixtures::TokenSigner::test().bearer("alice", "CUSTOMER", None);
//! let verifier = TokenVerifier::from_base64_secret(fixtures::TEST_SECRET_B64).unwrap();
//! assert!(verifier.verify_header(Some(&token)).is_ok());
//! ```

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Standard-base64 signing secret shared by workspace tests.
pub const TEST_SECRET_B64: &str = "c2VjcmV0LXNpZ25pbmcta2V5LWZvci1wYWxpc2FkZS10ZXN0cw==";

type HmacSha256 = Hmac<Sha256>;

/// Mints HS256 JWS tokens for tests.
#[derive(Clone)]
pub struct TokenSigner {
    key: Vec<u8>,
}

impl TokenSigner {
    /// Signer using [`TEST_SECRET_B64`].
    #[must_use]
    pub fn test() -> Self {
        Self::from_base64_secret(TEST_SECRET_B64)
    }

    /// Signer from a standard-base64 secret.
    ///
    /// # Panics
    ///
    /// Panics on invalid base64; fixtures are test-only.
    #[must_use]
    pub fn from_base64_secret(secret: &str) -> Self {
        Self {
            key: STANDARD.decode(secret).expect("fixture secret is base64"),
        }
    }

    /// Signer from raw key bytes.
    #[must_use]
    pub fn from_key_bytes(key: Vec<u8>) -> Self {
        Self { key }
    }

    /// Signs an arbitrary claims object into a compact JWS.
    ///
    /// # Panics
    ///
    /// Panics if the HMAC key is rejected; fixtures are test-only.
    #[must_use]
    pub fn sign(&self, claims: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());

        let mut mac = HmacSha256::new_from_slice(&self.key).expect("HMAC accepts any key length");
        mac.update(header.as_bytes());
        mac.update(b".");
        mac.update(payload.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        format!("{header}.{payload}.{signature}")
    }

    /// Signs a well-formed identity credential and returns the full
    /// `Bearer <token>` header value.
    #[must_use]
    pub fn bearer(&self, subject: &str, role: &str, user_id: Option<i64>) -> String {
        let mut claims = serde_json::json!({
            "sub": subject,
            "role": role,
        });
        if let Some(id) = user_id {
            claims["userId"] = serde_json::json!(id);
        }
        format!("Bearer {}", self.sign(&claims))
    }
}
