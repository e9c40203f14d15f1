//! Authentication error taxonomy.
//!
//! Both [`AuthError`] variants surface to the caller as HTTP 401 with the
//! same error envelope; the variant exists so internal diagnostics can
//! distinguish an absent credential from a rejected one. The credential
//! itself is never carried in an error value and never logged.

use http::StatusCode;
use thiserror::Error;

/// Authentication failures produced by credential verification.
///
/// # Example
///
/// ```
/// use http::StatusCode;
/// use palisade_core::AuthError;
///
/// assert_eq!(AuthError::MissingCredential.status_code(), StatusCode::UNAUTHORIZED);
/// assert_eq!(AuthError::InvalidCredential.status_code(), StatusCode::UNAUTHORIZED);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No Authorization header, or a shape other than `Bearer <token>`.
    #[error("missing or malformed Authorization header")]
    MissingCredential,

    /// Signature mismatch, malformed token structure, expiry, or a
    /// missing required claim.
    #[error("credential rejected")]
    InvalidCredential,
}

impl AuthError {
    /// The HTTP status this error surfaces as. Always 401: the caller is
    /// given no detail that would distinguish forgery from expiry.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    /// Machine-readable code for the JSON error envelope.
    ///
    /// Deliberately identical for both variants.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        "AUTHENTICATION_FAILED"
    }

    /// Caller-facing message for the JSON error envelope.
    #[must_use]
    pub const fn public_message(&self) -> &'static str {
        "Invalid or missing credentials"
    }
}

/// Signing-key material could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("signing secret is not valid base64: {reason}")]
pub struct KeyError {
    /// Why decoding failed.
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_variants_surface_identically() {
        let missing = AuthError::MissingCredential;
        let invalid = AuthError::InvalidCredential;
        assert_eq!(missing.status_code(), invalid.status_code());
        assert_eq!(missing.error_code(), invalid.error_code());
        assert_eq!(missing.public_message(), invalid.public_message());
    }

    #[test]
    fn test_display_never_contains_credential_detail() {
        let msg = AuthError::InvalidCredential.to_string();
        assert!(!msg.contains("Bearer"));
        assert!(!msg.contains("token"));
    }
}
