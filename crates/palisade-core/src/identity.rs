//! Verified caller identity and request identifiers.
//!
//! An [`Identity`] is only ever produced by successful credential
//! verification in [`TokenVerifier`](crate::TokenVerifier). It is never
//! reconstructed from caller-supplied headers; the filter pipeline strips
//! inbound identity headers before verification for exactly that reason.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A unique identifier for each request, using UUID v7.
///
/// UUID v7 is time-ordered, which makes it ideal for request tracking
/// and log correlation.
///
/// # Example
///
/// ```
/// use palisade_core::RequestId;
///
/// let id = RequestId::new();
/// println!("Request ID: {}", id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new unique request ID using UUID v7.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `RequestId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RequestId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<RequestId> for Uuid {
    fn from(id: RequestId) -> Self {
        id.0
    }
}

/// The verified identity of a caller.
///
/// Created exclusively by successful signature and claim verification.
/// The `role` is mandatory: a credential whose claims lack a role fails
/// verification outright, so authorization never runs against a roleless
/// identity.
///
/// # Example
///
/// ```
/// use palisade_core::Identity;
///
/// let identity = Identity {
///     subject: "alice".to_string(),
///     role: "CUSTOMER".to_string(),
///     user_id: Some(42),
/// };
/// assert_eq!(identity.log_id(), "user:alice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// The credential's subject claim.
    pub subject: String,

    /// The credential's role claim, consumed by path-prefix authorization.
    pub role: String,

    /// Optional numeric user identifier.
    pub user_id: Option<i64>,
}

impl Identity {
    /// Returns a string identifier suitable for logging.
    ///
    /// Never includes credential material; the subject is a claim, not a
    /// secret.
    #[must_use]
    pub fn log_id(&self) -> String {
        format!("user:{}", self.subject)
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.subject, self.role)
    }
}
