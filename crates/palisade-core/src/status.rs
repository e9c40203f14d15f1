//! Status-code classification for access-log categorization.
//!
//! Classification is purely a logging concern and never feeds back into
//! control flow.

use http::StatusCode;

/// Coarse bands a terminal status code is sorted into for log records.
///
/// # Example
///
/// ```
/// use http::StatusCode;
/// use palisade_core::StatusBand;
///
/// assert_eq!(StatusBand::classify(StatusCode::OK), StatusBand::Success);
/// assert_eq!(StatusBand::classify(StatusCode::UNAUTHORIZED), StatusBand::Unauthorized);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusBand {
    /// 2xx.
    Success,
    /// 3xx.
    Redirect,
    /// 401 specifically.
    Unauthorized,
    /// 403 specifically.
    Forbidden,
    /// 404 specifically.
    NotFound,
    /// Any other 4xx.
    ClientError,
    /// 5xx.
    ServerError,
    /// Anything outside the recognized ranges.
    Unknown,
}

impl StatusBand {
    /// Sorts a status code into its band.
    #[must_use]
    pub fn classify(status: StatusCode) -> Self {
        match status.as_u16() {
            200..=299 => Self::Success,
            300..=399 => Self::Redirect,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            400..=499 => Self::ClientError,
            500..=599 => Self::ServerError,
            _ => Self::Unknown,
        }
    }

    /// The label written into log records.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Redirect => "REDIRECT",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::ClientError => "CLIENT_ERROR",
            Self::ServerError => "SERVER_ERROR",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for StatusBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
