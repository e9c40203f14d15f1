//! HTTP request and response types used by the filter pipeline.

use bytes::Bytes;
use http_body_util::Full;

/// The HTTP request type flowing through the pipeline.
///
/// A standard `http::Request` with a `Full<Bytes>` body.
pub type Request = http::Request<Full<Bytes>>;

/// The HTTP response type produced by the pipeline.
pub type Response = http::Response<Full<Bytes>>;

/// Extension trait for building the gateway's error responses.
pub trait ResponseExt {
    /// Creates a JSON error response in the gateway envelope:
    /// `{"error": {"code": ..., "message": ...}}`.
    fn json_error(status: http::StatusCode, code: &str, message: &str) -> Response;
}

impl ResponseExt for Response {
    fn json_error(status: http::StatusCode, code: &str, message: &str) -> Response {
        let body = serde_json::json!({
            "error": {
                "code": code,
                "message": message
            }
        });

        http::Response::builder()
            .status(status)
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(body.to_string())))
            .expect("failed to build JSON error response")
    }
}
