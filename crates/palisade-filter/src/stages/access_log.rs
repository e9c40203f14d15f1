//! Access-log stage.
//!
//! Opens the per-request access-log record and emits the request-received
//! line. The record itself is finalized by the pipeline driver with the
//! terminal status, so short-circuited requests are logged the same way
//! as forwarded ones.

use palisade_config::AuthConfig;

use crate::context::FilterContext;
use crate::recorder::AccessRecorder;
use crate::stage::{BoxFuture, FilterStage, StageOutcome, StagePriority};
use crate::types::Request;

/// How the request relates to authentication, for the start-of-request log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequestKind {
    /// Login/registration traffic under the auth endpoints.
    AuthEndpoint,
    /// Other configured public paths (health, metrics).
    Public,
    /// Everything else; will be authenticated downstream.
    Protected,
}

impl RequestKind {
    const fn label(self) -> &'static str {
        match self {
            Self::AuthEndpoint => "auth",
            Self::Public => "public",
            Self::Protected => "protected",
        }
    }
}

/// The access-log stage.
#[derive(Debug, Clone)]
pub struct AccessLogStage {
    public_paths: Vec<String>,
}

impl AccessLogStage {
    /// Creates the stage from the auth section's public-path list.
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            public_paths: config.public_paths.clone(),
        }
    }

    fn classify(&self, path: &str) -> RequestKind {
        if path.contains("/api/auth/") {
            RequestKind::AuthEndpoint
        } else if self.public_paths.iter().any(|f| path.contains(f.as_str())) {
            RequestKind::Public
        } else {
            RequestKind::Protected
        }
    }
}

impl FilterStage for AccessLogStage {
    fn name(&self) -> &'static str {
        StagePriority::AccessLog.name()
    }

    fn priority(&self) -> StagePriority {
        StagePriority::AccessLog
    }

    fn apply<'a>(
        &'a self,
        ctx: &'a mut FilterContext,
        request: Request,
    ) -> BoxFuture<'a, StageOutcome> {
        Box::pin(async move {
            let client = ctx.client_addr(&request);
            let record = AccessRecorder::start(&request, ctx.route(), client.clone());
            let kind = self.classify(request.uri().path());

            tracing::info!(
                request_id = %ctx.request_id(),
                method = %request.method(),
                path = request.uri().path(),
                client = %client,
                service = record.service(),
                kind = kind.label(),
                "request received"
            );

            ctx.set_record(record);
            StageOutcome::Continue(request)
        })
    }
}
