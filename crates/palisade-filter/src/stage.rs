//! The filter stage abstraction.
//!
//! Every pipeline stage implements [`FilterStage`] and returns an explicit
//! [`StageOutcome`]: either the request continues to the next stage, or the
//! stage completes the exchange with a response, skipping the remaining
//! stages and the forward hop.

use std::future::Future;
use std::pin::Pin;

use crate::context::FilterContext;
use crate::types::{Request, Response};

/// A boxed future, as returned by [`FilterStage::apply`].
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// What a stage decided to do with the request.
#[derive(Debug)]
pub enum StageOutcome {
    /// Pass the (possibly modified) request to the next stage.
    Continue(Request),
    /// Terminate the exchange with this response; later stages and the
    /// forward hop do not run.
    Complete(Response),
}

/// Fixed priorities of the built-in stages; lower runs first.
///
/// The gap between values is deliberate, leaving room for embedders to
/// slot diagnostic stages between the built-ins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum StagePriority {
    /// Origin allowlist diagnostics.
    OriginDiagnostics = 10,
    /// Access-log record start.
    AccessLog = 20,
    /// Bearer-token verification and identity header handling.
    Authenticate = 30,
    /// Role policy enforcement.
    Authorize = 40,
}

impl StagePriority {
    /// Returns the stage name used in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::OriginDiagnostics => "origin_diagnostics",
            Self::AccessLog => "access_log",
            Self::Authenticate => "authenticate",
            Self::Authorize => "authorize",
        }
    }

    /// Returns all built-in priorities in execution order.
    #[must_use]
    pub const fn all() -> [StagePriority; 4] {
        [
            Self::OriginDiagnostics,
            Self::AccessLog,
            Self::Authenticate,
            Self::Authorize,
        ]
    }
}

/// One stage of the filter pipeline.
///
/// Stages are shared across concurrent requests, so they hold only
/// immutable state; per-request state lives in [`FilterContext`].
pub trait FilterStage: Send + Sync + 'static {
    /// Stage name used in logs and [`stage_names`](crate::FilterPipeline::stage_names).
    fn name(&self) -> &'static str;

    /// Position of this stage in the pipeline; lower runs first.
    fn priority(&self) -> StagePriority;

    /// Processes the request, either continuing or completing the exchange.
    fn apply<'a>(
        &'a self,
        ctx: &'a mut FilterContext,
        request: Request,
    ) -> BoxFuture<'a, StageOutcome>;
}
