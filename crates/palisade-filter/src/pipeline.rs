//! Priority-ordered filter pipeline.
//!
//! The pipeline holds its stages sorted by [`StagePriority`] and drives
//! each request through them in order. Every stage returns an explicit
//! [`StageOutcome`]: `Continue` feeds the next stage, and the first
//! `Complete` short-circuits everything after it, including the forward
//! hop. On full traversal the request is handed to the caller-supplied
//! forward handler; the pipeline never produces a successful response
//! itself.
//!
//! A panicking stage must not let the request through unauthenticated,
//! so the driver catches the unwind and completes that request with a
//! 500 instead. Whatever path the request takes, the driver finalizes
//! the access-log record with the terminal status.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use http::StatusCode;
use palisade_config::GatewayConfig;
use palisade_core::KeyError;

use crate::context::FilterContext;
use crate::stage::{BoxFuture, FilterStage, StageOutcome};
use crate::stages::{AccessLogStage, AuthenticateStage, AuthorizeStage, OriginStage};
use crate::types::{Request, Response, ResponseExt};

/// The filter pipeline.
///
/// Stage order is fixed at construction; the pipeline is immutable and
/// shared across concurrent requests.
///
/// # Example
///
/// ```ignore
/// let pipeline = FilterPipeline::standard(&config)?;
/// let response = pipeline
///     .process(ctx, request, |_ctx, req| Box::pin(forward_to_backend(req)))
///     .await;
/// ```
pub struct FilterPipeline {
    stages: Vec<Arc<dyn FilterStage>>,
}

impl FilterPipeline {
    /// Creates an empty pipeline builder.
    #[must_use]
    pub fn builder() -> FilterPipelineBuilder {
        FilterPipelineBuilder::new()
    }

    /// Builds the standard four-stage pipeline from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError`] if the configured signing secret is not
    /// valid base64.
    pub fn standard(config: &GatewayConfig) -> Result<Self, KeyError> {
        Ok(Self::builder()
            .add_stage(OriginStage::new(&config.cors))
            .add_stage(AccessLogStage::new(&config.auth))
            .add_stage(AuthenticateStage::from_config(&config.auth)?)
            .add_stage(AuthorizeStage::new(&config.policy))
            .build())
    }

    /// Drives a request through the stages and, if none completed it,
    /// the forward handler.
    pub async fn process<H>(&self, mut ctx: FilterContext, request: Request, forward: H) -> Response
    where
        H: FnOnce(&mut FilterContext, Request) -> BoxFuture<'static, Response> + Send,
    {
        let mut request = request;

        for stage in &self.stages {
            let outcome = AssertUnwindSafe(stage.apply(&mut ctx, request))
                .catch_unwind()
                .await;

            match outcome {
                Ok(StageOutcome::Continue(next)) => request = next,
                Ok(StageOutcome::Complete(response)) => {
                    tracing::debug!(
                        request_id = %ctx.request_id(),
                        stage = stage.name(),
                        status = response.status().as_u16(),
                        "stage completed exchange"
                    );
                    finish_record(&mut ctx, response.status());
                    return response;
                }
                Err(_) => {
                    tracing::error!(
                        request_id = %ctx.request_id(),
                        stage = stage.name(),
                        "stage panicked; completing request with 500"
                    );
                    let response = Response::json_error(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "Internal server error",
                    );
                    finish_record(&mut ctx, response.status());
                    return response;
                }
            }
        }

        let response = forward(&mut ctx, request).await;
        finish_record(&mut ctx, response.status());
        response
    }

    /// Returns the stage names in execution order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Returns the number of stages.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }
}

fn finish_record(ctx: &mut FilterContext, status: StatusCode) {
    if let Some(record) = ctx.take_record() {
        record.finish(status, ctx.identity());
    }
}

/// Builder for [`FilterPipeline`].
///
/// Stages may be added in any order; `build` sorts them by priority.
pub struct FilterPipelineBuilder {
    stages: Vec<Arc<dyn FilterStage>>,
}

impl FilterPipelineBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Adds a stage.
    #[must_use]
    pub fn add_stage<S: FilterStage>(mut self, stage: S) -> Self {
        self.stages.push(Arc::new(stage));
        self
    }

    /// Builds the pipeline, sorting stages by priority.
    #[must_use]
    pub fn build(mut self) -> FilterPipeline {
        self.stages.sort_by_key(|stage| stage.priority());
        FilterPipeline {
            stages: self.stages,
        }
    }
}

impl Default for FilterPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
