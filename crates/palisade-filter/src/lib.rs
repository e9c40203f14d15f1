//! # Palisade Filter
//!
//! Priority-ordered filter pipeline for the Palisade edge gateway.
//!
//! Every inbound request flows through four fixed stages before it is
//! forwarded to a backend service:
//!
//! | Priority | Stage              | Purpose                                    |
//! |----------|--------------------|--------------------------------------------|
//! | 10       | Origin diagnostics | Classify `Origin` against the allowlist    |
//! | 20       | Access log         | Open the per-request access-log record     |
//! | 30       | Authenticate       | Verify bearer token, manage identity headers |
//! | 40       | Authorize          | Enforce the path-prefix role policy        |
//!
//! The two diagnostic stages always continue. Authenticate completes
//! with 401 on a bad or missing token; authorize completes with 403 on
//! a policy denial. The first completion short-circuits the rest of the
//! pipeline and the forward hop. Routing itself is not done here: the
//! embedder supplies the forward handler (and optional [`RouteTarget`]
//! metadata) and the pipeline guards the way to it.
//!
//! ## Example
//!
//! ```
//! use palisade_config::GatewayConfig;
//! use palisade_filter::FilterPipeline;
//!
//! let config = GatewayConfig::builder()
//!     .signing_secret(palisade_core::fixtures::TEST_SECRET_B64)
//!     .build();
//! let pipeline = FilterPipeline::standard(&config).unwrap();
//! assert_eq!(pipeline.stage_count(), 4);
//! ```

#![doc(html_root_url = "https://docs.rs/palisade-filter/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod context;
pub mod pipeline;
pub mod recorder;
pub mod stage;
pub mod stages;
pub mod types;

pub use context::{FilterContext, RouteTarget};
pub use pipeline::{FilterPipeline, FilterPipelineBuilder};
pub use recorder::{AccessRecorder, RecordHandle};
pub use stage::{BoxFuture, FilterStage, StageOutcome, StagePriority};
pub use types::{Request, Response, ResponseExt};
