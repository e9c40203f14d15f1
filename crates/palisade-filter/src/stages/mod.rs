//! Built-in filter stages.
//!
//! Stages run in priority order: origin diagnostics, access log,
//! authenticate, authorize. The two diagnostic stages never complete
//! the exchange; the two enforcement stages may.

pub mod access_log;
pub mod authorization;
pub mod identity;
pub mod origin;

pub use access_log::AccessLogStage;
pub use authorization::{AccessDecision, AuthorizeStage, PolicyTable};
pub use identity::AuthenticateStage;
pub use origin::{OriginPolicy, OriginStage, OriginVerdict};
