//! Authorization stage and role policy table.
//!
//! Coarse gateway-level policy: an ordered list of path prefixes, each
//! with its allowed role set. The first matching prefix decides; paths
//! no prefix matches fall through to the table's default decision.
//! Fine-grained, resource-level authorization is the destination
//! service's responsibility.

use http::StatusCode;
use palisade_config::PolicyConfig;

use crate::context::FilterContext;
use crate::stage::{BoxFuture, FilterStage, StageOutcome, StagePriority};
use crate::types::{Request, Response, ResponseExt};

/// Outcome of a policy decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// The role may access the path.
    Allow,
    /// The role may not; the reason is for logs only, never the client.
    Deny {
        /// Why access was denied.
        reason: String,
    },
}

/// Ordered path-prefix policy table.
///
/// Total and deterministic: every `(path, role)` pair yields exactly one
/// decision, with no side effects.
#[derive(Debug, Clone)]
pub struct PolicyTable {
    entries: Vec<(String, Vec<String>)>,
    default_allow: bool,
}

impl PolicyTable {
    /// Builds the table from the policy configuration section.
    #[must_use]
    pub fn new(config: &PolicyConfig) -> Self {
        Self {
            entries: config
                .entries
                .iter()
                .map(|entry| (entry.prefix.clone(), entry.roles.clone()))
                .collect(),
            default_allow: config.default_allow,
        }
    }

    /// Decides whether `role` may access `path`.
    ///
    /// A missing role is always denied, whatever the path: it means the
    /// request reached authorization without a fully-verified identity.
    #[must_use]
    pub fn decide(&self, path: &str, role: Option<&str>) -> AccessDecision {
        let Some(role) = role else {
            return AccessDecision::Deny {
                reason: "no role established for request".to_string(),
            };
        };

        for (prefix, roles) in &self.entries {
            if path.starts_with(prefix.as_str()) {
                if roles.iter().any(|allowed| allowed == role) {
                    return AccessDecision::Allow;
                }
                return AccessDecision::Deny {
                    reason: format!("role {role} not permitted under {prefix}"),
                };
            }
        }

        if self.default_allow {
            AccessDecision::Allow
        } else {
            AccessDecision::Deny {
                reason: "no policy entry matched and default is deny".to_string(),
            }
        }
    }
}

/// The authorization stage.
#[derive(Debug, Clone)]
pub struct AuthorizeStage {
    table: PolicyTable,
}

impl AuthorizeStage {
    /// Creates the stage from the policy configuration section.
    #[must_use]
    pub fn new(config: &PolicyConfig) -> Self {
        Self {
            table: PolicyTable::new(config),
        }
    }
}

impl FilterStage for AuthorizeStage {
    fn name(&self) -> &'static str {
        StagePriority::Authorize.name()
    }

    fn priority(&self) -> StagePriority {
        StagePriority::Authorize
    }

    fn apply<'a>(
        &'a self,
        ctx: &'a mut FilterContext,
        request: Request,
    ) -> BoxFuture<'a, StageOutcome> {
        Box::pin(async move {
            // Public paths are outside policy scope entirely.
            if ctx.public_bypass() {
                return StageOutcome::Continue(request);
            }

            let role = ctx.identity().map(|identity| identity.role.as_str());
            match self.table.decide(request.uri().path(), role) {
                AccessDecision::Allow => StageOutcome::Continue(request),
                AccessDecision::Deny { reason } => {
                    tracing::warn!(
                        request_id = %ctx.request_id(),
                        path = request.uri().path(),
                        user = ctx.identity().map(palisade_core::Identity::log_id).as_deref().unwrap_or("-"),
                        reason = %reason,
                        "access denied"
                    );
                    StageOutcome::Complete(Response::json_error(
                        StatusCode::FORBIDDEN,
                        "ACCESS_DENIED",
                        "Access denied",
                    ))
                }
            }
        })
    }
}
