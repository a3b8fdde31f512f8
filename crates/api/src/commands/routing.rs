use cinelog_core::RouteDecision;
use tracing::debug;

use crate::context::AppContext;

/// Run the route gate for `path` against the stored credentials.
pub fn check_route(ctx: &AppContext, path: &str) -> RouteDecision {
    let decision = ctx.gate.decide(path, &ctx.credentials());
    debug!(path, ?decision, "route checked");
    decision
}
