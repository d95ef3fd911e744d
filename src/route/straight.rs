//! Straight-line routing: a single segment, valid only when nothing lies
//! between the endpoints. No detour logic; a blocked line is the caller's
//! contract violation, reported as a routing failure.

use crate::error::RoutingError;

use super::{RouteContext, Segment};

pub(crate) fn route(ctx: &RouteContext<'_>) -> Result<Segment, RoutingError> {
    if let Some(obs) = ctx
        .index
        .first_hit_on_segment(ctx.start, ctx.end, ctx.exclude)
    {
        return Err(RoutingError::Blocked {
            obstacle: obs.id.clone(),
        });
    }
    Ok(Segment::straight(ctx.start, ctx.end))
}
