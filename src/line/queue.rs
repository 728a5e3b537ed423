use super::behavior::{behavior_of, mismatch, Behavior, LocationKind};
use super::context::SimContext;
use crate::core::errors::{ModelError, ModelResult};
use crate::core::event::EventKind;
use crate::core::relation;
use crate::core::types::EntityId;
use crate::core::world::World;
use log::{debug, warn};
use serde::Serialize;

/// Seconds between a successful room check and the actual hand-over.
pub const MOVE_OUT_DELAY: u64 = 1;

/// Finite FIFO relay toward a single target.
///
/// Occupants leave one at a time through a self-rescheduling relay chain:
/// check the target, wait `MOVE_OUT_DELAY`, move the oldest occupant, then
/// check again after `retry_time` while occupants remain. A full target makes
/// the check retry after `retry_time`. Only the empty to non-empty transition
/// starts a chain, so at most one is ever pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QueueBehavior {
    pub(crate) target: Option<EntityId>,
    retry_time: u64,
    relay_active: bool,
}

impl QueueBehavior {
    pub const DEFAULT_RETRY_TIME: u64 = 3;

    pub fn new(retry_time: u64) -> Self {
        Self {
            target: None,
            retry_time,
            relay_active: false,
        }
    }

    pub fn target(&self) -> Option<EntityId> {
        self.target
    }

    /// Seconds to wait before checking the target again
    pub fn retry_time(&self) -> u64 {
        self.retry_time
    }

    /// Whether a relay chain is pending for this queue
    pub fn relay_active(&self) -> bool {
        self.relay_active
    }
}

impl Default for QueueBehavior {
    fn default() -> Self {
        Self::new(Self::DEFAULT_RETRY_TIME)
    }
}

fn state(world: &World, id: EntityId) -> ModelResult<QueueBehavior> {
    match behavior_of(world, id)? {
        Behavior::Queue(queue) => Ok(*queue),
        _ => Err(mismatch(world, id, LocationKind::Queue)),
    }
}

fn set_relay_active(world: &mut World, id: EntityId, active: bool) {
    if let Some(Behavior::Queue(q)) = world.get_mut::<Behavior>(id) {
        q.relay_active = active;
    }
}

fn target_of(ctx: &SimContext<'_>, id: EntityId, queue: &QueueBehavior) -> ModelResult<EntityId> {
    queue
        .target
        .ok_or_else(|| ModelError::MissingTarget(ctx.label(id)))
}

pub(crate) fn on_entered(
    ctx: &mut SimContext<'_>,
    id: EntityId,
    product: EntityId,
) -> ModelResult<()> {
    let queue = state(ctx.world, id)?;
    let count = relation::child_count(ctx.world, id)?;
    let capacity = relation::capacity(ctx.world, id).unwrap_or(u64::MAX);
    debug!(
        "[Queue:{}] received {}, capacity: {}/{}",
        ctx.label(id),
        ctx.label(product),
        count,
        capacity
    );

    if count == 1 {
        if queue.relay_active {
            debug!("[Queue:{}] relay already pending", ctx.label(id));
            return Ok(());
        }
        set_relay_active(ctx.world, id, true);
        check_move_out(ctx, id)?;
    }
    Ok(())
}

/// Check the target and either schedule the hand-over or retry later
pub(crate) fn check_move_out(ctx: &mut SimContext<'_>, id: EntityId) -> ModelResult<()> {
    let queue = state(ctx.world, id)?;
    let target = target_of(ctx, id, &queue)?;

    if !relation::has_room(ctx.world, target)? {
        debug!(
            "[Queue:{}] {} is full, retrying in {}s",
            ctx.label(id),
            ctx.label(target),
            queue.retry_time
        );
        ctx.schedule(id, queue.retry_time, EventKind::QueueCheck);
        return Ok(());
    }

    ctx.schedule(id, MOVE_OUT_DELAY, EventKind::QueueMove);
    Ok(())
}

/// Hand the oldest occupant to the target and continue the chain
pub(crate) fn move_out(ctx: &mut SimContext<'_>, id: EntityId) -> ModelResult<()> {
    let queue = state(ctx.world, id)?;
    let target = target_of(ctx, id, &queue)?;

    let first = ctx
        .world
        .get::<relation::Relation>(id)
        .and_then(|rel| rel.first());
    let Some(product) = first else {
        warn!(
            "[Queue:{}] nothing left to move out, ending relay",
            ctx.label(id)
        );
        set_relay_active(ctx.world, id, false);
        return Ok(());
    };

    // The target may have filled up since the check.
    if !relation::has_room(ctx.world, target)? {
        debug!(
            "[Queue:{}] {} filled up before the move, retrying in {}s",
            ctx.label(id),
            ctx.label(target),
            queue.retry_time
        );
        ctx.schedule(id, queue.retry_time, EventKind::QueueCheck);
        return Ok(());
    }

    debug!(
        "[Queue:{}] moving {} to {}",
        ctx.label(id),
        ctx.label(product),
        ctx.label(target)
    );
    ctx.move_entity_from(product, id, target)?;

    if relation::child_count(ctx.world, id)? > 0 {
        ctx.schedule(id, queue.retry_time, EventKind::QueueCheck);
    } else {
        set_relay_active(ctx.world, id, false);
    }
    Ok(())
}
