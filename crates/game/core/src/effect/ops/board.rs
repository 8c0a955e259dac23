use tracing::{debug, trace};

use super::skip_target;
use crate::board;
use crate::context::Context;
use crate::effect::params::{PushUnit, ShuffleAllies, SummonUnit, TagParams};
use crate::effect::{Invocation, OpCode};
use crate::event::{Event, EventType};
use crate::rng::salt;
use crate::world::{BoardPos, ClassTags, Team};

/// `ClassifyAdd` and `TransformUnit`: adds the tag once.
pub(crate) fn add_class_tag(code: OpCode, params: &TagParams, inv: &Invocation<'_>, ctx: &mut Context<'_>) {
    for &target in inv.targets {
        match ctx.world.get_or_insert_with(target, ClassTags::default) {
            Ok(tags) => {
                if !tags.add(params.tag) {
                    trace!(target: "mechanics::effects", %target, tag = %params.tag, "tag already present");
                }
            }
            Err(e) => skip_target(code, target, &e),
        }
    }
}

pub(crate) fn push_unit(params: &PushUnit, inv: &Invocation<'_>, ctx: &mut Context<'_>) {
    for &target in inv.targets {
        let pos = match ctx.world.get::<BoardPos>(target) {
            Ok(pos) => *pos,
            Err(e) => {
                skip_target(OpCode::PushUnit, target, &e);
                continue;
            }
        };
        let mut index = pos.index.saturating_add(params.delta);
        if params.clamp {
            if let Some((min, max)) = ctx.services.board_bounds(pos.lane) {
                index = index.clamp(min, max.max(min));
            }
        }
        let index = index.max(0);
        if index == pos.index {
            continue;
        }
        if let Ok(slot) = ctx.world.get_mut::<BoardPos>(target) {
            slot.index = index;
        }
        ctx.publish(Event::between(EventType::UnitPushed, inv.owner, Some(target)));
    }
}

/// Shuffles the owner and its allies within `radius` into compact slots,
/// starting at the lowest occupied index of the window.
pub(crate) fn shuffle_allies(params: &ShuffleAllies, inv: &Invocation<'_>, ctx: &mut Context<'_>) {
    let owner_pos = match ctx.world.get::<BoardPos>(inv.owner) {
        Ok(pos) => *pos,
        Err(e) => return skip_target(OpCode::ShuffleAllies, inv.owner, &e),
    };
    let mut window = board::allies_within(ctx.world, inv.owner, params.radius);
    window.push((inv.owner, owner_pos));
    let Some(low) = window.iter().map(|(_, pos)| pos.index).min() else {
        return;
    };
    let mut units: Vec<_> = window.into_iter().map(|(id, _)| id).collect();
    units.sort();
    ctx.battle
        .rng
        .shuffle(inv.owner.raw(), salt::SHUFFLE_ALLIES, &mut units);

    let slots = (0..).map_while(|offset: i32| low.checked_add(offset));
    for (slot, unit) in slots.zip(&units) {
        if let Ok(pos) = ctx.world.get_mut::<BoardPos>(*unit) {
            pos.index = slot;
        }
    }
    debug!(target: "mechanics::effects", owner = %inv.owner, units = units.len(), "allies shuffled");
}

/// Asks the services for `count` units behind the owner's slot.
pub(crate) fn summon_unit(params: &SummonUnit, inv: &Invocation<'_>, ctx: &mut Context<'_>) {
    let (team, pos) = match (ctx.world.get::<Team>(inv.owner), ctx.world.get::<BoardPos>(inv.owner)) {
        (Ok(team), Ok(pos)) => (*team, *pos),
        (Err(e), _) | (_, Err(e)) => return skip_target(OpCode::SummonUnit, inv.owner, &e),
    };
    let count = i32::try_from(params.count).unwrap_or(i32::MAX);
    for i in 0..count {
        let Some(index) = pos
            .index
            .checked_add(params.position_offset)
            .and_then(|index| index.checked_add(i))
        else {
            debug!(target: "mechanics::effects", owner = %inv.owner, "summon slot out of range");
            break;
        };
        let at = BoardPos::new(pos.lane, index);
        match ctx.services.spawn_unit(ctx.world, params.species, team, at) {
            Some(child) => {
                ctx.publish(Event::between(EventType::UnitSummoned, inv.owner, Some(child)));
            }
            None => {
                debug!(
                    target: "mechanics::effects",
                    species = %params.species,
                    lane = at.lane,
                    index = at.index,
                    "summon refused"
                );
            }
        }
    }
}
