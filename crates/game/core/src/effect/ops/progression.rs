use tracing::{debug, warn};

use super::skip_target;
use crate::context::Context;
use crate::effect::params::{CopyAbilityFrom, GiveExperience, SetLevel};
use crate::effect::{Invocation, OpCode};
use crate::event::{Event, EventType};
use crate::world::{Experience, KnownAbilities, Level};

/// Teaches the owner an ability one of the targets knows.
///
/// Nothing happens unless the database has the ability, at least one target
/// knows it and the owner does not yet.
pub(crate) fn copy_ability(params: &CopyAbilityFrom, inv: &Invocation<'_>, ctx: &mut Context<'_>) {
    let Some(database) = inv.abilities else {
        warn!(target: "mechanics::effects", ability = %params.ability, "no ability database to copy from");
        return;
    };
    if !database.contains(params.ability) {
        warn!(target: "mechanics::effects", ability = %params.ability, "unknown ability");
        return;
    }
    let source_knows = inv.targets.iter().any(|&target| {
        ctx.world
            .try_get::<KnownAbilities>(target)
            .is_some_and(|known| known.contains(params.ability))
    });
    if !source_knows {
        return;
    }
    let known = match ctx.world.get_or_insert_with(inv.owner, KnownAbilities::default) {
        Ok(known) => known,
        Err(e) => return skip_target(OpCode::CopyAbilityFrom, inv.owner, &e),
    };
    if known.contains(params.ability) {
        return;
    }
    if params.until_end_of_battle {
        known.push_temporary(params.ability);
    } else {
        known.push(params.ability);
    }
    debug!(target: "mechanics::effects", owner = %inv.owner, ability = %params.ability, "ability copied");
}

pub(crate) fn set_level(params: &SetLevel, inv: &Invocation<'_>, ctx: &mut Context<'_>) {
    for &target in inv.targets {
        if let Err(e) = ctx.world.insert(target, Level(params.level)) {
            skip_target(OpCode::SetLevel, target, &e);
            continue;
        }
        ctx.publish(Event::new(EventType::AllyLevelUp).with_source(target));
    }
}

pub(crate) fn give_experience(params: &GiveExperience, inv: &Invocation<'_>, ctx: &mut Context<'_>) {
    for &target in inv.targets {
        match ctx.world.get_or_insert_with(target, Experience::default) {
            Ok(xp) => xp.0 = xp.0.saturating_add(params.xp),
            Err(e) => skip_target(OpCode::GiveExperience, target, &e),
        }
    }
}
