use tracing::trace;

use super::skip_target;
use crate::context::Context;
use crate::effect::params::{ModifyStats, StatCopyFrom, StatSwapBetween, StatSwapWithin};
use crate::effect::{Invocation, OpCode};
use crate::stats::StatBlock;

pub(crate) fn modify_stats(params: &ModifyStats, inv: &Invocation<'_>, ctx: &mut Context<'_>) {
    for &target in inv.targets {
        let stats = match ctx.world.get_mut::<StatBlock>(target) {
            Ok(stats) => stats,
            Err(e) => {
                skip_target(OpCode::ModifyStats, target, &e);
                continue;
            }
        };
        for delta in &params.deltas {
            if delta.add != 0.0 {
                stats.add_flat(delta.stat, delta.add);
            }
            if delta.mul != 0.0 {
                stats.add_percent(delta.stat, delta.mul);
            }
        }
        stats.recompute_final();
    }
}

pub(crate) fn swap_within(params: &StatSwapWithin, inv: &Invocation<'_>, ctx: &mut Context<'_>) {
    for &target in inv.targets {
        match ctx.world.get_mut::<StatBlock>(target) {
            Ok(stats) => {
                stats.swap_base(params.a, params.b);
                stats.recompute_final();
            }
            Err(e) => skip_target(OpCode::StatSwapWithin, target, &e),
        }
    }
}

/// Exchanges base `a` of the first target with base `b` of the second.
pub(crate) fn swap_between(params: &StatSwapBetween, inv: &Invocation<'_>, ctx: &mut Context<'_>) {
    let &[first, second, ..] = inv.targets else {
        trace!(target: "mechanics::effects", "stat swap needs two targets");
        return;
    };
    let a = match ctx.world.get::<StatBlock>(first) {
        Ok(stats) => stats.base(params.a),
        Err(e) => return skip_target(OpCode::StatSwapBetween, first, &e),
    };
    let b = match ctx.world.get::<StatBlock>(second) {
        Ok(stats) => stats.base(params.b),
        Err(e) => return skip_target(OpCode::StatSwapBetween, second, &e),
    };
    for (unit, stat, value) in [(first, params.a, b), (second, params.b, a)] {
        if let Ok(stats) = ctx.world.get_mut::<StatBlock>(unit) {
            stats.set_base(stat, value);
            stats.recompute_final();
        }
    }
}

/// Writes the first target's final value into the base of every other target.
pub(crate) fn copy_from(params: &StatCopyFrom, inv: &Invocation<'_>, ctx: &mut Context<'_>) {
    let Some((&source, rest)) = inv.targets.split_first() else {
        return;
    };
    let value = match ctx.world.get::<StatBlock>(source) {
        Ok(stats) => stats.get(params.stat),
        Err(e) => return skip_target(OpCode::StatCopyFrom, source, &e),
    };
    for &target in rest {
        match ctx.world.get_mut::<StatBlock>(target) {
            Ok(stats) => {
                stats.set_base(params.stat, value);
                stats.recompute_final();
            }
            Err(e) => skip_target(OpCode::StatCopyFrom, target, &e),
        }
    }
}
