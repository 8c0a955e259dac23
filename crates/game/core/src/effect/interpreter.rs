//! Range executor over a [`CompiledEffectGraph`].

use tracing::trace;

use super::graph::CompiledEffectGraph;
use super::opcode::{EffectOp, OpCode};
use super::ops;
use super::EffectError;
use crate::ability::AbilityDatabase;
use crate::context::Context;
use crate::event::Event;
use crate::ids::EntityId;

/// Nesting limit for control ops.
pub const MAX_DEPTH: u32 = 64;

/// Who runs a graph, on whom, and in response to what.
#[derive(Clone, Copy)]
pub struct Invocation<'e> {
    pub event: &'e Event,
    pub owner: EntityId,
    pub targets: &'e [EntityId],
    /// Needed by `CopyAbilityFrom`; without it that op does nothing.
    pub abilities: Option<&'e AbilityDatabase>,
}

impl<'e> Invocation<'e> {
    pub fn new(event: &'e Event, owner: EntityId, targets: &'e [EntityId]) -> Self {
        Self {
            event,
            owner,
            targets,
            abilities: None,
        }
    }

    pub fn with_abilities(mut self, abilities: &'e AbilityDatabase) -> Self {
        self.abilities = Some(abilities);
        self
    }
}

/// Runs the root range of `graph` in order.
pub fn execute(
    graph: &CompiledEffectGraph,
    invocation: &Invocation<'_>,
    ctx: &mut Context<'_>,
) -> Result<(), EffectError> {
    execute_range(graph, 0, graph.root_count(), invocation, ctx, 0)
}

fn execute_range(
    graph: &CompiledEffectGraph,
    start: u16,
    count: u16,
    invocation: &Invocation<'_>,
    ctx: &mut Context<'_>,
    depth: u32,
) -> Result<(), EffectError> {
    if depth > MAX_DEPTH {
        return Err(EffectError::TooDeep(MAX_DEPTH));
    }
    let ops = graph.ops();
    let end = start as usize + count as usize;
    if end > ops.len() {
        return Err(EffectError::ChildRange {
            start,
            count,
            len: ops.len(),
        });
    }
    for op in &ops[start as usize..end] {
        execute_op(graph, op, invocation, ctx, depth)?;
    }
    Ok(())
}

fn param<'g, T>(pool: &'g [T], op: &EffectOp) -> Result<&'g T, EffectError> {
    pool.get(op.param as usize).ok_or(EffectError::MissingParam {
        code: op.code,
        index: op.param,
    })
}

fn execute_op(
    graph: &CompiledEffectGraph,
    op: &EffectOp,
    inv: &Invocation<'_>,
    ctx: &mut Context<'_>,
    depth: u32,
) -> Result<(), EffectError> {
    let pools = graph.pools();
    match op.code {
        OpCode::NoOp => {}
        OpCode::Seq => execute_range(graph, op.first_child, op.child_count, inv, ctx, depth + 1)?,
        OpCode::Repeat => {
            let repeat = param(&pools.repeat, op)?;
            for _ in 0..repeat.count {
                execute_range(graph, op.first_child, op.child_count, inv, ctx, depth + 1)?;
            }
        }
        OpCode::LimitPerTurn => {
            let limit = param(&pools.limit_per_turn, op)?;
            if ctx.battle.turn.try_consume(inv.owner, limit.key, limit.max_times) {
                execute_range(graph, op.first_child, op.child_count, inv, ctx, depth + 1)?;
            } else {
                trace!(
                    target: "mechanics::effects",
                    owner = %inv.owner,
                    key = %limit.key,
                    "per-turn limit reached"
                );
            }
        }
        OpCode::ModifyStats => ops::stats::modify_stats(param(&pools.modify_stats, op)?, inv, ctx),
        OpCode::StatSwapWithin => ops::stats::swap_within(param(&pools.swap_within, op)?, inv, ctx),
        OpCode::StatSwapBetween => ops::stats::swap_between(param(&pools.swap_between, op)?, inv, ctx),
        OpCode::StatCopyFrom => ops::stats::copy_from(param(&pools.stat_copy, op)?, inv, ctx),
        OpCode::DealDamage => ops::combat::deal_damage(param(&pools.deal_damage, op)?, inv, ctx),
        OpCode::ApplyStatus => ops::combat::apply_status(param(&pools.apply_status, op)?, inv, ctx),
        OpCode::ApplyRr => ops::combat::apply_rr(param(&pools.apply_rr, op)?, inv, ctx),
        OpCode::TakeLessDamageOneShot => {
            ops::combat::take_less_damage(param(&pools.take_less_damage, op)?, inv, ctx)
        }
        OpCode::GiveItem => ops::items::give(param(&pools.items, op)?, inv, ctx),
        OpCode::RemoveItem => ops::items::remove(inv, ctx),
        OpCode::StealItem => ops::items::steal(inv, ctx),
        OpCode::CopyItemTo => ops::items::copy_to(param(&pools.items, op)?, inv, ctx),
        OpCode::ClassifyAdd | OpCode::TransformUnit => {
            ops::board::add_class_tag(op.code, param(&pools.tags, op)?, inv, ctx)
        }
        OpCode::PushUnit => ops::board::push_unit(param(&pools.push, op)?, inv, ctx),
        OpCode::ShuffleAllies => ops::board::shuffle_allies(param(&pools.shuffle, op)?, inv, ctx),
        OpCode::SummonUnit => ops::board::summon_unit(param(&pools.summon, op)?, inv, ctx),
        OpCode::CopyAbilityFrom => {
            ops::progression::copy_ability(param(&pools.copy_ability, op)?, inv, ctx)
        }
        OpCode::SetLevel => ops::progression::set_level(param(&pools.set_level, op)?, inv, ctx),
        OpCode::GiveExperience => ops::progression::give_experience(param(&pools.give_xp, op)?, inv, ctx),
        OpCode::ModifyPlayerResource => {
            ops::meta::modify_player_resource(param(&pools.player_resource, op)?, ctx)
        }
        OpCode::ShopAddItem => ops::meta::shop_add_item(param(&pools.shop_add, op)?, ctx),
        OpCode::ShopDiscountUnit | OpCode::ShopDiscountItem => {
            ops::meta::shop_discount(op.code, param(&pools.shop_discount, op)?, ctx)
        }
        OpCode::ShopRoll => ops::meta::shop_roll(param(&pools.shop_roll, op)?, ctx),
        OpCode::ShopReplaceItems => ops::meta::shop_replace(param(&pools.shop_replace, op)?, ctx),
    }
    Ok(())
}
