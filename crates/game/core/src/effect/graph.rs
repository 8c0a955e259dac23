//! Flattened effect graphs and their builder.
//!
//! An ability's effects are authored as a tree ([`EffectNode`]) and compiled
//! into a flat op list plus parameter pools. The layout is breadth-first: the
//! root ops come first, and the children of every control op sit in one
//! contiguous block after their parent. Execution still walks it as a tree.

use std::collections::VecDeque;

use tracing::trace;

use super::opcode::{EffectOp, OpCode};
use super::params::*;
use super::EffectError;
use crate::config::EngineConfig;
use crate::error::{ErrorSeverity, MechanicsError};
use crate::ids::Sid;
use crate::services::ShopDiscount;

/// Errors raised while building or validating a graph.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("graph has {0} ops, more than a u16 child range can address")]
    TooManyOps(usize),

    #[error("ModifyStats holds at most {0} deltas")]
    TooManyDeltas(usize),

    #[error("repeat count {count} exceeds the limit of {max}")]
    RepeatTooLarge { count: u32, max: u32 },

    #[error("nested repeats run a body {total} times, more than the limit of {max}")]
    NestedRepeatTooLarge { total: u64, max: u32 },

    #[error("invalid {code} parameter: {reason}")]
    InvalidParameter { code: OpCode, reason: &'static str },

    #[error("op {index} ({code}) has children but is not a control op")]
    ChildrenOnAtomic { index: usize, code: OpCode },

    #[error("op {index} points at children that do not come after it")]
    BackwardChildren { index: usize },

    #[error(transparent)]
    Structure(#[from] EffectError),
}

impl MechanicsError for GraphError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::TooManyOps(_) => "GRAPH_TOO_MANY_OPS",
            Self::TooManyDeltas(_) => "GRAPH_TOO_MANY_DELTAS",
            Self::RepeatTooLarge { .. } => "GRAPH_REPEAT_TOO_LARGE",
            Self::NestedRepeatTooLarge { .. } => "GRAPH_NESTED_REPEAT_TOO_LARGE",
            Self::InvalidParameter { .. } => "GRAPH_INVALID_PARAMETER",
            Self::ChildrenOnAtomic { .. } => "GRAPH_CHILDREN_ON_ATOMIC",
            Self::BackwardChildren { .. } => "GRAPH_BACKWARD_CHILDREN",
            Self::Structure(e) => e.error_code(),
        }
    }
}

/// Authoring form of an effect: one variant per opcode.
#[derive(Clone, Debug, PartialEq)]
pub enum EffectNode {
    NoOp,
    Seq(Vec<EffectNode>),
    Repeat { count: u32, body: Vec<EffectNode> },
    LimitPerTurn { max_times: u32, key: Sid, body: Vec<EffectNode> },
    ModifyStats(ModifyStats),
    DealDamage(DealDamage),
    ApplyStatus(ApplyStatus),
    ApplyRr(ApplyRr),
    StatSwapWithin(StatSwapWithin),
    StatSwapBetween(StatSwapBetween),
    StatCopyFrom(StatCopyFrom),
    TakeLessDamageOneShot { pct: f32 },
    GiveItem(Sid),
    RemoveItem,
    StealItem,
    CopyItemTo { fallback: Sid },
    ClassifyAdd(Sid),
    TransformUnit { to_species: Sid },
    PushUnit(PushUnit),
    ShuffleAllies(ShuffleAllies),
    SummonUnit(SummonUnit),
    CopyAbilityFrom(CopyAbilityFrom),
    SetLevel(i32),
    GiveExperience(i64),
    ModifyPlayerResource(ModifyPlayerResource),
    ShopAddItem(ShopAddItem),
    ShopDiscountUnit(ShopDiscount),
    ShopDiscountItem(ShopDiscount),
    ShopRoll { times: u32 },
    ShopReplaceItems(ShopReplaceItems),
}

/// Flat op list, root range and parameter pools of one ability.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CompiledEffectGraph {
    ops: Vec<EffectOp>,
    root_count: u16,
    pools: ParamPools,
}

fn nested_runs(outer: u64, count: u32, max: u32) -> Result<u64, GraphError> {
    let total = outer.saturating_mul(u64::from(count));
    if total > u64::from(max) {
        return Err(GraphError::NestedRepeatTooLarge { total, max });
    }
    Ok(total)
}

fn push<T>(pool: &mut Vec<T>, value: T) -> u32 {
    pool.push(value);
    (pool.len() - 1) as u32
}

impl CompiledEffectGraph {
    /// Graph that does nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Compiles an effect tree with the default limits.
    pub fn compile(roots: &[EffectNode]) -> Result<Self, GraphError> {
        Self::compile_with(roots, &EngineConfig::default())
    }

    /// Compiles an effect tree against `config`'s limits.
    ///
    /// Besides each `Repeat` count, the product of nested `Repeat` counts is
    /// bounded by `max_repeat`.
    pub fn compile_with(roots: &[EffectNode], config: &EngineConfig) -> Result<Self, GraphError> {
        let mut graph = Self::default();
        // (slot, node, times the enclosing repeats run it)
        let mut queue: VecDeque<(usize, &EffectNode, u64)> = VecDeque::new();

        for node in roots {
            queue.push_back((graph.reserve()?, node, 1));
        }
        graph.root_count = roots.len() as u16;

        while let Some((slot, node, runs)) = queue.pop_front() {
            let (code, param, children) = graph.lower(node, config)?;
            let child_runs = match node {
                EffectNode::Repeat { count, .. } => nested_runs(runs, *count, config.max_repeat)?,
                _ => runs,
            };
            let first_child = graph.ops.len();
            for child in children {
                queue.push_back((graph.reserve()?, child, child_runs));
            }
            graph.ops[slot] = if children.is_empty() {
                EffectOp::atomic(code, param)
            } else {
                EffectOp::control(code, first_child as u16, children.len() as u16, param)
            };
        }

        trace!(
            target: "mechanics::effects",
            ops = graph.ops.len(),
            roots = graph.root_count,
            "effect graph compiled"
        );
        Ok(graph)
    }

    /// Builds a graph from raw parts, rejecting anything the interpreter could trip on.
    pub fn from_parts(ops: Vec<EffectOp>, root_count: u16, pools: ParamPools) -> Result<Self, GraphError> {
        let graph = Self {
            ops,
            root_count,
            pools,
        };
        graph.validate()?;
        Ok(graph)
    }

    fn reserve(&mut self) -> Result<usize, GraphError> {
        if self.ops.len() >= u16::MAX as usize {
            return Err(GraphError::TooManyOps(self.ops.len() + 1));
        }
        self.ops.push(EffectOp::atomic(OpCode::NoOp, 0));
        Ok(self.ops.len() - 1)
    }

    /// Moves a node's parameters into the pools.
    fn lower<'n>(
        &mut self,
        node: &'n EffectNode,
        config: &EngineConfig,
    ) -> Result<(OpCode, u32, &'n [EffectNode]), GraphError> {
        let pools = &mut self.pools;
        let lowered = match node {
            EffectNode::NoOp => (OpCode::NoOp, 0, &[][..]),
            EffectNode::Seq(body) => (OpCode::Seq, 0, body.as_slice()),
            EffectNode::Repeat { count, body } => {
                if *count > config.max_repeat {
                    return Err(GraphError::RepeatTooLarge {
                        count: *count,
                        max: config.max_repeat,
                    });
                }
                let param = push(&mut pools.repeat, Repeat { count: *count });
                (OpCode::Repeat, param, body.as_slice())
            }
            EffectNode::LimitPerTurn {
                max_times,
                key,
                body,
            } => {
                let param = push(
                    &mut pools.limit_per_turn,
                    LimitPerTurn {
                        max_times: *max_times,
                        key: *key,
                    },
                );
                (OpCode::LimitPerTurn, param, body.as_slice())
            }
            EffectNode::ModifyStats(p) => (OpCode::ModifyStats, push(&mut pools.modify_stats, p.clone()), &[][..]),
            EffectNode::DealDamage(p) => {
                if !p.bundle.weapon_scalar.is_finite() || p.bundle.flat.iter().any(|v| !v.is_finite()) {
                    return Err(GraphError::InvalidParameter {
                        code: OpCode::DealDamage,
                        reason: "damage values must be finite",
                    });
                }
                (OpCode::DealDamage, push(&mut pools.deal_damage, p.clone()), &[][..])
            }
            EffectNode::ApplyStatus(p) => (OpCode::ApplyStatus, push(&mut pools.apply_status, *p), &[][..]),
            EffectNode::ApplyRr(p) => (OpCode::ApplyRr, push(&mut pools.apply_rr, *p), &[][..]),
            EffectNode::StatSwapWithin(p) => (OpCode::StatSwapWithin, push(&mut pools.swap_within, *p), &[][..]),
            EffectNode::StatSwapBetween(p) => (OpCode::StatSwapBetween, push(&mut pools.swap_between, *p), &[][..]),
            EffectNode::StatCopyFrom(p) => (OpCode::StatCopyFrom, push(&mut pools.stat_copy, *p), &[][..]),
            EffectNode::TakeLessDamageOneShot { pct } => {
                if !(0.0..=1.0).contains(pct) {
                    return Err(GraphError::InvalidParameter {
                        code: OpCode::TakeLessDamageOneShot,
                        reason: "pct must be within [0, 1]",
                    });
                }
                let param = push(&mut pools.take_less_damage, TakeLessDamage { pct: *pct });
                (OpCode::TakeLessDamageOneShot, param, &[][..])
            }
            EffectNode::GiveItem(item) => (OpCode::GiveItem, push(&mut pools.items, ItemParams { item: *item }), &[][..]),
            EffectNode::RemoveItem => (OpCode::RemoveItem, 0, &[][..]),
            EffectNode::StealItem => (OpCode::StealItem, 0, &[][..]),
            EffectNode::CopyItemTo { fallback } => {
                (OpCode::CopyItemTo, push(&mut pools.items, ItemParams { item: *fallback }), &[][..])
            }
            EffectNode::ClassifyAdd(tag) => (OpCode::ClassifyAdd, push(&mut pools.tags, TagParams { tag: *tag }), &[][..]),
            EffectNode::TransformUnit { to_species } => {
                (OpCode::TransformUnit, push(&mut pools.tags, TagParams { tag: *to_species }), &[][..])
            }
            EffectNode::PushUnit(p) => (OpCode::PushUnit, push(&mut pools.push, *p), &[][..]),
            EffectNode::ShuffleAllies(p) => (OpCode::ShuffleAllies, push(&mut pools.shuffle, *p), &[][..]),
            EffectNode::SummonUnit(p) => {
                if p.count > config.max_repeat {
                    return Err(GraphError::InvalidParameter {
                        code: OpCode::SummonUnit,
                        reason: "summon count exceeds max_repeat",
                    });
                }
                (OpCode::SummonUnit, push(&mut pools.summon, *p), &[][..])
            }
            EffectNode::CopyAbilityFrom(p) => (OpCode::CopyAbilityFrom, push(&mut pools.copy_ability, *p), &[][..]),
            EffectNode::SetLevel(level) => (OpCode::SetLevel, push(&mut pools.set_level, SetLevel { level: *level }), &[][..]),
            EffectNode::GiveExperience(xp) => {
                (OpCode::GiveExperience, push(&mut pools.give_xp, GiveExperience { xp: *xp }), &[][..])
            }
            EffectNode::ModifyPlayerResource(p) => {
                (OpCode::ModifyPlayerResource, push(&mut pools.player_resource, *p), &[][..])
            }
            EffectNode::ShopAddItem(p) => (OpCode::ShopAddItem, push(&mut pools.shop_add, *p), &[][..]),
            EffectNode::ShopDiscountUnit(p) => (OpCode::ShopDiscountUnit, push(&mut pools.shop_discount, *p), &[][..]),
            EffectNode::ShopDiscountItem(p) => (OpCode::ShopDiscountItem, push(&mut pools.shop_discount, *p), &[][..]),
            EffectNode::ShopRoll { times } => (OpCode::ShopRoll, push(&mut pools.shop_roll, ShopRoll { times: *times }), &[][..]),
            EffectNode::ShopReplaceItems(p) => (OpCode::ShopReplaceItems, push(&mut pools.shop_replace, *p), &[][..]),
        };
        Ok(lowered)
    }

    /// Number of entries in the pool `code` reads from, `None` for parameterless ops.
    fn pool_len(&self, code: OpCode) -> Option<usize> {
        let p = &self.pools;
        let len = match code {
            OpCode::NoOp | OpCode::Seq | OpCode::RemoveItem | OpCode::StealItem => return None,
            OpCode::Repeat => p.repeat.len(),
            OpCode::LimitPerTurn => p.limit_per_turn.len(),
            OpCode::ModifyStats => p.modify_stats.len(),
            OpCode::DealDamage => p.deal_damage.len(),
            OpCode::ApplyStatus => p.apply_status.len(),
            OpCode::ApplyRr => p.apply_rr.len(),
            OpCode::StatSwapWithin => p.swap_within.len(),
            OpCode::StatSwapBetween => p.swap_between.len(),
            OpCode::StatCopyFrom => p.stat_copy.len(),
            OpCode::TakeLessDamageOneShot => p.take_less_damage.len(),
            OpCode::GiveItem | OpCode::CopyItemTo => p.items.len(),
            OpCode::ClassifyAdd | OpCode::TransformUnit => p.tags.len(),
            OpCode::PushUnit => p.push.len(),
            OpCode::ShuffleAllies => p.shuffle.len(),
            OpCode::SummonUnit => p.summon.len(),
            OpCode::CopyAbilityFrom => p.copy_ability.len(),
            OpCode::SetLevel => p.set_level.len(),
            OpCode::GiveExperience => p.give_xp.len(),
            OpCode::ModifyPlayerResource => p.player_resource.len(),
            OpCode::ShopAddItem => p.shop_add.len(),
            OpCode::ShopDiscountUnit | OpCode::ShopDiscountItem => p.shop_discount.len(),
            OpCode::ShopRoll => p.shop_roll.len(),
            OpCode::ShopReplaceItems => p.shop_replace.len(),
        };
        Some(len)
    }

    /// Checks every child range and parameter index, and bounds nested
    /// repeats by the default `max_repeat`.
    ///
    /// Children must come strictly after their parent, which rules out cycles.
    pub fn validate(&self) -> Result<(), GraphError> {
        let len = self.ops.len();
        if len > u16::MAX as usize {
            return Err(GraphError::TooManyOps(len));
        }
        if self.root_count as usize > len {
            return Err(EffectError::ChildRange {
                start: 0,
                count: self.root_count,
                len,
            }
            .into());
        }
        for (index, op) in self.ops.iter().enumerate() {
            if op.child_count > 0 {
                if !op.code.is_control() {
                    return Err(GraphError::ChildrenOnAtomic {
                        index,
                        code: op.code,
                    });
                }
                if (op.first_child as usize) <= index {
                    return Err(GraphError::BackwardChildren { index });
                }
                if op.first_child as usize + op.child_count as usize > len {
                    return Err(EffectError::ChildRange {
                        start: op.first_child,
                        count: op.child_count,
                        len,
                    }
                    .into());
                }
            }
            if let Some(pool_len) = self.pool_len(op.code) {
                if op.param as usize >= pool_len {
                    return Err(EffectError::MissingParam {
                        code: op.code,
                        index: op.param,
                    }
                    .into());
                }
            }
        }
        self.check_nested_repeats(EngineConfig::DEFAULT_MAX_REPEAT)
    }

    /// Parents precede their children, so one forward pass sees every
    /// op's enclosing repeat product before its children.
    fn check_nested_repeats(&self, max: u32) -> Result<(), GraphError> {
        let mut runs = vec![1u64; self.ops.len()];
        for (index, op) in self.ops.iter().enumerate() {
            if op.child_count == 0 {
                continue;
            }
            let child_runs = match op.code {
                OpCode::Repeat => {
                    let count = self.pools.repeat[op.param as usize].count;
                    nested_runs(runs[index], count, max)?
                }
                _ => runs[index],
            };
            let first = op.first_child as usize;
            for child in &mut runs[first..first + op.child_count as usize] {
                *child = child_runs;
            }
        }
        Ok(())
    }

    pub fn ops(&self) -> &[EffectOp] {
        &self.ops
    }

    pub fn root_count(&self) -> u16 {
        self.root_count
    }

    pub fn pools(&self) -> &ParamPools {
        &self.pools
    }

    pub fn is_empty(&self) -> bool {
        self.root_count == 0
    }
}
