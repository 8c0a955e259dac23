//! Strongly typed parameters of each opcode.

use arrayvec::ArrayVec;

use super::GraphError;
use crate::config::EngineConfig;
use crate::ids::Sid;
use crate::services::ShopDiscount;
use crate::stats::{DamageBundle, DamageType, RrStage, StatId};
use crate::world::StatusFlags;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatDelta {
    pub stat: StatId,
    pub add: f32,
    pub mul: f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModifyStats {
    pub deltas: ArrayVec<StatDelta, { EngineConfig::MAX_STAT_DELTAS }>,
}

impl ModifyStats {
    pub fn from_deltas(deltas: impl IntoIterator<Item = StatDelta>) -> Result<Self, GraphError> {
        let mut params = Self::default();
        for delta in deltas {
            params
                .deltas
                .try_push(delta)
                .map_err(|_| GraphError::TooManyDeltas(EngineConfig::MAX_STAT_DELTAS))?;
        }
        Ok(params)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DealDamage {
    pub bundle: DamageBundle,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ApplyStatus {
    pub flags: StatusFlags,
    /// Zero keeps the flags until something removes them.
    pub duration_sec: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ApplyRr {
    pub kind: DamageType,
    pub stage: RrStage,
    pub value: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatSwapWithin {
    pub a: StatId,
    pub b: StatId,
}

/// Swaps base `a` of the first target with base `b` of the second.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatSwapBetween {
    pub a: StatId,
    pub b: StatId,
}

/// Copies the first target's final `stat` into the base of the others.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatCopyFrom {
    pub stat: StatId,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TakeLessDamage {
    pub pct: f32,
}

/// Item carried by GiveItem / CopyItemTo (fallback when the owner holds nothing).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemParams {
    pub item: Sid,
}

/// Class tag or species added by ClassifyAdd / TransformUnit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TagParams {
    pub tag: Sid,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Repeat {
    pub count: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LimitPerTurn {
    pub max_times: u32,
    pub key: Sid,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PushUnit {
    pub delta: i32,
    /// Clamp to the lane bounds reported by the engine services.
    pub clamp: bool,
}

impl Default for PushUnit {
    fn default() -> Self {
        Self {
            delta: 1,
            clamp: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShuffleAllies {
    pub radius: u32,
}

impl Default for ShuffleAllies {
    fn default() -> Self {
        Self { radius: 5 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SummonUnit {
    pub species: Sid,
    pub count: u32,
    pub position_offset: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CopyAbilityFrom {
    pub ability: Sid,
    pub until_end_of_battle: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ResourceOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModifyPlayerResource {
    pub op: ResourceOp,
    pub value: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SetLevel {
    pub level: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GiveExperience {
    pub xp: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShopAddItem {
    pub item: Sid,
    pub count: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShopRoll {
    pub times: u32,
}

/// Replaces `from` with `to` in the shop; `all` (or `from == NONE`) replaces every item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShopReplaceItems {
    pub from: Sid,
    pub to: Sid,
    pub all: bool,
}

/// Parameter pools, one vector per parameter kind.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParamPools {
    pub modify_stats: Vec<ModifyStats>,
    pub deal_damage: Vec<DealDamage>,
    pub apply_status: Vec<ApplyStatus>,
    pub apply_rr: Vec<ApplyRr>,
    pub swap_within: Vec<StatSwapWithin>,
    pub swap_between: Vec<StatSwapBetween>,
    pub stat_copy: Vec<StatCopyFrom>,
    pub take_less_damage: Vec<TakeLessDamage>,
    pub items: Vec<ItemParams>,
    pub tags: Vec<TagParams>,
    pub repeat: Vec<Repeat>,
    pub limit_per_turn: Vec<LimitPerTurn>,
    pub push: Vec<PushUnit>,
    pub shuffle: Vec<ShuffleAllies>,
    pub summon: Vec<SummonUnit>,
    pub copy_ability: Vec<CopyAbilityFrom>,
    pub set_level: Vec<SetLevel>,
    pub give_xp: Vec<GiveExperience>,
    pub player_resource: Vec<ModifyPlayerResource>,
    pub shop_add: Vec<ShopAddItem>,
    pub shop_discount: Vec<ShopDiscount>,
    pub shop_roll: Vec<ShopRoll>,
    pub shop_replace: Vec<ShopReplaceItems>,
}
