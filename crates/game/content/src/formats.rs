//! Authoring formats for ability content.
//!
//! Stats, damage types and event kinds are written by name (`"max_hp"`,
//! `"cold"`, `"turn_started"`) and resolved by the compiler, so a typo skips
//! one ability instead of failing the whole file.
//!
//! ```ron
//! [
//!     (
//!         name: "ShiverStrike",
//!         trigger: (on: "on_cast"),
//!         target: Primary,
//!         effects: [
//!             DealDamage(weapon_scalar: 1.1, flat: {"cold": 25.0}),
//!             ApplyStatus(chilled: true),
//!             ApplyRr(damage_type: "cold", stage: Type1PctAdd, value: 25.0),
//!         ],
//!         cooldown: 4.0,
//!     ),
//! ]
//! ```

use std::collections::BTreeMap;

use mechanics_core::effect::params::ResourceOp;
use mechanics_core::{RrStage, ShopDiscount};
use serde::{Deserialize, Serialize};

fn one() -> f32 {
    1.0
}

fn one_u32() -> u32 {
    1
}

fn one_delta() -> i32 {
    1
}

fn yes() -> bool {
    true
}

fn default_radius() -> u32 {
    5
}

/// One ability as written by content authors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilitySpec {
    pub name: String,
    #[serde(default)]
    pub trigger: TriggerSpec,
    #[serde(default)]
    pub target: TargetSpec,
    #[serde(default)]
    pub effects: Vec<EffectSpec>,
    #[serde(default)]
    pub cooldown: f32,
    #[serde(default)]
    pub internal_cooldown: f32,
}

/// When an ability fires.
///
/// `on` is one of `passive`, `on_event`, `on_death`, `on_cast`,
/// `on_damage_taken`, `on_battle_start`, `ally_ahead_attacks`,
/// `ally_ahead_faints`. `on_event` also needs `event`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerSpec {
    pub on: String,
    #[serde(default)]
    pub event: Option<String>,
}

impl Default for TriggerSpec {
    fn default() -> Self {
        Self {
            on: "passive".to_string(),
            event: None,
        }
    }
}

/// Who an ability's effects apply to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TargetSpec {
    /// The event source.
    Source,
    #[default]
    Primary,
    AllEnemies,
    AllAllies {
        #[serde(default)]
        include_self: bool,
    },
    RandomAllies {
        #[serde(default = "one_u32")]
        n: u32,
        #[serde(default)]
        include_self: bool,
    },
    FirstAllies {
        #[serde(default = "one_u32")]
        n: u32,
        #[serde(default)]
        include_self: bool,
    },
    AllyAhead,
    AlliesBehind {
        #[serde(default = "one_u32")]
        n: u32,
    },
    NthAlly {
        n: u32,
    },
    AdjacentAllies,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatDeltaSpec {
    pub stat: String,
    #[serde(default)]
    pub add: f32,
    #[serde(default)]
    pub mul: f32,
}

/// One effect node; control variants nest bodies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EffectSpec {
    NoOp,
    Seq(Vec<EffectSpec>),
    Repeat {
        count: u32,
        body: Vec<EffectSpec>,
    },
    /// `key` defaults to the ability name.
    LimitPerTurn {
        #[serde(default = "one_u32")]
        max_times: u32,
        #[serde(default)]
        key: Option<String>,
        body: Vec<EffectSpec>,
    },
    ModifyStats(Vec<StatDeltaSpec>),
    DealDamage {
        #[serde(default = "one")]
        weapon_scalar: f32,
        #[serde(default)]
        flat: BTreeMap<String, f32>,
        /// Weapon attack rather than a skill.
        #[serde(default)]
        weapon: bool,
    },
    ApplyStatus {
        #[serde(default)]
        chilled: bool,
        #[serde(default)]
        frozen: bool,
        #[serde(default)]
        stunned: bool,
        /// Seconds; zero keeps the status until removed.
        #[serde(default)]
        duration: f32,
    },
    ApplyRr {
        damage_type: String,
        stage: RrStage,
        value: f32,
    },
    StatSwapWithin {
        a: String,
        b: String,
    },
    StatSwapBetween {
        a: String,
        b: String,
    },
    StatCopyFrom {
        stat: String,
    },
    TakeLessDamage {
        pct: f32,
    },
    GiveItem(String),
    RemoveItem,
    StealItem,
    CopyItemTo {
        #[serde(default)]
        fallback: Option<String>,
    },
    ClassifyAdd(String),
    TransformUnit(String),
    PushUnit {
        #[serde(default = "one_delta")]
        delta: i32,
        #[serde(default = "yes")]
        clamp: bool,
    },
    ShuffleAllies {
        #[serde(default = "default_radius")]
        radius: u32,
    },
    SummonUnit {
        species: String,
        #[serde(default = "one_u32")]
        count: u32,
        #[serde(default = "one_delta")]
        offset: i32,
    },
    CopyAbilityFrom {
        ability: String,
        #[serde(default = "yes")]
        until_end_of_battle: bool,
    },
    SetLevel(i32),
    GiveExperience(i64),
    ModifyGold {
        op: ResourceOp,
        value: i64,
    },
    ShopAddItem {
        item: String,
        #[serde(default = "one_u32")]
        count: u32,
    },
    ShopDiscountUnits(ShopDiscount),
    ShopDiscountItems(ShopDiscount),
    ShopRoll {
        #[serde(default = "one_u32")]
        times: u32,
    },
    ShopReplaceItems {
        #[serde(default)]
        from: Option<String>,
        to: String,
        #[serde(default)]
        all: bool,
    },
}
