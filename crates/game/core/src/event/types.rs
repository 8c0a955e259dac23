use strum::EnumCount;

use crate::ids::EntityId;
use crate::stats::DamageBundle;

/// Kind of gameplay event.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumCount,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[repr(u8)]
pub enum EventType {
    BattleStarted,
    TurnStarted,
    TurnEnded,
    AttackStarted,
    AttackResolved,
    SpellCastStarted,
    SpellCastResolved,
    DamageWillBeDealt,
    DamageDealt,
    DamageTaken,
    Healed,
    UnitDied,
    StatusApplied,
    StatusExpired,
    OnProvoke,
    OnDefend,
    BuyUnit,
    SellUnit,
    RollShop,
    UpgradeShopTier,
    ItemBought,
    AllyLevelUp,
    UnitPushed,
    UnitSummoned,
}

impl EventType {
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Number of event kinds, for per-kind tables.
pub const EVENT_KINDS: usize = EventType::COUNT;

/// A gameplay event. Read-only while it is being dispatched.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    pub kind: EventType,
    pub source: Option<EntityId>,
    pub primary_target: Option<EntityId>,
    pub damage: Option<DamageBundle>,
}

impl Event {
    pub fn new(kind: EventType) -> Self {
        Self {
            kind,
            source: None,
            primary_target: None,
            damage: None,
        }
    }

    /// Event with a source and an optional primary target.
    pub fn between(kind: EventType, source: EntityId, target: Option<EntityId>) -> Self {
        Self {
            source: Some(source),
            primary_target: target,
            ..Self::new(kind)
        }
    }

    pub fn with_source(mut self, source: EntityId) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_target(mut self, target: EntityId) -> Self {
        self.primary_target = Some(target);
        self
    }

    pub fn with_damage(mut self, damage: DamageBundle) -> Self {
        self.damage = Some(damage);
        self
    }
}
