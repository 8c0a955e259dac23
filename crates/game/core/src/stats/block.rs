//! Layered stat storage.
//!
//! Every stat has four layers:
//! - `base`: innate value (species, level, swaps/copies write here)
//! - `add`: summed flat bonuses
//! - `mul`: summed percent bonuses (0.25 = +25%)
//! - `final`: cached `(base + add) * (1 + mul)`
//!
//! Writers mark the block stale; [`StatBlock::recompute_final`] refreshes the
//! cache. Reading a stale block returns the previous cache and logs at debug
//! level, it never panics.

use strum::EnumCount;
use tracing::debug;

use super::DamageType;

/// Stat identifier.
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
pub enum StatId {
    // Primary
    Physique,
    Cunning,
    Spirit,
    // Derived core
    OffensiveAbility,
    DefensiveAbility,
    CritMultiplier,
    AttackSpeed,
    CastSpeed,
    RunSpeed,
    CooldownReduction,
    SkillCostReduction,
    HealingIncrease,
    EnergyAbsorb,
    Constitution,
    ExperienceGain,
    // Pools
    MaxHp,
    HpRegen,
    MaxEnergy,
    EnergyRegen,
    // Generic damage scalars
    PercentWeaponDamage,
    PercentAllDamage,
    CritDamagePercent,
    // Armor: flat protection cap and bonus absorption (0.2 = +20%)
    ArmorProtection,
    ArmorAbsorption,
    // Resistances per damage type, added on top of the resist pack base
    ResistPhysical,
    ResistPierce,
    ResistBleed,
    ResistTrauma,
    ResistFire,
    ResistCold,
    ResistLightning,
    ResistAcid,
    ResistPoison,
    ResistVitality,
    ResistVitalityDecay,
    ResistAether,
    ResistChaos,
    // Crowd-control resistances
    ResistStun,
    ResistSlow,
    ResistFreeze,
    ResistSleep,
    ResistTrap,
    ResistPetrify,
    ResistDisruption,
    ResistLifeLeech,
    ResistEnergyLeech,
    ResistReflect,
}

impl StatId {
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Resistance stat matching a damage type.
    pub const fn resistance(kind: DamageType) -> StatId {
        match kind {
            DamageType::Physical => StatId::ResistPhysical,
            DamageType::Pierce => StatId::ResistPierce,
            DamageType::Bleed => StatId::ResistBleed,
            DamageType::Trauma => StatId::ResistTrauma,
            DamageType::Fire => StatId::ResistFire,
            DamageType::Cold => StatId::ResistCold,
            DamageType::Lightning => StatId::ResistLightning,
            DamageType::Acid => StatId::ResistAcid,
            DamageType::Poison => StatId::ResistPoison,
            DamageType::Vitality => StatId::ResistVitality,
            DamageType::VitalityDecay => StatId::ResistVitalityDecay,
            DamageType::Aether => StatId::ResistAether,
            DamageType::Chaos => StatId::ResistChaos,
        }
    }
}

type Layer = [f32; StatId::COUNT];

/// Layered stats of one entity.
#[derive(Clone, Debug, PartialEq)]
pub struct StatBlock {
    base: Layer,
    add: Layer,
    mul: Layer,
    cached: Layer,
    stale: bool,
}

impl StatBlock {
    pub fn new() -> Self {
        Self {
            base: [0.0; StatId::COUNT],
            add: [0.0; StatId::COUNT],
            mul: [0.0; StatId::COUNT],
            cached: [0.0; StatId::COUNT],
            stale: false,
        }
    }

    /// Builds a block from base values and computes finals.
    pub fn from_base(values: &[(StatId, f32)]) -> Self {
        let mut block = Self::new();
        for &(id, value) in values {
            block.set_base(id, value);
        }
        block.recompute_final();
        block
    }

    pub fn base(&self, id: StatId) -> f32 {
        self.base[id.index()]
    }

    pub fn flat_bonus(&self, id: StatId) -> f32 {
        self.add[id.index()]
    }

    pub fn percent_bonus(&self, id: StatId) -> f32 {
        self.mul[id.index()]
    }

    /// Cached final value.
    pub fn get(&self, id: StatId) -> f32 {
        if self.stale {
            debug!(
                target: "mechanics::stats",
                stat = %id,
                "read of stale stat block"
            );
        }
        self.cached[id.index()]
    }

    pub fn set_base(&mut self, id: StatId, value: f32) {
        self.base[id.index()] = value;
        self.stale = true;
    }

    pub fn add_flat(&mut self, id: StatId, value: f32) {
        self.add[id.index()] += value;
        self.stale = true;
    }

    pub fn add_percent(&mut self, id: StatId, value: f32) {
        self.mul[id.index()] += value;
        self.stale = true;
    }

    pub fn swap_base(&mut self, a: StatId, b: StatId) {
        self.base.swap(a.index(), b.index());
        self.stale = true;
    }

    /// Drops every flat and percent bonus, keeping base values.
    pub fn clear_bonuses(&mut self) {
        self.add = [0.0; StatId::COUNT];
        self.mul = [0.0; StatId::COUNT];
        self.stale = true;
    }

    pub fn recompute_final(&mut self) {
        for i in 0..StatId::COUNT {
            self.cached[i] = (self.base[i] + self.add[i]) * (1.0 + self.mul[i]);
        }
        self.stale = false;
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }
}

impl Default for StatBlock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn final_matches_layer_formula_for_every_stat() {
        let mut block = StatBlock::new();
        for (i, id) in StatId::iter().enumerate() {
            let i = i as f32;
            block.set_base(id, 10.0 + i);
            block.add_flat(id, i * 0.5);
            block.add_percent(id, 0.01 * i);
        }
        block.recompute_final();

        for id in StatId::iter() {
            let expected =
                (block.base(id) + block.flat_bonus(id)) * (1.0 + block.percent_bonus(id));
            assert_eq!(block.get(id), expected, "stat {id}");
        }
    }

    #[test]
    fn writes_mark_stale_until_recompute() {
        let mut block = StatBlock::from_base(&[(StatId::OffensiveAbility, 200.0)]);
        assert!(!block.is_stale());

        block.add_flat(StatId::OffensiveAbility, 50.0);
        assert!(block.is_stale());
        // stale read returns the previous cache
        assert_eq!(block.get(StatId::OffensiveAbility), 200.0);

        block.recompute_final();
        assert_eq!(block.get(StatId::OffensiveAbility), 250.0);
    }

    #[test]
    fn swap_base_keeps_bonuses_in_place() {
        let mut block = StatBlock::from_base(&[(StatId::Physique, 10.0), (StatId::Spirit, 30.0)]);
        block.add_flat(StatId::Physique, 5.0);
        block.swap_base(StatId::Physique, StatId::Spirit);
        block.recompute_final();
        assert_eq!(block.get(StatId::Physique), 35.0);
        assert_eq!(block.get(StatId::Spirit), 10.0);
    }

    #[test]
    fn names_and_resistance_mapping() {
        assert_eq!(StatId::from_str("offensive_ability"), Ok(StatId::OffensiveAbility));
        assert_eq!(StatId::from_str("MAX_HP"), Ok(StatId::MaxHp));
        assert_eq!(StatId::resistance(DamageType::Cold), StatId::ResistCold);
        assert_eq!(StatId::COUNT, 47);
    }
}
