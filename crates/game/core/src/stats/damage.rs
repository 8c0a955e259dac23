//! Damage types and the per-hit damage bundle.

use bitflags::bitflags;
use strum::{EnumCount, IntoEnumIterator};

/// Damage type. Indexes every per-type array in the engine.
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
pub enum DamageType {
    Physical,
    Pierce,
    Bleed,
    Trauma,
    Fire,
    Cold,
    Lightning,
    Acid,
    Poison,
    Vitality,
    VitalityDecay,
    Aether,
    Chaos,
}

impl DamageType {
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn all() -> impl Iterator<Item = DamageType> {
        DamageType::iter()
    }
}

/// One value per damage type.
pub type PerType = [f32; DamageType::COUNT];

bitflags! {
    /// Classification of a damage source.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct DamageTags: u32 {
        const WEAPON = 1 << 0;
        const SKILL = 1 << 1;
        const SHIELD_SKILL = 1 << 2;
    }
}

/// Damage carried by a single hit, already split by type.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageBundle {
    /// Multiplier on the physical component (1.10 = 110% weapon damage).
    pub weapon_scalar: f32,
    pub flat: PerType,
    pub tags: DamageTags,
}

impl DamageBundle {
    pub fn new() -> Self {
        Self {
            weapon_scalar: 1.0,
            flat: [0.0; DamageType::COUNT],
            tags: DamageTags::empty(),
        }
    }

    /// Bundle used for skill damage: unit weapon scalar, `SKILL` tag.
    pub fn skill(weapon_scalar: f32) -> Self {
        Self {
            weapon_scalar,
            tags: DamageTags::SKILL,
            ..Self::new()
        }
    }

    pub fn with(mut self, kind: DamageType, amount: f32) -> Self {
        self.flat[kind.index()] += amount;
        self
    }

    pub fn get(&self, kind: DamageType) -> f32 {
        self.flat[kind.index()]
    }

    pub fn total(&self) -> f32 {
        self.flat.iter().sum()
    }
}

impl Default for DamageBundle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr;

    #[test]
    fn names_parse_case_insensitively() {
        assert_eq!(DamageType::from_str("cold"), Ok(DamageType::Cold));
        assert_eq!(DamageType::from_str("Vitality_Decay"), Ok(DamageType::VitalityDecay));
        assert!(DamageType::from_str("frost").is_err());
        assert_eq!(DamageType::COUNT, 13);
    }

    #[test]
    fn bundle_builder_accumulates() {
        let bundle = DamageBundle::skill(1.1)
            .with(DamageType::Cold, 25.0)
            .with(DamageType::Cold, 5.0)
            .with(DamageType::Physical, 10.0);
        assert_eq!(bundle.get(DamageType::Cold), 30.0);
        assert_eq!(bundle.total(), 40.0);
        assert!(bundle.tags.contains(DamageTags::SKILL));
    }
}
