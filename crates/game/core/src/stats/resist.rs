//! Resistances and resistance-reduction (RR) staging.

use strum::EnumCount;

use super::{DamageType, PerType};

/// RR stage an effect contributes to.
///
/// Stages accumulate differently and are applied in a fixed order, see
/// [`apply_rr_ordered`](crate::combat::apply_rr_ordered).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum RrStage {
    /// "-X% resistance": contributions are summed.
    Type1PctAdd,
    /// "X% reduced resistance": strongest contribution wins.
    Type2PctReduced,
    /// "X flat reduced resistance": strongest contribution wins.
    Type3Flat,
}

/// Per-damage-type resistance with single-hit RR staging.
///
/// Staging only lives between the effects that stage RR and the next damage
/// resolution against this entity, which clears it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResistPack {
    /// Base resistance in percent points (30 = 30%).
    pub base: PerType,
    pub type1_sum: PerType,
    pub type2_max: PerType,
    pub type3_max: PerType,
}

impl ResistPack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base(mut self, kind: DamageType, percent: f32) -> Self {
        self.base[kind.index()] = percent;
        self
    }

    /// Stages one RR contribution for the next hit.
    pub fn stage(&mut self, kind: DamageType, stage: RrStage, value: f32) {
        let i = kind.index();
        match stage {
            RrStage::Type1PctAdd => self.type1_sum[i] += value,
            RrStage::Type2PctReduced => self.type2_max[i] = self.type2_max[i].max(value),
            RrStage::Type3Flat => self.type3_max[i] = self.type3_max[i].max(value),
        }
    }

    pub fn clear_staging(&mut self) {
        self.type1_sum = [0.0; DamageType::COUNT];
        self.type2_max = [0.0; DamageType::COUNT];
        self.type3_max = [0.0; DamageType::COUNT];
    }

    pub fn has_staging(&self) -> bool {
        self.type1_sum
            .iter()
            .chain(&self.type2_max)
            .chain(&self.type3_max)
            .any(|v| *v != 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staging_rules_sum_and_max() {
        let mut pack = ResistPack::new();
        pack.stage(DamageType::Cold, RrStage::Type1PctAdd, 10.0);
        pack.stage(DamageType::Cold, RrStage::Type1PctAdd, 15.0);
        pack.stage(DamageType::Cold, RrStage::Type2PctReduced, 0.2);
        pack.stage(DamageType::Cold, RrStage::Type2PctReduced, 0.1);
        pack.stage(DamageType::Cold, RrStage::Type3Flat, 5.0);
        pack.stage(DamageType::Cold, RrStage::Type3Flat, 8.0);

        let cold = DamageType::Cold.index();
        assert_eq!(pack.type1_sum[cold], 25.0);
        assert_eq!(pack.type2_max[cold], 0.2);
        assert_eq!(pack.type3_max[cold], 8.0);

        pack.clear_staging();
        assert!(!pack.has_staging());
    }
}
