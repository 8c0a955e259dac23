/// Health and energy pools.
///
/// Kept apart from [`StatBlock`](super::StatBlock) so effects address the
/// current values directly. Current values never go below zero.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LifeEnergy {
    pub hp: f32,
    pub max_hp: f32,
    pub energy: f32,
    pub max_energy: f32,
}

impl LifeEnergy {
    /// Full pools.
    pub fn full(max_hp: f32, max_energy: f32) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            energy: max_energy,
            max_energy,
        }
    }

    /// Subtracts `amount` from HP, flooring at zero. Returns HP afterwards.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        self.hp = (self.hp - amount).max(0.0);
        self.hp
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0.0
    }
}
