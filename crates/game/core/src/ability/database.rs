use std::collections::HashMap;

use tracing::warn;

use super::AbilityDef;
use crate::ids::Sid;

/// Ability definitions keyed by the hash of their name.
#[derive(Clone, Debug, Default)]
pub struct AbilityDatabase {
    by_id: HashMap<Sid, AbilityDef>,
}

impl AbilityDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a definition. Returns the replaced one.
    pub fn insert(&mut self, ability: AbilityDef) -> Option<AbilityDef> {
        let replaced = self.by_id.insert(ability.id, ability);
        if let Some(old) = &replaced {
            warn!(
                target: "mechanics::abilities",
                ability = %old.name,
                id = %old.id,
                "ability definition replaced"
            );
        }
        replaced
    }

    pub fn get(&self, id: Sid) -> Option<&AbilityDef> {
        self.by_id.get(&id)
    }

    pub fn contains(&self, id: Sid) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Definitions sorted by id.
    pub fn sorted(&self) -> Vec<&AbilityDef> {
        let mut abilities: Vec<_> = self.by_id.values().collect();
        abilities.sort_by_key(|ability| ability.id);
        abilities
    }
}
