//! Component storage.
//!
//! One ordered map per component type. Iteration always walks entities in
//! ascending [`EntityId`] order, so every query over the world is
//! deterministic. Access is typed through the [`Component`] trait:
//!
//! ```
//! # use mechanics_core::world::{World, Team};
//! let mut world = World::new();
//! let unit = world.spawn();
//! world.insert(unit, Team(1)).unwrap();
//! assert_eq!(world.get::<Team>(unit).unwrap().0, 1);
//! ```

mod components;

use std::collections::{BTreeMap, BTreeSet};

pub use components::{
    BoardPos, ClassTags, Experience, HeldItem, KnownAbilities, KnownAbility, Level,
    NextHitMitigation, StatusFlags, StatusState, Team,
};

use crate::error::{ErrorSeverity, MechanicsError};
use crate::ids::EntityId;
use crate::stats::{LifeEnergy, ResistPack, StatBlock};

/// Errors raised by typed component access.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ComponentError {
    #[error("entity {0} does not exist")]
    UnknownEntity(EntityId),

    #[error("entity {entity} has no {component} component")]
    Missing {
        entity: EntityId,
        component: &'static str,
    },
}

impl MechanicsError for ComponentError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownEntity(_) => ErrorSeverity::Validation,
            Self::Missing { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownEntity(_) => "COMPONENT_UNKNOWN_ENTITY",
            Self::Missing { .. } => "COMPONENT_MISSING",
        }
    }
}

/// A type stored in the [`World`].
pub trait Component: Sized + 'static {
    const NAME: &'static str;

    fn storage(world: &World) -> &BTreeMap<EntityId, Self>;
    fn storage_mut(world: &mut World) -> &mut BTreeMap<EntityId, Self>;
}

macro_rules! world_storage {
    ($($field:ident: $ty:ty),+ $(,)?) => {
        /// Entity/component store.
        #[derive(Debug, Default)]
        pub struct World {
            next_id: u64,
            alive: BTreeSet<EntityId>,
            $($field: BTreeMap<EntityId, $ty>,)+
        }

        $(
            impl Component for $ty {
                const NAME: &'static str = stringify!($ty);

                fn storage(world: &World) -> &BTreeMap<EntityId, Self> {
                    &world.$field
                }

                fn storage_mut(world: &mut World) -> &mut BTreeMap<EntityId, Self> {
                    &mut world.$field
                }
            }
        )+

        impl World {
            fn strip(&mut self, entity: EntityId) {
                $(self.$field.remove(&entity);)+
            }
        }
    };
}

world_storage! {
    stats: StatBlock,
    resists: ResistPack,
    pools: LifeEnergy,
    teams: Team,
    positions: BoardPos,
    statuses: StatusState,
    items: HeldItem,
    classes: ClassTags,
    mitigations: NextHitMitigation,
    experience: Experience,
    levels: Level,
    abilities: KnownAbilities,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a new entity with no components.
    pub fn spawn(&mut self) -> EntityId {
        self.next_id += 1;
        let entity = EntityId(self.next_id);
        self.alive.insert(entity);
        entity
    }

    /// Removes an entity and all of its components.
    pub fn despawn(&mut self, entity: EntityId) -> bool {
        if !self.alive.remove(&entity) {
            return false;
        }
        self.strip(entity);
        true
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        self.alive.contains(&entity)
    }

    /// Live entities in id order.
    pub fn entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.alive.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.alive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alive.is_empty()
    }

    fn check(&self, entity: EntityId) -> Result<(), ComponentError> {
        if self.contains(entity) {
            Ok(())
        } else {
            Err(ComponentError::UnknownEntity(entity))
        }
    }

    fn missing<T: Component>(entity: EntityId) -> ComponentError {
        ComponentError::Missing {
            entity,
            component: T::NAME,
        }
    }

    pub fn get<T: Component>(&self, entity: EntityId) -> Result<&T, ComponentError> {
        self.check(entity)?;
        T::storage(self)
            .get(&entity)
            .ok_or_else(|| Self::missing::<T>(entity))
    }

    pub fn get_mut<T: Component>(&mut self, entity: EntityId) -> Result<&mut T, ComponentError> {
        self.check(entity)?;
        T::storage_mut(self)
            .get_mut(&entity)
            .ok_or_else(|| Self::missing::<T>(entity))
    }

    pub fn try_get<T: Component>(&self, entity: EntityId) -> Option<&T> {
        T::storage(self).get(&entity)
    }

    pub fn try_get_mut<T: Component>(&mut self, entity: EntityId) -> Option<&mut T> {
        T::storage_mut(self).get_mut(&entity)
    }

    pub fn has<T: Component>(&self, entity: EntityId) -> bool {
        T::storage(self).contains_key(&entity)
    }

    /// Attaches or replaces a component. Returns the replaced value.
    pub fn insert<T: Component>(
        &mut self,
        entity: EntityId,
        component: T,
    ) -> Result<Option<T>, ComponentError> {
        self.check(entity)?;
        Ok(T::storage_mut(self).insert(entity, component))
    }

    pub fn remove<T: Component>(&mut self, entity: EntityId) -> Option<T> {
        T::storage_mut(self).remove(&entity)
    }

    pub fn get_or_insert_with<T: Component>(
        &mut self,
        entity: EntityId,
        make: impl FnOnce() -> T,
    ) -> Result<&mut T, ComponentError> {
        self.check(entity)?;
        Ok(T::storage_mut(self).entry(entity).or_insert_with(make))
    }

    /// Every `(entity, component)` pair of type `T` in id order.
    pub fn iter<T: Component>(&self) -> impl Iterator<Item = (EntityId, &T)> + '_ {
        T::storage(self).iter().map(|(id, c)| (*id, c))
    }

    pub fn iter_mut<T: Component>(&mut self) -> impl Iterator<Item = (EntityId, &mut T)> + '_ {
        T::storage_mut(self).iter_mut().map(|(id, c)| (*id, c))
    }

    /// Snapshot of the entities owning `T`, in id order.
    pub fn entities_with<T: Component>(&self) -> Vec<EntityId> {
        T::storage(self).keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_access_reports_missing_components() {
        let mut world = World::new();
        let unit = world.spawn();

        let err = world.get::<LifeEnergy>(unit).unwrap_err();
        assert_eq!(
            err,
            ComponentError::Missing {
                entity: unit,
                component: "LifeEnergy"
            }
        );
        assert_eq!(err.error_code(), "COMPONENT_MISSING");
        assert!(world.try_get::<LifeEnergy>(unit).is_none());

        world.insert(unit, LifeEnergy::full(100.0, 0.0)).unwrap();
        assert_eq!(world.get::<LifeEnergy>(unit).unwrap().hp, 100.0);
    }

    #[test]
    fn insert_replaces_and_returns_previous() {
        let mut world = World::new();
        let unit = world.spawn();
        assert_eq!(world.insert(unit, Team(0)).unwrap(), None);
        assert_eq!(world.insert(unit, Team(1)).unwrap(), Some(Team(0)));
    }

    #[test]
    fn despawn_strips_every_component() {
        let mut world = World::new();
        let unit = world.spawn();
        world.insert(unit, Team(0)).unwrap();
        world.insert(unit, BoardPos::new(0, 1)).unwrap();

        assert!(world.despawn(unit));
        assert!(!world.despawn(unit));
        assert!(!world.has::<Team>(unit));
        assert_eq!(
            world.insert(unit, Team(0)),
            Err(ComponentError::UnknownEntity(unit))
        );
    }

    #[test]
    fn iteration_follows_spawn_order() {
        let mut world = World::new();
        let ids: Vec<_> = (0..5).map(|_| world.spawn()).collect();
        for id in ids.iter().rev() {
            world.insert(*id, Team(0)).unwrap();
        }
        assert_eq!(world.entities_with::<Team>(), ids);
    }
}
