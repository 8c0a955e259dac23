//! Per-battle state and the view handed to listeners and effects.

use std::collections::{BTreeMap, VecDeque};

use crate::event::Event;
use crate::ids::{EntityId, Sid};
use crate::rng::BattleRng;
use crate::services::EngineServices;
use crate::world::World;

/// Resources owned by the player rather than a unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlayerMeta {
    /// Never negative.
    pub gold: i64,
}

/// Current turn and the per-turn usage counters behind `LimitPerTurn`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TurnState {
    id: u64,
    counted_turn: u64,
    usage: BTreeMap<(EntityId, Sid), u32>,
}

impl TurnState {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn set_turn(&mut self, id: u64) {
        self.id = id;
    }

    /// Counts one use of `(owner, key)` this turn.
    ///
    /// Returns false once `max` uses were already counted. Counters reset the
    /// first time they are touched after the turn id changed.
    pub fn try_consume(&mut self, owner: EntityId, key: Sid, max: u32) -> bool {
        if self.counted_turn != self.id {
            self.usage.clear();
            self.counted_turn = self.id;
        }
        let used = self.usage.entry((owner, key)).or_insert(0);
        if *used >= max {
            return false;
        }
        *used += 1;
        true
    }

    pub fn uses(&self, owner: EntityId, key: Sid) -> u32 {
        if self.counted_turn != self.id {
            return 0;
        }
        self.usage.get(&(owner, key)).copied().unwrap_or(0)
    }
}

/// Everything a battle owns besides the world and the bus.
#[derive(Clone, Debug)]
pub struct BattleState {
    pub turn: TurnState,
    pub meta: PlayerMeta,
    pub rng: BattleRng,
}

impl BattleState {
    pub fn new(seed: u64) -> Self {
        Self {
            turn: TurnState::default(),
            meta: PlayerMeta::default(),
            rng: BattleRng::new(seed),
        }
    }
}

/// Mutable view of one simulation step.
///
/// Listeners, trigger predicates, targeting functions and effect ops all
/// receive it. Events published through it are queued and delivered after
/// the current dispatch returns.
pub struct Context<'a> {
    pub world: &'a mut World,
    pub battle: &'a mut BattleState,
    pub services: &'a mut dyn EngineServices,
    events: &'a mut VecDeque<Event>,
}

impl<'a> Context<'a> {
    pub fn new(
        world: &'a mut World,
        battle: &'a mut BattleState,
        services: &'a mut dyn EngineServices,
        events: &'a mut VecDeque<Event>,
    ) -> Self {
        Self {
            world,
            battle,
            services,
            events,
        }
    }

    /// Queues `event` behind everything already pending.
    pub fn publish(&mut self, event: Event) {
        self.events.push_back(event);
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_counters_reset_on_new_turn() {
        let owner = EntityId(1);
        let key = Sid::new("OncePerTurn");
        let mut turn = TurnState::default();
        turn.set_turn(1);

        assert!(turn.try_consume(owner, key, 2));
        assert!(turn.try_consume(owner, key, 2));
        assert!(!turn.try_consume(owner, key, 2));
        assert_eq!(turn.uses(owner, key), 2);

        turn.set_turn(2);
        assert_eq!(turn.uses(owner, key), 0);
        assert!(turn.try_consume(owner, key, 2));
    }

    #[test]
    fn counters_are_per_owner() {
        let key = Sid::new("k");
        let mut turn = TurnState::default();
        assert!(turn.try_consume(EntityId(1), key, 1));
        assert!(turn.try_consume(EntityId(2), key, 1));
        assert!(!turn.try_consume(EntityId(1), key, 1));
    }
}
