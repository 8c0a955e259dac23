use std::sync::Arc;

use tracing::{debug, trace, warn};

use super::AbilityDatabase;
use crate::context::Context;
use crate::effect::{self, Invocation};
use crate::error::MechanicsError;
use crate::event::{Event, EventBus, EventType, ListenerId, ListenerOrder};
use crate::world::{KnownAbilities, World};

/// Fires known abilities in response to bus events.
///
/// Holds the shared, read-only database. Per-owner cooldowns live in each
/// owner's [`KnownAbilities`].
#[derive(Clone, Debug, Default)]
pub struct AbilitySystem {
    database: Arc<AbilityDatabase>,
}

impl AbilitySystem {
    pub fn new(database: Arc<AbilityDatabase>) -> Self {
        Self { database }
    }

    pub fn database(&self) -> &AbilityDatabase {
        &self.database
    }

    /// Subscribes the dispatch handler to `kind`.
    pub fn attach_to(&self, bus: &mut EventBus, kind: EventType, lane: i32, priority: i32) -> ListenerId {
        let system = self.clone();
        bus.subscribe(kind, ListenerOrder::new(lane, priority), move |event, cx| {
            system.on_event(event, cx);
            Ok(())
        })
    }

    /// Evaluates every known ability of every owner against `event`.
    ///
    /// Owners are visited in id order, abilities in list order. An ability
    /// fires when both cooldowns are zero, it has a trigger and a target
    /// function, and the trigger accepts the event. Firing restarts both
    /// cooldowns.
    pub fn on_event(&self, event: &Event, cx: &mut Context<'_>) {
        for owner in cx.world.entities_with::<KnownAbilities>() {
            let mut slot = 0;
            loop {
                // effects may change the owner's list, re-read every slot
                let Some(known) = cx
                    .world
                    .try_get::<KnownAbilities>(owner)
                    .and_then(|list| list.0.get(slot))
                    .copied()
                else {
                    break;
                };
                slot += 1;

                if !known.is_ready() {
                    continue;
                }
                let Some(ability) = self.database.get(known.id) else {
                    trace!(target: "mechanics::abilities", id = %known.id, "unknown ability reference");
                    continue;
                };
                let (Some(trigger), Some(target)) = (&ability.trigger, &ability.target) else {
                    continue;
                };
                if !trigger(event, cx, owner) {
                    continue;
                }

                let targets = target(event, cx);
                debug!(
                    target: "mechanics::abilities",
                    ability = %ability.name,
                    %owner,
                    event = %event.kind,
                    targets = targets.len(),
                    "ability fired"
                );
                let invocation = Invocation::new(event, owner, &targets).with_abilities(&self.database);
                if let Err(e) = effect::execute(&ability.graph, &invocation, cx) {
                    warn!(
                        target: "mechanics::abilities",
                        ability = %ability.name,
                        %owner,
                        code = e.error_code(),
                        error = %e,
                        "effect graph aborted"
                    );
                }

                // Cooldowns are charged even when the graph aborted part way.
                let entry = cx
                    .world
                    .try_get_mut::<KnownAbilities>(owner)
                    .and_then(|list| list.0.get_mut(slot - 1));
                if let Some(entry) = entry.filter(|entry| entry.id == known.id) {
                    entry.cooldown_left = ability.cooldown_sec;
                    entry.internal_cooldown_left = ability.internal_cooldown_sec;
                }
            }
        }
    }

    /// Counts every owner's cooldowns down by `dt`, floored at zero.
    pub fn tick_cooldowns(&self, world: &mut World, dt: f32) {
        for (_, known) in world.iter_mut::<KnownAbilities>() {
            for entry in known.0.iter_mut() {
                entry.cooldown_left = (entry.cooldown_left - dt).max(0.0);
                entry.internal_cooldown_left = (entry.internal_cooldown_left - dt).max(0.0);
            }
        }
    }

    /// Strips abilities granted for the current battle only.
    pub fn end_battle(&self, world: &mut World) {
        let mut stripped = 0;
        for (_, known) in world.iter_mut::<KnownAbilities>() {
            let before = known.0.len();
            known.0.retain(|entry| !entry.temporary);
            stripped += before - known.0.len();
        }
        debug!(target: "mechanics::abilities", stripped, "battle abilities cleared");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::ability::{AbilityDef, trigger, triggers};
    use crate::context::BattleState;
    use crate::effect::params::{ModifyStats, StatDelta};
    use crate::effect::{CompiledEffectGraph, EffectNode};
    use crate::ids::{EntityId, Sid};
    use crate::services::NoServices;
    use crate::stats::{StatBlock, StatId};
    use crate::targeting::target_self;

    fn grow() -> CompiledEffectGraph {
        CompiledEffectGraph::compile(&[EffectNode::ModifyStats(
            ModifyStats::from_deltas([StatDelta {
                stat: StatId::MaxHp,
                add: 10.0,
                mul: 0.0,
            }])
            .unwrap(),
        )])
        .unwrap()
    }

    struct Battle {
        bus: EventBus,
        world: World,
        battle: BattleState,
        services: NoServices,
        system: AbilitySystem,
    }

    impl Battle {
        fn new(db: AbilityDatabase) -> Self {
            let mut bus = EventBus::new();
            let system = AbilitySystem::new(Arc::new(db));
            system.attach_to(&mut bus, EventType::TurnStarted, 0, 0);
            Self {
                bus,
                world: World::new(),
                battle: BattleState::new(7),
                services: NoServices,
                system,
            }
        }

        fn unit(&mut self, abilities: &[&str]) -> EntityId {
            let unit = self.world.spawn();
            self.world.insert(unit, StatBlock::new()).unwrap();
            self.world
                .insert(unit, KnownAbilities::from_ids(abilities.iter().map(|name| Sid::new(name))))
                .unwrap();
            unit
        }

        fn turn(&mut self, source: EntityId) {
            self.bus.publish(
                Event::new(EventType::TurnStarted).with_source(source),
                &mut self.world,
                &mut self.battle,
                &mut self.services,
            );
        }

        fn max_hp(&self, unit: EntityId) -> f32 {
            self.world.get::<StatBlock>(unit).unwrap().get(StatId::MaxHp)
        }
    }

    fn growth(cooldown: f32) -> AbilityDatabase {
        let mut db = AbilityDatabase::new();
        db.insert(
            AbilityDef::new("Growth")
                .with_trigger(triggers::on_event(EventType::TurnStarted))
                .with_target(target_self())
                .with_graph(grow())
                .with_cooldown(cooldown),
        );
        db
    }

    #[test]
    fn cooldown_gates_refiring_until_ticked() {
        let mut b = Battle::new(growth(2.0));
        let unit = b.unit(&["Growth"]);

        b.turn(unit);
        b.turn(unit);
        assert_eq!(b.max_hp(unit), 10.0);

        b.system.tick_cooldowns(&mut b.world, 1.5);
        b.turn(unit);
        assert_eq!(b.max_hp(unit), 10.0);

        b.system.tick_cooldowns(&mut b.world, 1.0);
        let known = b.world.get::<KnownAbilities>(unit).unwrap();
        assert_eq!(known.0[0].cooldown_left, 0.0);
        b.turn(unit);
        assert_eq!(b.max_hp(unit), 20.0);
    }

    #[test]
    fn trigger_is_evaluated_per_owner() {
        let mut b = Battle::new(growth(0.0));
        let a = b.unit(&["Growth"]);
        let other = b.unit(&["Growth"]);

        b.turn(a);
        assert_eq!(b.max_hp(a), 10.0);
        assert_eq!(b.max_hp(other), 0.0);
    }

    #[test]
    fn unarmed_and_unknown_abilities_are_skipped() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        let mut db = growth(0.0);
        db.insert(AbilityDef::new("NoTarget").with_trigger(trigger(move |_, _, _| {
            counter.fetch_add(1, Ordering::Relaxed);
            true
        })));
        let mut b = Battle::new(db);
        let unit = b.unit(&["Missing", "NoTarget", "Growth"]);

        b.turn(unit);
        assert_eq!(fired.load(Ordering::Relaxed), 0);
        assert_eq!(b.max_hp(unit), 10.0);
    }

    #[test]
    fn end_battle_strips_temporary_abilities() {
        let mut b = Battle::new(growth(0.0));
        let unit = b.unit(&["Growth"]);
        b.world
            .get_mut::<KnownAbilities>(unit)
            .unwrap()
            .push_temporary(Sid::new("Borrowed"));

        b.system.end_battle(&mut b.world);

        let known = b.world.get::<KnownAbilities>(unit).unwrap();
        assert_eq!(known.len(), 1);
        assert!(known.contains(Sid::new("Growth")));
    }
}
