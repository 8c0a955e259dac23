//! One battle: world, battle state, bus, ability system and services.
//!
//! [`Simulation`] is built once per battle and dropped with it. Callers drive
//! it by publishing events, advancing turns and ticking time; everything
//! listeners queue along the way is delivered before each call returns.

use std::sync::Arc;

use strum::IntoEnumIterator;
use tracing::{debug, info};

use crate::ability::{AbilityDatabase, AbilitySystem};
use crate::combat::{self, CombatError, DamageOutcome};
use crate::config::EngineConfig;
use crate::context::{BattleState, Context};
use crate::event::{Event, EventBus, EventType, ListenerId};
use crate::ids::EntityId;
use crate::services::{EngineServices, NoServices};
use crate::stats::DamageBundle;
use crate::world::{StatusState, World};

pub struct Simulation {
    world: World,
    battle: BattleState,
    bus: EventBus,
    abilities: AbilitySystem,
    services: Box<dyn EngineServices>,
    config: EngineConfig,
}

impl Simulation {
    /// Empty battle without external services.
    pub fn new(config: EngineConfig, database: Arc<AbilityDatabase>) -> Self {
        debug!(
            target: "mechanics::simulation",
            seed = config.battle_seed,
            abilities = database.len(),
            "simulation created"
        );
        Self {
            world: World::new(),
            battle: BattleState::new(config.battle_seed),
            bus: EventBus::with_limit(config.max_events_per_flush),
            abilities: AbilitySystem::new(database),
            services: Box::new(NoServices),
            config,
        }
    }

    pub fn with_services(mut self, services: Box<dyn EngineServices>) -> Self {
        self.services = services;
        self
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn battle(&self) -> &BattleState {
        &self.battle
    }

    pub fn battle_mut(&mut self) -> &mut BattleState {
        &mut self.battle
    }

    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    pub fn abilities(&self) -> &AbilitySystem {
        &self.abilities
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Subscribes the ability system to `kind`.
    pub fn attach_abilities(&mut self, kind: EventType, lane: i32, priority: i32) -> ListenerId {
        self.abilities.attach_to(&mut self.bus, kind, lane, priority)
    }

    /// Subscribes the ability system to every event kind in the normal lane.
    pub fn attach_abilities_to_all(&mut self) {
        for kind in EventType::iter() {
            self.attach_abilities(kind, 0, 0);
        }
    }

    /// Delivers `event` and everything it cascades into. Returns the number delivered.
    pub fn publish(&mut self, event: Event) -> usize {
        self.bus
            .publish(event, &mut self.world, &mut self.battle, &mut *self.services)
    }

    /// Delivers events queued outside a dispatch.
    pub fn flush(&mut self) -> usize {
        self.bus.flush(&mut self.world, &mut self.battle, &mut *self.services)
    }

    /// Runs `f` against a context of this battle, then delivers what it queued.
    pub fn with_context<R>(&mut self, f: impl FnOnce(&mut Context<'_>) -> R) -> R {
        let result = self
            .bus
            .with_context(&mut self.world, &mut self.battle, &mut *self.services, f);
        self.flush();
        result
    }

    pub fn start_battle(&mut self) -> usize {
        info!(target: "mechanics::simulation", units = self.world.len(), "battle started");
        self.publish(Event::new(EventType::BattleStarted))
    }

    /// Sets the turn id (resetting per-turn limits) and publishes `TurnStarted`.
    pub fn begin_turn(&mut self, turn: u64) -> usize {
        self.battle.turn.set_turn(turn);
        debug!(target: "mechanics::simulation", turn, "turn started");
        self.publish(Event::new(EventType::TurnStarted))
    }

    /// Advances time by `dt` seconds.
    ///
    /// Ticks ability cooldowns, then status durations; every lapsed status
    /// publishes `StatusExpired` with the affected unit as source.
    pub fn tick(&mut self, dt: f32) -> usize {
        self.abilities.tick_cooldowns(&mut self.world, dt);
        let mut expired = Vec::new();
        for (unit, status) in self.world.iter_mut::<StatusState>() {
            if !status.tick(dt).is_empty() {
                expired.push(unit);
            }
        }
        for unit in expired {
            self.bus
                .enqueue(Event::new(EventType::StatusExpired).with_source(unit));
        }
        self.flush()
    }

    /// Resolves one hit and delivers the damage events it emits.
    pub fn resolve_damage(
        &mut self,
        attacker: EntityId,
        defender: EntityId,
        bundle: &DamageBundle,
        emit: bool,
    ) -> Result<DamageOutcome, CombatError> {
        self.with_context(|cx| combat::resolve_and_apply_damage(attacker, defender, bundle, cx, emit))
    }

    /// Strips battle-only abilities and drops undelivered events.
    pub fn end_battle(&mut self) {
        self.abilities.end_battle(&mut self.world);
        let dropped = self.bus.pending();
        self.bus.clear_pending();
        info!(target: "mechanics::simulation", dropped, "battle ended");
    }
}
