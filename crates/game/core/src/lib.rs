//! Deterministic combat and ability resolution.
//!
//! `mechanics-core` holds the rules of a battle: an ordered event bus with
//! deferred reentrant publishing, abilities fired by trigger predicates, a
//! compiled effect-graph interpreter, and the hit/resistance/armor damage
//! pipeline. Everything runs synchronously on one thread; given the same
//! seed, content and inputs a battle replays identically.
//!
//! [`Simulation`] wires the pieces together for one battle. The building
//! blocks are public so tools and tests can drive them directly.

pub mod ability;
pub mod board;
pub mod combat;
pub mod config;
pub mod context;
pub mod effect;
pub mod error;
pub mod event;
pub mod ids;
pub mod rng;
pub mod services;
pub mod simulation;
pub mod stats;
pub mod targeting;
pub mod world;

pub use ability::{AbilityDatabase, AbilityDef, AbilitySystem, TriggerFn};
pub use combat::{
    CombatError, DamageOutcome, HitResult, apply_armor, apply_rr_ordered, compute_pth,
    resolve_and_apply_damage, resolve_hit_and_crit,
};
pub use config::EngineConfig;
pub use context::{BattleState, Context, PlayerMeta, TurnState};
pub use effect::{CompiledEffectGraph, EffectError, EffectNode, GraphError, Invocation, OpCode};
pub use error::{ErrorSeverity, MechanicsError};
pub use event::{Event, EventBus, EventType, ListenerError, ListenerId, ListenerOrder};
pub use ids::{EntityId, Sid};
pub use rng::BattleRng;
pub use services::{EngineServices, NoServices, ShopDiscount, ShopSection};
pub use simulation::Simulation;
pub use stats::{
    DamageBundle, DamageTags, DamageType, LifeEnergy, PerType, ResistPack, RrStage, StatBlock,
    StatId,
};
pub use targeting::TargetFn;
pub use world::{
    BoardPos, ClassTags, Component, ComponentError, Experience, HeldItem, KnownAbilities,
    KnownAbility, Level, NextHitMitigation, StatusFlags, StatusState, Team, World,
};
