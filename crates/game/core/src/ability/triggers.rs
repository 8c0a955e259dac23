//! Trigger predicate factories.
//!
//! `owner` is the entity whose ability is being evaluated.

use super::{TriggerFn, trigger};
use crate::board;
use crate::event::EventType;

/// Fires on `kind` when the owner is the event source.
pub fn on_event(kind: EventType) -> TriggerFn {
    trigger(move |event, _, owner| event.kind == kind && event.source == Some(owner))
}

/// The owner died.
pub fn on_death() -> TriggerFn {
    on_event(EventType::UnitDied)
}

/// The owner finished casting.
pub fn on_cast() -> TriggerFn {
    on_event(EventType::SpellCastResolved)
}

/// The owner took damage.
pub fn on_damage_taken() -> TriggerFn {
    on_event(EventType::DamageTaken)
}

/// Any `BattleStarted` event, whoever sent it.
pub fn on_battle_start() -> TriggerFn {
    trigger(|event, _, _| event.kind == EventType::BattleStarted)
}

/// The ally directly in front of the owner started an attack.
pub fn ally_ahead_attacks() -> TriggerFn {
    ally_ahead_on(EventType::AttackStarted)
}

/// The ally directly in front of the owner died.
///
/// Evaluated against the board as it is when the event is delivered, so the
/// fallen unit must still hold its position.
pub fn ally_ahead_faints() -> TriggerFn {
    ally_ahead_on(EventType::UnitDied)
}

fn ally_ahead_on(kind: EventType) -> TriggerFn {
    trigger(move |event, cx, owner| {
        event.kind == kind
            && event.source.is_some()
            && board::ally_ahead(cx.world, owner) == event.source
    })
}
