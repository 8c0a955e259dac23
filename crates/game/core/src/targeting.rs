//! Target selection for abilities.
//!
//! A target function maps `(event, context)` to the entities an ability's
//! effects apply to. Every selector here is relative to `event.source` and
//! returns nothing when the event has no source. Results are deterministic:
//! ally pools are built in entity id order and random picks draw from the
//! battle RNG.

use std::sync::Arc;

use crate::board;
use crate::context::Context;
use crate::event::Event;
use crate::ids::EntityId;
use crate::rng::salt;
use crate::world::{Team, World};

pub type TargetFn = Arc<dyn Fn(&Event, &mut Context<'_>) -> Vec<EntityId> + Send + Sync>;

/// Boxes a closure as a [`TargetFn`].
pub fn selector<F>(f: F) -> TargetFn
where
    F: Fn(&Event, &mut Context<'_>) -> Vec<EntityId> + Send + Sync + 'static,
{
    Arc::new(f)
}

fn team_of(world: &World, unit: EntityId) -> Option<Team> {
    world.try_get::<Team>(unit).copied()
}

/// Same-team units in id order, optionally without `source`.
fn ally_pool(world: &World, source: EntityId, include_self: bool) -> Vec<EntityId> {
    let Some(team) = team_of(world, source) else {
        return Vec::new();
    };
    world
        .iter::<Team>()
        .filter(|(id, t)| **t == team && (include_self || *id != source))
        .map(|(id, _)| id)
        .collect()
}

/// The event source.
pub fn target_self() -> TargetFn {
    selector(|event, _| event.source.into_iter().collect())
}

/// The event's primary target.
pub fn target_primary() -> TargetFn {
    selector(|event, _| event.primary_target.into_iter().collect())
}

/// Every unit on a different team than the source.
pub fn target_all_enemies() -> TargetFn {
    selector(|event, cx| {
        let Some(team) = event.source.and_then(|s| team_of(cx.world, s)) else {
            return Vec::new();
        };
        cx.world
            .iter::<Team>()
            .filter(|(_, t)| **t != team)
            .map(|(id, _)| id)
            .collect()
    })
}

/// Every unit on the source's team.
pub fn target_all_allies(include_self: bool) -> TargetFn {
    selector(move |event, cx| match event.source {
        Some(source) => ally_pool(cx.world, source, include_self),
        None => Vec::new(),
    })
}

/// `n` allies drawn at random from the battle RNG.
///
/// If the pool has `n` or fewer members the whole pool is returned in id order
/// and nothing is drawn.
pub fn target_random_allies(n: usize, include_self: bool) -> TargetFn {
    selector(move |event, cx| {
        let Some(source) = event.source else {
            return Vec::new();
        };
        let pool = ally_pool(cx.world, source, include_self);
        cx.battle
            .rng
            .sample(source.raw(), salt::RANDOM_ALLIES, &pool, n)
    })
}

/// The first `n` allies in id order.
pub fn target_first_allies(n: usize, include_self: bool) -> TargetFn {
    selector(move |event, cx| match event.source {
        Some(source) => {
            let mut pool = ally_pool(cx.world, source, include_self);
            pool.truncate(n);
            pool
        }
        None => Vec::new(),
    })
}

pub fn target_ally_ahead() -> TargetFn {
    selector(|event, cx| {
        event
            .source
            .and_then(|source| board::ally_ahead(cx.world, source))
            .into_iter()
            .collect()
    })
}

pub fn target_allies_behind(n: u32) -> TargetFn {
    selector(move |event, cx| match event.source {
        Some(source) => board::allies_behind(cx.world, source, n),
        None => Vec::new(),
    })
}

/// Ally in slot `n` (1-based from the front) of the source's lane.
pub fn target_nth_ally(n: u32) -> TargetFn {
    selector(move |event, cx| {
        event
            .source
            .and_then(|source| board::nth_ally(cx.world, source, n))
            .into_iter()
            .collect()
    })
}

pub fn target_two_adjacent_allies() -> TargetFn {
    selector(|event, cx| match event.source {
        Some(source) => {
            let mut out = board::adjacent_allies(cx.world, source);
            out.truncate(2);
            out
        }
        None => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::context::BattleState;
    use crate::event::EventType;
    use crate::services::NoServices;
    use crate::world::BoardPos;

    struct Board {
        world: World,
        battle: BattleState,
        units: Vec<EntityId>,
    }

    impl Board {
        /// Team 0 at lane 0 indices 0..4, team 1 at lane 0 indices 0..2.
        fn new(seed: u64) -> Self {
            let mut world = World::new();
            let mut units = Vec::new();
            for (team, count) in [(0u8, 4), (1u8, 2)] {
                for index in 0..count {
                    let unit = world.spawn();
                    world.insert(unit, Team(team)).unwrap();
                    world.insert(unit, BoardPos::new(0, index)).unwrap();
                    units.push(unit);
                }
            }
            Self {
                world,
                battle: BattleState::new(seed),
                units,
            }
        }

        fn select(&mut self, f: &TargetFn, event: &Event) -> Vec<EntityId> {
            let mut services = NoServices;
            let mut queue = VecDeque::new();
            let mut cx = Context::new(&mut self.world, &mut self.battle, &mut services, &mut queue);
            f(event, &mut cx)
        }
    }

    fn from(unit: EntityId) -> Event {
        Event::new(EventType::SpellCastResolved).with_source(unit)
    }

    #[test]
    fn self_primary_and_sourceless_events() {
        let mut b = Board::new(0);
        let (me, foe) = (b.units[0], b.units[4]);
        let event = from(me).with_target(foe);
        assert_eq!(b.select(&target_self(), &event), vec![me]);
        assert_eq!(b.select(&target_primary(), &event), vec![foe]);

        let bare = Event::new(EventType::BattleStarted);
        assert!(b.select(&target_self(), &bare).is_empty());
        assert!(b.select(&target_all_enemies(), &bare).is_empty());
        assert!(b.select(&target_random_allies(2, false), &bare).is_empty());
    }

    #[test]
    fn enemies_and_allies() {
        let mut b = Board::new(0);
        let me = b.units[1];
        assert_eq!(b.select(&target_all_enemies(), &from(me)), b.units[4..].to_vec());
        assert_eq!(
            b.select(&target_all_allies(false), &from(me)),
            vec![b.units[0], b.units[2], b.units[3]]
        );
        assert_eq!(
            b.select(&target_first_allies(2, true), &from(me)),
            vec![b.units[0], b.units[1]]
        );
    }

    #[test]
    fn random_allies_are_seeded() {
        let me = Board::new(0).units[0];
        let picks = |seed| {
            let mut b = Board::new(seed);
            b.select(&target_random_allies(2, false), &from(me))
        };

        let first = picks(11);
        assert_eq!(first, picks(11));
        assert_eq!(first.len(), 2);
        assert!(!first.contains(&me));

        let mut b = Board::new(11);
        let whole = b.select(&target_random_allies(5, true), &from(me));
        assert_eq!(whole, b.units[..4].to_vec());
        assert_eq!(b.battle.rng.draws(), 0);
    }

    #[test]
    fn positional_selectors() {
        let mut b = Board::new(0);
        let me = b.units[1];
        assert_eq!(b.select(&target_ally_ahead(), &from(me)), vec![b.units[0]]);
        assert_eq!(
            b.select(&target_allies_behind(5), &from(me)),
            vec![b.units[2], b.units[3]]
        );
        assert_eq!(b.select(&target_nth_ally(4), &from(me)), vec![b.units[3]]);
        assert_eq!(
            b.select(&target_two_adjacent_allies(), &from(me)),
            vec![b.units[0], b.units[2]]
        );
    }
}
