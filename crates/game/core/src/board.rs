//! Positional queries over `(lane, index)` board coordinates.
//!
//! All queries are relative to one unit and only consider allies: same team,
//! same lane. Index 0 is the front. An empty index is skipped, never an error.
//! A unit without `Team` or `BoardPos` has no neighbours.

use crate::ids::EntityId;
use crate::world::{BoardPos, Team, World};

fn placement(world: &World, unit: EntityId) -> Option<(Team, BoardPos)> {
    Some((*world.try_get::<Team>(unit)?, *world.try_get::<BoardPos>(unit)?))
}

/// Unit of `team` standing at `(lane, index)`. Lowest id wins if several overlap.
pub fn unit_at(world: &World, team: Team, lane: i32, index: i32) -> Option<EntityId> {
    world
        .iter::<BoardPos>()
        .filter(|(_, pos)| pos.lane == lane && pos.index == index)
        .map(|(id, _)| id)
        .find(|id| world.try_get::<Team>(*id) == Some(&team))
}

/// Same-team units in `lane`, sorted by `(index, id)`.
pub fn lane_members(world: &World, team: Team, lane: i32) -> Vec<(EntityId, BoardPos)> {
    let mut members: Vec<_> = world
        .iter::<BoardPos>()
        .filter(|(id, pos)| pos.lane == lane && world.try_get::<Team>(*id) == Some(&team))
        .map(|(id, pos)| (id, *pos))
        .collect();
    members.sort_by_key(|(id, pos)| (pos.index, *id));
    members
}

/// The ally directly in front (index - 1).
pub fn ally_ahead(world: &World, unit: EntityId) -> Option<EntityId> {
    let (team, pos) = placement(world, unit)?;
    unit_at(world, team, pos.lane, pos.index.checked_sub(1)?)
}

/// Allies at `index + 1 ..= index + n`, front to back.
pub fn allies_behind(world: &World, unit: EntityId, n: u32) -> Vec<EntityId> {
    let Some((team, pos)) = placement(world, unit) else {
        return Vec::new();
    };
    let last = pos
        .index
        .saturating_add(i32::try_from(n).unwrap_or(i32::MAX));
    let mut behind: Vec<_> = lane_members(world, team, pos.lane)
        .into_iter()
        .filter(|(_, other)| other.index > pos.index && other.index <= last)
        .collect();
    // lowest id wins a shared index, as in `unit_at`
    behind.dedup_by_key(|(_, other)| other.index);
    behind.into_iter().map(|(id, _)| id).collect()
}

/// Allies at `index - 1` and `index + 1`, in that order.
pub fn adjacent_allies(world: &World, unit: EntityId) -> Vec<EntityId> {
    let Some((team, pos)) = placement(world, unit) else {
        return Vec::new();
    };
    [pos.index.checked_sub(1), pos.index.checked_add(1)]
        .into_iter()
        .flatten()
        .filter_map(|index| unit_at(world, team, pos.lane, index))
        .collect()
}

/// The ally in slot `n` counted from the front (1-based).
pub fn nth_ally(world: &World, unit: EntityId, n: u32) -> Option<EntityId> {
    if n == 0 {
        return None;
    }
    let (team, pos) = placement(world, unit)?;
    unit_at(world, team, pos.lane, i32::try_from(n - 1).ok()?)
}

/// Allies (excluding `unit`) within `radius` indices of it, sorted by index.
pub fn allies_within(world: &World, unit: EntityId, radius: u32) -> Vec<(EntityId, BoardPos)> {
    let Some((team, pos)) = placement(world, unit) else {
        return Vec::new();
    };
    lane_members(world, team, pos.lane)
        .into_iter()
        .filter(|(id, other)| *id != unit && other.index.abs_diff(pos.index) <= radius)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(world: &mut World, team: u8, lane: i32, index: i32) -> EntityId {
        let unit = world.spawn();
        world.insert(unit, Team(team)).unwrap();
        world.insert(unit, BoardPos::new(lane, index)).unwrap();
        unit
    }

    #[test]
    fn allies_behind_skips_gaps() {
        let mut world = World::new();
        let me = place(&mut world, 0, 0, 1);
        let b1 = place(&mut world, 0, 0, 2);
        // index 3 empty
        let b3 = place(&mut world, 0, 0, 4);
        place(&mut world, 0, 0, 5);
        place(&mut world, 1, 0, 3); // enemy
        place(&mut world, 0, 1, 3); // other lane

        assert_eq!(allies_behind(&world, me, 3), vec![b1, b3]);
    }

    #[test]
    fn ahead_adjacent_and_nth() {
        let mut world = World::new();
        let front = place(&mut world, 0, 0, 0);
        let me = place(&mut world, 0, 0, 1);
        let back = place(&mut world, 0, 0, 2);
        place(&mut world, 1, 0, 0);

        assert_eq!(ally_ahead(&world, me), Some(front));
        assert_eq!(ally_ahead(&world, front), None);
        assert_eq!(adjacent_allies(&world, me), vec![front, back]);
        assert_eq!(adjacent_allies(&world, front), vec![me]);
        assert_eq!(nth_ally(&world, back, 1), Some(front));
        assert_eq!(nth_ally(&world, back, 3), Some(back));
        assert_eq!(nth_ally(&world, back, 0), None);
    }

    #[test]
    fn extreme_counts_and_edges_do_not_overflow() {
        let mut world = World::new();
        let edge = place(&mut world, 0, 0, i32::MIN);
        let last = place(&mut world, 0, 0, i32::MAX);
        let front = place(&mut world, 0, 0, 0);
        let behind = place(&mut world, 0, 0, 7);

        assert_eq!(ally_ahead(&world, edge), None);
        assert!(adjacent_allies(&world, last).is_empty());
        assert_eq!(allies_behind(&world, front, u32::MAX), vec![behind, last]);
        assert_eq!(nth_ally(&world, front, u32::MAX), None);
        assert_eq!(allies_within(&world, edge, u32::MAX).len(), 3);
    }

    #[test]
    fn unplaced_unit_has_no_neighbours() {
        let mut world = World::new();
        let loose = world.spawn();
        place(&mut world, 0, 0, 0);
        assert_eq!(ally_ahead(&world, loose), None);
        assert!(allies_behind(&world, loose, 4).is_empty());
        assert!(allies_within(&world, loose, 4).is_empty());
    }
}
