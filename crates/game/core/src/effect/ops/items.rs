use tracing::trace;

use super::skip_target;
use crate::context::Context;
use crate::effect::params::ItemParams;
use crate::effect::{Invocation, OpCode};
use crate::world::HeldItem;

pub(crate) fn give(params: &ItemParams, inv: &Invocation<'_>, ctx: &mut Context<'_>) {
    for &target in inv.targets {
        if let Err(e) = ctx.world.insert(target, HeldItem(params.item)) {
            skip_target(OpCode::GiveItem, target, &e);
        }
    }
}

pub(crate) fn remove(inv: &Invocation<'_>, ctx: &mut Context<'_>) {
    for &target in inv.targets {
        ctx.world.remove::<HeldItem>(target);
    }
}

/// Moves each target's item to the owner. With several victims the last one wins.
pub(crate) fn steal(inv: &Invocation<'_>, ctx: &mut Context<'_>) {
    if !ctx.world.contains(inv.owner) {
        trace!(target: "mechanics::effects", owner = %inv.owner, "thief is gone");
        return;
    }
    for &target in inv.targets.iter().filter(|t| **t != inv.owner) {
        if let Some(item) = ctx.world.remove::<HeldItem>(target) {
            if let Err(e) = ctx.world.insert(inv.owner, item) {
                skip_target(OpCode::StealItem, inv.owner, &e);
            }
        }
    }
}

/// Gives each target a copy of the owner's item, or of `params.item` when the
/// owner holds nothing.
pub(crate) fn copy_to(params: &ItemParams, inv: &Invocation<'_>, ctx: &mut Context<'_>) {
    let item = ctx
        .world
        .try_get::<HeldItem>(inv.owner)
        .map_or(params.item, |held| held.0);
    if item.is_none() {
        return;
    }
    for &target in inv.targets {
        if let Err(e) = ctx.world.insert(target, HeldItem(item)) {
            skip_target(OpCode::CopyItemTo, target, &e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::ops::fixture::OpFixture;
    use crate::ids::{EntityId, Sid};

    fn held(fx: &OpFixture, unit: EntityId) -> Option<Sid> {
        fx.world.try_get::<HeldItem>(unit).map(|held| held.0)
    }

    #[test]
    fn give_and_remove() {
        let mut fx = OpFixture::new();
        let target = fx.unit(0, 1);
        let honey = ItemParams {
            item: Sid::new("Honey"),
        };

        fx.run(&[target], |inv, ctx| give(&honey, inv, ctx));
        assert_eq!(held(&fx, target), Some(Sid::new("Honey")));

        fx.run(&[target], |inv, ctx| remove(inv, ctx));
        assert_eq!(held(&fx, target), None);
    }

    #[test]
    fn steal_moves_item_to_owner() {
        let mut fx = OpFixture::new();
        let owner = fx.owner;
        let victim = fx.unit(1, 0);
        fx.world.insert(victim, HeldItem(Sid::new("Garlic"))).unwrap();

        fx.run(&[victim], |inv, ctx| steal(inv, ctx));

        assert_eq!(held(&fx, victim), None);
        assert_eq!(held(&fx, owner), Some(Sid::new("Garlic")));
    }

    #[test]
    fn copy_prefers_owner_item_over_fallback() {
        let mut fx = OpFixture::new();
        let owner = fx.owner;
        let ally = fx.unit(0, 1);
        let fallback = ItemParams {
            item: Sid::new("Melon"),
        };

        fx.run(&[ally], |inv, ctx| copy_to(&fallback, inv, ctx));
        assert_eq!(held(&fx, ally), Some(Sid::new("Melon")));

        fx.world.insert(owner, HeldItem(Sid::new("Steak"))).unwrap();
        fx.run(&[ally], |inv, ctx| copy_to(&fallback, inv, ctx));
        assert_eq!(held(&fx, ally), Some(Sid::new("Steak")));
    }

    #[test]
    fn copy_without_any_item_does_nothing() {
        let mut fx = OpFixture::new();
        let ally = fx.unit(0, 1);
        let nothing = ItemParams { item: Sid::NONE };

        fx.run(&[ally], |inv, ctx| copy_to(&nothing, inv, ctx));
        assert_eq!(held(&fx, ally), None);
    }
}
