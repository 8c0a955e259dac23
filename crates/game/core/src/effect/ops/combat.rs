use super::skip_target;
use crate::combat::resolve_and_apply_damage;
use crate::context::Context;
use crate::effect::params::{ApplyRr, ApplyStatus, DealDamage, TakeLessDamage};
use crate::effect::{Invocation, OpCode};
use crate::event::{Event, EventType};
use crate::stats::ResistPack;
use crate::world::{NextHitMitigation, StatusState};

/// One hit of the bundle from the owner against each target, in order.
pub(crate) fn deal_damage(params: &DealDamage, inv: &Invocation<'_>, ctx: &mut Context<'_>) {
    for &target in inv.targets {
        if let Err(e) = resolve_and_apply_damage(inv.owner, target, &params.bundle, ctx, true) {
            skip_target(OpCode::DealDamage, target, &e);
        }
    }
}

pub(crate) fn apply_status(params: &ApplyStatus, inv: &Invocation<'_>, ctx: &mut Context<'_>) {
    for &target in inv.targets {
        match ctx.world.get_or_insert_with(target, StatusState::default) {
            Ok(status) => status.apply(params.flags, params.duration_sec),
            Err(e) => {
                skip_target(OpCode::ApplyStatus, target, &e);
                continue;
            }
        }
        ctx.publish(Event::between(EventType::StatusApplied, inv.owner, Some(target)));
    }
}

/// Stages RR on each target's resist pack for its next incoming hit.
pub(crate) fn apply_rr(params: &ApplyRr, inv: &Invocation<'_>, ctx: &mut Context<'_>) {
    for &target in inv.targets {
        match ctx.world.get_mut::<ResistPack>(target) {
            Ok(resist) => resist.stage(params.kind, params.stage, params.value),
            Err(e) => skip_target(OpCode::ApplyRr, target, &e),
        }
    }
}

pub(crate) fn take_less_damage(params: &TakeLessDamage, inv: &Invocation<'_>, ctx: &mut Context<'_>) {
    for &target in inv.targets {
        let mitigation = NextHitMitigation { pct: params.pct };
        if let Err(e) = ctx.world.insert(target, mitigation) {
            skip_target(OpCode::TakeLessDamageOneShot, target, &e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::ops::fixture::OpFixture;
    use crate::stats::{DamageBundle, DamageType, LifeEnergy, RrStage};
    use crate::world::StatusFlags;

    #[test]
    fn deal_damage_hits_each_target_and_queues_events() {
        let mut fx = OpFixture::new();
        let a = fx.unit(1, 0);
        let b = fx.unit(1, 1);
        let bare = fx.world.spawn();
        for unit in [a, b] {
            fx.world.insert(unit, ResistPack::new()).unwrap();
            fx.world.insert(unit, LifeEnergy::full(100.0, 0.0)).unwrap();
        }
        let params = DealDamage {
            bundle: DamageBundle::skill(1.0).with(DamageType::Fire, 25.0),
        };

        fx.run(&[a, bare, b], |inv, ctx| deal_damage(&params, inv, ctx));

        assert_eq!(fx.world.get::<LifeEnergy>(a).unwrap().hp, 75.0);
        assert_eq!(fx.world.get::<LifeEnergy>(b).unwrap().hp, 75.0);
        assert_eq!(
            fx.drain_kinds(),
            vec![
                EventType::DamageDealt,
                EventType::DamageTaken,
                EventType::DamageDealt,
                EventType::DamageTaken,
            ]
        );
    }

    #[test]
    fn apply_status_attaches_state_and_publishes() {
        let mut fx = OpFixture::new();
        let target = fx.unit(1, 0);
        let params = ApplyStatus {
            flags: StatusFlags::CHILLED,
            duration_sec: 3.0,
        };

        fx.run(&[target], |inv, ctx| apply_status(&params, inv, ctx));

        let status = fx.world.get::<StatusState>(target).unwrap();
        assert!(status.has(StatusFlags::CHILLED));
        assert_eq!(status.remaining(StatusFlags::CHILLED), 3.0);
        assert_eq!(fx.drain_kinds(), vec![EventType::StatusApplied]);
    }

    #[test]
    fn rr_and_mitigation_are_staged_not_applied() {
        let mut fx = OpFixture::new();
        let target = fx.unit(1, 0);
        fx.world.insert(target, ResistPack::new()).unwrap();
        let rr = ApplyRr {
            kind: DamageType::Cold,
            stage: RrStage::Type1PctAdd,
            value: 15.0,
        };

        fx.run(&[target], |inv, ctx| {
            apply_rr(&rr, inv, ctx);
            apply_rr(&rr, inv, ctx);
            take_less_damage(&TakeLessDamage { pct: 0.4 }, inv, ctx);
        });

        let resist = fx.world.get::<ResistPack>(target).unwrap();
        assert_eq!(resist.type1_sum[DamageType::Cold.index()], 30.0);
        assert!(resist.has_staging());
        assert_eq!(fx.world.get::<NextHitMitigation>(target).unwrap().pct, 0.4);
    }
}
