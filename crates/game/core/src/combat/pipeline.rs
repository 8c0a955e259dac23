//! Damage resolution against live components.

use strum::EnumCount;
use tracing::debug;

use super::{HitResult, apply_armor, apply_rr_ordered, resolve_hit_and_crit};
use crate::context::Context;
use crate::error::{ErrorSeverity, MechanicsError};
use crate::event::{Event, EventType};
use crate::ids::EntityId;
use crate::stats::{DamageBundle, DamageType, LifeEnergy, PerType, ResistPack, StatBlock, StatId};
use crate::world::{ComponentError, NextHitMitigation};

/// Errors from [`resolve_and_apply_damage`]. Nothing is mutated when one is returned.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CombatError {
    #[error("damage precondition failed: {0}")]
    MissingComponent(#[from] ComponentError),
}

impl MechanicsError for CombatError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::MissingComponent(e) => e.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingComponent(_) => "COMBAT_MISSING_COMPONENT",
        }
    }
}

/// What one resolved hit did.
#[derive(Clone, Debug, PartialEq)]
pub struct DamageOutcome {
    pub hit: HitResult,
    /// Effective resistance per type after RR staging.
    pub effective_resist: PerType,
    /// Final damage per type after every mitigation step.
    pub per_type: PerType,
    pub total: f32,
    pub hp_after: f32,
}

/// Resolves one hit of `bundle` from `attacker` against `defender`.
///
/// 1. Hit/crit from attacker OA, defender DA and attacker crit multiplier
/// 2. Effective resistance per type from the staged RR, then staging is cleared
/// 3. Raw damage: physical scaled by weapon scalar and hit damage scalar
/// 4. Pending [`NextHitMitigation`] scales every type and is consumed
/// 5. `* (1 - res / 100)` per type
/// 6. Armor on the physical component
/// 7. Sum, subtract from HP (floored at 0)
/// 8. With `emit`, queue `DamageDealt` (attacker → defender) and
///    `DamageTaken` (defender ← attacker), both carrying the final per-type damage
///
/// Base resistance for a type is the resist pack base. Stale stat blocks on
/// either side are recomputed before anything is read.
pub fn resolve_and_apply_damage(
    attacker: EntityId,
    defender: EntityId,
    bundle: &DamageBundle,
    cx: &mut Context<'_>,
    emit: bool,
) -> Result<DamageOutcome, CombatError> {
    // Check every precondition before touching anything. Refreshing a stale
    // cache is not a gameplay mutation.
    for unit in [attacker, defender] {
        let stats = cx.world.get_mut::<StatBlock>(unit)?;
        if stats.is_stale() {
            stats.recompute_final();
        }
    }
    let atk_stats = cx.world.get::<StatBlock>(attacker)?;
    let (oa, crit_stat) = (
        atk_stats.get(StatId::OffensiveAbility),
        atk_stats.get(StatId::CritMultiplier),
    );
    let def_stats = cx.world.get::<StatBlock>(defender)?;
    let da = def_stats.get(StatId::DefensiveAbility);
    let protection = def_stats.get(StatId::ArmorProtection);
    let absorption = 1.0 + def_stats.get(StatId::ArmorAbsorption);
    cx.world.get::<LifeEnergy>(defender)?;

    // 1
    let hit = resolve_hit_and_crit(oa, da, crit_stat);

    // 2
    let resist = cx.world.get_mut::<ResistPack>(defender)?;
    let mut effective_resist = [0.0; DamageType::COUNT];
    for t in 0..DamageType::COUNT {
        effective_resist[t] = apply_rr_ordered(
            resist.base[t],
            resist.type1_sum[t],
            resist.type2_max[t],
            resist.type3_max[t],
        );
    }
    resist.clear_staging();

    // 3
    let physical = DamageType::Physical.index();
    let mut dmg = bundle.flat;
    dmg[physical] *= bundle.weapon_scalar;
    dmg[physical] *= hit.damage_scalar;

    // 4
    if let Some(mitigation) = cx.world.remove::<NextHitMitigation>(defender) {
        let keep = 1.0 - mitigation.pct.clamp(0.0, 1.0);
        for v in dmg.iter_mut() {
            *v *= keep;
        }
    }

    // 5
    for (v, res) in dmg.iter_mut().zip(effective_resist.iter()) {
        *v *= 1.0 - res / 100.0;
    }

    // 6
    dmg[physical] = apply_armor(dmg[physical], protection, absorption);

    // 7
    let total: f32 = dmg.iter().sum();
    let hp_after = cx.world.get_mut::<LifeEnergy>(defender)?.take_damage(total);

    debug!(
        target: "mechanics::combat",
        attacker = %attacker,
        defender = %defender,
        pth = hit.pth,
        scalar = hit.damage_scalar,
        total,
        hp_after,
        "damage resolved"
    );

    // 8
    if emit {
        let dealt = DamageBundle {
            weapon_scalar: 1.0,
            flat: dmg,
            tags: bundle.tags,
        };
        cx.publish(Event::between(EventType::DamageDealt, attacker, Some(defender)).with_damage(dealt.clone()));
        cx.publish(Event::between(EventType::DamageTaken, defender, Some(attacker)).with_damage(dealt));
    }

    Ok(DamageOutcome {
        hit,
        effective_resist,
        per_type: dmg,
        total,
        hp_after,
    })
}
