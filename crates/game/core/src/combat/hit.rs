//! Percent-to-hit and crit tier resolution.

/// Outcome of hit/crit resolution. Nothing here is rolled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitResult {
    /// Percent-to-hit after the 60 floor.
    pub pth: f32,
    /// Percent chance to crit (0 below PTH 90).
    pub crit_chance: f32,
    /// Multiplier applied to the physical component of the hit.
    pub damage_scalar: f32,
    /// Crit damage multiplier, clamped to `[1.0, 3.5]` when crits are possible.
    pub crit_multiplier: f32,
}

/// Lowest PTH an attack can have.
pub const PTH_FLOOR: f32 = 60.0;
/// Below this PTH hits are grazes scaled by `pth / 75`.
pub const PTH_GRAZE: f32 = 75.0;
/// Above this PTH crits become possible.
pub const PTH_CRIT: f32 = 90.0;

/// Percent-to-hit from offensive and defensive ability.
///
/// # Formula
///
/// ```text
/// oa, da = max(oa, 1), max(da, 1)
/// p = 3.15 * oa / (3.5 * oa + da) + 0.0002275 * (oa - da) + 0.2
/// pth = clamp(p, 0, 1) * 100
/// ```
pub fn compute_pth(oa: f32, da: f32) -> f32 {
    let oa = oa.max(1.0);
    let da = da.max(1.0);
    let p = 3.15 * (oa / (3.5 * oa + da)) + 0.0002275 * (oa - da) + 0.2;
    p.clamp(0.0, 1.0) * 100.0
}

fn crit_tier_scalar(pth: f32) -> f32 {
    if pth >= 135.0 {
        1.5
    } else if pth >= 130.0 {
        1.4
    } else if pth >= 120.0 {
        1.3
    } else if pth >= 105.0 {
        1.2
    } else {
        1.1
    }
}

/// Resolves the hit band for an attack.
///
/// | PTH | damage scalar | crit |
/// |---|---|---|
/// | < 75 | `pth / 75` | none |
/// | 75..=90 | 1.0 | none |
/// | > 90 | tiered 1.1 .. 1.5 | `min(100, pth - 90)`% |
pub fn resolve_hit_and_crit(oa: f32, da: f32, crit_multiplier_stat: f32) -> HitResult {
    let pth = compute_pth(oa, da).max(PTH_FLOOR);

    if pth < PTH_GRAZE {
        return HitResult {
            pth,
            crit_chance: 0.0,
            damage_scalar: pth / PTH_GRAZE,
            crit_multiplier: 1.0,
        };
    }

    if pth > PTH_CRIT {
        return HitResult {
            pth,
            crit_chance: (pth - PTH_CRIT).min(100.0),
            damage_scalar: crit_tier_scalar(pth),
            crit_multiplier: crit_multiplier_stat.clamp(1.0, 3.5),
        };
    }

    HitResult {
        pth,
        crit_chance: 0.0,
        damage_scalar: 1.0,
        crit_multiplier: 1.0,
    }
}
