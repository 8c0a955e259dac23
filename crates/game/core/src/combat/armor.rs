/// Share of damage within the protection cap that armor absorbs at 1x absorption.
pub const BASE_ABSORPTION: f32 = 0.70;

/// Mitigates physical damage with armor.
///
/// Damage up to `protection` is reduced by `clamp(0.7 * absorption, 0, 1)`;
/// damage beyond it passes through untouched. Non-positive damage or
/// protection returns `raw` unchanged.
pub fn apply_armor(raw: f32, protection: f32, absorption_multiplier: f32) -> f32 {
    if raw <= 0.0 || protection <= 0.0 {
        return raw;
    }
    let within = raw.min(protection);
    let overflow = (raw - protection).max(0.0);
    let absorb = (BASE_ABSORPTION * absorption_multiplier).clamp(0.0, 1.0);
    (within - within * absorb) + overflow
}
