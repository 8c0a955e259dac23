/// Applies the three RR stages to a base resistance, in this exact order:
///
/// ```text
/// r = base - type1_sum            (may go negative)
/// r = r * (1 - max(0, type2))     (dampens, keeps the sign of r)
/// r = r - type3_flat              (may go negative)
/// ```
///
/// The result is an effective resistance percent and is not clamped.
pub fn apply_rr_ordered(base_pct: f32, type1_sum: f32, type2_reduced: f32, type3_flat: f32) -> f32 {
    let mut r = base_pct - type1_sum;
    r *= 1.0 - type2_reduced.max(0.0);
    r - type3_flat
}
