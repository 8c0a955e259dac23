//! Combat resolution.
//!
//! Pure formulas plus the one function that mutates: the damage pipeline.
//!
//! # Core Functions
//!
//! - [`compute_pth`]: offensive vs. defensive ability → percent-to-hit
//! - [`resolve_hit_and_crit`]: PTH floor, graze scaling, crit tiers
//! - [`apply_rr_ordered`]: three-stage resistance reduction
//! - [`apply_armor`]: physical mitigation with a protection cap
//! - [`resolve_and_apply_damage`]: everything above against live components

pub mod armor;
pub mod hit;
pub mod pipeline;
pub mod resist;

pub use armor::apply_armor;
pub use hit::{HitResult, compute_pth, resolve_hit_and_crit};
pub use pipeline::{CombatError, DamageOutcome, resolve_and_apply_damage};
pub use resist::apply_rr_ordered;

#[cfg(test)]
pub(crate) fn assert_close(actual: f32, expected: f32, tolerance: f32) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}
