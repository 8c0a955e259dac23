//! Per-entity numeric state.
//!
//! - [`StatBlock`]: layered stats (`base`, `add`, `mul`, cached `final`)
//! - [`ResistPack`]: per-damage-type resistance plus single-hit RR staging
//! - [`LifeEnergy`]: HP and energy pools
//! - [`DamageBundle`]: what a single hit carries into the damage pipeline

pub mod block;
pub mod damage;
pub mod pools;
pub mod resist;

pub use block::{StatBlock, StatId};
pub use damage::{DamageBundle, DamageTags, DamageType, PerType};
pub use pools::LifeEnergy;
pub use resist::{ResistPack, RrStage};
