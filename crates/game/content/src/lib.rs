//! Ability content for the mechanics engine.
//!
//! Abilities are authored in RON ([`formats`]), compiled into engine
//! [`AbilityDef`](mechanics_core::AbilityDef)s ([`compile`]) and collected into an
//! [`AbilityDatabase`](mechanics_core::AbilityDatabase) by the [`loaders`].
//! Engine tuning is read from TOML.

#[cfg(feature = "serde")]
pub mod compile;
#[cfg(feature = "serde")]
pub mod formats;

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "serde")]
pub use compile::{CompileError, compile_ability};
#[cfg(feature = "serde")]
pub use formats::{AbilitySpec, EffectSpec, StatDeltaSpec, TargetSpec, TriggerSpec};

#[cfg(feature = "loaders")]
pub use loaders::{AbilityLoader, ConfigLoader, ContentFactory, LoadReport, LoadResult};
