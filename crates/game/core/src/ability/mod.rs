//! Abilities: immutable definitions, the database holding them, trigger
//! predicates and the system that fires them from bus events.
mod database;
mod definition;
mod system;
pub mod triggers;

pub use database::AbilityDatabase;
pub use definition::{AbilityDef, TriggerFn, trigger};
pub use system::AbilitySystem;
