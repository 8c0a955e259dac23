/// Engine configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct EngineConfig {
    /// Root of the deterministic RNG stream for one battle.
    /// Two simulations with the same seed and inputs produce the same results.
    pub battle_seed: u64,

    /// Upper bound on events drained by one flush of the event bus.
    /// Guards against ability cascades that keep re-triggering each other.
    pub max_events_per_flush: usize,

    /// Largest `Repeat` count accepted when compiling an effect graph.
    pub max_repeat: u32,
}

impl EngineConfig {
    // ===== compile-time constants used as type parameters =====
    /// Inline capacity of a single ModifyStats op.
    pub const MAX_STAT_DELTAS: usize = 8;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_BATTLE_SEED: u64 = 0x5EED;
    pub const DEFAULT_MAX_EVENTS_PER_FLUSH: usize = 4096;
    pub const DEFAULT_MAX_REPEAT: u32 = 64;

    pub fn new() -> Self {
        Self {
            battle_seed: Self::DEFAULT_BATTLE_SEED,
            max_events_per_flush: Self::DEFAULT_MAX_EVENTS_PER_FLUSH,
            max_repeat: Self::DEFAULT_MAX_REPEAT,
        }
    }

    pub fn with_seed(battle_seed: u64) -> Self {
        Self {
            battle_seed,
            ..Self::new()
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
