//! Deterministic random number generation for battles.
//!
//! All randomness in the engine (random ally selection, ally shuffles) draws
//! from a [`BattleRng`] owned by the battle. Every draw mixes the battle seed,
//! a draw counter, the acting entity and a per-use salt into a fresh seed, then
//! runs one PCG step over it. Replaying the same inputs replays the same draws.

/// Salt values separating independent uses of the battle RNG.
pub mod salt {
    pub const RANDOM_ALLIES: u32 = 1;
    pub const SHUFFLE_ALLIES: u32 = 2;
}

/// PCG-XSH-RR: 32-bit output from 64-bit state.
///
/// - PCG paper: <https://www.pcg-random.org/>
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    /// `state' = (state * multiplier + increment) mod 2^64`
    #[inline]
    fn step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// XSH-RR output permutation (xorshift high, random rotate).
    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    /// Generates one value from a seed.
    pub fn next_u32(seed: u64) -> u32 {
        Self::output(Self::step(seed))
    }
}

/// Compute a deterministic seed for one draw.
///
/// # Arguments
///
/// * `battle_seed` - Seed fixed at battle start
/// * `nonce` - Draw counter, advanced on every draw
/// * `actor` - Entity the draw is made for
/// * `salt` - Separates independent uses (see [`salt`])
pub fn compute_seed(battle_seed: u64, nonce: u64, actor: u64, salt: u32) -> u64 {
    // SplitMix64 / FxHash style combiners
    let mut hash = battle_seed;
    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= actor.wrapping_mul(0x517cc1b727220a95);
    hash ^= (salt as u64).wrapping_mul(0x85ebca6b);

    // Final avalanche step
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}

/// Seeded draw stream for a single battle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BattleRng {
    seed: u64,
    nonce: u64,
}

impl BattleRng {
    pub fn new(seed: u64) -> Self {
        Self { seed, nonce: 0 }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of draws made so far.
    pub fn draws(&self) -> u64 {
        self.nonce
    }

    pub fn next_u32(&mut self, actor: u64, salt: u32) -> u32 {
        let seed = compute_seed(self.seed, self.nonce, actor, salt);
        self.nonce = self.nonce.wrapping_add(1);
        PcgRng::next_u32(seed)
    }

    /// Uniform-ish value in `[0, bound)`. Returns 0 without drawing when `bound <= 1`.
    pub fn below(&mut self, actor: u64, salt: u32, bound: u32) -> u32 {
        if bound <= 1 {
            return 0;
        }
        self.next_u32(actor, salt) % bound
    }

    /// In-place Fisher-Yates shuffle.
    pub fn shuffle<T>(&mut self, actor: u64, salt: u32, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.below(actor, salt, (i + 1) as u32) as usize;
            items.swap(i, j);
        }
    }

    /// Picks `n` distinct elements with a partial Fisher-Yates pass.
    ///
    /// When `pool.len() <= n` the pool is returned unchanged and nothing is drawn.
    pub fn sample<T: Copy>(&mut self, actor: u64, salt: u32, pool: &[T], n: usize) -> Vec<T> {
        if pool.len() <= n {
            return pool.to_vec();
        }
        let mut scratch = pool.to_vec();
        for i in 0..n {
            let remaining = (scratch.len() - i) as u32;
            let j = i + self.below(actor, salt, remaining) as usize;
            scratch.swap(i, j);
        }
        scratch.truncate(n);
        scratch
    }
}
