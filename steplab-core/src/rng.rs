//! Deterministic session RNG.
//!
//! A master seed is expanded into a per-symbol sub-seed with BLAKE3, so the
//! same `seed` replays the same anchor for a symbol while different symbols
//! still get independent draws.

use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSeed {
    master_seed: u64,
}

impl SessionSeed {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    /// Derive the sub-seed for `symbol`.
    pub fn sub_seed(&self, symbol: &str) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.master_seed.to_le_bytes());
        hasher.update(symbol.as_bytes());
        let hash = hasher.finalize();
        let mut word = [0u8; 8];
        word.copy_from_slice(&hash.as_bytes()[..8]);
        u64::from_le_bytes(word)
    }

    pub fn rng_for(&self, symbol: &str) -> StdRng {
        StdRng::seed_from_u64(self.sub_seed(symbol))
    }
}

/// Seeded RNG when a seed is configured, OS entropy otherwise.
pub fn session_rng(seed: Option<u64>, symbol: &str) -> StdRng {
    match seed {
        Some(s) => SessionSeed::new(s).rng_for(symbol),
        None => StdRng::from_entropy(),
    }
}
