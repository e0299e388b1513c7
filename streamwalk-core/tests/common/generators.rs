//! Seeded chunk splitting for stochastic tests
//!
//! Uses seeded RNG for reproducibility. Print seed on failure for replay.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeded generator for reproducible stochastic tests
pub struct Gen {
    pub rng: StdRng,
    pub seed: u64,
}

impl Gen {
    /// Create with specific seed (for reproduction)
    pub fn new(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed), seed }
    }

    /// Create from environment or random seed
    pub fn from_env_or_random() -> Self {
        let seed = std::env::var("STREAMWALK_TEST_SEED")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(rand::random);
        Self::new(seed)
    }

    /// Geometric distribution: count until rand > alpha
    /// Returns 0, 1, 2, ... with decreasing probability
    pub fn geometric(&mut self, alpha: f64) -> usize {
        let mut n = 0;
        while self.rng.gen::<f64>() < alpha {
            n += 1;
        }
        n
    }

    /// Random boolean with probability p
    pub fn chance(&mut self, p: f64) -> bool {
        self.rng.gen::<f64>() < p
    }

    /// Random byte offsets into an input of `len` bytes, sorted.
    ///
    /// Offsets land anywhere, including inside a UTF-8 sequence. Now and then
    /// an offset repeats, which yields an empty chunk.
    pub fn cuts(&mut self, len: usize) -> Vec<usize> {
        if len == 0 {
            return Vec::new();
        }
        let count = 1 + self.geometric(0.85);
        let mut cuts = Vec::with_capacity(count + 1);
        for _ in 0..count {
            let cut = self.rng.gen_range(0..=len);
            cuts.push(cut);
            if self.chance(0.05) {
                cuts.push(cut);
            }
        }
        cuts.sort_unstable();
        cuts
    }

    /// Split `input` into random chunks.
    pub fn split(&mut self, input: &[u8]) -> Vec<Vec<u8>> {
        let cuts = self.cuts(input.len());
        crate::common::chunk_at(input, &cuts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reproducibility() {
        let mut g1 = Gen::new(42);
        let mut g2 = Gen::new(42);

        for _ in 0..10 {
            assert_eq!(g1.cuts(100), g2.cuts(100));
            assert_eq!(g1.geometric(0.9), g2.geometric(0.9));
        }
    }

    #[test]
    fn test_split_keeps_every_byte() {
        let mut gen = Gen::new(7);
        let input = "<p>héllo &amp; world</p>".as_bytes();
        for _ in 0..50 {
            let chunks = gen.split(input);
            assert_eq!(chunks.concat(), input);
        }
    }
}
