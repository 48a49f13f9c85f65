//! Deterministic random number generation for the headless player.
//!
//! RULE: nothing in the simulation core is random. Randomness only
//! decides what the automated player does, and it all flows through a
//! BotRng seeded from a single u64, so a seed fully reproduces a run.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

pub struct BotRng {
    inner: Pcg64Mcg,
}

impl BotRng {
    pub fn new(seed: u64) -> Self {
        Self { inner: Pcg64Mcg::seed_from_u64(seed) }
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Pick one element uniformly, `None` if empty.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        items.get(self.next_u64_below(items.len() as u64) as usize)
    }
}
