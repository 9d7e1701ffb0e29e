//! Deterministic random number generation for synthetic datasets.
//!
//! RULE: Synthetic data never calls any platform RNG.
//! Every stream is derived from one master seed, one stream per slot,
//! seeded from (master_seed XOR slot * golden ratio). Adding a slot
//! never changes existing streams.
//!
//! The evaluation core itself is fully deterministic and uses no RNG.

use rand::{Rng, RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// A named, deterministic RNG stream.
pub struct DatasetRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl DatasetRng {
    pub fn new(master_seed: u64, slot_index: u64) -> Self {
        let derived_seed = master_seed ^ (slot_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a usize in [0, n). Returns 0 when `n` is 0.
    pub fn below(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        self.inner.gen_range(0..n)
    }

    /// Uniform float in [lo, hi).
    pub fn between(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Bernoulli trial: true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.get(self.below(items.len()))
    }
}

pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn for_slot(&self, slot: DatasetSlot) -> DatasetRng {
        DatasetRng::new(self.master_seed, slot as u64).with_name(slot.name())
    }
}

/// Stable stream assignments.
/// NEVER reorder or remove entries; only append.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum DatasetSlot {
    Roster = 0,
    Names = 1,
    Quantitative = 2,
    Qualitative = 3,
}

impl DatasetSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Roster => "roster",
            Self::Names => "names",
            Self::Quantitative => "quantitative",
            Self::Qualitative => "qualitative",
        }
    }
}
