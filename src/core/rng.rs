//! Seedable RNG for shuffles, random draws and pod rolls.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical shuffles and pod rolls
//! - **Entropy-seeded** for interactive use
//!
//! ```
//! use mulligan_tool::core::DeckRng;
//!
//! let mut rng = DeckRng::new(7);
//! let mut data = vec![1, 2, 3, 4, 5];
//! rng.fisher_yates(&mut data);
//!
//! let mut again = DeckRng::new(7);
//! let mut data2 = vec![1, 2, 3, 4, 5];
//! again.fisher_yates(&mut data2);
//! assert_eq!(data, data2);
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// RNG handed to every randomized library and pod operation.
///
/// Uses ChaCha8 so seeded runs reproduce exactly across platforms.
#[derive(Clone, Debug)]
pub struct DeckRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl DeckRng {
    /// Create an RNG with a fixed seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an RNG seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng().gen())
    }

    /// The seed this stream was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform index in `0..upper`. `upper` must be non-zero.
    pub fn gen_index(&mut self, upper: usize) -> usize {
        self.inner.gen_range(0..upper)
    }

    /// Uniform float in `[0, 1)`.
    pub fn gen_unit(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// Fisher-Yates shuffle in place.
    ///
    /// Walks from the last index down to 1, swapping each slot with a
    /// uniformly chosen index in `[0, i]`.
    pub fn fisher_yates<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.inner.gen_range(0..=i);
            slice.swap(i, j);
        }
    }

    /// Pick an index with probability proportional to its weight.
    ///
    /// Negative weights count as zero. When every weight is zero the pick
    /// is uniform. Returns `None` only for an empty slice.
    pub fn choose_weighted(&mut self, weights: &[f64]) -> Option<usize> {
        if weights.is_empty() {
            return None;
        }

        let total: f64 = weights.iter().map(|w| w.max(0.0)).sum();
        if total <= 0.0 {
            return Some(self.gen_index(weights.len()));
        }

        let target = self.gen_unit() * total;
        let mut running = 0.0;
        for (i, weight) in weights.iter().enumerate() {
            running += weight.max(0.0);
            if running >= target {
                return Some(i);
            }
        }

        // Floating point edge case
        Some(weights.len() - 1)
    }
}

impl Default for DeckRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}
