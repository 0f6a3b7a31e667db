//! Chromosome operators for the feature search.
//!
//! Provides random generation, two-point crossover and bit-flip mutation.
//! Every operator returns new chromosomes; parents are never modified.

use rand::prelude::*;

use crate::schema::{Chromosome, Population};

/// Seedable random source threaded through all genetic operators.
pub struct ChromosomeRng {
    rng: StdRng,
}

impl ChromosomeRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniformly random bit mask of the given length.
    pub fn random_chromosome(&mut self, len: usize) -> Chromosome {
        Chromosome::new((0..len).map(|_| self.rng.gen_bool(0.5)).collect())
    }

    /// `size` independently random chromosomes.
    pub fn random_population(&mut self, size: usize, len: usize) -> Population {
        (0..size).map(|_| self.random_chromosome(len)).collect()
    }

    /// Two-point crossover with cut points drawn uniformly from `0..=len`.
    ///
    /// # Panics
    ///
    /// Panics if the parents differ in length.
    pub fn crossover(
        &mut self,
        parent_a: &Chromosome,
        parent_b: &Chromosome,
    ) -> (Chromosome, Chromosome) {
        assert_eq!(
            parent_a.len(),
            parent_b.len(),
            "crossover parents must have equal length"
        );
        let len = parent_a.len();
        let x = self.rng.gen_range(0..=len);
        let y = self.rng.gen_range(0..=len);
        crossover_at(parent_a, parent_b, x.min(y), x.max(y))
    }

    /// Flip each bit independently with probability `rate`.
    ///
    /// `rate` is clamped to `[0, 1]`; NaN counts as 0.
    pub fn mutate(&mut self, chromosome: &Chromosome, rate: f64) -> Chromosome {
        let rate = if rate.is_nan() {
            0.0
        } else {
            rate.clamp(0.0, 1.0)
        };
        Chromosome::new(
            chromosome
                .genes()
                .iter()
                .map(|&g| g ^ self.rng.gen_bool(rate))
                .collect(),
        )
    }

    /// Uniform index in `0..n`.
    pub fn index(&mut self, n: usize) -> usize {
        self.rng.gen_range(0..n)
    }
}

/// Two-point crossover at fixed cut points `c1 <= c2`.
///
/// The first child is `a[..c1] + b[c1..c2] + a[c2..]`; the second is the
/// complementary swap.
pub fn crossover_at(
    parent_a: &Chromosome,
    parent_b: &Chromosome,
    c1: usize,
    c2: usize,
) -> (Chromosome, Chromosome) {
    let (a, b) = (parent_a.genes(), parent_b.genes());
    let splice = |outer: &[bool], inner: &[bool]| {
        let mut genes = Vec::with_capacity(outer.len());
        genes.extend_from_slice(&outer[..c1]);
        genes.extend_from_slice(&inner[c1..c2]);
        genes.extend_from_slice(&outer[c2..]);
        Chromosome::new(genes)
    };
    (splice(a, b), splice(b, a))
}
