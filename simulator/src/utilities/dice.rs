//! ----- DICE -----
//! Random draws behind a trait so tests can script every outcome.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of every random decision the simulation takes.
pub trait Dice {
    /// `true` with probability `p`.
    fn chance(&mut self, p: f64) -> bool;

    /// Uniform index in `0..len`. `len` must not be zero.
    fn pick(&mut self, len: usize) -> usize;
}

pub struct RandDice<R: Rng = StdRng> {
    rng: R,
}

impl RandDice<StdRng> {
    /// Reproducible when `seed` is given, seeded from the OS otherwise.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        RandDice { rng }
    }
}

impl<R: Rng> Dice for RandDice<R> {
    fn chance(&mut self, p: f64) -> bool {
        self.rng.gen_bool(p.clamp(0.0, 1.0))
    }

    fn pick(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}
